//! Health engine: per-component probes and the aggregate report.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
use chrono::Utc;
use futures::future::join_all;
use tracing::debug;

// Layer 3: Internal module imports
use super::manager::{invoke_user, InvokeOutcome, LifecycleManager};
use super::types::{AggregateHealthCode, AggregateHealthReport, HealthCode, HealthReport};
use crate::component::{Component, ComponentState};
use crate::events::{LifecycleEvent, LifecycleEventKind};

impl LifecycleManager {
    /// Probes one component's health.
    ///
    /// Unknown, stopped, and stalled components classify without invoking
    /// user code; a component without a probe is implicitly healthy
    /// (`NoHandler`). The probe is raced against the component's health
    /// timeout.
    pub async fn check_component_health(&self, name: &str) -> HealthReport {
        let checked_at = Utc::now();
        let begun = Instant::now();

        let classify = |healthy: bool, code: HealthCode| HealthReport {
            name: name.to_string(),
            healthy,
            message: None,
            details: None,
            checked_at,
            duration: begun.elapsed(),
            error: None,
            timed_out: false,
            code,
        };

        let (component, bound): (Arc<dyn Component>, Duration) = {
            let registry = self.inner.registry.lock();
            let Some(entry) = registry.get(name) else {
                return classify(false, HealthCode::NotFound);
            };
            match entry.state() {
                ComponentState::Running => {}
                ComponentState::Stalled => return classify(false, HealthCode::Stalled),
                _ => return classify(false, HealthCode::Stopped),
            }
            if !entry.component.capabilities().health_check {
                // No probe means implicitly OK.
                return classify(true, HealthCode::NoHandler);
            }
            (
                Arc::clone(&entry.component),
                entry.component.timeouts().health_check,
            )
        };

        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::HealthCheckStarted,
        ));

        let task_component = Arc::clone(&component);
        let outcome = invoke_user(bound, async move {
            task_component.health_check().await
        })
        .await;

        match outcome {
            InvokeOutcome::Completed(Ok(status)) => {
                let duration = begun.elapsed();
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::HealthCheckCompleted {
                        healthy: status.healthy,
                        duration,
                    },
                ));
                debug!(component = %name, healthy = status.healthy, "Health probe completed");
                HealthReport {
                    name: name.to_string(),
                    healthy: status.healthy,
                    message: status.message,
                    details: status.details,
                    checked_at,
                    duration,
                    error: None,
                    timed_out: false,
                    code: HealthCode::Ok,
                }
            }
            InvokeOutcome::Completed(Err(error)) => {
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::HealthCheckFailed {
                        error: error.clone(),
                    },
                ));
                HealthReport {
                    error: Some(error),
                    ..classify(false, HealthCode::Error)
                }
            }
            InvokeOutcome::TimedOut => {
                let message = format!("health check timed out after {}ms", bound.as_millis());
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::HealthCheckFailed {
                        error: message.clone(),
                    },
                ));
                HealthReport {
                    error: Some(message),
                    timed_out: true,
                    ..classify(false, HealthCode::Timeout)
                }
            }
        }
    }

    /// Probes every running component in parallel and aggregates.
    ///
    /// Overall `healthy` holds iff every probe reported healthy; the
    /// overall code takes the worst classification with precedence
    /// `Error > Timeout > Degraded > Ok`, where degraded is any unhealthy
    /// result other than an implicit `NoHandler` OK.
    pub async fn check_all_health(&self) -> AggregateHealthReport {
        let checked_at = Utc::now();
        let begun = Instant::now();

        let names = self.running_components();
        let probes = names.iter().map(|name| self.check_component_health(name));
        let components = join_all(probes).await;

        let healthy = components.iter().all(|r| r.healthy);
        let code = if components.iter().any(|r| r.code == HealthCode::Error) {
            AggregateHealthCode::Error
        } else if components.iter().any(|r| r.code == HealthCode::Timeout) {
            AggregateHealthCode::Timeout
        } else if components
            .iter()
            .any(|r| !r.healthy && r.code != HealthCode::NoHandler)
        {
            AggregateHealthCode::Degraded
        } else {
            AggregateHealthCode::Ok
        };

        AggregateHealthReport {
            healthy,
            code,
            components,
            checked_at,
            duration: begun.elapsed(),
        }
    }
}
