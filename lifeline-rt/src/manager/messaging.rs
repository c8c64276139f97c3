//! Point-to-point messaging, broadcast, and shared-value lookups.

// Layer 1: Standard library imports
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde_json::Value;
use tracing::debug;

// Layer 3: Internal module imports
use super::manager::{invoke_user, InvokeOutcome, LifecycleManager};
use super::types::{
    BroadcastEntry, BroadcastOptions, BroadcastReport, SendCode, SendOptions, SendReport,
    ValueCode, ValueOptions, ValueReport,
};
use crate::component::{Component, ComponentState};
use crate::events::{LifecycleEvent, LifecycleEventKind};

impl LifecycleManager {
    /// Delivers a message to one component's `on_message` handler.
    ///
    /// A handler error is a *delivery success* (`sent` is true, `code` is
    /// `Error`): the message reached the component; what it did with it is
    /// the component's business.
    pub async fn send_message_to_component(
        &self,
        name: &str,
        payload: Value,
        options: SendOptions,
    ) -> SendReport {
        let from = options.from.clone();

        let reject = |code: SendCode, found: bool, running: bool| {
            self.emit(LifecycleEvent::component(
                name,
                LifecycleEventKind::MessageFailed {
                    from: from.clone(),
                    code: code.as_str().into(),
                },
            ));
            SendReport::not_delivered(code, found, running)
        };

        let component: Arc<dyn Component> = {
            let registry = self.inner.registry.lock();
            let Some(entry) = registry.get(name) else {
                drop(registry);
                return reject(SendCode::NotFound, false, false);
            };
            match entry.state() {
                ComponentState::Running => {}
                ComponentState::Stalled if !options.include_stalled => {
                    drop(registry);
                    return reject(SendCode::Stalled, true, false);
                }
                ComponentState::Stalled => {}
                _ if !options.include_stopped => {
                    drop(registry);
                    return reject(SendCode::Stopped, true, false);
                }
                _ => {}
            }
            if !entry.component.capabilities().on_message {
                let running = entry.is_running();
                drop(registry);
                return reject(SendCode::NoHandler, true, running);
            }
            Arc::clone(&entry.component)
        };
        let component_running = self.is_component_running(name);

        let bound = options
            .timeout
            .unwrap_or(self.inner.config.message_timeout);
        let task_from = from.clone();
        let outcome = invoke_user(bound, async move {
            component.on_message(payload, task_from).await
        })
        .await;

        match outcome {
            InvokeOutcome::Completed(Ok(data)) => {
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::MessageSent { from: from.clone() },
                ));
                debug!(component = %name, from = ?from, "Message delivered");
                SendReport {
                    sent: true,
                    component_found: true,
                    component_running,
                    handler_implemented: true,
                    data,
                    error: None,
                    timed_out: false,
                    code: SendCode::Sent,
                }
            }
            InvokeOutcome::Completed(Err(error)) => {
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::MessageFailed {
                        from: from.clone(),
                        code: SendCode::Error.as_str().into(),
                    },
                ));
                SendReport {
                    sent: true,
                    component_found: true,
                    component_running,
                    handler_implemented: true,
                    data: None,
                    error: Some(error),
                    timed_out: false,
                    code: SendCode::Error,
                }
            }
            InvokeOutcome::TimedOut => {
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::MessageFailed {
                        from: from.clone(),
                        code: SendCode::Timeout.as_str().into(),
                    },
                ));
                SendReport {
                    sent: false,
                    component_found: true,
                    component_running,
                    handler_implemented: true,
                    data: None,
                    error: None,
                    timed_out: true,
                    code: SendCode::Timeout,
                }
            }
        }
    }

    /// Broadcasts a message, delivering sequentially in target order.
    ///
    /// The target set is the explicit `component_names` when given,
    /// otherwise every running component (plus stalled/stopped components
    /// when their include flags are set) in registry order. The returned
    /// deliveries preserve target-iteration order.
    pub async fn broadcast_message(
        &self,
        payload: Value,
        options: BroadcastOptions,
    ) -> BroadcastReport {
        let targets: Vec<String> = match &options.component_names {
            Some(names) => names.clone(),
            None => {
                let registry = self.inner.registry.lock();
                registry
                    .iter()
                    .filter(|e| match e.state() {
                        ComponentState::Running => true,
                        ComponentState::Stalled => options.include_stalled,
                        _ => options.include_stopped,
                    })
                    .map(|e| e.name.clone())
                    .collect()
            }
        };

        self.emit(LifecycleEvent::global(LifecycleEventKind::BroadcastStarted {
            targets: targets.len(),
        }));

        let mut deliveries = Vec::with_capacity(targets.len());
        for name in targets {
            let report = self
                .send_message_to_component(
                    &name,
                    payload.clone(),
                    SendOptions {
                        timeout: options.timeout,
                        include_stopped: options.include_stopped,
                        include_stalled: options.include_stalled,
                        from: options.from.clone(),
                    },
                )
                .await;
            deliveries.push(BroadcastEntry { name, report });
        }

        let report = BroadcastReport { deliveries };
        self.emit(LifecycleEvent::global(
            LifecycleEventKind::BroadcastCompleted {
                delivered: report.delivered(),
                failed: report.failed(),
            },
        ));
        report
    }

    /// Synchronous shared-value lookup against one component.
    ///
    /// Handler errors (and panics) are isolated and reported as
    /// `code = Error`.
    pub fn get_value(&self, name: &str, key: &str, options: ValueOptions) -> ValueReport {
        let requested_by = options.requested_by;
        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ValueRequested {
                key: key.to_string(),
                from: requested_by.clone(),
            },
        ));

        let mut report = ValueReport {
            found: false,
            value: None,
            component_found: false,
            component_running: false,
            handler_implemented: false,
            requested_by: requested_by.clone(),
            code: ValueCode::NotFound,
        };

        let component: Arc<dyn Component> = {
            let registry = self.inner.registry.lock();
            let Some(entry) = registry.get(name) else {
                return self.finish_value_lookup(name, key, report);
            };
            report.component_found = true;
            match entry.state() {
                ComponentState::Running => {}
                ComponentState::Stalled => {
                    report.code = ValueCode::Stalled;
                    drop(registry);
                    return self.finish_value_lookup(name, key, report);
                }
                _ => {
                    report.code = ValueCode::Stopped;
                    drop(registry);
                    return self.finish_value_lookup(name, key, report);
                }
            }
            report.component_running = true;
            if !entry.component.capabilities().get_value {
                report.code = ValueCode::NoHandler;
                drop(registry);
                return self.finish_value_lookup(name, key, report);
            }
            report.handler_implemented = true;
            Arc::clone(&entry.component)
        };

        let lookup = catch_unwind(AssertUnwindSafe(|| {
            component.get_value(key, requested_by.as_deref())
        }));

        match lookup {
            Ok(Ok(reply)) if reply.found => {
                report.found = true;
                report.value = reply.value;
                report.code = ValueCode::Found;
            }
            Ok(Ok(_)) => {
                report.code = ValueCode::NotFound;
            }
            Ok(Err(err)) => {
                tracing::error!(
                    target: "lifeline::report",
                    component = %name,
                    key = %key,
                    error = %err,
                    "Value handler failed"
                );
                report.code = ValueCode::Error;
            }
            Err(_) => {
                tracing::error!(
                    target: "lifeline::report",
                    component = %name,
                    key = %key,
                    "Value handler panicked"
                );
                report.code = ValueCode::Error;
            }
        }

        self.finish_value_lookup(name, key, report)
    }

    /// Emits the value-returned event and hands the report back.
    fn finish_value_lookup(&self, name: &str, key: &str, report: ValueReport) -> ValueReport {
        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ValueReturned {
                key: key.to_string(),
                found: report.found,
            },
        ));
        report
    }
}
