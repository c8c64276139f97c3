//! Bulk startup engine and per-component start pipeline.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// Layer 3: Internal module imports
use super::manager::{invoke_user, safe_sync_callback, InvokeOutcome, LifecycleManager, ManagerInner};
use super::types::{
    FailedOptionalComponent, ShutdownOptions, SkippedComponent, StartCode, StartComponentOptions,
    StartReport, StartupCode, StartupOptions, StartupReport,
};
use crate::component::ComponentState;
use crate::events::{LifecycleEvent, LifecycleEventKind};

/// Clears the in-flight startup flag on every exit path and wakes anything
/// waiting for the startup to finish (a shutdown that arrived mid-loop).
struct StartingGuard {
    inner: Arc<ManagerInner>,
}

impl Drop for StartingGuard {
    fn drop(&mut self) {
        self.inner.is_starting.store(false, Ordering::SeqCst);
        self.inner.startup_gate.notify_waiters();
    }
}

/// Why a component was unavailable to its dependents during a bulk startup.
#[derive(Clone, Copy, PartialEq)]
enum Unavailable {
    Failed,
    Skipped,
    Stalled,
}

impl Unavailable {
    fn describe(&self) -> &'static str {
        match self {
            Unavailable::Failed => "failed to start",
            Unavailable::Skipped => "was skipped",
            Unavailable::Stalled => "is stalled",
        }
    }
}

impl LifecycleManager {
    /// Starts every registered component in dependency order.
    ///
    /// Preconditions reject overlapping bulk operations, an empty registry,
    /// stalled components (unless `ignore_stalled`), and a partially
    /// running registry. Optional components may fail without consequence
    /// for the operation; a required failure (or a shutdown arriving
    /// mid-loop) rolls back everything started so far, in reverse order.
    pub async fn start_all_components(&self, options: StartupOptions) -> StartupReport {
        let begun = Instant::now();

        if self.inner.is_shutting_down.load(Ordering::SeqCst) {
            return finish(
                StartupReport::failure(StartupCode::ShutdownInProgress, "Shutdown in progress"),
                begun,
            );
        }
        if self
            .inner
            .is_starting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return finish(
                StartupReport::failure(StartupCode::AlreadyInProgress, "Startup already in progress"),
                begun,
            );
        }
        let _guard = StartingGuard {
            inner: Arc::clone(&self.inner),
        };

        let (total, running, stalled) = {
            let registry = self.inner.registry.lock();
            (
                registry.len(),
                registry.count_in_state(ComponentState::Running),
                registry.names_in_state(ComponentState::Stalled),
            )
        };

        if total == 0 {
            return finish(
                StartupReport::failure(
                    StartupCode::NoComponentsRegistered,
                    "No components registered",
                ),
                begun,
            );
        }
        if !stalled.is_empty() && !options.ignore_stalled {
            let mut report = StartupReport::failure(
                StartupCode::StalledComponentsExist,
                "Stalled components exist; stop or unregister them first",
            );
            report.blocked_by_stalled_components = Some(stalled);
            return finish(report, begun);
        }
        if running == total {
            // Nothing to do; trivially successful.
            return finish(
                StartupReport {
                    success: true,
                    started_components: Vec::new(),
                    failed_optional_components: Vec::new(),
                    skipped_due_to_dependency: Vec::new(),
                    skipped_due_to_stall: Vec::new(),
                    blocked_by_stalled_components: None,
                    reason: None,
                    code: None,
                    error: None,
                    duration: Duration::ZERO,
                    timed_out: false,
                },
                begun,
            );
        }
        if running > 0 {
            return finish(
                StartupReport {
                    code: None,
                    ..StartupReport::failure(
                        StartupCode::UnknownError,
                        "Components are partially running; stop all components first",
                    )
                },
                begun,
            );
        }

        // Fresh cycle: clear the previous attribution and arm a new token.
        *self.inner.shutdown_method.lock() = None;
        *self.inner.shutdown_token.lock() = CancellationToken::new();

        let order = match self.startup_order() {
            Ok(order) => order,
            Err(cycle) => {
                let mut report = StartupReport::failure(
                    StartupCode::DependencyCycle,
                    "Dependency cycle in registry",
                );
                report.error = Some(cycle.to_string());
                return finish(report, begun);
            }
        };

        let bound = options
            .timeout
            .unwrap_or(self.inner.config.startup_timeout);
        let deadline = (!bound.is_zero()).then(|| begun + bound);

        info!(components = order.len(), "Starting all components");

        let mut started: Vec<String> = Vec::new();
        let mut failed_optional: Vec<FailedOptionalComponent> = Vec::new();
        let mut skipped_dependency: Vec<SkippedComponent> = Vec::new();
        let mut skipped_stall: Vec<String> = Vec::new();
        let mut unavailable: HashMap<String, Unavailable> = HashMap::new();
        let mut timed_out = false;

        for name in &order {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                timed_out = true;
                break;
            }

            let Some((state, dependencies, optional)) = ({
                let registry = self.inner.registry.lock();
                registry
                    .get(name)
                    .map(|e| (e.state(), e.dependencies.clone(), e.optional))
            }) else {
                continue;
            };

            if state == ComponentState::Stalled {
                skipped_stall.push(name.clone());
                unavailable.insert(name.clone(), Unavailable::Stalled);
                continue;
            }
            if state == ComponentState::Running {
                continue;
            }

            // Dependency gating: a required dependency that failed, was
            // skipped, is stalled, or is missing blocks this component.
            let mut skip: Option<SkippedComponent> = None;
            {
                let registry = self.inner.registry.lock();
                for dep in &dependencies {
                    let Some(dep_entry) = registry.get(dep) else {
                        skip = Some(SkippedComponent {
                            name: name.clone(),
                            dependency: dep.clone(),
                            reason: "is not registered".into(),
                        });
                        break;
                    };
                    if let Some(cause) = unavailable.get(dep) {
                        if !dep_entry.optional {
                            skip = Some(SkippedComponent {
                                name: name.clone(),
                                dependency: dep.clone(),
                                reason: cause.describe().into(),
                            });
                            break;
                        }
                        debug!(
                            component = %name,
                            dependency = %dep,
                            "Optional dependency unavailable; continuing"
                        );
                    }
                }
            }
            if let Some(skipped) = skip {
                warn!(
                    component = %name,
                    dependency = %skipped.dependency,
                    reason = %skipped.reason,
                    "Skipping component: required dependency unavailable"
                );
                skipped_dependency.push(skipped);
                unavailable.insert(name.clone(), Unavailable::Skipped);
                continue;
            }

            // A shutdown signal that arrived mid-loop aborts the startup and
            // rolls back; its events belong to the outer shutdown.
            if self.inner.is_shutting_down.load(Ordering::SeqCst) {
                warn!("Shutdown during startup; rolling back started components");
                self.rollback_started(&started).await;
                let mut report = StartupReport::failure(
                    StartupCode::ShutdownInProgress,
                    "Shutdown requested during startup",
                );
                return finish(report_with_skips(&mut report, failed_optional, skipped_dependency, skipped_stall), begun);
            }

            match self.start_component_pipeline(name, true, false).await {
                Ok(_) => started.push(name.clone()),
                Err((code, error)) => {
                    let message = error.unwrap_or_else(|| format!("start failed ({code:?})"));
                    if optional {
                        warn!(
                            component = %name,
                            error = %message,
                            "Optional component failed to start; continuing"
                        );
                        {
                            let mut registry = self.inner.registry.lock();
                            if let Some(entry) = registry.get_mut(name) {
                                entry.record.mark_failed(&message);
                            }
                        }
                        failed_optional.push(FailedOptionalComponent {
                            name: name.clone(),
                            error: message,
                        });
                        unavailable.insert(name.clone(), Unavailable::Failed);
                        continue;
                    }

                    warn!(
                        component = %name,
                        error = %message,
                        "Required component failed to start; rolling back"
                    );
                    self.rollback_started(&started).await;
                    let mut report = StartupReport::failure(
                        StartupCode::UnknownError,
                        format!("Component '{name}' failed to start"),
                    );
                    report.code = None;
                    report.error = Some(message);
                    return finish(report_with_skips(&mut report, failed_optional, skipped_dependency, skipped_stall), begun);
                }
            }
        }

        if timed_out {
            warn!(started = started.len(), "Global startup timeout reached");
            let mut report =
                StartupReport::failure(StartupCode::StartupTimeout, "Global startup timeout");
            report.started_components = started;
            report.timed_out = true;
            return finish(report_with_skips(&mut report, failed_optional, skipped_dependency, skipped_stall), begun);
        }

        info!(started = started.len(), "All components started");
        self.emit(LifecycleEvent::global(LifecycleEventKind::ManagerStarted {
            started: started.clone(),
        }));

        finish(
            StartupReport {
                success: true,
                started_components: started,
                failed_optional_components: failed_optional,
                skipped_due_to_dependency: skipped_dependency,
                skipped_due_to_stall: skipped_stall,
                blocked_by_stalled_components: None,
                reason: None,
                code: None,
                error: None,
                duration: Duration::ZERO,
                timed_out: false,
            },
            begun,
        )
    }

    /// Starts one component through the per-component pipeline.
    pub async fn start_component(
        &self,
        name: &str,
        options: StartComponentOptions,
    ) -> StartReport {
        let begun = Instant::now();
        match self
            .start_component_pipeline(name, false, options.allow_required_dependencies)
            .await
        {
            Ok(_) => StartReport {
                success: true,
                code: None,
                error: None,
                duration: begun.elapsed(),
            },
            Err((code, error)) => StartReport {
                success: false,
                code: Some(code),
                error,
                duration: begun.elapsed(),
            },
        }
    }

    /// Stops then starts one component.
    pub async fn restart_component(&self, name: &str) -> StartReport {
        let begun = Instant::now();
        if self.is_component_running(name) {
            let stop = self
                .stop_component(name, super::types::StopComponentOptions::default())
                .await;
            if !stop.success {
                return StartReport {
                    success: false,
                    code: Some(StartCode::StartFailed),
                    error: Some(
                        stop.error
                            .unwrap_or_else(|| "restart aborted: stop failed".into()),
                    ),
                    duration: begun.elapsed(),
                };
            }
        }
        let mut report = self
            .start_component(name, StartComponentOptions::default())
            .await;
        report.duration = begun.elapsed();
        report
    }

    /// Stops every component, then starts them again.
    pub async fn restart_all_components(&self) -> StartupReport {
        let _ = self.stop_all_components(ShutdownOptions::default()).await;
        self.start_all_components(StartupOptions::default()).await
    }

    /// Rolls back the given components in reverse start order via the stop
    /// pipeline. Events for each component carry the rollback marker; the
    /// surrounding operation emits no shutdown-initiated/completed pair of
    /// its own.
    pub(crate) async fn rollback_started(&self, started: &[String]) {
        for name in started.iter().rev() {
            self.emit(LifecycleEvent::component(
                name,
                LifecycleEventKind::StartupRollback,
            ));
            let _ = self.stop_pipeline(name, None).await;
        }
    }

    /// Per-component start: preconditions, `Starting` transition, the user
    /// `start()` raced against the component's startup timeout, and the
    /// resulting state transition.
    ///
    /// A timed-out `start()` keeps running detached; `on_startup_aborted`
    /// fires synchronously (best-effort) so the component can abandon its
    /// own work.
    pub(crate) async fn start_component_pipeline(
        &self,
        name: &str,
        allow_during_bulk: bool,
        allow_required_dependencies: bool,
    ) -> Result<Duration, (StartCode, Option<String>)> {
        if self.inner.is_shutting_down.load(Ordering::SeqCst) {
            return Err((StartCode::ShutdownInProgress, None));
        }
        if !allow_during_bulk && self.inner.is_starting.load(Ordering::SeqCst) {
            return Err((StartCode::StartupInProgress, None));
        }

        let (component, startup_timeout, capabilities) = {
            let mut registry = self.inner.registry.lock();
            let Some(entry) = registry.get(name) else {
                return Err((StartCode::NotFound, None));
            };
            match entry.state() {
                ComponentState::Running => return Err((StartCode::AlreadyRunning, None)),
                ComponentState::Starting => return Err((StartCode::AlreadyStarting, None)),
                ComponentState::Stalled => return Err((StartCode::ComponentStalled, None)),
                ComponentState::Stopping | ComponentState::ForceStopping => {
                    return Err((
                        StartCode::StartFailed,
                        Some("cannot start while a stop is in flight".into()),
                    ))
                }
                ComponentState::Registered | ComponentState::Stopped | ComponentState::Failed => {}
            }

            if !allow_required_dependencies {
                for dep in &entry.dependencies {
                    let Some(dep_entry) = registry.get(dep) else {
                        return Err((
                            StartCode::DependencyNotRunning,
                            Some(format!("dependency '{dep}' is not registered")),
                        ));
                    };
                    if !dep_entry.is_running() {
                        if dep_entry.optional {
                            debug!(
                                component = %name,
                                dependency = %dep,
                                "Optional dependency not running"
                            );
                        } else {
                            return Err((
                                StartCode::DependencyNotRunning,
                                Some(format!("dependency '{dep}' is not running")),
                            ));
                        }
                    }
                }
            }

            let component = {
                let Some(entry) = registry.get_mut(name) else {
                    return Err((StartCode::NotFound, None));
                };
                entry.record.mark_starting();
                Arc::clone(&entry.component)
            };
            let timeouts = component.timeouts();
            let capabilities = component.capabilities();
            (component, timeouts.startup, capabilities)
        };

        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ComponentStarting,
        ));
        debug!(component = %name, "Starting component");

        let begun = Instant::now();
        let task_component = Arc::clone(&component);
        let outcome = invoke_user(startup_timeout, async move {
            task_component.start().await
        })
        .await;

        match outcome {
            InvokeOutcome::Completed(Ok(())) => {
                let duration = begun.elapsed();
                let first_running = {
                    let mut registry = self.inner.registry.lock();
                    if let Some(entry) = registry.get_mut(name) {
                        entry.record.mark_running();
                    }
                    registry.count_in_state(ComponentState::Running) == 1
                };
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ComponentStarted { duration },
                ));
                info!(
                    component = %name,
                    duration_ms = duration.as_millis() as u64,
                    "Component started"
                );
                if first_running && self.inner.config.attach_signals_on_start {
                    if let Err(err) = self.attach_signals().await {
                        warn!(error = %err, "Failed to attach signal coordinator");
                    }
                }
                Ok(duration)
            }
            InvokeOutcome::Completed(Err(error)) => {
                {
                    let mut registry = self.inner.registry.lock();
                    if let Some(entry) = registry.get_mut(name) {
                        entry.record.mark_start_failed(&error);
                    }
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::StartFailed {
                        error: error.clone(),
                    },
                ));
                warn!(component = %name, error = %error, "Component failed to start");
                Err((StartCode::StartFailed, Some(error)))
            }
            InvokeOutcome::TimedOut => {
                if capabilities.on_startup_aborted {
                    safe_sync_callback(name, "on_startup_aborted", || {
                        component.on_startup_aborted();
                    });
                }
                let message = format!(
                    "start timed out after {}ms",
                    startup_timeout.as_millis()
                );
                {
                    let mut registry = self.inner.registry.lock();
                    if let Some(entry) = registry.get_mut(name) {
                        entry.record.mark_start_failed(&message);
                    }
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::StartTimeout {
                        timeout: startup_timeout,
                    },
                ));
                warn!(
                    component = %name,
                    timeout_ms = startup_timeout.as_millis() as u64,
                    "Component start timed out"
                );
                Err((StartCode::StartTimeout, Some(message)))
            }
        }
    }
}

/// Stamps the final duration on a report.
fn finish(mut report: StartupReport, begun: Instant) -> StartupReport {
    report.duration = begun.elapsed();
    report
}

/// Folds accumulated skip bookkeeping into a failure report.
fn report_with_skips(
    report: &mut StartupReport,
    failed_optional: Vec<FailedOptionalComponent>,
    skipped_dependency: Vec<SkippedComponent>,
    skipped_stall: Vec<String>,
) -> StartupReport {
    report.failed_optional_components = failed_optional;
    report.skipped_due_to_dependency = skipped_dependency;
    report.skipped_due_to_stall = skipped_stall;
    report.clone()
}
