//! Shutdown engine: warning phase, graceful-then-force pipeline, stall
//! tracking, and the global shutdown bound.

// Layer 1: Standard library imports
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

// Layer 3: Internal module imports
use super::config::WarningTimeout;
use super::manager::{invoke_user, safe_sync_callback, InvokeOutcome, LifecycleManager, ManagerInner};
use super::types::{
    ShutdownCode, ShutdownMethod, ShutdownOptions, ShutdownReport, StopCode, StopComponentOptions,
    StopReport,
};
use crate::component::{Component, ComponentState, StallPhase, StallReason, StallRecord};
use crate::events::{LifecycleEvent, LifecycleEventKind};

/// Clears the in-flight shutdown flag on every exit path.
struct ShuttingDownGuard {
    inner: Arc<ManagerInner>,
}

impl Drop for ShuttingDownGuard {
    fn drop(&mut self) {
        self.inner.is_shutting_down.store(false, Ordering::SeqCst);
    }
}

/// How the graceful phase failed, feeding the force phase's stall reason.
#[derive(Clone, Copy, PartialEq)]
enum GracefulFailure {
    Timeout,
    Error,
}

/// Outcome of the per-component stop pipeline.
pub(crate) struct PipelineOutcome {
    /// Whether the component reached `Stopped`.
    pub(crate) stopped: bool,

    /// Stall details when the component ended up stalled.
    pub(crate) stall: Option<StallRecord>,

    /// The failing phase's error message, if any.
    pub(crate) error: Option<String>,
}

impl LifecycleManager {
    /// Stops every running component in reverse dependency order.
    ///
    /// Runs the global warning phase first, then each component through the
    /// graceful-then-force pipeline. Stalled components are retried through
    /// the force phase when `retry_stalled` is set; `halt_on_stall` stops
    /// processing at the first stall. A global bound caps the whole
    /// operation and returns partial progress when it elapses.
    pub async fn stop_all_components(&self, options: ShutdownOptions) -> ShutdownReport {
        self.shutdown_with_method(options, ShutdownMethod::Manual)
            .await
    }

    /// Shutdown entry point with explicit method attribution.
    pub(crate) async fn shutdown_with_method(
        &self,
        options: ShutdownOptions,
        method: ShutdownMethod,
    ) -> ShutdownReport {
        let begun = Instant::now();

        if self
            .inner
            .is_shutting_down
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return ShutdownReport {
                success: false,
                method,
                stopped_components: Vec::new(),
                stalled_components: Vec::new(),
                reason: Some("Shutdown already in progress".into()),
                code: Some(ShutdownCode::AlreadyInProgress),
                duration: begun.elapsed(),
                timed_out: false,
            };
        }
        let _guard = ShuttingDownGuard {
            inner: Arc::clone(&self.inner),
        };

        // Attribution is retained until the next successful startup.
        *self.inner.shutdown_method.lock() = Some(method);
        let token = self.inner.shutdown_token.lock().clone();
        token.cancel();

        self.emit(LifecycleEvent::global(LifecycleEventKind::ShutdownInitiated {
            method: method.as_str().into(),
        }));
        info!(method = method.as_str(), "Shutdown initiated");

        // A startup in flight observes the flag and rolls back; wait for it
        // so the two engines never mutate state concurrently.
        while self.inner.is_starting.load(Ordering::SeqCst) {
            let notified = self.inner.startup_gate.notified();
            if !self.inner.is_starting.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }

        self.run_warning_phase().await;

        // Reverse topological order; reverse registration order if the
        // resolver fails (cycle introduced after registration).
        let order: Vec<String> = match self.startup_order() {
            Ok(mut order) => {
                order.reverse();
                order
            }
            Err(err) => {
                tracing::error!(
                    target: "lifeline::report",
                    error = %err,
                    "Resolver failed during shutdown; falling back to reverse registration order"
                );
                let mut names = self.component_names();
                names.reverse();
                names
            }
        };

        let bound = options
            .timeout
            .unwrap_or(self.inner.config.shutdown_timeout);
        let deadline = (!bound.is_zero()).then(|| begun + bound);

        let mut stopped: Vec<String> = Vec::new();
        let mut stalls: Vec<StallRecord> = Vec::new();
        let mut timed_out = false;

        for name in &order {
            let state = {
                let registry = self.inner.registry.lock();
                match registry.get(name) {
                    Some(entry) => entry.state(),
                    None => continue,
                }
            };
            if state != ComponentState::Running && state != ComponentState::Stalled {
                continue;
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                timed_out = true;
                break;
            }

            if state == ComponentState::Stalled {
                if options.retry_stalled {
                    let outcome = self.retry_stalled_pipeline(name).await;
                    if outcome.stopped {
                        stopped.push(name.clone());
                    } else if let Some(stall) = outcome.stall {
                        stalls.push(stall);
                        if options.halt_on_stall {
                            break;
                        }
                    }
                } else {
                    let existing = {
                        let registry = self.inner.registry.lock();
                        registry.get(name).and_then(|e| e.record.stall.clone())
                    };
                    if let Some(stall) = existing {
                        stalls.push(stall);
                    }
                    if options.halt_on_stall {
                        break;
                    }
                }
                continue;
            }

            let outcome = self.stop_pipeline(name, None).await;
            if outcome.stopped {
                stopped.push(name.clone());
            } else if let Some(stall) = outcome.stall {
                stalls.push(stall);
                if options.halt_on_stall {
                    warn!(component = %name, "Halting shutdown on stall");
                    break;
                }
            }
        }

        let duration = begun.elapsed();
        let success = stalls.is_empty() && !timed_out;
        let (code, reason) = if timed_out {
            (
                Some(ShutdownCode::ShutdownTimeout),
                Some("Global shutdown timeout".to_string()),
            )
        } else if !stalls.is_empty() {
            (
                Some(ShutdownCode::ComponentStalled),
                Some(format!("{} component(s) stalled", stalls.len())),
            )
        } else {
            (None, None)
        };

        self.emit(LifecycleEvent::global(LifecycleEventKind::ShutdownCompleted {
            stopped: stopped.len(),
            stalled: stalls.len(),
            duration,
        }));
        if success {
            info!(
                stopped = stopped.len(),
                duration_ms = duration.as_millis() as u64,
                "Shutdown complete"
            );
        } else {
            warn!(
                stopped = stopped.len(),
                stalled = stalls.len(),
                timed_out,
                "Shutdown finished with failures"
            );
        }

        ShutdownReport {
            success,
            method,
            stopped_components: stopped,
            stalled_components: stalls,
            reason,
            code,
            duration,
            timed_out,
        }
    }

    /// Stops a single component.
    ///
    /// Rejects when running components depend on this one, unless `force`
    /// is set. The per-call `timeout` overrides the component's graceful
    /// bound.
    pub async fn stop_component(&self, name: &str, options: StopComponentOptions) -> StopReport {
        let begun = Instant::now();

        let fail = |code: StopCode, error: Option<String>| StopReport {
            success: false,
            code: Some(code),
            error,
            stall: None,
            duration: begun.elapsed(),
        };

        {
            let registry = self.inner.registry.lock();
            let Some(entry) = registry.get(name) else {
                return fail(StopCode::NotFound, None);
            };
            match entry.state() {
                ComponentState::Running => {}
                ComponentState::Stalled => return fail(StopCode::ComponentStalled, None),
                ComponentState::Stopping | ComponentState::ForceStopping => {
                    return fail(StopCode::AlreadyStopping, None)
                }
                _ => return fail(StopCode::ComponentNotRunning, None),
            }

            if !options.force {
                let dependents: Vec<String> = registry
                    .iter()
                    .filter(|e| e.is_running() && e.dependencies.iter().any(|d| d == name))
                    .map(|e| e.name.clone())
                    .collect();
                if !dependents.is_empty() {
                    return fail(
                        StopCode::HasRunningDependents,
                        Some(format!("running dependents: {}", dependents.join(", "))),
                    );
                }
            }
        }

        let outcome = self.stop_pipeline(name, options.timeout).await;
        if outcome.stopped {
            StopReport {
                success: true,
                code: None,
                error: None,
                stall: None,
                duration: begun.elapsed(),
            }
        } else if outcome.stall.is_some() {
            StopReport {
                success: false,
                code: Some(StopCode::Stalled),
                error: outcome.error,
                stall: outcome.stall,
                duration: begun.elapsed(),
            }
        } else {
            fail(StopCode::ComponentNotRunning, outcome.error)
        }
    }

    /// Graceful-then-force stop pipeline for one running component.
    ///
    /// B1 races the user `stop()` against the graceful bound (or the
    /// per-call override). On failure B2 races `on_shutdown_force` against
    /// the force bound; a component without the force hook stalls
    /// immediately with the graceful phase's reason. A component whose
    /// graceful phase timed out *and* whose force phase failed stalls with
    /// reason `Both`.
    pub(crate) async fn stop_pipeline(
        &self,
        name: &str,
        timeout_override: Option<Duration>,
    ) -> PipelineOutcome {
        let attempt_started_at = Utc::now();
        let begun = Instant::now();

        let Some((component, timeouts, capabilities)) = ({
            let mut registry = self.inner.registry.lock();
            match registry.get_mut(name) {
                Some(entry) if entry.is_running() => {
                    entry.record.mark_stopping();
                    Some((
                        Arc::clone(&entry.component),
                        entry.component.timeouts(),
                        entry.component.capabilities(),
                    ))
                }
                _ => None,
            }
        }) else {
            return PipelineOutcome {
                stopped: false,
                stall: None,
                error: Some("component is not running".into()),
            };
        };

        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ComponentStopping,
        ));
        debug!(component = %name, "Stopping component");

        let graceful_bound = timeout_override.unwrap_or(timeouts.shutdown_graceful);
        let task_component = Arc::clone(&component);
        let outcome = invoke_user(graceful_bound, async move {
            task_component.stop().await
        })
        .await;

        let (graceful_failure, graceful_error) = match outcome {
            InvokeOutcome::Completed(Ok(())) => {
                let duration = begun.elapsed();
                {
                    let mut registry = self.inner.registry.lock();
                    if let Some(entry) = registry.get_mut(name) {
                        entry.record.mark_stopped();
                    }
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ComponentStopped { duration },
                ));
                info!(
                    component = %name,
                    duration_ms = duration.as_millis() as u64,
                    "Component stopped"
                );
                return PipelineOutcome {
                    stopped: true,
                    stall: None,
                    error: None,
                };
            }
            InvokeOutcome::Completed(Err(error)) => {
                warn!(component = %name, error = %error, "Graceful stop failed");
                (GracefulFailure::Error, Some(error))
            }
            InvokeOutcome::TimedOut => {
                if capabilities.on_stop_aborted {
                    safe_sync_callback(name, "on_stop_aborted", || {
                        component.on_stop_aborted();
                    });
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::StopTimeout {
                        timeout: graceful_bound,
                    },
                ));
                warn!(
                    component = %name,
                    timeout_ms = graceful_bound.as_millis() as u64,
                    "Graceful stop timed out"
                );
                (GracefulFailure::Timeout, None)
            }
        };

        // B2: force phase.
        {
            let mut registry = self.inner.registry.lock();
            if let Some(entry) = registry.get_mut(name) {
                entry.record.mark_force_stopping();
            }
        }

        if !capabilities.on_shutdown_force {
            let stall = StallRecord {
                name: name.to_string(),
                phase: StallPhase::Graceful,
                reason: match graceful_failure {
                    GracefulFailure::Timeout => StallReason::Timeout,
                    GracefulFailure::Error => StallReason::Error,
                },
                started_at: attempt_started_at,
                stalled_at: Utc::now(),
                error: graceful_error.clone(),
            };
            return self.record_stall(name, stall, graceful_error);
        }

        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ForceStopStarted,
        ));
        let force_begun = Instant::now();
        let task_component = Arc::clone(&component);
        let force_outcome = invoke_user(timeouts.shutdown_force, async move {
            task_component.on_shutdown_force().await
        })
        .await;

        match force_outcome {
            InvokeOutcome::Completed(Ok(())) => {
                let force_duration = force_begun.elapsed();
                {
                    let mut registry = self.inner.registry.lock();
                    if let Some(entry) = registry.get_mut(name) {
                        entry.record.mark_stopped();
                    }
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ForceStopCompleted {
                        duration: force_duration,
                    },
                ));
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ComponentStopped {
                        duration: begun.elapsed(),
                    },
                ));
                info!(component = %name, "Component force-stopped");
                PipelineOutcome {
                    stopped: true,
                    stall: None,
                    error: None,
                }
            }
            InvokeOutcome::Completed(Err(force_error)) => {
                let reason = match graceful_failure {
                    GracefulFailure::Timeout => StallReason::Both,
                    GracefulFailure::Error => StallReason::Error,
                };
                let stall = StallRecord {
                    name: name.to_string(),
                    phase: StallPhase::Force,
                    reason,
                    started_at: attempt_started_at,
                    stalled_at: Utc::now(),
                    error: Some(force_error.clone()),
                };
                self.record_stall(name, stall, Some(force_error))
            }
            InvokeOutcome::TimedOut => {
                if capabilities.on_shutdown_force_aborted {
                    safe_sync_callback(name, "on_shutdown_force_aborted", || {
                        component.on_shutdown_force_aborted();
                    });
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ForceStopTimeout {
                        timeout: timeouts.shutdown_force,
                    },
                ));
                let reason = match graceful_failure {
                    GracefulFailure::Timeout => StallReason::Both,
                    GracefulFailure::Error => StallReason::Timeout,
                };
                let stall = StallRecord {
                    name: name.to_string(),
                    phase: StallPhase::Force,
                    reason,
                    started_at: attempt_started_at,
                    stalled_at: Utc::now(),
                    error: graceful_error.clone(),
                };
                self.record_stall(name, stall, graceful_error)
            }
        }
    }

    /// Re-enters the force phase for an already-stalled component.
    ///
    /// The graceful `stop()` is not re-run. Success clears the stall;
    /// failure leaves the original stall record in place.
    pub(crate) async fn retry_stalled_pipeline(&self, name: &str) -> PipelineOutcome {
        let Some((component, timeouts, capabilities, previous_stall)) = ({
            let mut registry = self.inner.registry.lock();
            match registry.get_mut(name) {
                Some(entry) if entry.is_stalled() => {
                    let previous = entry.record.stall.clone();
                    entry.record.mark_force_stopping();
                    Some((
                        Arc::clone(&entry.component),
                        entry.component.timeouts(),
                        entry.component.capabilities(),
                        previous,
                    ))
                }
                _ => None,
            }
        }) else {
            return PipelineOutcome {
                stopped: false,
                stall: None,
                error: Some("component is not stalled".into()),
            };
        };

        debug!(component = %name, "Retrying stalled component through force phase");

        let restore = |error: Option<String>| {
            let stall = previous_stall.clone().unwrap_or_else(|| StallRecord {
                name: name.to_string(),
                phase: StallPhase::Force,
                reason: StallReason::Timeout,
                started_at: Utc::now(),
                stalled_at: Utc::now(),
                error: error.clone(),
            });
            {
                let mut registry = self.inner.registry.lock();
                if let Some(entry) = registry.get_mut(name) {
                    entry.record.mark_stalled(stall.clone());
                }
            }
            PipelineOutcome {
                stopped: false,
                stall: Some(stall),
                error,
            }
        };

        if !capabilities.on_shutdown_force {
            warn!(component = %name, "Stalled component has no force hook; remains stalled");
            return restore(None);
        }

        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ForceStopStarted,
        ));
        let begun = Instant::now();
        let task_component = Arc::clone(&component);
        let outcome = invoke_user(timeouts.shutdown_force, async move {
            task_component.on_shutdown_force().await
        })
        .await;

        match outcome {
            InvokeOutcome::Completed(Ok(())) => {
                let duration = begun.elapsed();
                {
                    let mut registry = self.inner.registry.lock();
                    if let Some(entry) = registry.get_mut(name) {
                        entry.record.mark_stopped();
                    }
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ForceStopCompleted { duration },
                ));
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ComponentStopped { duration },
                ));
                info!(component = %name, "Stalled component recovered by force stop");
                PipelineOutcome {
                    stopped: true,
                    stall: None,
                    error: None,
                }
            }
            InvokeOutcome::Completed(Err(error)) => {
                warn!(component = %name, error = %error, "Force retry failed; remains stalled");
                restore(Some(error))
            }
            InvokeOutcome::TimedOut => {
                if capabilities.on_shutdown_force_aborted {
                    safe_sync_callback(name, "on_shutdown_force_aborted", || {
                        component.on_shutdown_force_aborted();
                    });
                }
                self.emit(LifecycleEvent::component(
                    name,
                    LifecycleEventKind::ForceStopTimeout {
                        timeout: timeouts.shutdown_force,
                    },
                ));
                warn!(component = %name, "Force retry timed out; remains stalled");
                restore(None)
            }
        }
    }

    /// Records a stall on the component and emits the stalled event.
    fn record_stall(
        &self,
        name: &str,
        stall: StallRecord,
        error: Option<String>,
    ) -> PipelineOutcome {
        {
            let mut registry = self.inner.registry.lock();
            if let Some(entry) = registry.get_mut(name) {
                entry.record.mark_stalled(stall.clone());
            }
        }
        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ComponentStalled {
                phase: stall.phase,
                reason: stall.reason,
            },
        ));
        warn!(
            component = %name,
            phase = ?stall.phase,
            reason = ?stall.reason,
            "Component stalled"
        );
        PipelineOutcome {
            stopped: false,
            stall: Some(stall),
            error,
        }
    }

    /// The global pre-shutdown warning phase.
    ///
    /// Every running component implementing `on_shutdown_warning` is
    /// notified concurrently. Fire-and-forget mode flushes exactly one
    /// scheduler tick before emitting the global completion event, so the
    /// event order is deterministic even though individual completions
    /// arrive later.
    async fn run_warning_phase(&self) {
        let policy = self.inner.config.warning_timeout;
        if policy == WarningTimeout::Skip {
            return;
        }

        let targets: Vec<(String, Arc<dyn Component>)> = {
            let registry = self.inner.registry.lock();
            registry
                .iter()
                .filter(|e| e.is_running() && e.component.capabilities().on_shutdown_warning)
                .map(|e| (e.name.clone(), Arc::clone(&e.component)))
                .collect()
        };

        self.emit(LifecycleEvent::global(LifecycleEventKind::WarningPhaseStarted {
            count: targets.len(),
        }));
        let begun = Instant::now();

        match policy {
            WarningTimeout::Skip => {}
            WarningTimeout::FireAndForget => {
                for (name, component) in targets {
                    let manager = self.clone();
                    tokio::spawn(async move {
                        run_warning_handler(&manager, &name, component).await;
                    });
                }
                tokio::task::yield_now().await;
                self.emit(LifecycleEvent::global(
                    LifecycleEventKind::WarningPhaseCompleted {
                        duration: begun.elapsed(),
                    },
                ));
            }
            WarningTimeout::Bounded(bound) => {
                let completed: Arc<Mutex<HashSet<String>>> =
                    Arc::new(Mutex::new(HashSet::new()));
                let mut handles = Vec::with_capacity(targets.len());
                let names: Vec<String> = targets.iter().map(|(n, _)| n.clone()).collect();

                for (name, component) in targets {
                    let manager = self.clone();
                    let completed = Arc::clone(&completed);
                    handles.push(tokio::spawn(async move {
                        run_warning_handler(&manager, &name, component).await;
                        completed.lock().insert(name);
                    }));
                }

                let all = futures::future::join_all(handles);
                match tokio::time::timeout(bound, all).await {
                    Ok(_) => {
                        self.emit(LifecycleEvent::global(
                            LifecycleEventKind::WarningPhaseCompleted {
                                duration: begun.elapsed(),
                            },
                        ));
                    }
                    Err(_) => {
                        let done = completed.lock();
                        let pending: Vec<String> = names
                            .into_iter()
                            .filter(|n| !done.contains(n))
                            .collect();
                        for name in &pending {
                            self.emit(LifecycleEvent::component(
                                name,
                                LifecycleEventKind::ShutdownWarningTimeout,
                            ));
                        }
                        warn!(pending = ?pending, "Warning phase timed out");
                        self.emit(LifecycleEvent::global(
                            LifecycleEventKind::WarningPhaseTimeout { pending },
                        ));
                    }
                }
            }
        }
    }
}

/// Invokes one component's warning hook, emitting the component-level
/// events. Handler errors are logged and never affect shutdown progression.
async fn run_warning_handler(
    manager: &LifecycleManager,
    name: &str,
    component: Arc<dyn Component>,
) {
    manager.emit(LifecycleEvent::component(
        name,
        LifecycleEventKind::ShutdownWarning,
    ));
    let begun = Instant::now();
    match component.on_shutdown_warning().await {
        Ok(()) => {
            manager.emit(LifecycleEvent::component(
                name,
                LifecycleEventKind::ShutdownWarningCompleted {
                    duration: begun.elapsed(),
                },
            ));
        }
        Err(err) => {
            tracing::error!(
                target: "lifeline::report",
                component = %name,
                error = %err,
                "Shutdown warning handler failed"
            );
        }
    }
}
