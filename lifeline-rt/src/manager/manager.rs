//! LifecycleManager: the owner of the registry and all lifecycle state.

// Layer 1: Standard library imports
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// Layer 3: Internal module imports
use super::config::ManagerConfig;
use super::handle::ComponentHandle;
use super::types::{
    ComponentStatus, ExitAction, ShutdownMethod, ShutdownOptions, ShutdownReport, SystemState,
    UnregisterCode, UnregisterOptions, UnregisterReport,
};
use crate::component::{BoxError, Component, ComponentName, ComponentState};
use crate::events::{EventSink, LifecycleEvent, LifecycleEventKind, NoopEventSink};
use crate::registry::{
    startup_order, ComponentRegistry, InsertPosition, RegistrationCode, RegistrationReport,
    RegistryEntry, ValidationReport,
};
use crate::registry::{validate_dependencies, CycleError};
use crate::signal::{SignalConfig, SignalCoordinator, SignalError, SignalHandler};

/// Internal shared state behind the manager's cheap-clone wrapper.
pub(crate) struct ManagerInner {
    pub(crate) config: ManagerConfig,
    pub(crate) sink: Arc<dyn EventSink<LifecycleEvent>>,
    pub(crate) registry: Mutex<ComponentRegistry>,
    pub(crate) is_starting: AtomicBool,
    pub(crate) is_shutting_down: AtomicBool,
    pub(crate) shutdown_method: Mutex<Option<ShutdownMethod>>,
    pub(crate) shutdown_token: Mutex<CancellationToken>,
    pub(crate) startup_gate: Notify,
    pub(crate) coordinator: Mutex<Option<SignalCoordinator>>,
}

/// Component lifecycle manager.
///
/// Registers heterogeneous components, starts them in dependency order,
/// stops them in reverse through the graceful-then-force pipeline, and
/// coordinates signals, messaging, shared-value lookups, and health checks.
///
/// Cloning is cheap: clones share the same inner state, so a manager can be
/// handed to signal handlers and scoped handles freely.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use lifeline_rt::component::{BoxError, Component};
/// use lifeline_rt::manager::{LifecycleManager, StartupOptions, ShutdownOptions};
///
/// struct Db;
///
/// #[async_trait]
/// impl Component for Db {
///     fn name(&self) -> &str { "db" }
///     async fn start(&self) -> Result<(), BoxError> { Ok(()) }
///     async fn stop(&self) -> Result<(), BoxError> { Ok(()) }
/// }
///
/// # async fn example() {
/// let manager = LifecycleManager::new();
/// let report = manager.register_component(Arc::new(Db));
/// assert!(report.success);
///
/// let startup = manager.start_all_components(StartupOptions::default()).await;
/// assert!(startup.success);
///
/// let shutdown = manager.stop_all_components(ShutdownOptions::default()).await;
/// assert!(shutdown.success);
/// # }
/// ```
#[derive(Clone)]
pub struct LifecycleManager {
    pub(crate) inner: Arc<ManagerInner>,
}

/// Builder for [`LifecycleManager`].
pub struct LifecycleManagerBuilder {
    config: ManagerConfig,
    sink: Arc<dyn EventSink<LifecycleEvent>>,
}

impl LifecycleManagerBuilder {
    /// Sets the manager configuration.
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the lifecycle event sink.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink<LifecycleEvent>>) -> Self {
        self.sink = sink;
        self
    }

    /// Consumes the builder and produces a manager.
    pub fn build(self) -> LifecycleManager {
        LifecycleManager {
            inner: Arc::new(ManagerInner {
                config: self.config,
                sink: self.sink,
                registry: Mutex::new(ComponentRegistry::new()),
                is_starting: AtomicBool::new(false),
                is_shutting_down: AtomicBool::new(false),
                shutdown_method: Mutex::new(None),
                shutdown_token: Mutex::new(CancellationToken::new()),
                startup_gate: Notify::new(),
                coordinator: Mutex::new(None),
            }),
        }
    }
}

impl Default for LifecycleManagerBuilder {
    fn default() -> Self {
        Self {
            config: ManagerConfig::default(),
            sink: Arc::new(NoopEventSink::new()),
        }
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration body result: the caller-facing report plus the raw outcome
/// so event emission can branch without re-deriving it.
struct RegistrationOutcome {
    report: RegistrationReport,
    outcome: Result<(), RegistrationCode>,
}

/// Outcome of a user-code invocation raced against a bound.
pub(crate) enum InvokeOutcome<T> {
    /// The call finished (possibly with an error, possibly by panicking;
    /// panics are captured as errors).
    Completed(Result<T, String>),

    /// The bound elapsed; the call keeps running detached and its eventual
    /// result is discarded silently.
    TimedOut,
}

/// Runs user code as a spawned task raced against `bound`.
///
/// A zero bound disables the race. On timeout the task is detached, not
/// cancelled: user code keeps running, and whatever it eventually returns
/// (or panics with) is swallowed so a late failure cannot surface as an
/// unhandled error.
pub(crate) async fn invoke_user<T, F>(bound: Duration, future: F) -> InvokeOutcome<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T, BoxError>> + Send + 'static,
{
    let mut task = tokio::spawn(future);

    let joined = if bound.is_zero() {
        (&mut task).await
    } else {
        match tokio::time::timeout(bound, &mut task).await {
            Ok(joined) => joined,
            Err(_) => return InvokeOutcome::TimedOut,
        }
    };

    match joined {
        Ok(Ok(value)) => InvokeOutcome::Completed(Ok(value)),
        Ok(Err(err)) => InvokeOutcome::Completed(Err(err.to_string())),
        Err(join_err) => InvokeOutcome::Completed(Err(format!("user code panicked: {join_err}"))),
    }
}

/// Runs a synchronous user callback, containing panics.
///
/// Abort callbacks fire best-effort on timeout paths; a panicking callback
/// is reported out-of-band and the lifecycle operation proceeds.
pub(crate) fn safe_sync_callback(component: &str, label: &str, callback: impl FnOnce()) {
    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback)).is_err() {
        tracing::error!(
            target: "lifeline::report",
            component = %component,
            callback = label,
            "Abort callback panicked"
        );
    }
}

impl LifecycleManager {
    /// Creates a manager with default configuration and no event sink.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a manager builder.
    pub fn builder() -> LifecycleManagerBuilder {
        LifecycleManagerBuilder::default()
    }

    /// The manager's configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    /// Records a lifecycle event through the safe-emit wrapper.
    ///
    /// Sink failures are reported on the `lifeline::report` target and never
    /// interrupt the operation that produced the event.
    pub(crate) fn emit(&self, event: LifecycleEvent) {
        if let Err(err) = self.inner.sink.record(event) {
            tracing::error!(
                target: "lifeline::report",
                error = %err,
                "Event sink failed; continuing"
            );
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a component at the end of the sequence.
    pub fn register_component(&self, component: Arc<dyn Component>) -> RegistrationReport {
        self.insert_component_at(InsertPosition::End, component)
    }

    /// Registers a component at an explicit position.
    ///
    /// The insertion is atomic: the resolver validates a trial copy of the
    /// registry first, and on any failure the registry is left untouched and
    /// the report carries the failure code.
    pub fn insert_component_at(
        &self,
        position: InsertPosition,
        component: Arc<dyn Component>,
    ) -> RegistrationReport {
        let declared_name = component.name().to_string();

        let report = self.try_insert(&position, &component, &declared_name);
        match &report.outcome {
            Ok(()) => {
                // User code runs outside the registry lock.
                component.attach_handle(ComponentHandle::new(self.clone(), &declared_name));
                self.emit(LifecycleEvent::component(
                    &declared_name,
                    LifecycleEventKind::RegistrationAccepted,
                ));
                debug!(component = %declared_name, "Component registered");
            }
            Err(code) => {
                self.emit(LifecycleEvent::component(
                    &declared_name,
                    LifecycleEventKind::RegistrationRejected {
                        code: code.as_str().into(),
                    },
                ));
                warn!(
                    component = %declared_name,
                    code = code.as_str(),
                    "Registration rejected"
                );
            }
        }
        report.report
    }

    /// Registration body; split out so event emission can observe the
    /// outcome uniformly.
    fn try_insert(
        &self,
        position: &InsertPosition,
        component: &Arc<dyn Component>,
        declared_name: &str,
    ) -> RegistrationOutcome {
        let mut registry = self.inner.registry.lock();
        let index_before = registry.len();

        let fail = |code: RegistrationCode, error: Option<String>| RegistrationOutcome {
            report: RegistrationReport::failure(declared_name, index_before, code, error),
            outcome: Err(code),
        };

        if ComponentName::parse(declared_name).is_err() {
            return fail(
                RegistrationCode::InvalidName,
                Some(format!("'{declared_name}' is not lowercase kebab-case")),
            );
        }
        if self.inner.is_shutting_down.load(Ordering::SeqCst) {
            return fail(RegistrationCode::ShutdownInProgress, None);
        }
        if self.inner.is_starting.load(Ordering::SeqCst) {
            // During startup only components nothing depends on may join,
            // otherwise the in-flight topological order would be violated.
            let is_depended_upon = registry
                .iter()
                .any(|e| e.dependencies.iter().any(|d| d == declared_name));
            if is_depended_upon && !component.optional() {
                return fail(
                    RegistrationCode::StartupInProgress,
                    Some(format!(
                        "'{declared_name}' is a required dependency of a registered component"
                    )),
                );
            }
        }

        // Structural checks come before the trial: a duplicate must report
        // as a duplicate, not as whatever the resolver makes of it.
        if registry.contains(declared_name) {
            return fail(
                RegistrationCode::DuplicateName,
                Some(format!("'{declared_name}' is already registered")),
            );
        }
        if registry.has_instance(component) {
            return fail(
                RegistrationCode::DuplicateInstance,
                Some(format!("instance of '{declared_name}' is already registered")),
            );
        }

        let dependencies = component.dependencies();
        let trial = match registry.trial_nodes_with(declared_name, &dependencies, position) {
            Ok(trial) => trial,
            Err(err) => {
                let mut out = fail(err.code(), Some(err.to_string()));
                if err.code() == RegistrationCode::TargetNotFound {
                    out.report.target_found = Some(false);
                }
                return out;
            }
        };
        let order = match startup_order(&trial) {
            Ok(order) => order,
            Err(cycle) => {
                return fail(RegistrationCode::DependencyCycle, Some(cycle.to_string()))
            }
        };

        let target_found = match position {
            InsertPosition::Before(_) | InsertPosition::After(_) => Some(true),
            _ => None,
        };

        let entry = RegistryEntry::new(Arc::clone(component));
        match registry.insert(entry, position) {
            Ok(index_after) => RegistrationOutcome {
                report: RegistrationReport {
                    success: true,
                    name: declared_name.to_string(),
                    code: None,
                    error: None,
                    index_before,
                    index_after: Some(index_after),
                    startup_order: order,
                    position_respected: true,
                    target_found,
                },
                outcome: Ok(()),
            },
            Err(err) => fail(err.code(), Some(err.to_string())),
        }
    }

    /// Removes a component from the registry.
    ///
    /// Blocked during bulk operations. When the component is running and
    /// `stop_if_running` is set (the default), it is stopped first and the
    /// removal is aborted unless the stop lands on `Stopped`. A stalled
    /// component can only be removed with `stop_if_running` unset.
    pub async fn unregister_component(
        &self,
        name: &str,
        options: UnregisterOptions,
    ) -> UnregisterReport {
        if self.inner.is_starting.load(Ordering::SeqCst) {
            return UnregisterReport {
                success: false,
                code: Some(UnregisterCode::StartupInProgress),
                error: None,
            };
        }
        if self.inner.is_shutting_down.load(Ordering::SeqCst) {
            return UnregisterReport {
                success: false,
                code: Some(UnregisterCode::ShutdownInProgress),
                error: None,
            };
        }

        let state = {
            let registry = self.inner.registry.lock();
            match registry.get(name) {
                Some(entry) => entry.state(),
                None => {
                    return UnregisterReport {
                        success: false,
                        code: Some(UnregisterCode::NotFound),
                        error: None,
                    }
                }
            }
        };

        if state == ComponentState::Stalled && options.stop_if_running {
            return UnregisterReport {
                success: false,
                code: Some(UnregisterCode::ComponentStalled),
                error: Some(format!(
                    "'{name}' is stalled; unregister with stop_if_running disabled"
                )),
            };
        }

        if state.is_running() && options.stop_if_running {
            let outcome = self.stop_pipeline(name, None).await;
            let after = {
                let registry = self.inner.registry.lock();
                registry.get(name).map(|e| e.state())
            };
            if after != Some(ComponentState::Stopped) {
                return UnregisterReport {
                    success: false,
                    code: Some(UnregisterCode::StopFailed),
                    error: outcome.error,
                };
            }
        }

        {
            let mut registry = self.inner.registry.lock();
            registry.remove(name);
        }
        self.emit(LifecycleEvent::component(
            name,
            LifecycleEventKind::ComponentUnregistered,
        ));
        info!(component = %name, "Component unregistered");
        UnregisterReport {
            success: true,
            code: None,
            error: None,
        }
    }

    // ========================================================================
    // Read-only queries
    // ========================================================================

    /// Returns `true` if a component with the given name is registered.
    pub fn has_component(&self, name: &str) -> bool {
        self.inner.registry.lock().contains(name)
    }

    /// Returns `true` if the named component is running.
    pub fn is_component_running(&self, name: &str) -> bool {
        self.inner
            .registry
            .lock()
            .get(name)
            .is_some_and(|e| e.is_running())
    }

    /// All component names in registry order.
    pub fn component_names(&self) -> Vec<String> {
        self.inner.registry.lock().names()
    }

    /// Names of running components in registry order.
    pub fn running_components(&self) -> Vec<String> {
        self.inner
            .registry
            .lock()
            .names_in_state(ComponentState::Running)
    }

    /// Names of stalled components in registry order.
    pub fn stalled_components(&self) -> Vec<String> {
        self.inner
            .registry
            .lock()
            .names_in_state(ComponentState::Stalled)
    }

    /// Names of stopped components in registry order.
    pub fn stopped_components(&self) -> Vec<String> {
        self.inner
            .registry
            .lock()
            .names_in_state(ComponentState::Stopped)
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.inner.registry.lock().len()
    }

    /// Number of running components.
    pub fn running_count(&self) -> usize {
        self.inner
            .registry
            .lock()
            .count_in_state(ComponentState::Running)
    }

    /// Number of stalled components.
    pub fn stalled_count(&self) -> usize {
        self.inner
            .registry
            .lock()
            .count_in_state(ComponentState::Stalled)
    }

    /// Point-in-time status of the named component.
    pub fn component_status(&self, name: &str) -> Option<ComponentStatus> {
        let registry = self.inner.registry.lock();
        registry.get(name).map(|entry| ComponentStatus {
            name: entry.name.clone(),
            state: entry.record.state,
            optional: entry.optional,
            dependencies: entry.dependencies.clone(),
            started_at: entry.record.started_at,
            stopped_at: entry.record.stopped_at,
            last_error: entry.record.last_error.clone(),
            stall: entry.record.stall.clone(),
        })
    }

    /// Point-in-time status of every registered component, in registry
    /// order.
    pub fn component_statuses(&self) -> Vec<ComponentStatus> {
        let names = self.component_names();
        names
            .iter()
            .filter_map(|n| self.component_status(n))
            .collect()
    }

    /// Returns `true` while at least one component is running or stalled.
    pub fn is_started(&self) -> bool {
        let registry = self.inner.registry.lock();
        registry.count_in_state(ComponentState::Running)
            + registry.count_in_state(ComponentState::Stalled)
            > 0
    }

    /// Returns `true` while a bulk startup is in progress.
    pub fn is_starting(&self) -> bool {
        self.inner.is_starting.load(Ordering::SeqCst)
    }

    /// Returns `true` while a shutdown is in progress.
    pub fn is_shutting_down(&self) -> bool {
        self.inner.is_shutting_down.load(Ordering::SeqCst)
    }

    /// The method of the most recent shutdown, retained until the next
    /// successful startup.
    pub fn shutdown_method(&self) -> Option<ShutdownMethod> {
        *self.inner.shutdown_method.lock()
    }

    /// Derived system state.
    pub fn system_state(&self) -> SystemState {
        if self.inner.is_shutting_down.load(Ordering::SeqCst) {
            return SystemState::ShuttingDown;
        }
        if self.inner.is_starting.load(Ordering::SeqCst) {
            return SystemState::Starting;
        }
        let registry = self.inner.registry.lock();
        if registry.is_empty() {
            SystemState::NoComponents
        } else if registry.count_in_state(ComponentState::Stalled) > 0 {
            SystemState::Stalled
        } else if registry.count_in_state(ComponentState::Running) == 0 {
            SystemState::Ready
        } else {
            SystemState::Running
        }
    }

    /// The deterministic topological startup order of the current registry.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] with one concrete cycle when the registry is
    /// cyclic (only possible through dependency lists that changed after
    /// registration).
    pub fn startup_order(&self) -> Result<Vec<String>, CycleError> {
        let nodes = self.inner.registry.lock().dependency_nodes();
        startup_order(&nodes)
    }

    /// Every missing dependency and every cycle, collected without failing.
    pub fn validate_dependencies(&self) -> ValidationReport {
        let nodes = self.inner.registry.lock().validation_nodes();
        validate_dependencies(&nodes)
    }

    // ========================================================================
    // Signals
    // ========================================================================

    /// Attaches the signal coordinator (idempotent).
    ///
    /// # Errors
    ///
    /// Propagates [`SignalError`] when installing signal streams or entering
    /// raw mode fails; partial installations are unwound by the coordinator.
    pub async fn attach_signals(&self) -> Result<(), SignalError> {
        let coordinator = {
            let mut guard = self.inner.coordinator.lock();
            if guard.is_none() {
                let handler: Arc<dyn SignalHandler> = Arc::new(ManagerSignalHandler {
                    inner: Arc::downgrade(&self.inner),
                });
                let config = SignalConfig {
                    keypress_throttle: self.inner.config.keypress_throttle,
                    ..SignalConfig::default()
                };
                *guard = Some(SignalCoordinator::new(config, handler));
            }
            guard.clone()
        };
        if let Some(coordinator) = coordinator {
            coordinator.attach().await?;
            self.emit(LifecycleEvent::global(LifecycleEventKind::SignalsAttached));
        }
        Ok(())
    }

    /// Detaches the signal coordinator (idempotent).
    ///
    /// # Errors
    ///
    /// Propagates [`SignalError`] when restoring the terminal fails; raw
    /// mode ownership is retained so a later detach can retry.
    pub async fn detach_signals(&self) -> Result<(), SignalError> {
        let coordinator = self.inner.coordinator.lock().clone();
        if let Some(coordinator) = coordinator {
            coordinator.detach().await?;
            self.emit(LifecycleEvent::global(LifecycleEventKind::SignalsDetached));
        }
        Ok(())
    }

    /// Returns `true` while the signal coordinator is attached.
    pub fn signals_attached(&self) -> bool {
        self.inner
            .coordinator
            .lock()
            .as_ref()
            .is_some_and(|c| c.is_attached())
    }

    /// Triggers a shutdown with the given method.
    ///
    /// While a shutdown is already in progress the trigger is logged and
    /// ignored, and the original method attribution is retained.
    pub async fn trigger_shutdown(&self, method: ShutdownMethod) -> Option<ShutdownReport> {
        if self.inner.is_shutting_down.load(Ordering::SeqCst) {
            info!(
                method = method.as_str(),
                "Shutdown already in progress; signal ignored"
            );
            return None;
        }
        self.emit(LifecycleEvent::global(LifecycleEventKind::SignalShutdown {
            method: method.as_str().into(),
        }));
        Some(
            self.shutdown_with_method(ShutdownOptions::default(), method)
                .await,
        )
    }

    /// Invokes `on_reload` on every running component that implements it.
    pub async fn trigger_reload(&self) {
        self.emit(LifecycleEvent::global(LifecycleEventKind::SignalReload));
        if self.is_starting() {
            info!("Reload during startup; only already-started components are notified");
        }
        self.dispatch_signal("reload", |component| {
            Box::pin(async move { component.on_reload().await })
        })
        .await;
    }

    /// Invokes `on_info` on every running component that implements it.
    pub async fn trigger_info(&self) {
        self.emit(LifecycleEvent::global(LifecycleEventKind::SignalInfo));
        self.dispatch_signal("info", |component| {
            Box::pin(async move { component.on_info().await })
        })
        .await;
    }

    /// Invokes `on_debug` on every running component that implements it.
    pub async fn trigger_debug(&self) {
        self.emit(LifecycleEvent::global(LifecycleEventKind::SignalDebug));
        self.dispatch_signal("debug", |component| {
            Box::pin(async move { component.on_debug().await })
        })
        .await;
    }

    /// Shared dispatch for the reload/info/debug triggers: running
    /// components with the matching capability, each raced against its
    /// `signal` timeout, errors reported out-of-band.
    async fn dispatch_signal<F>(&self, label: &'static str, mut call: F)
    where
        F: FnMut(
            Arc<dyn Component>,
        ) -> std::pin::Pin<
            Box<dyn Future<Output = Result<(), BoxError>> + Send>,
        >,
    {
        let targets: Vec<(String, Arc<dyn Component>, Duration)> = {
            let registry = self.inner.registry.lock();
            registry
                .iter()
                .filter(|e| e.is_running())
                .filter(|e| {
                    let caps = e.component.capabilities();
                    match label {
                        "reload" => caps.on_reload,
                        "info" => caps.on_info,
                        _ => caps.on_debug,
                    }
                })
                .map(|e| {
                    (
                        e.name.clone(),
                        Arc::clone(&e.component),
                        e.component.timeouts().signal,
                    )
                })
                .collect()
        };

        for (name, component, bound) in targets {
            let call_future = call(component);
            match invoke_user(bound, call_future).await {
                InvokeOutcome::Completed(Ok(())) => {
                    debug!(component = %name, signal = label, "Signal handler completed");
                }
                InvokeOutcome::Completed(Err(err)) => {
                    tracing::error!(
                        target: "lifeline::report",
                        component = %name,
                        signal = label,
                        error = %err,
                        "Signal handler failed"
                    );
                }
                InvokeOutcome::TimedOut => {
                    warn!(component = %name, signal = label, "Signal handler timed out");
                }
            }
        }
    }

    // ========================================================================
    // Logger exit hook
    // ========================================================================

    /// Before-exit hook for an external logger.
    ///
    /// When the hook is enabled and a shutdown is in progress, answers
    /// [`ExitAction::Wait`] so the logger defers process exit until the
    /// shutdown finishes.
    pub fn before_exit(&self, exit_code: i32, is_first_exit: bool) -> ExitAction {
        if self.inner.config.enable_logger_exit_hook
            && self.inner.is_shutting_down.load(Ordering::SeqCst)
        {
            debug!(exit_code, is_first_exit, "Deferring exit during shutdown");
            return ExitAction::Wait;
        }
        ExitAction::Proceed
    }

    /// Future that resolves when the current shutdown begins.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let token = self.inner.shutdown_token.lock().clone();
        token.cancelled_owned()
    }
}

/// Dispatches coordinator callbacks onto the owning manager.
///
/// Holds a weak reference: the coordinator must not keep a dropped manager
/// alive.
struct ManagerSignalHandler {
    inner: Weak<ManagerInner>,
}

#[async_trait]
impl SignalHandler for ManagerSignalHandler {
    async fn on_shutdown(&self, method: ShutdownMethod) {
        if let Some(inner) = self.inner.upgrade() {
            let manager = LifecycleManager { inner };
            let _ = manager.trigger_shutdown(method).await;
        }
    }

    async fn on_reload(&self) {
        if let Some(inner) = self.inner.upgrade() {
            LifecycleManager { inner }.trigger_reload().await;
        }
    }

    async fn on_info(&self) {
        if let Some(inner) = self.inner.upgrade() {
            LifecycleManager { inner }.trigger_info().await;
        }
    }

    async fn on_debug(&self) {
        if let Some(inner) = self.inner.upgrade() {
            LifecycleManager { inner }.trigger_debug().await;
        }
    }
}
