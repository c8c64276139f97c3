//! Shared test support: a configurable component with behavior knobs and
//! counters, in the shape production components take.

// Each integration test binary uses a subset of these helpers.
#![allow(dead_code)]

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

// Layer 3: Internal module imports
use lifeline_rt::component::{
    BoxError, Capabilities, Component, ComponentTimeouts, HealthStatus, ValueReply,
};
use lifeline_rt::manager::ComponentHandle;

/// Records the global order in which components started/stopped.
pub type OrderLog = Arc<Mutex<Vec<String>>>;

pub fn order_log() -> OrderLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Test component with configurable behavior.
///
/// Built with the builder-style `with_*` methods; every hook counts its
/// invocations so tests can assert on observed behavior.
#[derive(Default)]
pub struct TestComponent {
    pub name: String,
    pub deps: Vec<String>,
    pub optional: bool,
    pub timeouts: ComponentTimeouts,
    pub capabilities: Capabilities,

    // Behavior knobs
    pub fail_start: bool,
    pub hang_start: bool,
    pub fail_stop: bool,
    pub hang_stop: bool,
    pub fail_force: bool,
    pub hang_force: bool,
    pub unhealthy: bool,
    pub fail_health: bool,
    pub hang_health: bool,
    pub hang_message: bool,
    pub fail_message: bool,
    pub hang_warning: bool,
    pub start_gate: Option<Arc<Notify>>,
    pub stop_gate: Option<Arc<Notify>>,
    pub value_key: Option<(String, Value)>,

    // Observation
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub forces: AtomicUsize,
    pub warnings: AtomicUsize,
    pub reloads: AtomicUsize,
    pub infos: AtomicUsize,
    pub debugs: AtomicUsize,
    pub startup_aborts: AtomicUsize,
    pub stop_aborts: AtomicUsize,
    pub messages: Mutex<Vec<(Value, Option<String>)>>,
    pub handle_slot: Mutex<Option<ComponentHandle>>,
    pub start_order: Option<OrderLog>,
    pub stop_order: Option<OrderLog>,
}

impl TestComponent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_deps(mut self, deps: &[&str]) -> Self {
        self.deps = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn optional_component(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_timeouts(mut self, timeouts: ComponentTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn hanging_start(mut self) -> Self {
        self.hang_start = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn hanging_stop(mut self) -> Self {
        self.hang_stop = true;
        self
    }

    pub fn with_force_hook(mut self) -> Self {
        self.capabilities.on_shutdown_force = true;
        self
    }

    pub fn failing_force(mut self) -> Self {
        self.capabilities.on_shutdown_force = true;
        self.fail_force = true;
        self
    }

    pub fn hanging_force(mut self) -> Self {
        self.capabilities.on_shutdown_force = true;
        self.hang_force = true;
        self
    }

    pub fn with_warning_hook(mut self) -> Self {
        self.capabilities.on_shutdown_warning = true;
        self
    }

    pub fn hanging_warning(mut self) -> Self {
        self.capabilities.on_shutdown_warning = true;
        self.hang_warning = true;
        self
    }

    pub fn with_reload_hook(mut self) -> Self {
        self.capabilities.on_reload = true;
        self
    }

    pub fn with_info_hook(mut self) -> Self {
        self.capabilities.on_info = true;
        self
    }

    pub fn with_debug_hook(mut self) -> Self {
        self.capabilities.on_debug = true;
        self
    }

    pub fn with_abort_hooks(mut self) -> Self {
        self.capabilities.on_startup_aborted = true;
        self.capabilities.on_stop_aborted = true;
        self.capabilities.on_shutdown_force_aborted = true;
        self
    }

    pub fn with_health(mut self) -> Self {
        self.capabilities.health_check = true;
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.capabilities.health_check = true;
        self.unhealthy = true;
        self
    }

    pub fn failing_health(mut self) -> Self {
        self.capabilities.health_check = true;
        self.fail_health = true;
        self
    }

    pub fn hanging_health(mut self) -> Self {
        self.capabilities.health_check = true;
        self.hang_health = true;
        self
    }

    pub fn with_message_handler(mut self) -> Self {
        self.capabilities.on_message = true;
        self
    }

    pub fn failing_messages(mut self) -> Self {
        self.capabilities.on_message = true;
        self.fail_message = true;
        self
    }

    pub fn hanging_messages(mut self) -> Self {
        self.capabilities.on_message = true;
        self.hang_message = true;
        self
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.capabilities.get_value = true;
        self.value_key = Some((key.to_string(), value));
        self
    }

    pub fn with_start_gate(mut self, gate: Arc<Notify>) -> Self {
        self.start_gate = Some(gate);
        self
    }

    pub fn with_stop_gate(mut self, gate: Arc<Notify>) -> Self {
        self.stop_gate = Some(gate);
        self
    }

    pub fn record_orders(mut self, start: OrderLog, stop: OrderLog) -> Self {
        self.start_order = Some(start);
        self.stop_order = Some(stop);
        self
    }
}

#[async_trait]
impl Component for TestComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<String> {
        self.deps.clone()
    }

    fn optional(&self) -> bool {
        self.optional
    }

    fn timeouts(&self) -> ComponentTimeouts {
        self.timeouts
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn attach_handle(&self, handle: ComponentHandle) {
        *self.handle_slot.lock() = Some(handle);
    }

    async fn start(&self) -> Result<(), BoxError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.start_gate {
            gate.notified().await;
        }
        if self.hang_start {
            std::future::pending::<()>().await;
        }
        if self.fail_start {
            return Err(format!("{} refused to start", self.name).into());
        }
        if let Some(log) = &self.start_order {
            log.lock().push(self.name.clone());
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.stop_gate {
            gate.notified().await;
        }
        if self.hang_stop {
            std::future::pending::<()>().await;
        }
        if self.fail_stop {
            return Err(format!("{} refused to stop", self.name).into());
        }
        if let Some(log) = &self.stop_order {
            log.lock().push(self.name.clone());
        }
        Ok(())
    }

    fn on_startup_aborted(&self) {
        self.startup_aborts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stop_aborted(&self) {
        self.stop_aborts.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_shutdown_warning(&self) -> Result<(), BoxError> {
        self.warnings.fetch_add(1, Ordering::SeqCst);
        if self.hang_warning {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn on_shutdown_force(&self) -> Result<(), BoxError> {
        self.forces.fetch_add(1, Ordering::SeqCst);
        if self.hang_force {
            std::future::pending::<()>().await;
        }
        if self.fail_force {
            return Err(format!("{} refused force stop", self.name).into());
        }
        Ok(())
    }

    async fn on_reload(&self) -> Result<(), BoxError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn on_info(&self) -> Result<(), BoxError> {
        self.infos.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn on_debug(&self) -> Result<(), BoxError> {
        self.debugs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, BoxError> {
        if self.hang_health {
            std::future::pending::<()>().await;
        }
        if self.fail_health {
            return Err("probe exploded".into());
        }
        if self.unhealthy {
            return Ok(HealthStatus::unhealthy("degraded"));
        }
        Ok(HealthStatus::healthy())
    }

    async fn on_message(
        &self,
        payload: Value,
        from: Option<String>,
    ) -> Result<Option<Value>, BoxError> {
        if self.hang_message {
            std::future::pending::<()>().await;
        }
        if self.fail_message {
            return Err("handler rejected message".into());
        }
        self.messages.lock().push((payload.clone(), from));
        Ok(Some(serde_json::json!({ "echo": payload })))
    }

    fn get_value(&self, key: &str, _from: Option<&str>) -> Result<ValueReply, BoxError> {
        match &self.value_key {
            Some((k, v)) if k == key => Ok(ValueReply::found(v.clone())),
            _ => Ok(ValueReply::not_found()),
        }
    }
}

/// Per-component timeouts small enough for paused-clock tests.
pub fn fast_timeouts() -> ComponentTimeouts {
    ComponentTimeouts::default()
        .with_startup(std::time::Duration::from_millis(100))
        .with_shutdown_graceful(std::time::Duration::from_secs(1))
        .with_shutdown_force(std::time::Duration::from_millis(500))
        .with_health_check(std::time::Duration::from_millis(100))
        .with_signal(std::time::Duration::from_millis(100))
}
