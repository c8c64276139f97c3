//! The component-scoped handle: a component's view of its manager.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde_json::Value;

// Layer 3: Internal module imports
use super::manager::LifecycleManager;
use super::types::{
    AggregateHealthReport, BroadcastOptions, BroadcastReport, ComponentStatus, HealthReport,
    SendOptions, SendReport, ShutdownMethod, ShutdownOptions, ShutdownReport, StartComponentOptions,
    StartReport, StartupOptions, StartupReport, StopComponentOptions, StopReport, SystemState,
    ValueOptions, ValueReport,
};
use crate::registry::ValidationReport;

/// Scoped proxy a component receives at registration time.
///
/// Exposes the registry/state queries, lifecycle operations, signal
/// triggers, health probes, and messaging, with the owning component's
/// name injected as `from` on every send/broadcast/value call, so
/// receivers can attribute requests without trusting the payload.
///
/// The handle is a thin cheap-clone view: the manager remains the sole
/// owner of all state.
#[derive(Clone)]
pub struct ComponentHandle {
    manager: LifecycleManager,
    component_name: String,
}

impl ComponentHandle {
    /// Creates a handle scoped to the named component.
    pub(crate) fn new(manager: LifecycleManager, component_name: &str) -> Self {
        Self {
            manager,
            component_name: component_name.to_string(),
        }
    }

    /// The owning component's name.
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    // ========================================================================
    // Registry and state queries
    // ========================================================================

    /// Returns `true` if a component with the given name is registered.
    pub fn has_component(&self, name: &str) -> bool {
        self.manager.has_component(name)
    }

    /// Returns `true` if the named component is running.
    pub fn is_component_running(&self, name: &str) -> bool {
        self.manager.is_component_running(name)
    }

    /// All component names in registry order.
    pub fn component_names(&self) -> Vec<String> {
        self.manager.component_names()
    }

    /// Names of running components.
    pub fn running_components(&self) -> Vec<String> {
        self.manager.running_components()
    }

    /// Names of stalled components.
    pub fn stalled_components(&self) -> Vec<String> {
        self.manager.stalled_components()
    }

    /// Names of stopped components.
    pub fn stopped_components(&self) -> Vec<String> {
        self.manager.stopped_components()
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.manager.component_count()
    }

    /// Number of running components.
    pub fn running_count(&self) -> usize {
        self.manager.running_count()
    }

    /// Point-in-time status of the named component.
    pub fn component_status(&self, name: &str) -> Option<ComponentStatus> {
        self.manager.component_status(name)
    }

    /// Point-in-time status of every registered component.
    pub fn component_statuses(&self) -> Vec<ComponentStatus> {
        self.manager.component_statuses()
    }

    /// Derived system state.
    pub fn system_state(&self) -> SystemState {
        self.manager.system_state()
    }

    /// Returns `true` while at least one component is running or stalled.
    pub fn is_started(&self) -> bool {
        self.manager.is_started()
    }

    /// The deterministic topological startup order.
    pub fn startup_order(&self) -> Result<Vec<String>, crate::registry::CycleError> {
        self.manager.startup_order()
    }

    /// Every missing dependency and cycle, collected without failing.
    pub fn validate_dependencies(&self) -> ValidationReport {
        self.manager.validate_dependencies()
    }

    /// The most recent shutdown method.
    pub fn shutdown_method(&self) -> Option<ShutdownMethod> {
        self.manager.shutdown_method()
    }

    /// Returns `true` while the signal coordinator is attached.
    pub fn signals_attached(&self) -> bool {
        self.manager.signals_attached()
    }

    // ========================================================================
    // Lifecycle operations
    // ========================================================================

    /// Starts every registered component.
    pub async fn start_all_components(&self, options: StartupOptions) -> StartupReport {
        self.manager.start_all_components(options).await
    }

    /// Stops every running component.
    pub async fn stop_all_components(&self, options: ShutdownOptions) -> ShutdownReport {
        self.manager.stop_all_components(options).await
    }

    /// Stops then starts every component.
    pub async fn restart_all_components(&self) -> StartupReport {
        self.manager.restart_all_components().await
    }

    /// Starts one component.
    pub async fn start_component(
        &self,
        name: &str,
        options: StartComponentOptions,
    ) -> StartReport {
        self.manager.start_component(name, options).await
    }

    /// Stops one component.
    pub async fn stop_component(&self, name: &str, options: StopComponentOptions) -> StopReport {
        self.manager.stop_component(name, options).await
    }

    /// Stops then starts one component.
    pub async fn restart_component(&self, name: &str) -> StartReport {
        self.manager.restart_component(name).await
    }

    // ========================================================================
    // Signal triggers
    // ========================================================================

    /// Triggers a manual shutdown.
    pub async fn trigger_shutdown(&self) -> Option<ShutdownReport> {
        self.manager.trigger_shutdown(ShutdownMethod::Manual).await
    }

    /// Invokes `on_reload` on every running component implementing it.
    pub async fn trigger_reload(&self) {
        self.manager.trigger_reload().await;
    }

    /// Invokes `on_info` on every running component implementing it.
    pub async fn trigger_info(&self) {
        self.manager.trigger_info().await;
    }

    /// Invokes `on_debug` on every running component implementing it.
    pub async fn trigger_debug(&self) {
        self.manager.trigger_debug().await;
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Probes one component's health.
    pub async fn check_component_health(&self, name: &str) -> HealthReport {
        self.manager.check_component_health(name).await
    }

    /// Probes every running component and aggregates.
    pub async fn check_all_health(&self) -> AggregateHealthReport {
        self.manager.check_all_health().await
    }

    // ========================================================================
    // Messaging and values (auto-`from`)
    // ========================================================================

    /// Sends a message, attributed to the owning component.
    pub async fn send_message_to_component(
        &self,
        name: &str,
        payload: Value,
        timeout: Option<Duration>,
    ) -> SendReport {
        self.manager
            .send_message_to_component(
                name,
                payload,
                SendOptions {
                    timeout,
                    from: Some(self.component_name.clone()),
                    ..SendOptions::default()
                },
            )
            .await
    }

    /// Broadcasts a message, attributed to the owning component.
    pub async fn broadcast_message(
        &self,
        payload: Value,
        mut options: BroadcastOptions,
    ) -> BroadcastReport {
        options.from = Some(self.component_name.clone());
        self.manager.broadcast_message(payload, options).await
    }

    /// Looks up a shared value, attributed to the owning component.
    pub fn get_value(&self, name: &str, key: &str) -> ValueReport {
        self.manager.get_value(
            name,
            key,
            ValueOptions {
                requested_by: Some(self.component_name.clone()),
            },
        )
    }
}
