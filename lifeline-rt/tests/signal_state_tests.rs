//! Signal Coordination and Manager Integration Tests
//!
//! Exercised without a TTY (CI has none): signal-stream attach/detach
//! idempotence, shared-state bookkeeping across coexisting instances,
//! manager-level signal triggers, and the logger exit hook.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

// Layer 1: Standard library imports
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use tokio::sync::Notify;

// Layer 3: Internal module imports
use common::TestComponent;
use lifeline_rt::events::{InMemoryEventSink, LifecycleEvent, LifecycleEventKind, SinkConfig};
use lifeline_rt::manager::{
    ExitAction, LifecycleManager, ManagerConfig, ShutdownMethod, ShutdownOptions, StartupOptions,
};
use lifeline_rt::signal::{SignalConfig, SignalCoordinator, SignalHandler};

struct NullHandler;

#[async_trait]
impl SignalHandler for NullHandler {
    async fn on_shutdown(&self, _method: ShutdownMethod) {}
    async fn on_reload(&self) {}
    async fn on_info(&self) {}
    async fn on_debug(&self) {}
}

fn coordinator() -> SignalCoordinator {
    SignalCoordinator::new(SignalConfig::default(), Arc::new(NullHandler))
}

// ============================================================================
// TEST GROUP 1: Coordinator attach/detach
// ============================================================================

#[tokio::test]
async fn test_attach_detach_idempotence_law() {
    let coordinator = coordinator();

    // attach(); attach(); == attach();
    coordinator.attach().await.unwrap();
    coordinator.attach().await.unwrap();
    assert!(coordinator.is_attached());

    // detach(); detach(); == detach();
    coordinator.detach().await.unwrap();
    coordinator.detach().await.unwrap();
    assert!(!coordinator.is_attached());
}

#[tokio::test]
async fn test_coexisting_instances_do_not_interfere() {
    let a = coordinator();
    let b = coordinator();

    a.attach().await.unwrap();
    b.attach().await.unwrap();

    a.detach().await.unwrap();
    // b remains fully attached after a leaves.
    assert!(b.is_attached());
    b.detach().await.unwrap();
    assert!(!b.is_attached());
}

#[tokio::test]
async fn test_reattach_after_detach() {
    let coordinator = coordinator();
    coordinator.attach().await.unwrap();
    coordinator.detach().await.unwrap();
    coordinator.attach().await.unwrap();
    assert!(coordinator.is_attached());
    coordinator.detach().await.unwrap();
}

// ============================================================================
// TEST GROUP 2: Manager signal surface
// ============================================================================

#[tokio::test]
async fn test_manager_attach_emits_events() {
    let sink = Arc::new(InMemoryEventSink::<LifecycleEvent>::new(SinkConfig::default()));
    let manager = LifecycleManager::builder()
        .with_event_sink(Arc::clone(&sink) as Arc<dyn lifeline_rt::events::EventSink<_>>)
        .build();

    manager.attach_signals().await.unwrap();
    assert!(manager.signals_attached());
    manager.attach_signals().await.unwrap();
    manager.detach_signals().await.unwrap();
    assert!(!manager.signals_attached());

    let snapshot = sink.snapshot().unwrap();
    let attached = snapshot
        .recent_events
        .iter()
        .filter(|e| matches!(e.kind, LifecycleEventKind::SignalsAttached))
        .count();
    let detached = snapshot
        .recent_events
        .iter()
        .filter(|e| matches!(e.kind, LifecycleEventKind::SignalsDetached))
        .count();
    assert_eq!(attached, 2);
    assert_eq!(detached, 1);
}

#[tokio::test]
async fn test_attach_signals_on_first_start() {
    let manager = LifecycleManager::builder()
        .with_config(
            ManagerConfig::builder()
                .with_attach_signals_on_start(true)
                .build()
                .unwrap(),
        )
        .build();
    manager.register_component(Arc::new(TestComponent::new("db")));

    assert!(!manager.signals_attached());
    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    assert!(manager.signals_attached());

    manager.detach_signals().await.unwrap();
}

#[tokio::test]
async fn test_trigger_info_and_debug_reach_capable_components() {
    let manager = LifecycleManager::new();
    let chatty = Arc::new(
        TestComponent::new("chatty")
            .with_info_hook()
            .with_debug_hook(),
    );
    let mute = Arc::new(TestComponent::new("mute"));
    manager
        .register_component(Arc::clone(&chatty) as Arc<dyn lifeline_rt::component::Component>);
    manager.register_component(Arc::clone(&mute) as Arc<dyn lifeline_rt::component::Component>);
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    manager.trigger_info().await;
    manager.trigger_debug().await;
    manager.trigger_debug().await;

    assert_eq!(chatty.infos.load(Ordering::SeqCst), 1);
    assert_eq!(chatty.debugs.load(Ordering::SeqCst), 2);
    assert_eq!(mute.infos.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_manual_shutdown_attribution() {
    let manager = LifecycleManager::new();
    manager.register_component(Arc::new(TestComponent::new("db")));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(report.success);
    assert_eq!(report.method, ShutdownMethod::Manual);
    assert_eq!(manager.shutdown_method(), Some(ShutdownMethod::Manual));
}

// ============================================================================
// TEST GROUP 3: Logger exit hook
// ============================================================================

#[tokio::test]
async fn test_exit_hook_waits_during_shutdown() {
    let manager = LifecycleManager::builder()
        .with_config(
            ManagerConfig::builder()
                .with_logger_exit_hook(true)
                .build()
                .unwrap(),
        )
        .build();

    let gate = Arc::new(Notify::new());
    manager.register_component(Arc::new(
        TestComponent::new("slow").with_stop_gate(Arc::clone(&gate)),
    ));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    assert_eq!(manager.before_exit(0, true), ExitAction::Proceed);

    let background = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.stop_all_components(ShutdownOptions::default()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_shutting_down());
    assert_eq!(manager.before_exit(0, true), ExitAction::Wait);

    gate.notify_one();
    assert!(background.await.unwrap().success);
    assert_eq!(manager.before_exit(0, false), ExitAction::Proceed);
}

#[tokio::test]
async fn test_exit_hook_disabled_always_proceeds() {
    let manager = LifecycleManager::new();
    let gate = Arc::new(Notify::new());
    manager.register_component(Arc::new(
        TestComponent::new("slow").with_stop_gate(Arc::clone(&gate)),
    ));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let background = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.stop_all_components(ShutdownOptions::default()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    // Hook not enabled: proceed even while shutting down.
    assert_eq!(manager.before_exit(0, true), ExitAction::Proceed);
    gate.notify_one();
    assert!(background.await.unwrap().success);
}

// ============================================================================
// TEST GROUP 4: Shutdown signal future
// ============================================================================

#[tokio::test]
async fn test_shutdown_signal_future_resolves() {
    let manager = LifecycleManager::new();
    manager.register_component(Arc::new(TestComponent::new("db")));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let signal = manager.shutdown_signal();
    let waiter = tokio::spawn(async move {
        signal.await;
        true
    });

    assert!(manager.stop_all_components(ShutdownOptions::default()).await.success);
    let resolved = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
    assert!(resolved);
}
