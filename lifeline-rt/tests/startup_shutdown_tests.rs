//! Startup/Shutdown Engine Integration Tests
//!
//! End-to-end coverage of the bulk engines against real components:
//!
//! 1. **Ordering** - diamond dependencies, reverse shutdown order
//! 2. **Failure handling** - optional failures, required-failure rollback
//! 3. **Stalls** - stall trap, retry, halt-on-stall, blocked startup
//! 4. **Concurrency** - overlapped bulk operations, double shutdown,
//!    reload during startup
//! 5. **Warning phase** - fire-and-forget determinism

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

// Layer 1: Standard library imports
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use tokio::sync::Notify;

// Layer 3: Internal module imports
use common::{fast_timeouts, order_log, TestComponent};
use lifeline_rt::component::{ComponentState, StallPhase, StallReason};
use lifeline_rt::events::{InMemoryEventSink, LifecycleEvent, LifecycleEventKind, SinkConfig};
use lifeline_rt::manager::{
    LifecycleManager, ManagerConfig, ShutdownMethod, ShutdownOptions, StartupCode, StartupOptions,
    StopCode, StopComponentOptions, SystemState, WarningTimeout,
};

fn manager() -> LifecycleManager {
    LifecycleManager::new()
}

// ============================================================================
// TEST GROUP 1: Ordering
// ============================================================================

#[tokio::test]
async fn test_diamond_dependency_order() {
    let manager = manager();
    let starts = order_log();
    let stops = order_log();

    for component in [
        TestComponent::new("api").with_deps(&["web", "worker"]),
        TestComponent::new("web").with_deps(&["db"]),
        TestComponent::new("worker").with_deps(&["db"]),
        TestComponent::new("db"),
    ] {
        let report = manager.register_component(Arc::new(
            component.record_orders(Arc::clone(&starts), Arc::clone(&stops)),
        ));
        assert!(report.success, "registration failed: {:?}", report.code);
    }

    assert_eq!(
        manager.startup_order().unwrap(),
        vec!["db", "web", "worker", "api"]
    );

    let report = manager.start_all_components(StartupOptions::default()).await;
    assert!(report.success);
    assert_eq!(report.started_components.len(), 4);
    assert_eq!(manager.running_count(), 4);
    assert_eq!(manager.system_state(), SystemState::Running);
    assert_eq!(&*starts.lock(), &["db", "web", "worker", "api"]);

    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(report.success);
    assert_eq!(report.method, ShutdownMethod::Manual);
    assert_eq!(&*stops.lock(), &["api", "worker", "web", "db"]);
    assert_eq!(manager.running_count(), 0);
}

#[tokio::test]
async fn test_serial_start_stop_start_succeeds() {
    let manager = manager();
    manager.register_component(Arc::new(TestComponent::new("db")));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    assert!(manager.stop_all_components(ShutdownOptions::default()).await.success);
    assert!(manager.start_all_components(StartupOptions::default()).await.success);
}

#[tokio::test]
async fn test_start_all_when_all_running_is_trivial_success() {
    let manager = manager();
    manager.register_component(Arc::new(TestComponent::new("db")));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager.start_all_components(StartupOptions::default()).await;
    assert!(report.success);
    assert!(report.started_components.is_empty());
}

#[tokio::test]
async fn test_start_all_empty_registry() {
    let report = manager().start_all_components(StartupOptions::default()).await;
    assert!(!report.success);
    assert_eq!(report.code, Some(StartupCode::NoComponentsRegistered));
}

// ============================================================================
// TEST GROUP 2: Failure handling
// ============================================================================

#[tokio::test]
async fn test_optional_failure_and_dependent_skip() {
    let manager = manager();
    manager.register_component(Arc::new(TestComponent::new("db")));
    manager.register_component(Arc::new(
        TestComponent::new("cache").optional_component().failing_start(),
    ));
    manager.register_component(Arc::new(TestComponent::new("web").with_deps(&["db"])));
    manager.register_component(Arc::new(TestComponent::new("api").with_deps(&["cache"])));

    let report = manager.start_all_components(StartupOptions::default()).await;
    assert!(report.success);
    assert_eq!(report.failed_optional_components.len(), 1);
    assert_eq!(report.failed_optional_components[0].name, "cache");
    assert!(report.failed_optional_components[0]
        .error
        .contains("refused to start"));
    assert_eq!(report.skipped_due_to_dependency.len(), 1);
    assert_eq!(report.skipped_due_to_dependency[0].name, "api");
    assert_eq!(report.skipped_due_to_dependency[0].dependency, "cache");

    assert!(manager.is_component_running("db"));
    assert!(manager.is_component_running("web"));
    assert!(!manager.is_component_running("cache"));
    assert!(!manager.is_component_running("api"));
}

#[tokio::test]
async fn test_optional_dependency_failure_does_not_block_dependent() {
    let manager = manager();
    // cache is optional and fails; api depends on it but cache's optional
    // flag means the failure does not block api.
    manager.register_component(Arc::new(
        TestComponent::new("cache").optional_component().failing_start(),
    ));
    manager.register_component(Arc::new(TestComponent::new("api").with_deps(&["cache"])));

    let report = manager.start_all_components(StartupOptions::default()).await;
    assert!(report.success);
    assert!(report.skipped_due_to_dependency.is_empty());
    assert!(manager.is_component_running("api"));
}

#[tokio::test]
async fn test_required_failure_rolls_back() {
    let manager = manager();
    let db = Arc::new(TestComponent::new("db"));
    manager.register_component(Arc::clone(&db) as Arc<dyn lifeline_rt::component::Component>);
    manager.register_component(Arc::new(
        TestComponent::new("api").with_deps(&["db"]).failing_start(),
    ));

    let report = manager.start_all_components(StartupOptions::default()).await;
    assert!(!report.success);
    assert!(report.started_components.is_empty());
    assert!(report.error.as_deref().unwrap_or("").contains("refused"));

    // db was started, then rolled back.
    assert_eq!(db.starts.load(Ordering::SeqCst), 1);
    assert_eq!(db.stops.load(Ordering::SeqCst), 1);
    assert!(!manager.is_component_running("db"));
    assert!(!manager.is_component_running("api"));
}

#[tokio::test(start_paused = true)]
async fn test_start_timeout_marks_failed_and_fires_abort() {
    let manager = manager();
    let hang = Arc::new(
        TestComponent::new("slow")
            .hanging_start()
            .with_abort_hooks()
            .with_timeouts(fast_timeouts()),
    );
    manager.register_component(Arc::clone(&hang) as Arc<dyn lifeline_rt::component::Component>);

    let report = manager.start_all_components(StartupOptions::default()).await;
    assert!(!report.success);
    assert_eq!(hang.startup_aborts.load(Ordering::SeqCst), 1);

    let status = manager.component_status("slow").unwrap();
    assert_eq!(status.state, ComponentState::Registered);
    assert!(status.last_error.unwrap().contains("timed out"));
}

// ============================================================================
// TEST GROUP 3: Stalls
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_stall_trap_blocks_next_startup() {
    let manager = manager();
    manager.register_component(Arc::new(
        TestComponent::new("hung").hanging_stop().with_timeouts(fast_timeouts()),
    ));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(!report.success);
    assert_eq!(report.stalled_components.len(), 1);
    let stall = &report.stalled_components[0];
    assert_eq!(stall.name, "hung");
    assert_eq!(stall.phase, StallPhase::Graceful);
    assert_eq!(stall.reason, StallReason::Timeout);

    assert_eq!(manager.system_state(), SystemState::Stalled);
    assert_eq!(manager.stalled_components(), vec!["hung"]);

    let startup = manager.start_all_components(StartupOptions::default()).await;
    assert!(!startup.success);
    assert_eq!(startup.code, Some(StartupCode::StalledComponentsExist));
    assert_eq!(
        startup.blocked_by_stalled_components,
        Some(vec!["hung".to_string()])
    );
}

#[tokio::test(start_paused = true)]
async fn test_force_hook_rescues_hanging_stop() {
    let manager = manager();
    let component = Arc::new(
        TestComponent::new("tough")
            .hanging_stop()
            .with_force_hook()
            .with_timeouts(fast_timeouts()),
    );
    manager.register_component(Arc::clone(&component) as Arc<dyn lifeline_rt::component::Component>);

    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(report.success, "force hook should rescue: {:?}", report.reason);
    assert_eq!(component.forces.load(Ordering::SeqCst), 1);
    assert_eq!(manager.stopped_components(), vec!["tough"]);
}

#[tokio::test(start_paused = true)]
async fn test_graceful_timeout_and_force_failure_stalls_with_both() {
    let manager = manager();
    manager.register_component(Arc::new(
        TestComponent::new("doomed")
            .hanging_stop()
            .failing_force()
            .with_timeouts(fast_timeouts()),
    ));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(!report.success);
    let stall = &report.stalled_components[0];
    assert_eq!(stall.phase, StallPhase::Force);
    assert_eq!(stall.reason, StallReason::Both);
}

#[tokio::test(start_paused = true)]
async fn test_graceful_error_without_force_hook_stalls_with_error() {
    let manager = manager();
    manager.register_component(Arc::new(
        TestComponent::new("broken").failing_stop().with_timeouts(fast_timeouts()),
    ));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(!report.success);
    let stall = &report.stalled_components[0];
    assert_eq!(stall.phase, StallPhase::Graceful);
    assert_eq!(stall.reason, StallReason::Error);
    assert!(stall.error.as_deref().unwrap().contains("refused to stop"));
}

#[tokio::test(start_paused = true)]
async fn test_retry_stalled_recovers_through_force() {
    let manager = manager();
    // First shutdown stalls (hanging stop, force also hangs). The component
    // is then "fixed": hang_force cannot be flipped at runtime, so model
    // recovery with a second shutdown retrying a force hook that succeeds.
    let component = Arc::new(
        TestComponent::new("wedged")
            .hanging_stop()
            .with_force_hook()
            .hanging_force()
            .with_timeouts(fast_timeouts()),
    );
    manager.register_component(Arc::clone(&component) as Arc<dyn lifeline_rt::component::Component>);

    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    let first = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(!first.success);
    assert_eq!(manager.stalled_components(), vec!["wedged"]);

    // Retry goes straight to the force phase; stop() is not re-run.
    let stops_before = component.stops.load(Ordering::SeqCst);
    let second = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(!second.success); // force still hangs; remains stalled
    assert_eq!(component.stops.load(Ordering::SeqCst), stops_before);
    assert!(component.forces.load(Ordering::SeqCst) >= 2);
    assert_eq!(manager.stalled_components(), vec!["wedged"]);
}

#[tokio::test(start_paused = true)]
async fn test_halt_on_stall_stops_processing() {
    let manager = manager();
    let survivor = Arc::new(TestComponent::new("a-ok"));
    // Reverse shutdown order processes "z-hung" first (registered last,
    // no dependencies, so reverse registration order applies).
    manager.register_component(Arc::clone(&survivor) as Arc<dyn lifeline_rt::component::Component>);
    manager.register_component(Arc::new(
        TestComponent::new("z-hung").hanging_stop().with_timeouts(fast_timeouts()),
    ));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager
        .stop_all_components(ShutdownOptions {
            halt_on_stall: true,
            ..ShutdownOptions::default()
        })
        .await;
    assert!(!report.success);
    assert_eq!(report.stalled_components.len(), 1);
    // Processing halted before the survivor.
    assert_eq!(survivor.stops.load(Ordering::SeqCst), 0);
    assert!(manager.is_component_running("a-ok"));
}

#[tokio::test(start_paused = true)]
async fn test_halt_on_stall_false_collects_all_stalls() {
    let manager = manager();
    manager.register_component(Arc::new(
        TestComponent::new("hung-one").hanging_stop().with_timeouts(fast_timeouts()),
    ));
    manager.register_component(Arc::new(
        TestComponent::new("hung-two").hanging_stop().with_timeouts(fast_timeouts()),
    ));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager
        .stop_all_components(ShutdownOptions {
            halt_on_stall: false,
            ..ShutdownOptions::default()
        })
        .await;
    assert!(!report.success);
    assert_eq!(report.stalled_components.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_ignore_stalled_starts_the_rest() {
    let manager = manager();
    manager.register_component(Arc::new(
        TestComponent::new("hung").hanging_stop().with_timeouts(fast_timeouts()),
    ));
    manager.register_component(Arc::new(TestComponent::new("db")));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    assert!(!manager.stop_all_components(ShutdownOptions::default()).await.success);

    // db stopped cleanly; hung is stalled. A fresh startup with
    // ignore_stalled skips the stalled component and starts db.
    let report = manager
        .start_all_components(StartupOptions {
            ignore_stalled: true,
            ..StartupOptions::default()
        })
        .await;
    assert!(report.success, "reason: {:?}", report.reason);
    assert_eq!(report.skipped_due_to_stall, vec!["hung"]);
    assert!(manager.is_component_running("db"));
}

// ============================================================================
// TEST GROUP 4: Concurrency
// ============================================================================

#[tokio::test]
async fn test_overlapped_start_all_rejected() {
    let manager = manager();
    let gate = Arc::new(Notify::new());
    manager.register_component(Arc::new(
        TestComponent::new("gated").with_start_gate(Arc::clone(&gate)),
    ));

    let background = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.start_all_components(StartupOptions::default()).await })
    };
    // Let the background startup reach the gated component.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_starting());

    let overlapped = manager.start_all_components(StartupOptions::default()).await;
    assert!(!overlapped.success);
    assert_eq!(overlapped.code, Some(StartupCode::AlreadyInProgress));

    gate.notify_one();
    let report = background.await.unwrap();
    assert!(report.success);
}

#[tokio::test]
async fn test_double_shutdown_ignored_and_attribution_retained() {
    let manager = manager();
    let gate = Arc::new(Notify::new());
    manager.register_component(Arc::new(
        TestComponent::new("slow").with_stop_gate(Arc::clone(&gate)),
    ));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let background = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.trigger_shutdown(ShutdownMethod::Sigterm).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_shutting_down());

    // Second signal while shutting down: logged and ignored.
    let second = manager.trigger_shutdown(ShutdownMethod::Sigint).await;
    assert!(second.is_none());
    assert_eq!(manager.shutdown_method(), Some(ShutdownMethod::Sigterm));

    gate.notify_one();
    let report = background.await.unwrap().unwrap();
    assert!(report.success);
    assert_eq!(report.method, ShutdownMethod::Sigterm);
    // Attribution survives until the next successful startup.
    assert_eq!(manager.shutdown_method(), Some(ShutdownMethod::Sigterm));

    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    assert_eq!(manager.shutdown_method(), None);
}

#[tokio::test]
async fn test_shutdown_during_startup_rolls_back() {
    let manager = manager();
    let gate = Arc::new(Notify::new());
    let db = Arc::new(TestComponent::new("db"));
    manager.register_component(Arc::clone(&db) as Arc<dyn lifeline_rt::component::Component>);
    manager.register_component(Arc::new(
        TestComponent::new("api")
            .with_deps(&["db"])
            .with_start_gate(Arc::clone(&gate)),
    ));
    // A third component after the gated one: the engine observes the
    // shutdown before reaching it and rolls back.
    manager.register_component(Arc::new(TestComponent::new("web").with_deps(&["api"])));

    let background = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.start_all_components(StartupOptions::default()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_starting());

    let shutdown = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.trigger_shutdown(ShutdownMethod::Sigint).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_shutting_down());

    // Unblock api's start; the engine observes the shutdown before web.
    gate.notify_one();
    let startup = background.await.unwrap();
    assert!(!startup.success);
    assert_eq!(startup.code, Some(StartupCode::ShutdownInProgress));
    assert!(startup.started_components.is_empty());

    let _ = shutdown.await.unwrap();
    // Rollback stopped db (and api) in reverse order.
    assert_eq!(db.stops.load(Ordering::SeqCst), 1);
    assert!(!manager.is_component_running("db"));
    assert!(!manager.is_component_running("api"));
}

#[tokio::test]
async fn test_reload_during_startup_reaches_started_components_only() {
    let manager = manager();
    let gate = Arc::new(Notify::new());
    let early = Arc::new(TestComponent::new("early").with_reload_hook());
    let late = Arc::new(
        TestComponent::new("late")
            .with_reload_hook()
            .with_start_gate(Arc::clone(&gate)),
    );
    manager.register_component(Arc::clone(&early) as Arc<dyn lifeline_rt::component::Component>);
    manager.register_component(Arc::clone(&late) as Arc<dyn lifeline_rt::component::Component>);

    let background = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.start_all_components(StartupOptions::default()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_component_running("early"));

    manager.trigger_reload().await;
    assert_eq!(early.reloads.load(Ordering::SeqCst), 1);
    assert_eq!(late.reloads.load(Ordering::SeqCst), 0);

    gate.notify_one();
    assert!(background.await.unwrap().success);
}

#[tokio::test]
async fn test_registration_during_startup() {
    let manager = manager();
    let gate = Arc::new(Notify::new());
    manager.register_component(Arc::new(
        TestComponent::new("db").with_start_gate(Arc::clone(&gate)),
    ));
    manager.register_component(Arc::new(
        TestComponent::new("api").with_deps(&["db", "late-cache"]),
    ));

    let background = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.start_all_components(StartupOptions::default()).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(manager.is_starting());

    // "late-cache" is a required dependency of api: joining mid-startup
    // would invalidate the in-flight order.
    let report = manager.register_component(Arc::new(TestComponent::new("late-cache")));
    assert!(!report.success);
    assert_eq!(
        report.code,
        Some(lifeline_rt::registry::RegistrationCode::StartupInProgress)
    );

    // An independent component may still join (it is not part of the
    // in-flight order and starts on the next bulk startup).
    let report = manager.register_component(Arc::new(TestComponent::new("metrics")));
    assert!(report.success);

    gate.notify_one();
    let startup = background.await.unwrap();
    assert!(startup.success);
    // api was skipped: its required dependency never joined.
    assert_eq!(startup.skipped_due_to_dependency.len(), 1);
    assert_eq!(startup.skipped_due_to_dependency[0].name, "api");
    assert!(manager.has_component("metrics"));
}

#[tokio::test]
async fn test_stop_component_rejects_running_dependents() {
    let manager = manager();
    manager.register_component(Arc::new(TestComponent::new("db")));
    manager.register_component(Arc::new(TestComponent::new("api").with_deps(&["db"])));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager
        .stop_component("db", StopComponentOptions::default())
        .await;
    assert!(!report.success);
    assert_eq!(report.code, Some(StopCode::HasRunningDependents));

    let report = manager
        .stop_component(
            "db",
            StopComponentOptions {
                force: true,
                ..StopComponentOptions::default()
            },
        )
        .await;
    assert!(report.success);
}

#[tokio::test]
async fn test_stop_of_stopped_component_reports_not_running() {
    let manager = manager();
    manager.register_component(Arc::new(TestComponent::new("db")));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    assert!(manager.stop_all_components(ShutdownOptions::default()).await.success);

    let report = manager
        .stop_component("db", StopComponentOptions::default())
        .await;
    assert!(!report.success);
    assert_eq!(report.code, Some(StopCode::ComponentNotRunning));
}

// ============================================================================
// TEST GROUP 5: Warning phase
// ============================================================================

#[tokio::test]
async fn test_fire_and_forget_emits_global_completion_early() {
    let sink = Arc::new(InMemoryEventSink::<LifecycleEvent>::new(SinkConfig::default()));
    let manager = LifecycleManager::builder()
        .with_config(
            ManagerConfig::builder()
                .with_warning_timeout(WarningTimeout::FireAndForget)
                .build()
                .unwrap(),
        )
        .with_event_sink(Arc::clone(&sink) as Arc<dyn lifeline_rt::events::EventSink<_>>)
        .build();

    let slow = Arc::new(TestComponent::new("slow-warner").hanging_warning());
    manager.register_component(Arc::clone(&slow) as Arc<dyn lifeline_rt::component::Component>);
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(report.success);

    // The handler was launched but never completed; the global completion
    // event still fired.
    assert_eq!(slow.warnings.load(Ordering::SeqCst), 1);
    let snapshot = sink.snapshot().unwrap();
    let kinds: Vec<&LifecycleEventKind> =
        snapshot.recent_events.iter().map(|e| &e.kind).collect();
    assert!(kinds
        .iter()
        .any(|k| matches!(k, LifecycleEventKind::WarningPhaseCompleted { .. })));
    assert!(!kinds
        .iter()
        .any(|k| matches!(k, LifecycleEventKind::ShutdownWarningCompleted { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_bounded_warning_timeout_emits_pending() {
    let sink = Arc::new(InMemoryEventSink::<LifecycleEvent>::new(SinkConfig::default()));
    let manager = LifecycleManager::builder()
        .with_config(
            ManagerConfig::builder()
                .with_warning_timeout(WarningTimeout::Bounded(Duration::from_millis(100)))
                .build()
                .unwrap(),
        )
        .with_event_sink(Arc::clone(&sink) as Arc<dyn lifeline_rt::events::EventSink<_>>)
        .build();

    manager.register_component(Arc::new(TestComponent::new("slow-warner").hanging_warning()));
    assert!(manager.start_all_components(StartupOptions::default()).await.success);

    let report = manager.stop_all_components(ShutdownOptions::default()).await;
    assert!(report.success);

    let snapshot = sink.snapshot().unwrap();
    assert!(snapshot.recent_events.iter().any(|e| matches!(
        &e.kind,
        LifecycleEventKind::WarningPhaseTimeout { pending } if *pending == vec!["slow-warner".to_string()]
    )));
}

#[tokio::test]
async fn test_warning_phase_skip_never_invokes_handlers() {
    let manager = LifecycleManager::builder()
        .with_config(
            ManagerConfig::builder()
                .with_warning_timeout(WarningTimeout::Skip)
                .build()
                .unwrap(),
        )
        .build();

    let warner = Arc::new(TestComponent::new("warner").with_warning_hook());
    manager.register_component(Arc::clone(&warner) as Arc<dyn lifeline_rt::component::Component>);
    assert!(manager.start_all_components(StartupOptions::default()).await.success);
    assert!(manager.stop_all_components(ShutdownOptions::default()).await.success);
    assert_eq!(warner.warnings.load(Ordering::SeqCst), 0);
}
