//! The signal coordinator: OS signals and TTY keypresses mapped onto four
//! logical callbacks.

// Layer 1: Standard library imports
use std::io::IsTerminal;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use futures::{FutureExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::error::SignalError;
use super::keys::{decode_key, KeypressAction, KeypressThrottle};
use super::shared::shared_terminal;
use super::traits::SignalHandler;
use crate::manager::{ShutdownMethod, DEFAULT_KEYPRESS_THROTTLE};
use crate::util::InstanceId;

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Leading-edge throttle window for keypress actions; zero disables.
    pub keypress_throttle: Duration,

    /// Decode TTY keypresses at all (signals are always handled).
    pub enable_keypresses: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            keypress_throttle: DEFAULT_KEYPRESS_THROTTLE,
            enable_keypresses: true,
        }
    }
}

/// Per-instance attach bookkeeping.
#[derive(Default)]
struct AttachState {
    attached: bool,
    signal_task: Option<JoinHandle<()>>,
    keypress_task: Option<JoinHandle<()>>,
}

struct CoordinatorInner {
    id: InstanceId,
    config: SignalConfig,
    handler: Arc<dyn SignalHandler>,
    state: Mutex<AttachState>,
}

/// Maps OS signals and TTY keypresses to the four logical callbacks of a
/// [`SignalHandler`].
///
/// Signal mapping: `SIGINT`/`SIGTERM`/`SIGTRAP` trigger a shutdown with the
/// signal's name as method, `SIGHUP` reloads, `SIGUSR1` reports info,
/// `SIGUSR2` reports debug. Keypresses (TTY only): `Ctrl+C` and `Esc`
/// shut down as `SIGINT`; `r`/`i`/`d` (either case) reload/info/debug,
/// throttled per action. Signals are never throttled.
///
/// Attach and detach are idempotent. Multiple coordinators may coexist;
/// they share the process-global terminal record and hand raw-mode
/// ownership between each other (see [`super::shared`]).
///
/// Cloning is cheap: clones share the same instance identity and state.
#[derive(Clone)]
pub struct SignalCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl SignalCoordinator {
    /// Creates a coordinator dispatching into `handler`.
    pub fn new(config: SignalConfig, handler: Arc<dyn SignalHandler>) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                id: InstanceId::allocate(),
                config,
                handler,
                state: Mutex::new(AttachState::default()),
            }),
        }
    }

    /// This instance's identity in the shared terminal record.
    pub fn instance_id(&self) -> InstanceId {
        self.inner.id
    }

    /// Returns `true` while attached.
    pub fn is_attached(&self) -> bool {
        self.inner.state.lock().attached
    }

    /// Attaches signal streams and (on a TTY) keypress decoding.
    ///
    /// Idempotent. On failure everything installed so far is unwound and
    /// the error propagates, with one deliberate exception: a raw-mode
    /// enable failure still records this instance as the raw-mode owner, so
    /// a later detach can restore the terminal if the enable partially took
    /// effect.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] when installing a signal stream or entering
    /// raw mode fails.
    pub async fn attach(&self) -> Result<(), SignalError> {
        if self.inner.state.lock().attached {
            return Ok(());
        }

        let signal_task = spawn_signal_streams(Arc::clone(&self.inner.handler))?;

        let keypress_task = match self.setup_keypresses() {
            Ok(task) => task,
            Err(err) => {
                if let Some(task) = signal_task {
                    task.abort();
                }
                return Err(err);
            }
        };

        let mut state = self.inner.state.lock();
        state.attached = true;
        state.signal_task = signal_task;
        state.keypress_task = keypress_task;
        debug!(instance = %self.inner.id, "Signal coordinator attached");
        Ok(())
    }

    /// Detaches this instance, restoring the terminal when it is the last
    /// one out.
    ///
    /// Idempotent. When other instances remain and this one owns raw mode,
    /// ownership transfers to a survivor. When the last instance fails to
    /// disable raw mode, ownership is left in place so a later detach can
    /// retry; the terminal is restored on process exit regardless.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::RawMode`] when disabling raw mode fails.
    pub async fn detach(&self) -> Result<(), SignalError> {
        let (signal_task, keypress_task) = {
            let mut state = self.inner.state.lock();
            if !state.attached {
                return Ok(());
            }
            state.attached = false;
            (state.signal_task.take(), state.keypress_task.take())
        };

        if let Some(task) = signal_task {
            task.abort();
        }
        if let Some(task) = keypress_task {
            task.abort();
        }

        let mut shared = shared_terminal().lock();
        // Remove-then-check: survivors must observe a non-empty set.
        shared.attached.remove(&self.inner.id);

        if !shared.attached.is_empty() {
            if shared.raw_mode_owner == Some(self.inner.id) {
                shared.raw_mode_owner = shared.attached.iter().next().copied();
                debug!(
                    instance = %self.inner.id,
                    new_owner = ?shared.raw_mode_owner,
                    "Raw mode ownership transferred"
                );
            }
            return Ok(());
        }

        if shared.raw_mode_enabled_by_coordinator && shared.raw_mode_owner == Some(self.inner.id)
        {
            if let Err(err) = crossterm::terminal::disable_raw_mode() {
                warn!(error = %err, "Failed to disable raw mode; will retry on next detach");
                return Err(SignalError::raw_mode("disable", err));
            }
            shared.raw_mode_owner = None;
            shared.raw_mode_enabled_by_coordinator = false;
        }
        debug!(instance = %self.inner.id, "Signal coordinator detached");
        Ok(())
    }

    /// TTY path of the attach protocol: start the keypress pump once,
    /// add-then-check the attached set, take raw-mode ownership when first
    /// in, and subscribe this instance to the pump.
    fn setup_keypresses(&self) -> Result<Option<JoinHandle<()>>, SignalError> {
        if !self.inner.config.enable_keypresses || !std::io::stdin().is_terminal() {
            return Ok(None);
        }

        let receiver = {
            let mut shared = shared_terminal().lock();

            if !shared.keypress_pump_started {
                let (tx, _) = broadcast::channel(64);
                spawn_keypress_pump(tx.clone());
                shared.keypress_tx = Some(tx);
                shared.keypress_pump_started = true;
            }

            // Add-then-check prevents two instances from both observing an
            // empty set and both enabling raw mode.
            shared.attached.insert(self.inner.id);
            let first_instance = shared.attached.len() == 1;

            if first_instance {
                match crossterm::terminal::is_raw_mode_enabled() {
                    Ok(false) => {
                        if let Err(err) = crossterm::terminal::enable_raw_mode() {
                            // The terminal may have flipped despite the
                            // error; record ownership so a later detach can
                            // restore it.
                            shared.raw_mode_owner = Some(self.inner.id);
                            shared.raw_mode_enabled_by_coordinator = true;
                            shared.attached.remove(&self.inner.id);
                            return Err(SignalError::raw_mode("enable", err));
                        }
                        shared.raw_mode_owner = Some(self.inner.id);
                        shared.raw_mode_enabled_by_coordinator = true;
                    }
                    Ok(true) => {
                        // Raw mode already on. If we enabled it in a past
                        // attach cycle and the owner is gone, adopt it.
                        if shared.raw_mode_enabled_by_coordinator {
                            let owner_is_stale = shared
                                .raw_mode_owner
                                .is_none_or(|owner| !shared.attached.contains(&owner));
                            if owner_is_stale {
                                shared.raw_mode_owner = Some(self.inner.id);
                            }
                        }
                    }
                    Err(err) => {
                        shared.attached.remove(&self.inner.id);
                        return Err(SignalError::raw_mode("query", err));
                    }
                }
            }

            match &shared.keypress_tx {
                Some(tx) => tx.subscribe(),
                None => return Ok(None),
            }
        };

        let handler = Arc::clone(&self.inner.handler);
        let throttle_window = self.inner.config.keypress_throttle;
        let task = tokio::spawn(async move {
            run_keypress_subscriber(receiver, handler, throttle_window).await;
        });
        Ok(Some(task))
    }
}

/// Installs the six signal streams and spawns the listener task.
///
/// All streams are created before anything is spawned, so a failure on any
/// of them unwinds the earlier ones by dropping them.
#[cfg(unix)]
fn spawn_signal_streams(
    handler: Arc<dyn SignalHandler>,
) -> Result<Option<JoinHandle<()>>, SignalError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint =
        signal(SignalKind::interrupt()).map_err(|e| SignalError::install("SIGINT", e))?;
    let mut sigterm =
        signal(SignalKind::terminate()).map_err(|e| SignalError::install("SIGTERM", e))?;
    let mut sigtrap = signal(SignalKind::from_raw(nix::libc::SIGTRAP))
        .map_err(|e| SignalError::install("SIGTRAP", e))?;
    let mut sighup = signal(SignalKind::hangup()).map_err(|e| SignalError::install("SIGHUP", e))?;
    let mut sigusr1 =
        signal(SignalKind::user_defined1()).map_err(|e| SignalError::install("SIGUSR1", e))?;
    let mut sigusr2 =
        signal(SignalKind::user_defined2()).map_err(|e| SignalError::install("SIGUSR2", e))?;

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigint.recv() => dispatch(&handler, SignalEventKind::Shutdown(ShutdownMethod::Sigint)),
                _ = sigterm.recv() => dispatch(&handler, SignalEventKind::Shutdown(ShutdownMethod::Sigterm)),
                _ = sigtrap.recv() => dispatch(&handler, SignalEventKind::Shutdown(ShutdownMethod::Sigtrap)),
                _ = sighup.recv() => dispatch(&handler, SignalEventKind::Reload),
                _ = sigusr1.recv() => dispatch(&handler, SignalEventKind::Info),
                _ = sigusr2.recv() => dispatch(&handler, SignalEventKind::Debug),
            }
        }
    });
    Ok(Some(task))
}

#[cfg(not(unix))]
fn spawn_signal_streams(
    _handler: Arc<dyn SignalHandler>,
) -> Result<Option<JoinHandle<()>>, SignalError> {
    Ok(None)
}

/// The logical event a signal or keypress resolves to.
#[derive(Debug, Clone, Copy)]
enum SignalEventKind {
    Shutdown(ShutdownMethod),
    Reload,
    Info,
    Debug,
}

impl From<KeypressAction> for SignalEventKind {
    fn from(action: KeypressAction) -> Self {
        match action {
            // Keypress-initiated shutdowns are attributed as SIGINT.
            KeypressAction::Shutdown => SignalEventKind::Shutdown(ShutdownMethod::Sigint),
            KeypressAction::Reload => SignalEventKind::Reload,
            KeypressAction::Info => SignalEventKind::Info,
            KeypressAction::Debug => SignalEventKind::Debug,
        }
    }
}

/// Safe dispatch: the handler runs in its own task, and a panic is reported
/// on the out-of-band channel instead of taking down the listener.
fn dispatch(handler: &Arc<dyn SignalHandler>, event: SignalEventKind) {
    let handler = Arc::clone(handler);
    tokio::spawn(async move {
        let invocation = async {
            match event {
                SignalEventKind::Shutdown(method) => handler.on_shutdown(method).await,
                SignalEventKind::Reload => handler.on_reload().await,
                SignalEventKind::Info => handler.on_info().await,
                SignalEventKind::Debug => handler.on_debug().await,
            }
        };
        if AssertUnwindSafe(invocation).catch_unwind().await.is_err() {
            tracing::error!(
                target: "lifeline::report",
                event = ?event,
                "Signal handler panicked"
            );
        }
    });
}

/// The process-wide keypress pump: drains the crossterm event stream and
/// broadcasts decoded actions to every attached instance. Started at most
/// once per process (guarded by the shared one-shot flag); with no
/// receivers the sends are simply dropped, which is the pause analogue.
fn spawn_keypress_pump(tx: broadcast::Sender<KeypressAction>) {
    tokio::spawn(async move {
        let mut stream = crossterm::event::EventStream::new();
        while let Some(event) = stream.next().await {
            match event {
                Ok(crossterm::event::Event::Key(key))
                    if key.kind == crossterm::event::KeyEventKind::Press =>
                {
                    if let Some(action) = decode_key(&key) {
                        let _ = tx.send(action);
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "Keypress stream error");
                    break;
                }
            }
        }
    });
}

/// Per-instance keypress subscriber with its own throttle.
async fn run_keypress_subscriber(
    mut receiver: broadcast::Receiver<KeypressAction>,
    handler: Arc<dyn SignalHandler>,
    throttle_window: Duration,
) {
    let mut throttle = KeypressThrottle::new(throttle_window);
    loop {
        match receiver.recv().await {
            Ok(action) => {
                if throttle.allow(action) {
                    dispatch(&handler, action.into());
                } else {
                    debug!(action = ?action, "Keypress throttled");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "Keypress subscriber lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
