//! Process-scoped shared terminal state.
//!
//! stdin and raw mode are process-global, so every coordinator instance in
//! the process shares this record. The attach protocol inserts into the
//! attached set *before* checking whether it is the first instance
//! (add-then-check), and detach removes *before* checking whether it was
//! the last (remove-then-check); both orders close the race where two
//! instances each observe an empty set.

// Layer 1: Standard library imports
use std::collections::HashSet;
use std::sync::OnceLock;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::broadcast;

// Layer 3: Internal module imports
use super::keys::KeypressAction;
use crate::util::InstanceId;

/// Shared terminal bookkeeping for every coordinator in the process.
#[derive(Debug, Default)]
pub(crate) struct SharedTerminalState {
    /// One-shot: the keypress pump has been started on stdin.
    pub keypress_pump_started: bool,

    /// Broadcast side of the keypress pump; attached instances subscribe.
    pub keypress_tx: Option<broadcast::Sender<KeypressAction>>,

    /// Instances currently attached to the terminal.
    pub attached: HashSet<InstanceId>,

    /// The instance that must eventually disable raw mode, if any.
    pub raw_mode_owner: Option<InstanceId>,

    /// True iff a coordinator instance enabled raw mode.
    pub raw_mode_enabled_by_coordinator: bool,
}

/// The process-global shared terminal record.
pub(crate) fn shared_terminal() -> &'static Mutex<SharedTerminalState> {
    static SHARED: OnceLock<Mutex<SharedTerminalState>> = OnceLock::new();
    SHARED.get_or_init(|| Mutex::new(SharedTerminalState::default()))
}
