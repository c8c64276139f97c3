//! Keypress decoding and per-action throttling.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// Layer 3: Internal module imports
// (none)

/// Logical action a TTY keypress maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypressAction {
    /// Ctrl+C or Esc: shutdown (attributed as SIGINT).
    Shutdown,

    /// `r` / `R`: reload.
    Reload,

    /// `i` / `I`: info.
    Info,

    /// `d` / `D`: debug.
    Debug,
}

/// Decodes a key event into its logical action, if it has one.
///
/// # Examples
///
/// ```rust
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
/// use lifeline_rt::signal::{decode_key, KeypressAction};
///
/// let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert_eq!(decode_key(&ctrl_c), Some(KeypressAction::Shutdown));
///
/// let reload = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::NONE);
/// assert_eq!(decode_key(&reload), Some(KeypressAction::Reload));
///
/// let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
/// assert_eq!(decode_key(&other), None);
/// ```
pub fn decode_key(key: &KeyEvent) -> Option<KeypressAction> {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(KeypressAction::Shutdown)
        }
        KeyCode::Esc => Some(KeypressAction::Shutdown),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeypressAction::Reload),
        KeyCode::Char('i') | KeyCode::Char('I') => Some(KeypressAction::Info),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(KeypressAction::Debug),
        _ => None,
    }
}

/// Leading-edge per-action throttle.
///
/// The first press of an action fires immediately; further presses inside
/// the window are dropped. A zero window disables throttling. Signals are
/// never routed through this; only keypresses, which a held key can
/// repeat far faster than any supervisor resends signals.
#[derive(Debug)]
pub struct KeypressThrottle {
    window: Duration,
    last_fired: HashMap<KeypressAction, Instant>,
}

impl KeypressThrottle {
    /// Creates a throttle with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: HashMap::new(),
        }
    }

    /// Returns `true` if the action may fire now, recording the edge.
    pub fn allow(&mut self, action: KeypressAction) -> bool {
        if self.window.is_zero() {
            return true;
        }
        let now = Instant::now();
        match self.last_fired.get(&action) {
            Some(last) if now.duration_since(*last) < self.window => false,
            _ => {
                self.last_fired.insert(action, now);
                true
            }
        }
    }
}
