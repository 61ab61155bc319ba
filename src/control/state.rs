//! Shared control state between the acquisition loop and the publisher.
//!
//! One mutex guards everything; the acquisition loop is the only writer of
//! decoded values, the publisher the only writer of the rate-limited
//! `steering`/`prev_steering` pair. Neither side holds the lock across
//! blocking I/O.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The control values mediating between the two loops.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlValues {
    /// Signed physical acceleration command.
    pub acceleration: f32,
    /// Current physical steering command, already quantized.
    pub steering: f32,
    /// Latest decoded steering before rate limiting; only meaningful when
    /// the limiter is enabled.
    pub target_steering: f32,
    /// Steering applied at the previous publish tick.
    pub prev_steering: f32,
    /// Sticky fault/shutdown flag; once set, never cleared.
    pub has_error: bool,
}

/// Cloneable handle to the single shared [`ControlValues`] instance.
///
/// Ownership is explicit: the handle is created once in `main` and passed to
/// both loops at construction.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    inner: Arc<Mutex<ControlValues>>,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the state lock.
    ///
    /// A poisoned lock is absorbed: if one side panicked, the other must
    /// still be able to observe the error flag and drain.
    pub fn lock(&self) -> MutexGuard<'_, ControlValues> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the sticky error flag.
    pub fn set_error(&self) {
        self.lock().has_error = true;
    }

    /// Reads the sticky error flag.
    pub fn has_error(&self) -> bool {
        self.lock().has_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_flag_is_sticky() {
        let state = ControlState::new();
        assert!(!state.has_error());
        state.set_error();
        assert!(state.has_error());
        state.set_error();
        assert!(state.has_error());
    }

    #[test]
    fn clones_share_one_instance() {
        let state = ControlState::new();
        let peer = state.clone();
        state.lock().steering = 2.5;
        assert_eq!(peer.lock().steering, 2.5);
        peer.set_error();
        assert!(state.has_error());
    }
}
