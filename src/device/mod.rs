//! Joystick device access.
//!
//! Talks to the Linux joystick interface directly:
//!
//! 1. [`event`] - fixed-size event record decode and classification
//! 2. [`joystick`] - non-blocking device handle with bounded-wait polling
//!
//! The [`EventSource`] trait is the seam between the acquisition loop and the
//! hardware; tests drive the loop with a scripted source instead of a device
//! node.

pub mod event;
pub mod joystick;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use event::JoystickEvent;
pub use joystick::Joystick;

/// Errors from the device layer.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device node could not be opened.
    #[error("failed to open device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The readiness poll failed.
    #[error("failed to poll device: {0}")]
    Poll(#[source] io::Error),

    /// A read failed for a reason other than "no data currently available".
    /// This is fatal for the acquisition path.
    #[error("failed to read from device: {0}")]
    Read(#[source] io::Error),
}

/// A non-blocking source of joystick events with an explicit wait bound.
///
/// `wait_readable` may block up to `timeout`; `next_event` never blocks and
/// returns `Ok(None)` once all currently pending events are drained.
pub trait EventSource {
    /// Waits up to `timeout` for the source to become readable.
    fn wait_readable(&mut self, timeout: Duration) -> Result<bool, DeviceError>;

    /// Reads the next pending event, if any.
    fn next_event(&mut self) -> Result<Option<JoystickEvent>, DeviceError>;
}
