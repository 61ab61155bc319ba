//! Acquisition loop: drains device events into the shared control state.
//!
//! Runs on a dedicated thread because the readiness wait blocks in the
//! kernel. Each iteration waits at most [`POLL_TIMEOUT`] so both the sticky
//! error flag and the cancellation token are observed with bounded latency.
//! The state lock is held only while draining already-pending events, never
//! across the wait.

use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::BridgeConfig;
use crate::control::mapping::AxisMapper;
use crate::control::state::{ControlState, ControlValues};
use crate::device::event::JoystickEvent;
use crate::device::{DeviceError, EventSource};

/// Upper bound on one readiness wait; this bounds shutdown latency.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(20);

/// Turns axis events into control-state updates.
///
/// The two axis checks are independent: a single event is evaluated against
/// both mappings, and everything else (buttons, init replays) is accepted
/// without touching the state.
#[derive(Debug, Clone, Copy)]
pub struct EventDecoder {
    mapper: AxisMapper,
    axis_leftright: u8,
    axis_updown: u8,
    rate_limited: bool,
}

impl EventDecoder {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            mapper: AxisMapper::new(config),
            axis_leftright: config.axis_leftright,
            axis_updown: config.axis_updown,
            rate_limited: config.rate_limiting_enabled(),
        }
    }

    /// Applies one event to the control values.
    pub fn apply(&self, event: &JoystickEvent, values: &mut ControlValues) {
        // Init replays carry no user input.
        if event.is_init() {
            return;
        }
        if event.is_button() {
            debug!(
                button = event.number,
                pressed = event.value != 0,
                "button event ignored"
            );
            return;
        }
        if !event.is_axis() {
            return;
        }
        if event.number == self.axis_leftright {
            let steering = self.mapper.steering(event.value);
            debug!(raw = event.value, steering, "left-right axis");
            values.steering = steering;
            if self.rate_limited {
                values.target_steering = steering;
            }
        }
        if event.number == self.axis_updown {
            let acceleration = self.mapper.longitudinal(event.value);
            debug!(raw = event.value, acceleration, "up-down axis");
            values.acceleration = acceleration;
        }
    }
}

/// The acquisition side of the bridge, generic over its event source.
pub struct AcquisitionLoop<S> {
    source: S,
    decoder: EventDecoder,
    state: ControlState,
    shutdown: CancellationToken,
    poll_timeout: Duration,
}

impl<S: EventSource> AcquisitionLoop<S> {
    pub fn new(
        source: S,
        decoder: EventDecoder,
        state: ControlState,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            source,
            decoder,
            state,
            shutdown,
            poll_timeout: POLL_TIMEOUT,
        }
    }

    /// Runs until the error flag is set or the token is cancelled.
    ///
    /// Consumes the loop; the event source is dropped (and the device
    /// closed) when this returns.
    pub fn run(mut self) {
        info!("starting acquisition loop");
        loop {
            if self.shutdown.is_cancelled() || self.state.has_error() {
                break;
            }
            match self.source.wait_readable(self.poll_timeout) {
                Ok(false) => continue,
                Ok(true) => {
                    if let Err(err) = self.drain() {
                        error!(%err, "fatal device read error");
                        self.state.set_error();
                        break;
                    }
                }
                Err(err) => {
                    error!(%err, "device poll failed");
                    self.state.set_error();
                    break;
                }
            }
        }
        info!("acquisition loop terminated");
    }

    /// Drains all currently pending events under the state lock.
    fn drain(&mut self) -> Result<(), DeviceError> {
        let mut values = self.state.lock();
        loop {
            match self.source.next_event()? {
                Some(event) => self.decoder.apply(&event, &mut values),
                None => return Ok(()),
            }
        }
    }
}

/// Join handle for the acquisition thread.
///
/// The thread owns the device; joining it is what guarantees no I/O happens
/// on a released handle.
pub struct AcquisitionHandle {
    thread: thread::JoinHandle<()>,
}

impl AcquisitionHandle {
    /// Spawns the acquisition loop on its own OS thread.
    pub fn spawn<S>(acquisition: AcquisitionLoop<S>) -> std::io::Result<Self>
    where
        S: EventSource + Send + 'static,
    {
        let thread = thread::Builder::new()
            .name("acquisition".to_string())
            .spawn(move || acquisition.run())?;
        Ok(Self { thread })
    }

    /// Waits for the loop to finish and the device to be released.
    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("acquisition thread panicked");
        }
    }
}
