//! Per-tick command construction.
//!
//! Invoked once per control tick by the transport's time trigger. The whole
//! tick runs under the state lock: rate-limit the steering, move the
//! baseline, snapshot the outgoing command, and restore the decoded target so
//! the next tick computes its rate from the true stick position rather than
//! from the clamped output. The transport send happens after the lock is
//! released.

use crate::control::limiter::SteeringRateLimiter;
use crate::control::state::ControlState;
use crate::transport::command::ActuationCommand;

/// The publishing side of the bridge.
#[derive(Debug, Clone)]
pub struct Publisher {
    state: ControlState,
    limiter: Option<SteeringRateLimiter>,
}

impl Publisher {
    pub fn new(state: ControlState, limiter: Option<SteeringRateLimiter>) -> Self {
        Self { state, limiter }
    }

    /// One control tick.
    ///
    /// Returns the command to emit and the continuation flag; the scheduler
    /// stops invoking the publisher once the flag is false.
    pub fn tick(&self) -> (ActuationCommand, bool) {
        let mut values = self.state.lock();

        if let Some(limiter) = &self.limiter {
            values.steering = limiter.apply(values.steering, values.prev_steering);
        }
        values.prev_steering = values.steering;

        let command = ActuationCommand {
            acceleration: values.acceleration,
            steering: values.steering,
            valid: !values.has_error,
        };

        // The clamp affects only what is sent, not the tracked target.
        if self.limiter.is_some() {
            values.steering = values.target_steering;
        }

        (command, !values.has_error)
    }
}
