//! Steering rate-of-change bound.
//!
//! The limiter caps how far the published steering value may move per tick.
//! It only affects what is sent: the acquisition loop keeps writing the true
//! stick position, and the publisher restores it after each emission.

/// Bounds the steering rate of change per control tick.
#[derive(Debug, Clone, Copy)]
pub struct SteeringRateLimiter {
    max_rate: f32,
    tick_period: f32,
}

impl SteeringRateLimiter {
    /// Builds a limiter, or `None` when limiting is disabled (absent or
    /// non-positive configured rate).
    pub fn new(max_rate: Option<f32>, tick_period: f32) -> Option<Self> {
        match max_rate {
            Some(rate) if rate > 0.0 => Some(Self {
                max_rate: rate,
                tick_period,
            }),
            _ => None,
        }
    }

    /// Clamps `steering` so its rate of change from `prev` stays within the
    /// configured bound.
    pub fn apply(&self, steering: f32, prev: f32) -> f32 {
        let increment = self.tick_period * self.max_rate;
        let rate = (steering - prev) / self.tick_period;
        if rate > self.max_rate {
            prev + increment
        } else if rate < -self.max_rate {
            prev - increment
        } else {
            steering
        }
    }
}
