//! Decoding raw axis values into physical actuation commands.
//!
//! A raw value first becomes a percentage of the axis travel, then lands in
//! the configured physical range, is quantized to 0.25 steps, and finally
//! snapped to exactly zero when it rounds to a signed zero. Stick polarity is
//! inverted for steering: pushing left must produce a positive steering
//! command.

use crate::config::BridgeConfig;
use crate::device::event::{MAX_AXIS_VALUE, MIN_AXIS_VALUE};

/// Values closer to zero than this collapse to exactly `0.0`. After the 0.25
/// quantization the only candidate is `-0.0`, which would otherwise show up
/// as "-0" downstream.
const ZERO_SNAP: f32 = 1e-3;

/// Maps raw axis values into the configured actuation ranges.
#[derive(Debug, Clone, Copy)]
pub struct AxisMapper {
    acc_min: f32,
    acc_max: f32,
    dec_min: f32,
    dec_max: f32,
    steering_min: f32,
    steering_max: f32,
}

impl AxisMapper {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            acc_min: config.acc_min,
            acc_max: config.acc_max,
            dec_min: config.dec_min,
            dec_max: config.dec_max,
            steering_min: config.steering_min,
            steering_max: config.steering_max,
        }
    }

    /// Position of a raw value within the axis travel, as 0..=100.
    pub fn percent(raw: i16) -> f32 {
        (raw as f32 - MIN_AXIS_VALUE) / (MAX_AXIS_VALUE - MIN_AXIS_VALUE) * 100.0
    }

    /// Decodes a left-right axis value into a steering command.
    pub fn steering(&self, raw: i16) -> f32 {
        let percent = Self::percent(raw);
        let mapped = percent / 100.0 * (self.steering_max - self.steering_min) + self.steering_min;
        // Stick polarity is inverted relative to the output sign.
        let steering = quantize(-mapped);
        clamp_to(steering, -self.steering_max, -self.steering_min)
    }

    /// Decodes an up-down axis value into an acceleration (stick pushed
    /// forward, raw negative) or deceleration command (stick pulled back).
    pub fn longitudinal(&self, raw: i16) -> f32 {
        let percent = Self::percent(raw);
        if raw < 0 {
            let mapped =
                (100.0 - 2.0 * percent) / 100.0 * (self.acc_max - self.acc_min) + self.acc_min;
            clamp_to(quantize(mapped), self.acc_min, self.acc_max)
        } else {
            // Deceleration is computed relative to zero; the dec_min offset
            // is deliberately absent.
            let mapped = (2.0 * percent - 100.0) / 100.0 * (self.dec_max - self.dec_min);
            clamp_to(quantize(mapped), 0.0, self.dec_max - self.dec_min)
        }
    }
}

/// Rounds to the nearest 0.25 and snaps signed zeros to exactly `0.0`.
fn quantize(value: f32) -> f32 {
    let quantized = (value * 4.0).round() / 4.0;
    if quantized.abs() < ZERO_SNAP {
        0.0
    } else {
        quantized
    }
}

/// Clamps `value` into the range spanned by `a` and `b`, whichever order the
/// configuration put them in.
fn clamp_to(value: f32, a: f32, b: f32) -> f32 {
    if a <= b {
        value.clamp(a, b)
    } else {
        value.clamp(b, a)
    }
}
