//! Startup configuration for the gamepad bridge.
//!
//! All parameters come from the command line and are validated once, before
//! any device or network I/O is opened. Axis indices and actuation ranges are
//! device- and vehicle-specific; there are no sensible universal defaults, so
//! they are required flags.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Errors raised by [`BridgeConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("control frequency must be positive, got {0}")]
    InvalidFrequency(f32),

    #[error("acceleration range is empty: acc_min {0} >= acc_max {1}")]
    EmptyAccelerationRange(f32, f32),

    #[error("steering range is empty: steering_min {0} >= steering_max {1}")]
    EmptySteeringRange(f32, f32),

    #[error("left-right and up-down axes must differ, both are {0}")]
    DuplicateAxes(u8),
}

/// Command-line configuration for the bridge.
///
/// One flag per physical range plus the device path, the control frequency,
/// and the pub/sub session identifier.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gamepad-bridge",
    about = "Reads a game controller and republishes actuation commands at a fixed frequency"
)]
pub struct BridgeConfig {
    /// Joystick device to read, e.g. /dev/input/js0
    #[arg(long)]
    pub device: PathBuf,

    /// Control frequency in Hz
    #[arg(long)]
    pub freq: f32,

    /// Axis index reporting left-right stick motion (steering)
    #[arg(long)]
    pub axis_leftright: u8,

    /// Axis index reporting up-down stick motion (acceleration/deceleration)
    #[arg(long)]
    pub axis_updown: u8,

    /// Minimum acceleration command
    #[arg(long)]
    pub acc_min: f32,

    /// Maximum acceleration command
    #[arg(long)]
    pub acc_max: f32,

    /// Minimum deceleration command
    #[arg(long)]
    pub dec_min: f32,

    /// Maximum deceleration command
    #[arg(long)]
    pub dec_max: f32,

    /// Minimum steering command
    #[arg(long)]
    pub steering_min: f32,

    /// Maximum steering command
    #[arg(long)]
    pub steering_max: f32,

    /// Maximum steering rate of change in units/second; absent or <= 0
    /// disables rate limiting
    #[arg(long)]
    pub steering_max_rate: Option<f32>,

    /// Session identifier selecting the pub/sub channel
    #[arg(long)]
    pub session: String,

    /// Broker address as host:port
    #[arg(long, default_value = "localhost:1883")]
    pub broker: String,

    /// Log every decoded axis transition and emitted command
    #[arg(long)]
    pub verbose: bool,
}

impl BridgeConfig {
    /// Checks the numeric constraints clap cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.freq <= 0.0 || !self.freq.is_finite() {
            return Err(ConfigError::InvalidFrequency(self.freq));
        }
        if self.acc_min >= self.acc_max {
            return Err(ConfigError::EmptyAccelerationRange(
                self.acc_min,
                self.acc_max,
            ));
        }
        if self.steering_min >= self.steering_max {
            return Err(ConfigError::EmptySteeringRange(
                self.steering_min,
                self.steering_max,
            ));
        }
        if self.axis_leftright == self.axis_updown {
            return Err(ConfigError::DuplicateAxes(self.axis_leftright));
        }
        Ok(())
    }

    /// Duration of one control tick in seconds.
    pub fn tick_period(&self) -> f32 {
        1.0 / self.freq
    }

    /// Whether the steering rate limiter is active.
    pub fn rate_limiting_enabled(&self) -> bool {
        self.steering_max_rate.is_some_and(|rate| rate > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> BridgeConfig {
        BridgeConfig {
            device: PathBuf::from("/dev/input/js0"),
            freq: 100.0,
            axis_leftright: 0,
            axis_updown: 4,
            acc_min: 0.0,
            acc_max: 50.0,
            dec_min: 0.0,
            dec_max: -10.0,
            steering_min: -10.0,
            steering_max: 10.0,
            steering_max_rate: Some(5.0),
            session: "111".to_string(),
            broker: "localhost:1883".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn zero_frequency_is_rejected() {
        let mut config = base_config();
        config.freq = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn negative_frequency_is_rejected() {
        let mut config = base_config();
        config.freq = -20.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_steering_range_is_rejected() {
        let mut config = base_config();
        config.steering_min = 10.0;
        config.steering_max = -10.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptySteeringRange(..))
        ));
    }

    #[test]
    fn duplicate_axes_are_rejected() {
        let mut config = base_config();
        config.axis_updown = config.axis_leftright;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateAxes(_))
        ));
    }

    #[test]
    fn rate_limiting_disabled_by_non_positive_rate() {
        let mut config = base_config();
        assert!(config.rate_limiting_enabled());
        config.steering_max_rate = Some(0.0);
        assert!(!config.rate_limiting_enabled());
        config.steering_max_rate = Some(-1.0);
        assert!(!config.rate_limiting_enabled());
        config.steering_max_rate = None;
        assert!(!config.rate_limiting_enabled());
    }

    #[test]
    fn tick_period_is_inverse_frequency() {
        let config = base_config();
        assert!((config.tick_period() - 0.01).abs() < f32::EPSILON);
    }
}
