//! The actuation command envelope.

use serde::{Deserialize, Serialize};

/// One vehicle actuation command, emitted once per control tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuationCommand {
    /// Signed acceleration command; positive accelerates.
    pub acceleration: f32,
    /// Signed steering command.
    pub steering: f32,
    /// False once the bridge has entered its fault state.
    pub valid: bool,
}

impl ActuationCommand {
    /// The neutral command sent once at shutdown so the downstream consumer
    /// is left with a safe value.
    pub fn stop() -> Self {
        Self {
            acceleration: 0.0,
            steering: 0.0,
            valid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_command_is_neutral_and_valid() {
        let stop = ActuationCommand::stop();
        assert_eq!(stop.acceleration, 0.0);
        assert_eq!(stop.steering, 0.0);
        assert!(stop.valid);
    }

    #[test]
    fn serializes_the_three_wire_fields() {
        let command = ActuationCommand {
            acceleration: 12.5,
            steering: -0.25,
            valid: true,
        };
        let json = serde_json::to_value(command).unwrap();
        assert_eq!(json["acceleration"], 12.5);
        assert_eq!(json["steering"], -0.25);
        assert_eq!(json["valid"], true);
    }
}
