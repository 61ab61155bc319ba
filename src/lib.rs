//! Bridge between a game controller and a periodic actuation-command stream.
//!
//! Reads raw analog-stick events from a joystick device, decodes them into
//! physical acceleration and steering commands, and republishes them at a
//! fixed control frequency over a pub/sub session.
//!
//! # Architecture
//!
//! ```text
//! Joystick ──► Acquisition Loop ──► ControlState ──► Publisher ──► Session
//!              (dedicated thread)   (one mutex)      (per tick)    (MQTT)
//! ```
//!
//! The acquisition loop and the periodic publisher are the only writers of
//! the shared state; everything they exchange goes through [`control::ControlState`].

pub mod config;
pub mod control;
pub mod device;
pub mod transport;

pub use config::BridgeConfig;
pub use transport::command::ActuationCommand;
