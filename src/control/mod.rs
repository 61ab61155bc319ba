//! Control core: shared state, axis decode, and the two concurrent loops.
//!
//! 1. [`state`] - mutex-guarded control values shared between the loops
//! 2. [`mapping`] - raw axis values to physical actuation commands
//! 3. [`limiter`] - steering rate-of-change bound
//! 4. [`acquisition`] - device event drain on a dedicated thread
//! 5. [`publisher`] - per-tick command construction
//!
//! # Data flow
//!
//! ```text
//! Joystick ──► AcquisitionLoop ──► ControlState ──► Publisher ──► command
//! ```

pub mod acquisition;
pub mod limiter;
pub mod mapping;
pub mod publisher;
pub mod state;

pub use acquisition::{AcquisitionHandle, AcquisitionLoop, EventDecoder};
pub use limiter::SteeringRateLimiter;
pub use mapping::AxisMapper;
pub use publisher::Publisher;
pub use state::{ControlState, ControlValues};
