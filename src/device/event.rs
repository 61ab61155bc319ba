//! Joystick event records.
//!
//! The kernel joystick interface delivers fixed-size 8-byte records:
//! a millisecond timestamp, a signed 16-bit value, an event kind, and the
//! axis or button number. Records with the init bit set replay the current
//! device state after open; they carry no user input.

/// Size of one raw event record in bytes.
pub const EVENT_SIZE: usize = 8;

/// Raw axis value range reported by the device.
pub const MIN_AXIS_VALUE: f32 = -32768.0;
pub const MAX_AXIS_VALUE: f32 = 32767.0;

const KIND_BUTTON: u8 = 0x01;
const KIND_AXIS: u8 = 0x02;
const KIND_INIT: u8 = 0x80;

/// One decoded joystick event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickEvent {
    /// Event timestamp in milliseconds.
    pub time: u32,
    /// Raw axis position or button state.
    pub value: i16,
    /// Kind bitfield (axis/button, possibly with the init bit).
    pub kind: u8,
    /// Axis or button number.
    pub number: u8,
}

impl JoystickEvent {
    /// Decodes one record from its little-endian wire form.
    pub fn from_bytes(buf: &[u8; EVENT_SIZE]) -> Self {
        Self {
            time: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: i16::from_le_bytes([buf[4], buf[5]]),
            kind: buf[6],
            number: buf[7],
        }
    }

    /// True for analog axis motion.
    pub fn is_axis(&self) -> bool {
        self.kind & KIND_AXIS != 0
    }

    /// True for button presses and releases.
    pub fn is_button(&self) -> bool {
        self.kind & KIND_BUTTON != 0
    }

    /// True for synthetic state-replay records emitted right after open.
    pub fn is_init(&self) -> bool {
        self.kind & KIND_INIT != 0
    }

    /// An axis motion record.
    pub fn axis(number: u8, value: i16) -> Self {
        Self {
            time: 0,
            value,
            kind: KIND_AXIS,
            number,
        }
    }

    /// A button press or release record.
    pub fn button(number: u8, pressed: bool) -> Self {
        Self {
            time: 0,
            value: pressed as i16,
            kind: KIND_BUTTON,
            number,
        }
    }

    /// A synthetic state-replay record for an axis.
    pub fn init_axis(number: u8, value: i16) -> Self {
        Self {
            time: 0,
            value,
            kind: KIND_AXIS | KIND_INIT,
            number,
        }
    }
}
