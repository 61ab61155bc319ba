//! Non-blocking joystick device handle.
//!
//! Opens the device node in non-blocking mode and exposes the two operations
//! the acquisition loop needs: a bounded-wait readiness check (`poll(2)`) and
//! a non-blocking read of one fixed-size event record. Axis/button counts and
//! the device name are queried once at open for the diagnostic log line.

use std::ffi::CStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use super::event::{JoystickEvent, EVENT_SIZE};
use super::{DeviceError, EventSource};

// ioctl request codes from <linux/joystick.h>.
const JSIOCGAXES: libc::c_ulong = 0x8001_6a11;
const JSIOCGBUTTONS: libc::c_ulong = 0x8001_6a12;
const JSIOCGNAME_128: libc::c_ulong = 0x8080_6a13;
const NAME_LEN: usize = 128;

/// An open joystick device.
///
/// The descriptor is closed on drop; the acquisition thread owns the handle,
/// so the device is released only after the thread has exited.
#[derive(Debug)]
pub struct Joystick {
    fd: libc::c_int,
    path: PathBuf,
}

impl Joystick {
    /// Opens the device node for non-blocking reads and logs its identity.
    pub fn open(path: &Path) -> Result<Self, DeviceError> {
        let mut raw = path.as_os_str().as_bytes().to_vec();
        raw.push(0);

        let fd = unsafe { libc::open(raw.as_ptr().cast(), libc::O_RDONLY | libc::O_NONBLOCK) };
        if fd < 0 {
            return Err(DeviceError::Open {
                path: path.to_path_buf(),
                source: io::Error::last_os_error(),
            });
        }

        let joystick = Self {
            fd,
            path: path.to_path_buf(),
        };
        info!(
            device = %joystick.path.display(),
            name = %joystick.name(),
            axes = joystick.axis_count(),
            buttons = joystick.button_count(),
            "opened joystick device"
        );
        Ok(joystick)
    }

    /// Number of axes the device reports.
    pub fn axis_count(&self) -> u8 {
        let mut count: u8 = 0;
        unsafe { libc::ioctl(self.fd, JSIOCGAXES, &mut count) };
        count
    }

    /// Number of buttons the device reports.
    pub fn button_count(&self) -> u8 {
        let mut count: u8 = 0;
        unsafe { libc::ioctl(self.fd, JSIOCGBUTTONS, &mut count) };
        count
    }

    /// Human-readable device name, or the path if the driver reports none.
    pub fn name(&self) -> String {
        let mut buf = [0u8; NAME_LEN];
        let rc = unsafe { libc::ioctl(self.fd, JSIOCGNAME_128, buf.as_mut_ptr()) };
        if rc < 0 {
            return self.path.display().to_string();
        }
        CStr::from_bytes_until_nul(&buf)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| self.path.display().to_string())
    }
}

impl EventSource for Joystick {
    fn wait_readable(&mut self, timeout: Duration) -> Result<bool, DeviceError> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let rc = unsafe { libc::poll(&mut pfd, 1, timeout.as_millis() as libc::c_int) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            // A signal during poll just shortens this wait.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(DeviceError::Poll(err));
        }
        Ok(rc > 0 && pfd.revents & libc::POLLIN != 0)
    }

    fn next_event(&mut self) -> Result<Option<JoystickEvent>, DeviceError> {
        let mut buf = [0u8; EVENT_SIZE];
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), EVENT_SIZE) };
        if n == EVENT_SIZE as isize {
            return Ok(Some(JoystickEvent::from_bytes(&buf)));
        }
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::WouldBlock {
                // No data currently available; the queue is drained.
                return Ok(None);
            }
            return Err(DeviceError::Read(err));
        }
        // Short read; the driver always delivers whole records, so treat the
        // queue as drained.
        Ok(None)
    }
}

impl Drop for Joystick {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}
