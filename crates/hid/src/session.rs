//! USB session lifecycle and last-error diagnostics

use common::{Error, UsbErrorKind};
use rusb::Context;
use tracing::debug;

use crate::reports::map_rusb_error;

/// Diagnostic string reported when the last operation succeeded (or no
/// operation has run yet).
const SUCCESS_STR: &str = "Success (no error)";

/// A process-wide USB session
///
/// Owns the libusb context plus the low-level code of the last operation
/// that touched the USB library. Creating more than one session per
/// process works but wastes a context; there is no reason to do it.
///
/// The session is not internally synchronized. Every operation takes
/// `&mut self`, which pushes the required serialization onto the caller
/// instead of documentation.
pub struct UsbSession {
    pub(crate) context: Context,
    pub(crate) last_error: Option<UsbErrorKind>,
}

impl UsbSession {
    /// Initialize the USB subsystem
    ///
    /// Fails with a USB error kind if the underlying libusb context
    /// cannot be created.
    pub fn start() -> common::Result<Self> {
        let context = Context::new().map_err(|e| Error::Usb(map_rusb_error(e)))?;
        debug!("USB session started");

        Ok(Self {
            context,
            last_error: None,
        })
    }

    /// Tear down the USB session
    ///
    /// Consumes the session; the libusb context is released on drop. Any
    /// handles opened from this session stay valid until closed (the
    /// context is reference-counted underneath).
    pub fn stop(self) {
        debug!("USB session stopped");
    }

    /// Human-readable description of the last recorded low-level code
    ///
    /// Pure read of session state: calling it before any operation, or
    /// after a successful one, yields the fixed success string.
    pub fn strerror(&self) -> &'static str {
        describe(self.last_error)
    }

    /// Record a low-level failure and coarsen it for the caller
    pub(crate) fn fail(&mut self, err: rusb::Error) -> Error {
        let kind = map_rusb_error(err);
        self.last_error = Some(kind);
        Error::Usb(kind)
    }

    /// Record a clean pass through the USB library
    pub(crate) fn succeed(&mut self) {
        self.last_error = None;
    }
}

/// Map a recorded code to its fixed diagnostic string
pub(crate) fn describe(last: Option<UsbErrorKind>) -> &'static str {
    match last {
        Some(kind) => kind.as_str(),
        None => SUCCESS_STR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults_to_success() {
        assert_eq!(describe(None), "Success (no error)");
    }

    #[test]
    fn test_describe_reports_recorded_code() {
        assert_eq!(describe(Some(UsbErrorKind::Timeout)), "Operation timed out");
        assert_eq!(
            describe(Some(UsbErrorKind::NoDevice)),
            "No such device (it may have been disconnected)"
        );
        assert_eq!(describe(Some(UsbErrorKind::Other)), "Other/unknown error");
    }
}
