//! Library-wide error types

use crate::types::UsbErrorKind;
use thiserror::Error;

/// Errors surfaced to callers of the token backend
///
/// All USB transport failures are coarsened to `Usb`; the raw low-level
/// code remains available through the session's `strerror`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No attached device matched the vendor/product filter
    #[error("no matching token found")]
    NoKey,

    /// The token completed a read but returned zero bytes
    #[error("token returned no data")]
    NoData,

    /// USB transport failure
    #[error("USB error: {0}")]
    Usb(UsbErrorKind),

    /// Configuration error (log filter, etc.)
    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for token backend results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let msg = format!("{}", Error::NoKey);
        assert!(msg.contains("no matching token"));

        let msg = format!("{}", Error::Usb(UsbErrorKind::Timeout));
        assert!(msg.contains("USB error"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn test_no_data_is_distinct_from_usb_error() {
        assert_ne!(Error::NoData, Error::Usb(UsbErrorKind::Io));
        assert_ne!(Error::NoData, Error::NoKey);
    }
}
