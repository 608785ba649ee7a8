//! Shared USB and HID types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Low-level USB error kinds
///
/// Maps to libusb error codes. See rusb::Error for details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsbErrorKind {
    /// I/O error
    Io,
    /// Invalid parameter
    InvalidParam,
    /// Access denied (permissions)
    Access,
    /// Device was disconnected
    NoDevice,
    /// Device or endpoint not found
    NotFound,
    /// Device is busy
    Busy,
    /// Transfer timed out
    Timeout,
    /// Buffer overflow
    Overflow,
    /// Endpoint stalled (protocol error)
    Pipe,
    /// System call was interrupted
    Interrupted,
    /// Out of memory
    NoMem,
    /// Operation not supported on this platform
    NotSupported,
    /// Other error
    Other,
}

impl UsbErrorKind {
    /// Fixed diagnostic string for this error kind
    ///
    /// The strings match the libusb diagnostic texts so output stays
    /// familiar to anyone used to the C tooling around these tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            UsbErrorKind::Io => "Input/output error",
            UsbErrorKind::InvalidParam => "Invalid parameter",
            UsbErrorKind::Access => "Access denied (insufficient permissions)",
            UsbErrorKind::NoDevice => "No such device (it may have been disconnected)",
            UsbErrorKind::NotFound => "Entity not found",
            UsbErrorKind::Busy => "Resource busy",
            UsbErrorKind::Timeout => "Operation timed out",
            UsbErrorKind::Overflow => "Overflow",
            UsbErrorKind::Pipe => "Pipe error",
            UsbErrorKind::Interrupted => "System call interrupted (perhaps due to signal)",
            UsbErrorKind::NoMem => "Insufficient memory",
            UsbErrorKind::NotSupported => {
                "Operation not supported or unimplemented on this platform"
            }
            UsbErrorKind::Other => "Other/unknown error",
        }
    }
}

impl fmt::Display for UsbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HID report types as used in the high byte of wValue
///
/// Values follow the HID 1.11 specification (section 7.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReportType {
    /// Input report (device to host)
    Input = 1,
    /// Output report (host to device)
    Output = 2,
    /// Feature report (bidirectional, used by the token protocol)
    Feature = 3,
}

impl ReportType {
    /// Compose the wValue field for a GET_REPORT/SET_REPORT request
    pub fn wvalue(self, report_number: u8) -> u16 {
        ((self as u16) << 8) | report_number as u16
    }
}

/// Information about an attached token, gathered during enumeration
///
/// String descriptors are best-effort: reading them requires opening the
/// device, which may fail for permission reasons without making the
/// device any less present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// USB vendor ID
    pub vendor_id: u16,
    /// USB product ID
    pub product_id: u16,
    /// Bus the device is attached to
    pub bus_number: u8,
    /// Address on the bus
    pub device_address: u8,
    /// Manufacturer string, if readable
    pub manufacturer: Option<String>,
    /// Product string, if readable
    pub product: Option<String>,
    /// Serial number string, if readable
    pub serial_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_values() {
        assert_eq!(ReportType::Input as u8, 1);
        assert_eq!(ReportType::Output as u8, 2);
        assert_eq!(ReportType::Feature as u8, 3);
    }

    #[test]
    fn test_wvalue_composition() {
        // Feature report 0 is what the token protocol uses
        assert_eq!(ReportType::Feature.wvalue(0), 0x0300);
        assert_eq!(ReportType::Input.wvalue(0x42), 0x0142);
        assert_eq!(ReportType::Output.wvalue(0xff), 0x02ff);
    }

    #[test]
    fn test_error_kind_strings_are_distinct() {
        let kinds = [
            UsbErrorKind::Io,
            UsbErrorKind::InvalidParam,
            UsbErrorKind::Access,
            UsbErrorKind::NoDevice,
            UsbErrorKind::NotFound,
            UsbErrorKind::Busy,
            UsbErrorKind::Timeout,
            UsbErrorKind::Overflow,
            UsbErrorKind::Pipe,
            UsbErrorKind::Interrupted,
            UsbErrorKind::NoMem,
            UsbErrorKind::NotSupported,
            UsbErrorKind::Other,
        ];

        for (i, a) in kinds.iter().enumerate() {
            assert!(!a.as_str().is_empty());
            for b in &kinds[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_error_kind_display_matches_as_str() {
        assert_eq!(
            format!("{}", UsbErrorKind::Timeout),
            UsbErrorKind::Timeout.as_str()
        );
    }
}
