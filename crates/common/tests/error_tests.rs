//! Error taxonomy tests
//!
//! The caller-facing error space is deliberately tiny: a missing key, a
//! silent device, and a coarse USB transport failure. These tests pin
//! down the taxonomy and the fixed diagnostic strings.
//!
//! Run with: `cargo test -p common --test error_tests`

use common::{Error, ReportType, UsbErrorKind};

#[test]
fn diagnostic_strings_match_the_libusb_texts() {
    assert_eq!(UsbErrorKind::Io.as_str(), "Input/output error");
    assert_eq!(UsbErrorKind::InvalidParam.as_str(), "Invalid parameter");
    assert_eq!(
        UsbErrorKind::Access.as_str(),
        "Access denied (insufficient permissions)"
    );
    assert_eq!(
        UsbErrorKind::NoDevice.as_str(),
        "No such device (it may have been disconnected)"
    );
    assert_eq!(UsbErrorKind::NotFound.as_str(), "Entity not found");
    assert_eq!(UsbErrorKind::Busy.as_str(), "Resource busy");
    assert_eq!(UsbErrorKind::Timeout.as_str(), "Operation timed out");
    assert_eq!(UsbErrorKind::Overflow.as_str(), "Overflow");
    assert_eq!(UsbErrorKind::Pipe.as_str(), "Pipe error");
    assert_eq!(
        UsbErrorKind::Interrupted.as_str(),
        "System call interrupted (perhaps due to signal)"
    );
    assert_eq!(UsbErrorKind::NoMem.as_str(), "Insufficient memory");
    assert_eq!(
        UsbErrorKind::NotSupported.as_str(),
        "Operation not supported or unimplemented on this platform"
    );
    assert_eq!(UsbErrorKind::Other.as_str(), "Other/unknown error");
}

#[test]
fn usb_errors_carry_their_kind() {
    let err = Error::Usb(UsbErrorKind::Access);
    match err {
        Error::Usb(kind) => assert_eq!(kind, UsbErrorKind::Access),
        other => panic!("expected Usb error, got {other:?}"),
    }
}

#[test]
fn no_data_and_no_key_are_not_usb_errors() {
    assert!(!matches!(Error::NoData, Error::Usb(_)));
    assert!(!matches!(Error::NoKey, Error::Usb(_)));
}

#[test]
fn feature_report_zero_wvalue() {
    // The token protocol addresses everything as feature report 0
    assert_eq!(ReportType::Feature.wvalue(0), 0x0300);
}
