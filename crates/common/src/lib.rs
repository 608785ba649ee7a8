//! Common types for token-hid
//!
//! This crate provides the vocabulary shared between the USB backend and
//! its callers: the library-wide error enum, the low-level USB error kind
//! with its fixed diagnostic strings, HID report types, device information,
//! and logging setup.

pub mod error;
pub mod logging;
pub mod types;

pub use error::{Error, Result};
pub use logging::setup_logging;
pub use types::{ReportType, TokenInfo, UsbErrorKind};
