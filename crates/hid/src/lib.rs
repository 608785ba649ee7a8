//! rusb backend for USB HID security tokens
//!
//! This crate is the thin adapter between the token library and the USB
//! host stack. It locates a token by vendor/product id, opens it with the
//! kernel driver detached and configuration 1 active, and moves HID
//! feature reports over control transfers, claiming the HID interface
//! around every single transfer.
//!
//! The model is deliberately synchronous and blocking: every operation
//! runs on the calling thread and blocks for at most the fixed transfer
//! timeout. All session operations take `&mut self`, so concurrent use
//! has to be serialized by the caller, exactly as the claim/release
//! protocol assumes.
//!
//! # Example
//!
//! ```no_run
//! use common::ReportType;
//! use hid::UsbSession;
//!
//! # fn main() -> common::Result<()> {
//! let mut session = UsbSession::start()?;
//! let mut token = session.open_token(0x1050, &[0x0010, 0x0030], 0)?;
//!
//! let mut report = [0u8; 8];
//! let n = session.read_report(&mut token, ReportType::Feature, 0, &mut report)?;
//! println!("token said {n} bytes: {report:02x?}");
//!
//! session.close_token(token);
//! # Ok(())
//! # }
//! ```

pub mod device;
pub mod discovery;
pub mod reports;
pub mod session;

pub use device::TokenHandle;
pub use discovery::nth_match;
pub use reports::{HID_GET_REPORT, HID_SET_REPORT, REPORT_TIMEOUT, map_rusb_error};
pub use session::UsbSession;
