//! HID report I/O
//!
//! Feature reports move over class-specific control transfers on the
//! default endpoint. Each transfer is bracketed by a claim and an
//! unconditional release of the HID interface, so the OS driver can take
//! the device back between operations.
//!
//! The outcome of the claim/transfer/release sequence is resolved by
//! pure functions over the individual results, which keeps the error
//! precedence rules testable without a device attached.

use common::{Error, ReportType, UsbErrorKind};
use rusb::{Direction, Recipient, RequestType};
use std::time::Duration;
use tracing::{debug, warn};

use crate::device::TokenHandle;
use crate::session::UsbSession;

/// HID class request: GET_REPORT
pub const HID_GET_REPORT: u8 = 0x01;

/// HID class request: SET_REPORT
pub const HID_SET_REPORT: u8 = 0x09;

/// Fixed timeout applied to every report transfer
pub const REPORT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Resolved outcome of one claim/transfer/release sequence
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TransferOutcome {
    /// Transfer completed, carrying the byte count
    Transferred(usize),
    /// Transfer completed but the device had nothing to say
    NoData,
    /// Sequence failed with this low-level code
    Failed(rusb::Error),
}

/// Resolve a write sequence
///
/// A transfer error always wins over a release error; the release error
/// is surfaced only when the transfer itself went through.
pub(crate) fn resolve_write(
    transfer: Result<usize, rusb::Error>,
    release: Result<(), rusb::Error>,
) -> Result<usize, rusb::Error> {
    match (transfer, release) {
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(e),
        (Ok(n), Ok(())) => Ok(n),
    }
}

/// Resolve a read sequence
///
/// Same precedence as [`resolve_write`], with one addition: a zero-length
/// successful read means the device answered with nothing, which is its
/// own outcome rather than a transport failure. The release result is
/// irrelevant in that case.
pub(crate) fn resolve_read(
    transfer: Result<usize, rusb::Error>,
    release: Result<(), rusb::Error>,
) -> TransferOutcome {
    match (transfer, release) {
        (Err(e), _) => TransferOutcome::Failed(e),
        (Ok(0), _) => TransferOutcome::NoData,
        (Ok(_), Err(e)) => TransferOutcome::Failed(e),
        (Ok(n), Ok(())) => TransferOutcome::Transferred(n),
    }
}

/// Map rusb::Error to the library's USB error kind
///
/// This is the single point where low-level transport errors enter the
/// library error space.
pub fn map_rusb_error(err: rusb::Error) -> UsbErrorKind {
    match err {
        rusb::Error::Io => UsbErrorKind::Io,
        rusb::Error::InvalidParam => UsbErrorKind::InvalidParam,
        rusb::Error::Access => UsbErrorKind::Access,
        rusb::Error::NoDevice => UsbErrorKind::NoDevice,
        rusb::Error::NotFound => UsbErrorKind::NotFound,
        rusb::Error::Busy => UsbErrorKind::Busy,
        rusb::Error::Timeout => UsbErrorKind::Timeout,
        rusb::Error::Overflow => UsbErrorKind::Overflow,
        rusb::Error::Pipe => UsbErrorKind::Pipe,
        rusb::Error::Interrupted => UsbErrorKind::Interrupted,
        rusb::Error::NoMem => UsbErrorKind::NoMem,
        rusb::Error::NotSupported => UsbErrorKind::NotSupported,
        _ => UsbErrorKind::Other,
    }
}

impl UsbSession {
    /// Set a HID report on the token
    ///
    /// Claims the HID interface, issues a SET_REPORT control transfer
    /// with the fixed timeout, then releases the interface regardless of
    /// the transfer result. A claim failure skips the transfer entirely.
    pub fn write_report(
        &mut self,
        handle: &mut TokenHandle,
        report_type: ReportType,
        report_number: u8,
        data: &[u8],
    ) -> common::Result<()> {
        if let Err(e) = handle.claim_interface() {
            return Err(self.fail(e));
        }

        let request_type =
            rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface);
        let transfer = handle.write_control(
            request_type,
            HID_SET_REPORT,
            report_type.wvalue(report_number),
            0,
            data,
            REPORT_TIMEOUT,
        );
        let release = handle.release_interface();

        match resolve_write(transfer, release) {
            Ok(n) => {
                debug!("Set report {:?}/{}: {} bytes", report_type, report_number, n);
                self.succeed();
                Ok(())
            }
            Err(e) => {
                warn!("Set report failed: {}", e);
                Err(self.fail(e))
            }
        }
    }

    /// Get a HID report from the token
    ///
    /// Same claim/transfer/release bracket as [`write_report`], with a
    /// GET_REPORT transfer reading into `buf`. Returns the number of
    /// bytes the device actually produced. A zero-length answer is
    /// reported as [`Error::NoData`] so callers can tell "the device
    /// said nothing" apart from a transport failure.
    ///
    /// [`write_report`]: UsbSession::write_report
    pub fn read_report(
        &mut self,
        handle: &mut TokenHandle,
        report_type: ReportType,
        report_number: u8,
        buf: &mut [u8],
    ) -> common::Result<usize> {
        if let Err(e) = handle.claim_interface() {
            return Err(self.fail(e));
        }

        let request_type =
            rusb::request_type(Direction::In, RequestType::Class, Recipient::Interface);
        let transfer = handle.read_control(
            request_type,
            HID_GET_REPORT,
            report_type.wvalue(report_number),
            0,
            buf,
            REPORT_TIMEOUT,
        );
        let release = handle.release_interface();

        match resolve_read(transfer, release) {
            TransferOutcome::Transferred(n) => {
                debug!("Got report {:?}/{}: {} bytes", report_type, report_number, n);
                self.succeed();
                Ok(n)
            }
            TransferOutcome::NoData => {
                debug!("Got report {:?}/{}: no data", report_type, report_number);
                self.succeed();
                Err(Error::NoData)
            }
            TransferOutcome::Failed(e) => {
                warn!("Get report failed: {}", e);
                Err(self.fail(e))
            }
        }
    }
}
