//! Open token handle
//!
//! Wraps an open `rusb::DeviceHandle` and owns the open/close protocol:
//! kernel driver detach on open, best-effort re-attach on close, and the
//! configuration check the token needs to work inside VirtualBox style
//! virtualization.

use rusb::{Context, Device, DeviceHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// The token is a single-interface HID device; everything happens on
/// interface 0.
pub(crate) const HID_INTERFACE: u8 = 0;

/// The token always exposes exactly one configuration, numbered 1.
pub(crate) const REQUIRED_CONFIGURATION: u8 = 1;

/// Handle to an open token
///
/// Obtained from [`UsbSession::open_token`](crate::UsbSession::open_token)
/// and released exactly once by
/// [`UsbSession::close_token`](crate::UsbSession::close_token) or by drop.
/// The handle is not shareable for concurrent I/O; the claim/release
/// protocol around each transfer assumes exclusive access.
pub struct TokenHandle {
    handle: DeviceHandle<Context>,
}

impl TokenHandle {
    /// Open a selected device and bring it into the required state
    ///
    /// Detaches a kernel driver that currently owns the HID interface and
    /// enforces configuration 1. Any failure drops the partially opened
    /// handle; it is never returned to the caller.
    pub(crate) fn open(device: &Device<Context>) -> Result<Self, rusb::Error> {
        let handle = device.open()?;

        if handle.kernel_driver_active(HID_INTERFACE)? {
            debug!("Detaching kernel driver from interface {}", HID_INTERFACE);
            handle.detach_kernel_driver(HID_INTERFACE)?;
        }

        let current = handle.active_configuration()?;
        if current != REQUIRED_CONFIGURATION {
            debug!(
                "Switching configuration {} -> {}",
                current, REQUIRED_CONFIGURATION
            );
            handle.set_active_configuration(REQUIRED_CONFIGURATION)?;
        }

        Ok(Self { handle })
    }

    /// Close the handle, handing the device back to the kernel
    ///
    /// The re-attach is best-effort: on platforms without kernel driver
    /// management, or when no driver was detached, it simply fails and
    /// the failure is ignored. Closing never reports an error.
    pub(crate) fn close(self) {
        if let Err(e) = self.handle.attach_kernel_driver(HID_INTERFACE) {
            debug!("Kernel driver not re-attached: {}", e);
        }
        // DeviceHandle closes on drop
    }

    /// Vendor/product id pair from the device descriptor
    pub(crate) fn vid_pid(&self) -> Result<(u16, u16), rusb::Error> {
        let descriptor = self.handle.device().device_descriptor()?;
        Ok((descriptor.vendor_id(), descriptor.product_id()))
    }

    pub(crate) fn claim_interface(&mut self) -> Result<(), rusb::Error> {
        self.handle.claim_interface(HID_INTERFACE).inspect_err(|e| {
            warn!("Failed to claim interface {}: {}", HID_INTERFACE, e);
        })
    }

    pub(crate) fn release_interface(&mut self) -> Result<(), rusb::Error> {
        self.handle
            .release_interface(HID_INTERFACE)
            .inspect_err(|e| {
                warn!("Failed to release interface {}: {}", HID_INTERFACE, e);
            })
    }

    pub(crate) fn write_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.handle
            .write_control(request_type, request, value, index, data, timeout)
    }

    pub(crate) fn read_control(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, rusb::Error> {
        self.handle
            .read_control(request_type, request, value, index, buf, timeout)
    }
}
