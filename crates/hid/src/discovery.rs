//! Device discovery, open and identification
//!
//! Enumeration walks every attached device, matches descriptors against a
//! vendor id plus an ordered candidate product-id list, and selects the
//! Nth match. The selection rule lives in [`nth_match`] as a pure
//! function over (vendor, product) pairs so it can be tested without
//! hardware.

use common::{Error, TokenInfo};
use rusb::{Context, Device, UsbContext};
use tracing::debug;

use crate::device::TokenHandle;
use crate::session::UsbSession;

/// Select the Nth device matching a vendor/product filter
///
/// `devices` yields (vendor, product) pairs in enumeration order. A
/// device matches when its vendor id equals `vendor_id` and its product
/// id appears in `product_ids`. Returns the enumeration position of the
/// match with zero-based ordinal `index`, or `None` when there are not
/// enough matches.
///
/// Selection is final: scanning stops at the chosen device, so matches
/// enumerated later can never displace it.
pub fn nth_match<I>(devices: I, vendor_id: u16, product_ids: &[u16], index: usize) -> Option<usize>
where
    I: IntoIterator<Item = (u16, u16)>,
{
    let mut found = 0;
    for (position, (vid, pid)) in devices.into_iter().enumerate() {
        if vid == vendor_id && product_ids.contains(&pid) {
            found += 1;
            if found - 1 == index {
                return Some(position);
            }
        }
    }
    None
}

impl UsbSession {
    /// Find and open the Nth token matching the vendor/product filter
    ///
    /// `index` is zero-based and selects among devices that share the
    /// same ids. When fewer than `index + 1` devices match, the result
    /// is [`Error::NoKey`]. Opening brings the device into the state the
    /// token protocol expects: kernel driver detached from the HID
    /// interface and configuration 1 active. On any failure past
    /// selection the partially opened handle is dropped and a USB error
    /// is reported.
    ///
    /// The enumeration list is released before returning, success or
    /// failure.
    pub fn open_token(
        &mut self,
        vendor_id: u16,
        product_ids: &[u16],
        index: usize,
    ) -> common::Result<TokenHandle> {
        let devices = match self.context.devices() {
            Ok(devices) => devices,
            Err(e) => return Err(self.fail(e)),
        };

        let mut found = 0;
        let mut selected: Option<Device<Context>> = None;
        for device in devices.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    // A broken descriptor aborts the scan; the device is
                    // treated as missing but the low-level code stays
                    // readable through strerror.
                    self.last_error = Some(crate::reports::map_rusb_error(e));
                    return Err(Error::NoKey);
                }
            };

            if descriptor.vendor_id() == vendor_id
                && product_ids.contains(&descriptor.product_id())
            {
                found += 1;
                if found - 1 == index {
                    selected = Some(device);
                    break;
                }
            }
        }

        let Some(device) = selected else {
            debug!(
                "No token matching {:04x}:{:04x?} at index {}",
                vendor_id, product_ids, index
            );
            return Err(Error::NoKey);
        };

        match TokenHandle::open(&device) {
            Ok(handle) => {
                debug!(
                    "Opened token {:04x} on bus {} address {}",
                    vendor_id,
                    device.bus_number(),
                    device.address()
                );
                self.succeed();
                Ok(handle)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Close an open token handle
    ///
    /// Re-attaches the kernel driver on a best-effort basis, then closes
    /// the handle. Never reports a failure.
    pub fn close_token(&mut self, handle: TokenHandle) {
        handle.close();
        debug!("Closed token handle");
    }

    /// Vendor/product id pair of an already-open token
    pub fn vid_pid(&mut self, handle: &TokenHandle) -> common::Result<(u16, u16)> {
        handle
            .vid_pid()
            .map_err(|e| Error::Usb(crate::reports::map_rusb_error(e)))
    }

    /// List every attached token matching the vendor/product filter
    ///
    /// Purely informational. String descriptors are filled in on a
    /// best-effort basis through a temporary open; devices that cannot
    /// be opened still appear in the list.
    pub fn list_tokens(
        &mut self,
        vendor_id: u16,
        product_ids: &[u16],
    ) -> common::Result<Vec<TokenInfo>> {
        let devices = match self.context.devices() {
            Ok(devices) => devices,
            Err(e) => return Err(self.fail(e)),
        };

        let mut tokens = Vec::new();
        for device in devices.iter() {
            let Ok(descriptor) = device.device_descriptor() else {
                continue;
            };

            if descriptor.vendor_id() != vendor_id
                || !product_ids.contains(&descriptor.product_id())
            {
                continue;
            }

            let strings = device
                .open()
                .ok()
                .map(|handle| read_strings(&handle, &descriptor));
            let (manufacturer, product, serial_number) =
                strings.unwrap_or((None, None, None));

            tokens.push(TokenInfo {
                vendor_id: descriptor.vendor_id(),
                product_id: descriptor.product_id(),
                bus_number: device.bus_number(),
                device_address: device.address(),
                manufacturer,
                product,
                serial_number,
            });
        }

        self.succeed();
        debug!("Enumerated {} matching tokens", tokens.len());
        Ok(tokens)
    }
}

/// Read the descriptor-referenced strings from an opened device
fn read_strings(
    handle: &rusb::DeviceHandle<Context>,
    descriptor: &rusb::DeviceDescriptor,
) -> (Option<String>, Option<String>, Option<String>) {
    let manufacturer = descriptor
        .manufacturer_string_index()
        .and_then(|idx| handle.read_string_descriptor_ascii(idx).ok());

    let product = descriptor
        .product_string_index()
        .and_then(|idx| handle.read_string_descriptor_ascii(idx).ok());

    let serial_number = descriptor
        .serial_number_string_index()
        .and_then(|idx| handle.read_string_descriptor_ascii(idx).ok());

    (manufacturer, product, serial_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENDOR: u16 = 0x1050;
    const PRODUCTS: &[u16] = &[0x0010, 0x0030];

    #[test]
    fn test_index_beyond_matches_selects_nothing() {
        let attached = [(VENDOR, 0x0010), (VENDOR, 0x0030)];
        assert_eq!(nth_match(attached, VENDOR, PRODUCTS, 2), None);
        assert_eq!(nth_match([], VENDOR, PRODUCTS, 0), None);
    }

    #[test]
    fn test_first_match_wins_for_index_zero() {
        // Two matching tokens attached with unrelated devices in between
        let attached = [
            (0x046d, 0xc52b), // mouse receiver
            (VENDOR, 0x0010),
            (0x8087, 0x0026), // hub
            (VENDOR, 0x0030),
        ];
        assert_eq!(nth_match(attached, VENDOR, PRODUCTS, 0), Some(1));
        assert_eq!(nth_match(attached, VENDOR, PRODUCTS, 1), Some(3));
    }

    #[test]
    fn test_vendor_must_match_even_for_known_products() {
        let attached = [(0x1d50, 0x0010), (0x1d50, 0x0030)];
        assert_eq!(nth_match(attached, VENDOR, PRODUCTS, 0), None);
    }

    #[test]
    fn test_product_outside_candidate_list_is_skipped() {
        let attached = [(VENDOR, 0x0407), (VENDOR, 0x0030)];
        assert_eq!(nth_match(attached, VENDOR, PRODUCTS, 0), Some(1));
    }

    #[test]
    fn test_selection_is_stable_under_later_matches() {
        // A long tail of additional matches must not displace the chosen one
        let mut attached = vec![(VENDOR, 0x0010)];
        attached.extend(std::iter::repeat_n((VENDOR, 0x0030), 16));
        assert_eq!(nth_match(attached, VENDOR, PRODUCTS, 0), Some(0));
    }
}
