//! libusb-backed sign transport.
//!
//! The sign shows up as a single bulk OUT endpoint. Opening finds it by
//! vendor/product id and claims its interface; dropping releases the
//! interface and closes the handle.

use std::time::Duration;

use rusb::constants::LIBUSB_ENDPOINT_OUT;
use rusb::{DeviceHandle, GlobalContext};
use tracing::{debug, error, info, warn};

use super::Transport;
use crate::error::{Result, SignError};
use crate::profile::DeviceProfile;

/// How a device reset is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbFlavor {
    /// Reset in place. The handle is only reopened when the device
    /// re-enumerated during the reset.
    RealDevice,
    /// Reset, then always close and reopen the handle.
    LegacyDevice,
}

/// A claimed sign on the USB bus.
pub struct UsbTransport {
    flavor: UsbFlavor,
    vendor_id: u16,
    product_id: u16,
    interface: u8,
    timeout: Duration,
    handle: Option<DeviceHandle<GlobalContext>>,
}

impl UsbTransport {
    /// Find, open and claim the sign described by `profile`.
    pub fn open(flavor: UsbFlavor, profile: &DeviceProfile) -> Result<Self> {
        let handle = open_handle(profile.vendor_id, profile.product_id, profile.interface)?;
        info!(
            ?flavor,
            "Opened sign {:04x}:{:04x} interface {}",
            profile.vendor_id,
            profile.product_id,
            profile.interface
        );
        Ok(Self {
            flavor,
            vendor_id: profile.vendor_id,
            product_id: profile.product_id,
            interface: profile.interface,
            timeout: profile.timeout(),
            handle: Some(handle),
        })
    }

    pub fn flavor(&self) -> UsbFlavor {
        self.flavor
    }

    fn reopen(&mut self) -> Result<()> {
        self.close();
        self.handle = Some(open_handle(self.vendor_id, self.product_id, self.interface)?);
        debug!("Reopened sign after reset");
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.release_interface(self.interface) {
                debug!("Releasing interface {} failed: {}", self.interface, e);
            }
        }
    }
}

impl Transport for UsbTransport {
    fn send(&mut self, endpoint: u8, data: &[u8]) -> Result<usize> {
        let handle = self.handle.as_ref().ok_or_else(|| SignError::Device {
            code: error_code(rusb::Error::NoDevice),
            message: "device is not open".into(),
        })?;
        handle
            .write_bulk(out_address(endpoint), data, self.timeout)
            .map_err(|e| {
                error!("Bulk write of {} bytes failed: {}", data.len(), e);
                device_error(e)
            })
    }

    fn reset(&mut self) -> Result<()> {
        let result = match self.handle.as_mut() {
            Some(handle) => handle.reset(),
            None => Err(rusb::Error::NotFound),
        };

        match (self.flavor, result) {
            (UsbFlavor::RealDevice, Ok(())) => Ok(()),
            (UsbFlavor::RealDevice, Err(rusb::Error::NotFound)) => {
                warn!("Sign re-enumerated during reset, reopening");
                self.reopen()
            }
            (UsbFlavor::LegacyDevice, Ok(())) => self.reopen(),
            (_, Err(e)) => {
                error!("Got error {} when resetting usb device", e);
                Err(device_error(e))
            }
        }
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn open_handle(vendor_id: u16, product_id: u16, interface: u8) -> Result<DeviceHandle<GlobalContext>> {
    let mut handle =
        rusb::open_device_with_vid_pid(vendor_id, product_id).ok_or_else(|| SignError::Device {
            code: error_code(rusb::Error::NotFound),
            message: format!(
                "Could not find/open USB device with vid=0x{:X} pid=0x{:X}. Is the sign plugged in?",
                vendor_id, product_id
            ),
        })?;

    if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
        debug!("Kernel driver auto-detach unavailable: {}", e);
    }
    handle.claim_interface(interface).map_err(|e| SignError::Device {
        code: error_code(e),
        message: format!("Could not claim device: {}", e),
    })?;
    Ok(handle)
}

/// Bulk OUT address for endpoint number `endpoint`.
fn out_address(endpoint: u8) -> u8 {
    endpoint | LIBUSB_ENDPOINT_OUT
}

fn device_error(e: rusb::Error) -> SignError {
    SignError::Device {
        code: error_code(e),
        message: e.to_string(),
    }
}

/// libusb-1.0 error number for `e`.
fn error_code(e: rusb::Error) -> i32 {
    match e {
        rusb::Error::Io => -1,
        rusb::Error::InvalidParam => -2,
        rusb::Error::Access => -3,
        rusb::Error::NoDevice => -4,
        rusb::Error::NotFound => -5,
        rusb::Error::Busy => -6,
        rusb::Error::Timeout => -7,
        rusb::Error::Overflow => -8,
        rusb::Error::Pipe => -9,
        rusb::Error::Interrupted => -10,
        rusb::Error::NoMem => -11,
        rusb::Error::NotSupported => -12,
        _ => -99,
    }
}
