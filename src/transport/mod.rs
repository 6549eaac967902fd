//! Transport module - the link that carries framed packets to the sign.
//!
//! Backends:
//! - [`UsbTransport`]: a real sign over libusb (`usb` feature), in
//!   [`UsbFlavor::RealDevice`] or [`UsbFlavor::LegacyDevice`] reset flavor
//! - [`NullTransport`]: logs every call and pretends it succeeded
//! - [`MockTransport`]: scripted outcomes for tests
//!
//! A transport is opened by its constructor and closed when dropped.

mod mock;
mod null;
#[cfg(feature = "usb")]
mod usb;

pub use mock::{MockEvent, MockTransport, SendOutcome};
pub use null::NullTransport;
#[cfg(feature = "usb")]
pub use usb::{UsbFlavor, UsbTransport};

use crate::error::Result;

/// A blocking, exclusively owned link to one sign.
pub trait Transport {
    /// Write `data` to the bulk OUT `endpoint`, returning how many bytes the
    /// device accepted.
    fn send(&mut self, endpoint: u8, data: &[u8]) -> Result<usize>;

    /// Reset the device, reopening it if the reset made the handle stale.
    fn reset(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, endpoint: u8, data: &[u8]) -> Result<usize> {
        (**self).send(endpoint, data)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, endpoint: u8, data: &[u8]) -> Result<usize> {
        (**self).send(endpoint, data)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

/// Hex preview of the first bytes of a send, for debug logs.
pub(crate) fn hex_preview(data: &[u8]) -> String {
    const PREVIEW: usize = 16;
    let mut out: Vec<String> = data
        .iter()
        .take(PREVIEW)
        .map(|b| format!("{:02x}", b))
        .collect();
    if data.len() > PREVIEW {
        out.push("..".to_string());
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_preview() {
        assert_eq!(hex_preview(&[0x02]), "02");
        assert_eq!(hex_preview(b"AZ"), "41 5a");
        let long = [0u8; 20];
        assert!(hex_preview(&long).ends_with(" .."));
    }

    #[test]
    fn test_boxed_transport() {
        let mut boxed: Box<dyn Transport> = Box::new(NullTransport::new());
        assert_eq!(boxed.send(2, b"abc").unwrap(), 3);
        boxed.reset().unwrap();
    }
}
