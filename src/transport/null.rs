//! Transport that talks to nothing.

use tracing::info;

use super::Transport;
use crate::error::Result;
use crate::profile::DeviceProfile;

/// Logs every open, send, reset and close, and reports every send as complete.
///
/// Useful for checking what a config would send without a sign attached.
#[derive(Debug)]
pub struct NullTransport {
    sent_bytes: usize,
}

impl NullTransport {
    /// Open a stub for the default profile.
    pub fn new() -> Self {
        Self::open(&DeviceProfile::default())
    }

    /// Open a stub standing in for the device described by `profile`.
    pub fn open(profile: &DeviceProfile) -> Self {
        info!(
            "USB Open {:X}:{:X} interface {}",
            profile.vendor_id, profile.product_id, profile.interface
        );
        Self { sent_bytes: 0 }
    }

    /// Total bytes "sent" so far.
    pub fn sent_bytes(&self) -> usize {
        self.sent_bytes
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for NullTransport {
    fn send(&mut self, endpoint: u8, data: &[u8]) -> Result<usize> {
        info!("USB Send {} bytes of data to endpoint {}", data.len(), endpoint);
        self.sent_bytes += data.len();
        Ok(data.len())
    }

    fn reset(&mut self) -> Result<()> {
        info!("USB Reset");
        Ok(())
    }
}

impl Drop for NullTransport {
    fn drop(&mut self) {
        info!("USB Close ({} bytes sent)", self.sent_bytes);
    }
}
