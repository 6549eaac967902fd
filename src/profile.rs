//! Device profile: USB identity and protocol limits of one sign model.
//!
//! Every field has a default, so a profile file only needs the values that
//! differ from the stock BetaBrite Prism.
//!
//! # Example
//!
//! ```
//! use signwire::profile::DeviceProfile;
//!
//! let profile = DeviceProfile::from_json_str(r#"{ "label_limit": 60 }"#).unwrap();
//! assert_eq!(profile.label_limit, 60);
//! assert_eq!(profile.vendor_id, 0x8765);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::{DEFAULT_LABEL_LIMIT, PACKET_DELAY};

/// Default USB vendor id of the Prism.
pub const DEFAULT_VENDOR_ID: u16 = 0x8765;
/// Default USB product id of the Prism.
pub const DEFAULT_PRODUCT_ID: u16 = 0x1234;
/// Default USB interface.
pub const DEFAULT_INTERFACE: u8 = 0;
/// Default bulk OUT endpoint.
pub const DEFAULT_ENDPOINT: u8 = 2;
/// Default bulk write timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// USB identity, timing and label budget of a sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    /// Bulk OUT endpoint number (without the direction bit).
    pub endpoint: u8,
    /// Bulk write timeout.
    pub timeout_ms: u64,
    /// Pause between a packet header and its body.
    pub packet_delay_ms: u64,
    /// Number of labels the sign accepts.
    pub label_limit: usize,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
            interface: DEFAULT_INTERFACE,
            endpoint: DEFAULT_ENDPOINT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            packet_delay_ms: PACKET_DELAY.as_millis() as u64,
            label_limit: DEFAULT_LABEL_LIMIT,
        }
    }
}

impl DeviceProfile {
    /// Parse a profile from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON profile from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn packet_delay(&self) -> Duration {
        Duration::from_millis(self.packet_delay_ms)
    }
}
