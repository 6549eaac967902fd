//! Wire format constants for the BetaBrite sign protocol.
//!
//! A transmission is a *sequence* of framed packets:
//! ```text
//! ┌────────────────────────────┬──────────────────────────────┬────────┐
//! │ Sequence header (9 bytes)  │ Packet [Packet ...]          │ Footer │
//! │ 00 00 00 00 00 01 'Z' 0 0  │ 02 ~100ms~ <payload> 03      │ 04     │
//! └────────────────────────────┴──────────────────────────────┴────────┘
//! ```
//!
//! Packet payloads start with a command code (see [`command`]).

use std::time::Duration;

/// Begins a sequence of packets: five NULs, SOH, type code `Z` (all signs),
/// address `00` (broadcast).
pub const SEQUENCE_HEADER: [u8; 9] = [0, 0, 0, 0, 0, 1, b'Z', b'0', b'0'];

/// Ends a sequence of packets (EOT).
pub const SEQUENCE_FOOTER: [u8; 1] = [0x04];

/// Starts a packet (STX).
pub const PACKET_HEADER: [u8; 1] = [0x02];

/// Ends a packet (ETX).
pub const PACKET_FOOTER: [u8; 1] = [0x03];

/// Required pause between the packet header and the packet body.
pub const PACKET_DELAY: Duration = Duration::from_millis(100);

/// Smallest memory allocation for a TEXT file.
pub const MIN_TEXT_SIZE: usize = 128;

/// Largest TEXT payload the sign accepts reliably.
pub const MAX_TEXT_SIZE: usize = 4096;

/// Largest STRING payload. Longer dynamic content is split across STRINGs.
pub const MAX_STRING_SIZE: usize = 125;

/// Number of STRINGs a single TEXT may reference and still display.
pub const MAX_STRING_GROUP_COUNT: usize = 4;

/// Byte budget of one STRING group.
pub const MAX_STRING_GROUP_SIZE: usize = MAX_STRING_GROUP_COUNT * MAX_STRING_SIZE;

/// Mode value meaning "no second mode character".
pub const NO_SPECIAL: u8 = 0;

/// Introduces a STRING reference inside TEXT data (`0x10, label`).
pub const STRING_REFERENCE: u8 = 0x10;

/// Separates the label from the display mode in a TEXT packet.
pub const MODE_DIVIDER: u8 = 0x1B;

/// Display position: fill (middle line on one-line signs).
pub const POSITION_FILL: u8 = 0x30;

/// Command codes that open a packet payload.
pub mod command {
    /// Write TEXT file.
    pub const WRITE_TEXT: u8 = b'A';
    /// Write STRING file.
    pub const WRITE_STRING: u8 = b'G';
    /// Write special function.
    pub const WRITE_SPECIAL: u8 = b'E';
    /// Special function: set memory configuration.
    pub const SPECIAL_MEMORY_CONFIG: u8 = b'$';
    /// Special function: set run sequence.
    pub const SPECIAL_RUN_SEQUENCE: u8 = 0x2E;
}

/// Field values of a memory-configuration file spec.
pub mod memory {
    /// File type flag for TEXT files.
    pub const TYPE_TEXT: u8 = b'A';
    /// File type flag for STRING files.
    pub const TYPE_STRING: u8 = b'B';
    /// Keyboard protection flag. STRING files must be locked.
    pub const LOCKED: u8 = b'L';
    /// Trailing field for TEXT files: start/stop times "always".
    pub const TEXT_TAIL: [u8; 4] = *b"FF00";
    /// Trailing field for STRING files.
    pub const STRING_TAIL: [u8; 4] = *b"0000";
    /// Bytes per file spec.
    pub const SPEC_SIZE: usize = 11;
}

/// Field values of a run-sequence packet.
pub mod run_sequence {
    /// Run sequence type: run files in order, ignoring their times.
    pub const TYPE_SEQUENCE: u8 = b'S';
    /// Sequence is unlocked.
    pub const UNLOCKED: u8 = b'U';
}

/// Render `size` as the 4 upper-case hex digits used in memory specs.
///
/// Values above `0xFFFF` are clamped.
pub fn hex_size(size: usize) -> [u8; 4] {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let size = size.min(0xFFFF);
    [
        DIGITS[(size >> 12) & 0xF],
        DIGITS[(size >> 8) & 0xF],
        DIGITS[(size >> 4) & 0xF],
        DIGITS[size & 0xF],
    ]
}
