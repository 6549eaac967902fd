//! Protocol module - wire format, frames, labels and packet encoding.
//!
//! This module implements the sign side of the data path:
//! - Wire constants (sequence/packet framing, command codes, size limits)
//! - [`Frame`]/[`FrameList`] model
//! - Label pool and allocation
//! - The four packet encoders

mod frame;
mod label;
pub mod modes;
mod packet;
mod wire_format;

pub use frame::{Frame, FrameKind, FrameList};
pub use label::{LabelAllocator, LabelPool, DEFAULT_LABEL_LIMIT, PROTOCOL_LABEL_RANGES};
pub use packet::{
    allocation_size, build_frame_packet, build_memory_config, build_run_sequence, build_string,
    build_text, EncodedPacket, PacketKind,
};
pub use wire_format::{
    command, hex_size, memory, run_sequence, MAX_STRING_GROUP_COUNT, MAX_STRING_GROUP_SIZE,
    MAX_STRING_SIZE, MAX_TEXT_SIZE, MIN_TEXT_SIZE, MODE_DIVIDER, NO_SPECIAL, PACKET_DELAY,
    PACKET_FOOTER, PACKET_HEADER, POSITION_FILL, SEQUENCE_FOOTER, SEQUENCE_HEADER,
    STRING_REFERENCE,
};
