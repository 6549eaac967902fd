//! Packet encoders.
//!
//! Four packet payloads are built from a compiled [`FrameList`]. Framing
//! (`02 ... 03`) is added by the session, not here.
//!
//! ```text
//! MEMORY CONFIG  'E' '$' { label 'A'|'B' 'L' SSSS "FF00"|"0000" } ...
//! TEXT           'A' label 0x1B 0x30 mode [special] data
//! STRING         'G' label data
//! RUN SEQUENCE   'E' 0x2E 'S' 'U' label ...
//! ```
//!
//! `SSSS` is the allocated size in four upper-case hex digits.

use bytes::{BufMut, Bytes, BytesMut};

use super::frame::{Frame, FrameKind, FrameList};
use super::wire_format::{
    command, hex_size, memory, run_sequence, MAX_STRING_SIZE, MAX_TEXT_SIZE, MIN_TEXT_SIZE,
    MODE_DIVIDER, NO_SPECIAL, POSITION_FILL,
};
use crate::error::{Result, SignError};

/// Which of the four packet payloads this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    /// Memory allocation for every frame.
    MemoryConfig,
    /// Contents of one TEXT file.
    Text,
    /// Contents of one STRING file.
    String,
    /// Display order.
    RunSequence,
}

impl PacketKind {
    /// Short description used in logs and errors.
    pub fn describe(self) -> &'static str {
        match self {
            PacketKind::MemoryConfig => "memory config packet",
            PacketKind::Text => "text packet",
            PacketKind::String => "string packet",
            PacketKind::RunSequence => "run sequence packet",
        }
    }
}

/// An encoded packet payload (without framing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPacket {
    kind: PacketKind,
    bytes: Bytes,
}

impl EncodedPacket {
    fn new(kind: PacketKind, bytes: BytesMut) -> Self {
        Self {
            kind,
            bytes: bytes.freeze(),
        }
    }

    /// Packet kind.
    #[inline]
    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    /// Encoded bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Exact encoded length.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the packet has no bytes (never true for built packets).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume into the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

/// Memory size reserved for a frame.
///
/// TEXT frames reserve their own length clamped to `[128, 4096]`; STRING
/// frames always reserve the full fragment size so later updates fit.
pub fn allocation_size(frame: &Frame) -> usize {
    match frame.kind {
        FrameKind::Text { .. } => frame.payload_len().clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE),
        FrameKind::StringFragment => MAX_STRING_SIZE,
    }
}

/// Build the memory-configuration packet, one 11-byte spec per frame.
pub fn build_memory_config(frames: &FrameList) -> EncodedPacket {
    let mut buf = BytesMut::with_capacity(2 + memory::SPEC_SIZE * frames.len());
    buf.put_u8(command::WRITE_SPECIAL);
    buf.put_u8(command::SPECIAL_MEMORY_CONFIG);

    for frame in frames {
        let (type_flag, tail) = match frame.kind {
            FrameKind::Text { .. } => (memory::TYPE_TEXT, memory::TEXT_TAIL),
            FrameKind::StringFragment => (memory::TYPE_STRING, memory::STRING_TAIL),
        };
        buf.put_u8(frame.label);
        buf.put_u8(type_flag);
        buf.put_u8(memory::LOCKED);
        buf.put_slice(&hex_size(allocation_size(frame)));
        buf.put_slice(&tail);
    }

    EncodedPacket::new(PacketKind::MemoryConfig, buf)
}

/// Build the TEXT packet for a TEXT frame.
///
/// Payloads over 4096 bytes are cut to fit, with a warning.
///
/// # Errors
///
/// Returns [`SignError::Internal`] if `frame` is a STRING fragment.
pub fn build_text(frame: &Frame) -> Result<EncodedPacket> {
    let FrameKind::Text { mode, mode_special } = frame.kind else {
        return Err(SignError::Internal(format!(
            "frame {:#04x} is not a text frame",
            frame.label
        )));
    };

    let data = truncated(frame.payload(), MAX_TEXT_SIZE, frame.label, "text");

    let mut buf = BytesMut::with_capacity(6 + data.len());
    buf.put_u8(command::WRITE_TEXT);
    buf.put_u8(frame.label);
    buf.put_u8(MODE_DIVIDER);
    buf.put_u8(POSITION_FILL);
    buf.put_u8(mode);
    if mode_special != NO_SPECIAL {
        buf.put_u8(mode_special);
    }
    buf.put_slice(data);

    Ok(EncodedPacket::new(PacketKind::Text, buf))
}

/// Build the STRING packet for a STRING fragment.
///
/// Payloads over 125 bytes are cut to fit, with a warning.
///
/// # Errors
///
/// Returns [`SignError::Internal`] if `frame` is a TEXT frame.
pub fn build_string(frame: &Frame) -> Result<EncodedPacket> {
    if !frame.is_string_fragment() {
        return Err(SignError::Internal(format!(
            "frame {:#04x} is not a string fragment",
            frame.label
        )));
    }

    let data = truncated(frame.payload(), MAX_STRING_SIZE, frame.label, "string");

    let mut buf = BytesMut::with_capacity(2 + data.len());
    buf.put_u8(command::WRITE_STRING);
    buf.put_u8(frame.label);
    buf.put_slice(data);

    Ok(EncodedPacket::new(PacketKind::String, buf))
}

/// Build the TEXT or STRING packet matching the frame's kind.
pub fn build_frame_packet(frame: &Frame) -> Result<EncodedPacket> {
    match frame.kind {
        FrameKind::Text { .. } => build_text(frame),
        FrameKind::StringFragment => build_string(frame),
    }
}

/// Build the run-sequence packet: every TEXT frame's label, in list order.
pub fn build_run_sequence(frames: &FrameList) -> EncodedPacket {
    let mut buf = BytesMut::with_capacity(4 + frames.len());
    buf.put_u8(command::WRITE_SPECIAL);
    buf.put_u8(command::SPECIAL_RUN_SEQUENCE);
    buf.put_u8(run_sequence::TYPE_SEQUENCE);
    buf.put_u8(run_sequence::UNLOCKED);
    for label in frames.run_sequence_labels() {
        buf.put_u8(label);
    }

    EncodedPacket::new(PacketKind::RunSequence, buf)
}

fn truncated<'a>(data: &'a [u8], max: usize, label: u8, what: &str) -> &'a [u8] {
    if data.len() > max {
        tracing::warn!(
            "Shrank {} frame {:#04x} from {} to {} bytes",
            what,
            label,
            data.len(),
            max
        );
        &data[..max]
    } else {
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_capture::capture_warnings;

    fn text(label: u8, mode: u8, special: u8, data: &'static [u8]) -> Frame {
        Frame::text(label, mode, special, Some(Bytes::from_static(data)))
    }

    #[test]
    fn test_memory_config_text_spec() {
        let frames: FrameList = vec![text(0x20, b'a', NO_SPECIAL, b"Hello")]
            .into_iter()
            .collect();
        let packet = build_memory_config(&frames);

        assert_eq!(packet.kind(), PacketKind::MemoryConfig);
        assert_eq!(packet.len(), 2 + 11);
        assert_eq!(packet.bytes(), b"E$ AL0080FF00");
    }

    #[test]
    fn test_memory_config_absent_payload_uses_minimum() {
        let frames: FrameList = vec![Frame::text(0x20, b'n', b'X', None)].into_iter().collect();
        let packet = build_memory_config(&frames);
        assert_eq!(&packet.bytes()[5..9], b"0080");
    }

    #[test]
    fn test_memory_config_clamps_large_text() {
        let big = Frame::text(0x20, b'a', NO_SPECIAL, Some(Bytes::from(vec![b'x'; 5000])));
        assert_eq!(allocation_size(&big), MAX_TEXT_SIZE);
        let frames: FrameList = vec![big].into_iter().collect();
        assert_eq!(&build_memory_config(&frames).bytes()[5..9], b"1000");
    }

    #[test]
    fn test_memory_config_string_spec_always_full_size() {
        let frames: FrameList = vec![
            Frame::string_fragment(0x20, Bytes::from_static(b"ab")),
            text(0x21, b'b', NO_SPECIAL, &[0x10, 0x20]),
        ]
        .into_iter()
        .collect();
        let packet = build_memory_config(&frames);

        assert_eq!(packet.len(), 2 + 22);
        assert_eq!(&packet.bytes()[2..13], b" BL007D0000");
        assert_eq!(&packet.bytes()[13..24], b"!AL0080FF00");
    }

    #[test]
    fn test_text_packet_layout() {
        let packet = build_text(&text(0x20, b'a', NO_SPECIAL, b"Hello")).unwrap();
        assert_eq!(packet.kind(), PacketKind::Text);
        assert_eq!(packet.bytes(), b"A \x1b0aHello");
    }

    #[test]
    fn test_text_packet_with_special_mode() {
        let packet = build_text(&Frame::text(0x21, b'n', b'X', None)).unwrap();
        assert_eq!(packet.bytes(), b"A!\x1b0nX");
        assert_eq!(packet.len(), 6);
    }

    #[test]
    fn test_text_packet_truncates_to_4096() {
        let frame = Frame::text(0x20, b'a', NO_SPECIAL, Some(Bytes::from(vec![b'x'; 5000])));
        let (packet, logs) = capture_warnings(|| build_text(&frame).unwrap());
        assert_eq!(packet.len(), 5 + MAX_TEXT_SIZE);
        assert!(logs.contains("Shrank text frame 0x20 from 5000 to 4096 bytes"));
    }

    #[test]
    fn test_text_packet_at_limit_is_not_shrunk() {
        let frame = Frame::text(0x20, b'a', NO_SPECIAL, Some(Bytes::from(vec![b'x'; 4096])));
        let (packet, logs) = capture_warnings(|| build_text(&frame).unwrap());
        assert_eq!(packet.len(), 5 + MAX_TEXT_SIZE);
        assert!(logs.is_empty());
    }

    #[test]
    fn test_text_packet_rejects_string_fragment() {
        let frame = Frame::string_fragment(0x20, Bytes::new());
        let err = build_text(&frame).unwrap_err();
        assert!(matches!(err, SignError::Internal(_)));
    }

    #[test]
    fn test_string_packet_layout() {
        let frame = Frame::string_fragment(0x22, Bytes::from_static(b"42F"));
        let packet = build_string(&frame).unwrap();
        assert_eq!(packet.kind(), PacketKind::String);
        assert_eq!(packet.bytes(), b"G\"42F");
    }

    #[test]
    fn test_string_packet_empty_payload() {
        let frame = Frame::string_fragment(0x22, Bytes::new());
        assert_eq!(build_string(&frame).unwrap().bytes(), b"G\"");
    }

    #[test]
    fn test_string_packet_truncates_to_125() {
        let frame = Frame::string_fragment(0x20, Bytes::from(vec![b'y'; 200]));
        let (packet, logs) = capture_warnings(|| build_string(&frame).unwrap());
        assert_eq!(packet.len(), 2 + MAX_STRING_SIZE);
        assert!(logs.contains("Shrank string frame 0x20 from 200 to 125 bytes"));
    }

    #[test]
    fn test_string_packet_rejects_text_frame() {
        let err = build_string(&Frame::text(0x20, b'a', NO_SPECIAL, None)).unwrap_err();
        assert!(matches!(err, SignError::Internal(_)));
    }

    #[test]
    fn test_frame_packet_dispatch() {
        let s = Frame::string_fragment(0x20, Bytes::from_static(b"x"));
        let t = text(0x21, b'a', NO_SPECIAL, b"y");
        assert_eq!(build_frame_packet(&s).unwrap().kind(), PacketKind::String);
        assert_eq!(build_frame_packet(&t).unwrap().kind(), PacketKind::Text);
    }

    #[test]
    fn test_run_sequence_skips_string_fragments() {
        let frames: FrameList = vec![
            text(0x20, b'a', NO_SPECIAL, b"one"),
            Frame::string_fragment(0x21, Bytes::new()),
            Frame::string_fragment(0x22, Bytes::new()),
            text(0x23, b'b', NO_SPECIAL, &[0x10, 0x21, 0x10, 0x22]),
        ]
        .into_iter()
        .collect();
        let packet = build_run_sequence(&frames);

        assert_eq!(packet.kind(), PacketKind::RunSequence);
        assert_eq!(packet.bytes(), &[b'E', 0x2E, b'S', b'U', 0x20, 0x23]);
    }
}
