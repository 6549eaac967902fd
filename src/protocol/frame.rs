//! Frame model: one addressable unit of sign memory.
//!
//! A [`Frame`] is either a TEXT file (static display configuration, with a
//! transition mode) or a STRING fragment (size-limited dynamic content that a
//! TEXT frame pulls in by reference). Frames are collected in a
//! [`FrameList`] in creation order.
//!
//! # Example
//!
//! ```
//! use signwire::protocol::{Frame, FrameList, NO_SPECIAL};
//! use bytes::Bytes;
//!
//! let mut frames = FrameList::new();
//! frames.push(Frame::text(0x20, b'a', NO_SPECIAL, Some(Bytes::from_static(b"Hello"))));
//!
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames.labels().collect::<Vec<_>>(), vec![0x20]);
//! ```

use bytes::Bytes;

use super::wire_format::NO_SPECIAL;

/// What kind of sign file a frame maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// TEXT file with its display mode.
    Text {
        /// Transition/effect code (e.g. `b'a'` rotate).
        mode: u8,
        /// Second mode character for `n` modes, or [`NO_SPECIAL`].
        mode_special: u8,
    },
    /// STRING file holding part of a command's output.
    StringFragment,
}

/// A single frame of sign memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// One-byte file label, unique within a run.
    pub label: u8,
    /// Text or string fragment.
    pub kind: FrameKind,
    /// Encoded content. `None` only for self-contained `n` effects.
    pub payload: Option<Bytes>,
}

impl Frame {
    /// Create a TEXT frame.
    pub fn text(label: u8, mode: u8, mode_special: u8, payload: Option<Bytes>) -> Self {
        Self {
            label,
            kind: FrameKind::Text { mode, mode_special },
            payload,
        }
    }

    /// Create a STRING fragment frame.
    pub fn string_fragment(label: u8, payload: Bytes) -> Self {
        Self {
            label,
            kind: FrameKind::StringFragment,
            payload: Some(payload),
        }
    }

    /// Check if this is a STRING fragment.
    #[inline]
    pub fn is_string_fragment(&self) -> bool {
        self.kind == FrameKind::StringFragment
    }

    /// Check if this is a TEXT frame.
    #[inline]
    pub fn is_text(&self) -> bool {
        !self.is_string_fragment()
    }

    /// Payload bytes, empty when absent.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }

    /// Payload length, 0 when absent.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload().len()
    }

    /// Display mode and optional second character for TEXT frames.
    pub fn mode(&self) -> Option<(u8, Option<u8>)> {
        match self.kind {
            FrameKind::Text { mode, mode_special } => {
                let special = (mode_special != NO_SPECIAL).then_some(mode_special);
                Some((mode, special))
            }
            FrameKind::StringFragment => None,
        }
    }
}

/// Ordered, owned list of frames built by one compile run.
///
/// Frames can only be appended; nothing mutates a frame once it is in the
/// list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameList {
    frames: Vec<Frame>,
}

impl FrameList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, in creation order.
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Iterate frames in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// All frames as a slice.
    pub fn as_slice(&self) -> &[Frame] {
        &self.frames
    }

    /// Labels of all frames, in creation order.
    pub fn labels(&self) -> impl Iterator<Item = u8> + '_ {
        self.frames.iter().map(|f| f.label)
    }

    /// Labels that appear in the run sequence (TEXT frames only).
    pub fn run_sequence_labels(&self) -> impl Iterator<Item = u8> + '_ {
        self.frames
            .iter()
            .filter(|f| f.is_text())
            .map(|f| f.label)
    }

    /// Number of STRING fragments.
    pub fn string_fragment_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_string_fragment()).count()
    }
}

impl<'a> IntoIterator for &'a FrameList {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl IntoIterator for FrameList {
    type Item = Frame;
    type IntoIter = std::vec::IntoIter<Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl FromIterator<Frame> for FrameList {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}
