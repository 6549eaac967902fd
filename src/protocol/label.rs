//! File label allocation.
//!
//! Every frame is addressed on the sign by a one-byte label. Labels come from
//! a small pool of inclusive byte ranges and are handed out in order:
//!
//! ```text
//! 0x20 ..= 0x2F   (16)
//! 0x36 ..= 0x3E   ( 9)
//! 0x40 ..= 0x7E   (63)
//! ```
//!
//! Signs reject far fewer labels than the protocol allows. The tested Prism
//! model fails above 46 labels, so [`LabelPool::default`] stops at `0x54`.

use std::ops::RangeInclusive;

/// Label ranges the protocol allows.
pub const PROTOCOL_LABEL_RANGES: [RangeInclusive<u8>; 3] = [0x20..=0x2F, 0x36..=0x3E, 0x40..=0x7E];

/// Working label limit of the tested sign.
pub const DEFAULT_LABEL_LIMIT: usize = 46;

/// An ordered set of inclusive label ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPool {
    ranges: Vec<RangeInclusive<u8>>,
}

impl LabelPool {
    /// Build a pool from explicit ranges.
    ///
    /// Ranges must be ascending and non-overlapping; empty ranges are dropped.
    pub fn from_ranges(ranges: impl IntoIterator<Item = RangeInclusive<u8>>) -> Self {
        Self {
            ranges: ranges.into_iter().filter(|r| !r.is_empty()).collect(),
        }
    }

    /// The full protocol pool (88 labels).
    pub fn protocol() -> Self {
        Self::from_ranges(PROTOCOL_LABEL_RANGES)
    }

    /// The first `limit` labels of the protocol pool.
    pub fn with_limit(limit: usize) -> Self {
        let mut budget = limit;
        let mut ranges = Vec::new();
        for range in PROTOCOL_LABEL_RANGES {
            if budget == 0 {
                break;
            }
            let (first, last) = (*range.start(), *range.end());
            let len = usize::from(last - first) + 1;
            if budget >= len {
                ranges.push(first..=last);
                budget -= len;
            } else {
                // budget < len <= 256, so the offset fits in u8
                let end = first + (budget - 1) as u8;
                ranges.push(first..=end);
                budget = 0;
            }
        }
        Self { ranges }
    }

    /// Total number of labels in the pool.
    pub fn capacity(&self) -> usize {
        self.ranges
            .iter()
            .map(|r| usize::from(r.end() - r.start()) + 1)
            .sum()
    }

    /// Label following `previous`, or `None` when the pool is exhausted.
    ///
    /// With no previous label the first label of the first range is returned.
    /// A previous label that falls in a gap (or at the end of a range) moves on
    /// to the start of the next range.
    pub fn next_label(&self, previous: Option<u8>) -> Option<u8> {
        let Some(prev) = previous else {
            return self.ranges.first().map(|r| *r.start());
        };
        for range in &self.ranges {
            if prev < *range.end() {
                return if prev >= *range.start() {
                    Some(prev + 1)
                } else {
                    Some(*range.start())
                };
            }
        }
        None
    }

    /// Start allocating from this pool.
    pub fn allocator(&self) -> LabelAllocator<'_> {
        LabelAllocator {
            pool: self,
            previous: None,
            issued: 0,
        }
    }
}

impl Default for LabelPool {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LABEL_LIMIT)
    }
}

/// Cursor that hands out each label of a pool once.
#[derive(Debug, Clone)]
pub struct LabelAllocator<'a> {
    pool: &'a LabelPool,
    previous: Option<u8>,
    issued: usize,
}

impl LabelAllocator<'_> {
    /// Next unused label, or `None` once the pool is exhausted.
    pub fn allocate(&mut self) -> Option<u8> {
        let label = self.pool.next_label(self.previous)?;
        self.previous = Some(label);
        self.issued += 1;
        Some(label)
    }

    /// Number of labels handed out so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Size of the underlying pool.
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }
}
