//! Implements the typed quantities the pager calculates with.
//!
//! Block indices, line indices, byte offsets, and byte lengths are all plain
//! `u64`s underneath, but mixing them up is the easiest way to corrupt the
//! scroll arithmetic, so each gets its own wrapper with only the operations
//! the pager actually needs.

use std::fmt;
use std::ops::{Add, Sub};

/// A byte position in the underlying device.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbsoluteOffset(u64);

impl AbsoluteOffset {
    /// The offset of the first byte.
    pub const ZERO: AbsoluteOffset = AbsoluteOffset(0);

    /// Returns the offset as a plain `u64`.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for AbsoluteOffset {
    fn from(value: u64) -> AbsoluteOffset {
        AbsoluteOffset(value)
    }
}

impl Add<Len> for AbsoluteOffset {
    type Output = AbsoluteOffset;

    fn add(self, rhs: Len) -> AbsoluteOffset {
        AbsoluteOffset(self.0 + rhs.0)
    }
}

impl fmt::Debug for AbsoluteOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AbsoluteOffset({:#x})", self.0)
    }
}

/// A length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Len(u64);

impl Len {
    /// The length of nothing.
    pub const ZERO: Len = Len(0);

    /// Returns the length as a plain `u64`.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Determines if the length is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Len {
    fn from(value: u64) -> Len {
        Len(value)
    }
}

/// The index of a fixed-size block on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockIndex(u64);

impl BlockIndex {
    /// The first block.
    pub const ZERO: BlockIndex = BlockIndex(0);

    /// Returns the index as a plain `u64`.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the index moved `count` blocks towards the start, stopping at
    /// block zero.
    pub fn saturating_sub(self, count: u64) -> BlockIndex {
        BlockIndex(self.0.saturating_sub(count))
    }
}

impl From<u64> for BlockIndex {
    fn from(value: u64) -> BlockIndex {
        BlockIndex(value)
    }
}

impl Add<u64> for BlockIndex {
    type Output = BlockIndex;

    fn add(self, rhs: u64) -> BlockIndex {
        BlockIndex(self.0 + rhs)
    }
}

impl Sub<u64> for BlockIndex {
    type Output = BlockIndex;

    fn sub(self, rhs: u64) -> BlockIndex {
        BlockIndex(self.0 - rhs)
    }
}

impl Sub<BlockIndex> for BlockIndex {
    /// The number of blocks between the two indices.
    type Output = u64;

    fn sub(self, rhs: BlockIndex) -> u64 {
        self.0 - rhs.0
    }
}

/// A global line position in the dump.
///
/// This is the single coordinate system scrolling happens in: line `n` is row
/// `n % lines_per_block` of block `n / lines_per_block`, regardless of which
/// lines are currently materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineIndex(u64);

impl LineIndex {
    /// The first line.
    pub const ZERO: LineIndex = LineIndex(0);

    /// Returns the index as a plain `u64`.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the line `delta` scroll steps away, or `None` if that would be
    /// before the first line.
    pub fn checked_add_signed(self, delta: i64) -> Option<LineIndex> {
        self.0.checked_add_signed(delta).map(LineIndex)
    }
}

impl From<u64> for LineIndex {
    fn from(value: u64) -> LineIndex {
        LineIndex(value)
    }
}

impl Add<u64> for LineIndex {
    type Output = LineIndex;

    fn add(self, rhs: u64) -> LineIndex {
        LineIndex(self.0 + rhs)
    }
}

impl Sub<LineIndex> for LineIndex {
    /// The number of lines between the two positions.
    type Output = u64;

    fn sub(self, rhs: LineIndex) -> u64 {
        self.0 - rhs.0
    }
}
