//! Models the fixed shape of the dump: how blocks map to lines and offsets.

use crate::{AbsoluteOffset, BlockIndex, Len, LineIndex};

/// The number of bytes rendered on one dump line.
pub const BYTES_PER_LINE: usize = 16;

/// The conversion rules between blocks, lines, and byte offsets for one
/// block size.
///
/// All coordinate conversions go through here so the scroll arithmetic can
/// never disagree with the codec about where a block starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// The size of one block in bytes.
    block_size: u32,
}

impl Geometry {
    /// The block size used when the operator does not configure one.
    pub const DEFAULT_BLOCK_SIZE: u32 = 512;

    /// Creates the geometry for the given block size.
    ///
    /// `block_size` must be a non-zero multiple of [`BYTES_PER_LINE`] so that
    /// every block decodes to a whole number of lines.
    pub fn new(block_size: u32) -> Geometry {
        debug_assert!(block_size != 0 && block_size as usize % BYTES_PER_LINE == 0);

        Geometry { block_size }
    }

    /// The size of one block in bytes.
    pub fn block_size(self) -> u32 {
        self.block_size
    }

    /// The size of one block, as a buffer length.
    pub fn block_len(self) -> usize {
        self.block_size as usize
    }

    /// The number of dump lines one full block decodes to.
    pub fn lines_per_block(self) -> u64 {
        self.block_size as u64 / BYTES_PER_LINE as u64
    }

    /// The byte offset of the first byte of the given block.
    pub fn byte_offset(self, block: BlockIndex) -> AbsoluteOffset {
        AbsoluteOffset::from(block.as_u64() * self.block_size as u64)
    }

    /// The global index of the first line of the given block.
    pub fn first_line(self, block: BlockIndex) -> LineIndex {
        LineIndex::from(block.as_u64() * self.lines_per_block())
    }

    /// The number of blocks needed to cover `len` bytes.
    ///
    /// The final block may be backed by fewer bytes than the block size.
    pub fn block_count(self, len: Len) -> u64 {
        len.as_u64().div_ceil(self.block_size as u64)
    }
}

impl Default for Geometry {
    fn default() -> Geometry {
        Geometry::new(Geometry::DEFAULT_BLOCK_SIZE)
    }
}
