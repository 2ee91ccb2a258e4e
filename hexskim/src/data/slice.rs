//! Implements in-memory bytes as a block source.

use hexskim_common::{BlockIndex, Geometry, Len};

use super::BlockSource;

/// A block source over bytes already in memory.
///
/// Useful for exercising the pager without a device behind it.
#[derive(Debug)]
pub struct SliceBlocks<'a> {
    /// The backing bytes.
    bytes: &'a [u8],
    /// The block layout imposed on them.
    geometry: Geometry,
}

impl<'a> SliceBlocks<'a> {
    /// Wraps the bytes in the given block layout.
    pub fn new(bytes: &'a [u8], geometry: Geometry) -> SliceBlocks<'a> {
        SliceBlocks { bytes, geometry }
    }
}

impl BlockSource for SliceBlocks<'_> {
    type Error = &'static str;

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn total_blocks(&self) -> u64 {
        self.geometry.block_count(Len::from(self.bytes.len() as u64))
    }

    fn read_blocks<'buf>(
        &mut self,
        first: BlockIndex,
        buf: &'buf mut [u8],
    ) -> Result<&'buf [u8], Self::Error> {
        let offset: usize = self
            .geometry
            .byte_offset(first)
            .as_u64()
            .try_into()
            .map_err(|_| "offset does not fit into `usize`")?;

        if offset > self.bytes.len() {
            return Err("offset is beyond input");
        }

        let len_left = self.bytes.len() - offset;
        let output_size = std::cmp::min(len_left, buf.len());

        buf[..output_size].copy_from_slice(&self.bytes[offset..offset + output_size]);

        Ok(&buf[..output_size])
    }
}
