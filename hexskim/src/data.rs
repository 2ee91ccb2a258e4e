//! Models how raw blocks are read into the pager.

use std::fmt;

use hexskim_common::{BlockIndex, Geometry};

mod device;
mod slice;

pub use device::DeviceBlocks;
pub use slice::SliceBlocks;

/// A source of fixed-size blocks for the pager to page through.
pub trait BlockSource {
    /// The error type for fallible sources.
    type Error: fmt::Debug + fmt::Display;

    /// The block layout of this source.
    fn geometry(&self) -> Geometry;

    /// The number of blocks the source covers.
    ///
    /// The final block may be backed by fewer bytes than the block size.
    fn total_blocks(&self) -> u64;

    /// Fills the buffer with consecutive blocks starting at `first`,
    /// returning the filled slice.
    ///
    /// Callers size `buf` to a whole number of blocks. A read reaching past
    /// the end of the source is truncated to the bytes that exist rather
    /// than failing; the returned slice may therefore be shorter than `buf`.
    fn read_blocks<'buf>(
        &mut self,
        first: BlockIndex,
        buf: &'buf mut [u8],
    ) -> Result<&'buf [u8], Self::Error>;
}
