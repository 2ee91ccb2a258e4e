//! Implements [`Device`] as a block source.

use std::io;

use hexskim_common::{BlockIndex, Device, Geometry};

use super::BlockSource;

/// The block view of an open [`Device`].
#[derive(Debug)]
pub struct DeviceBlocks {
    /// The underlying device.
    device: Device,
    /// The block layout imposed on it.
    geometry: Geometry,
}

impl DeviceBlocks {
    /// Wraps the device in the given block layout.
    pub fn new(device: Device, geometry: Geometry) -> DeviceBlocks {
        DeviceBlocks { device, geometry }
    }
}

impl BlockSource for DeviceBlocks {
    type Error = io::Error;

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn total_blocks(&self) -> u64 {
        self.geometry.block_count(self.device.len())
    }

    fn read_blocks<'buf>(
        &mut self,
        first: BlockIndex,
        buf: &'buf mut [u8],
    ) -> Result<&'buf [u8], Self::Error> {
        self.device.read_at(self.geometry.byte_offset(first), buf)
    }
}
