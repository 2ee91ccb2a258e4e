//! Defines common types and functions used by all hexskim `crate`s.

pub use geometry::{BYTES_PER_LINE, Geometry};
pub use input::{Device, OpenError, OpenErrorKind};
pub use quantities::{AbsoluteOffset, BlockIndex, Len, LineIndex};

mod geometry;
mod input;
mod quantities;
