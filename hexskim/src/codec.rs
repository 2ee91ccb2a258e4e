//! Turns raw block bytes into formatted hex-dump lines.

use std::fmt::Write as _;

use hexskim_common::{BYTES_PER_LINE, BlockIndex, Geometry};

/// Decodes a buffer of block bytes into dump lines.
///
/// The buffer must start on the block boundary named by `first_block`; every
/// [`BYTES_PER_LINE`] bytes become one line of the form
///
/// ```text
/// 0000000000001400 4d 5a 90 00 ... 00 00 MZ..............
/// ```
///
/// with the offset as 16 hex digits, one ` xx` group per byte, and a sidebar
/// that shows printable ASCII and `.` for everything else. A short final row
/// (an oddly-sized device tail) is padded with ` 00` and `.` so every line
/// has the same width. Empty input produces no lines.
pub fn encode(bytes: &[u8], first_block: BlockIndex, geometry: Geometry) -> Vec<String> {
    let base = geometry.byte_offset(first_block).as_u64();

    let mut lines = Vec::with_capacity(bytes.len().div_ceil(BYTES_PER_LINE));
    for (row, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        let mut line = String::with_capacity(16 + 4 * BYTES_PER_LINE + 1);
        let mut sidebar = String::with_capacity(BYTES_PER_LINE + 1);

        let _ = write!(line, "{:016x}", base + (row * BYTES_PER_LINE) as u64);
        sidebar.push(' ');

        for &value in chunk {
            let _ = write!(line, " {value:02x}");
            sidebar.push(if (0x20..=0x7e).contains(&value) {
                value as char
            } else {
                '.'
            });
        }

        for _ in chunk.len()..BYTES_PER_LINE {
            line.push_str(" 00");
            sidebar.push('.');
        }

        line.push_str(&sidebar);
        lines.push(line);
    }

    lines
}
