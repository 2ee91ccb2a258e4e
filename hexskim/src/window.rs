//! The sliding window of decoded dump lines backing the scroll view.
//!
//! Only a bounded range of blocks is ever materialized. Jumps reseed the
//! window around the target; scrolling slides it one chunk at a time, with
//! one chunk entering and one leaving so the footprint stays constant.

use std::{cmp, fmt};

use tracing::debug;

use hexskim_common::{BlockIndex, Geometry, LineIndex};

use crate::codec;
use crate::data::BlockSource;

/// Blocks fetched ahead of a jump target when the window is reseeded.
pub const PREFETCH_BLOCKS_AHEAD: u64 = 12;
/// Blocks fetched behind a jump target when the window is reseeded.
pub const PREFETCH_BLOCKS_BEHIND: u64 = 4;
/// Blocks entering and leaving the window in one sliding shift.
pub const GROW_SHRINK_CHUNK_BLOCKS: u64 = 4;

/// The lines a scroll step makes available, and which of them to show.
#[derive(Debug)]
pub struct VisibleSlice<'window> {
    /// Every line currently materialized.
    pub lines: &'window [String],
    /// The index into `lines` of the first visible row.
    pub start: usize,
    /// The index into `lines` one past the last visible row.
    pub end: usize,
}

/// A bounded window of decoded dump lines over a block source.
///
/// Invariants: the window always covers the contiguous block range
/// `[start_block, end_block)` within the device, `lines` holds exactly the
/// decoded lines of that range (the final block of the device may decode
/// short), and `current_line` equals the first line of `start_block` plus
/// `offset_in_window`.
pub struct LineWindow {
    /// The block layout shared with the source.
    geometry: Geometry,
    /// The number of blocks the source covers.
    total_blocks: u64,
    /// The first materialized block.
    start_block: BlockIndex,
    /// One past the last materialized block.
    end_block: BlockIndex,
    /// The decoded lines of `[start_block, end_block)`.
    lines: Vec<String>,
    /// The global position of the top visible line.
    current_line: LineIndex,
    /// The position of the top visible line within `lines`.
    offset_in_window: usize,
}

impl LineWindow {
    /// Creates an empty window over the source's block range.
    ///
    /// Nothing is fetched until the first [`seek_to`](LineWindow::seek_to).
    pub fn new<S: BlockSource>(source: &S) -> LineWindow {
        LineWindow {
            geometry: source.geometry(),
            total_blocks: source.total_blocks(),
            start_block: BlockIndex::ZERO,
            end_block: BlockIndex::ZERO,
            lines: Vec::new(),
            current_line: LineIndex::ZERO,
            offset_in_window: 0,
        }
    }

    /// The global position of the top visible line.
    pub fn current_line(&self) -> LineIndex {
        self.current_line
    }

    /// The first materialized block.
    pub fn start_block(&self) -> BlockIndex {
        self.start_block
    }

    /// One past the last materialized block.
    pub fn end_block(&self) -> BlockIndex {
        self.end_block
    }

    /// The block layout the window was created with.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Discards the window and reseeds it around `target`.
    ///
    /// The new window reaches [`PREFETCH_BLOCKS_AHEAD`] blocks past the
    /// target and, away from the device start, keeps
    /// [`PREFETCH_BLOCKS_BEHIND`] blocks before it so that an immediate
    /// scroll in either direction is served from memory.
    pub fn seek_to<S: BlockSource>(
        &mut self,
        source: &mut S,
        target: BlockIndex,
    ) -> Result<(), SeekError<S::Error>> {
        if target.as_u64() >= self.total_blocks {
            return Err(SeekError::TargetOutOfRange(target));
        }

        let mut block_count = cmp::min(PREFETCH_BLOCKS_AHEAD, self.total_blocks - target.as_u64());
        let start = if target.as_u64() > 0 {
            let start = target.saturating_sub(PREFETCH_BLOCKS_BEHIND);
            block_count += target - start;
            start
        } else {
            target
        };

        self.lines = self
            .fetch(source, start, block_count)
            .map_err(SeekError::Source)?;
        self.start_block = start;
        self.end_block = start + block_count;
        self.current_line = self.geometry.first_line(target);
        self.offset_in_window = ((target - start) * self.geometry.lines_per_block()) as usize;

        debug!(
            block = target.as_u64(),
            start = start.as_u64(),
            blocks = block_count,
            "window reseeded"
        );

        Ok(())
    }

    /// Moves the viewport by `delta` lines and returns the slice to render.
    ///
    /// A `delta` of zero re-renders the current position. When the requested
    /// position leaves the materialized range, the window slides one chunk in
    /// the direction of travel first. Steps that would leave the device at
    /// either end are absorbed: the cursor stays where it is.
    pub fn scroll<S: BlockSource>(
        &mut self,
        source: &mut S,
        delta: i64,
    ) -> Result<VisibleSlice<'_>, S::Error> {
        if self.total_blocks == 0 {
            return Ok(VisibleSlice {
                lines: &self.lines,
                start: 0,
                end: 0,
            });
        }

        if !self.contains_target(delta) {
            if delta > 0 {
                self.shift_forward(source)?;
            } else {
                self.shift_backward(source)?;
            }
        }

        let last = self.last_line();
        let delta = match self.current_line.checked_add_signed(delta) {
            Some(line) if line <= last => delta,
            _ => 0,
        };

        let target_line_pos = cmp::max(self.offset_in_window as i64 + delta, 0) as usize;
        let current = self
            .current_line
            .checked_add_signed(delta)
            .expect("delta is zero whenever the step would leave the device");

        let visible = cmp::min(self.geometry.lines_per_block(), (last - current) + 1) as usize;

        self.offset_in_window = target_line_pos;
        self.current_line = current;

        Ok(VisibleSlice {
            lines: &self.lines,
            start: target_line_pos,
            end: target_line_pos + visible,
        })
    }

    /// Determines if the viewport moved by `delta` still fits the
    /// materialized range, with room to spare at the far end.
    fn contains_target(&self, delta: i64) -> bool {
        let lines_per_block = self.geometry.lines_per_block() as i64;
        let current = self.current_line.as_u64() as i64;

        let target_start = cmp::max(current + delta, 0);
        let target_end = cmp::min(
            current + delta + lines_per_block,
            self.last_line().as_u64() as i64,
        );

        let window_start = self.geometry.first_line(self.start_block).as_u64() as i64;
        let window_end = self.geometry.first_line(self.end_block).as_u64() as i64;

        target_start >= window_start && target_start < window_end && target_end < window_end
    }

    /// Slides the window one chunk towards the device end.
    fn shift_forward<S: BlockSource>(&mut self, source: &mut S) -> Result<(), S::Error> {
        let fetched = cmp::min(
            GROW_SHRINK_CHUNK_BLOCKS,
            self.total_blocks - self.end_block.as_u64(),
        );
        if fetched == 0 {
            // Already abutting the device end; there is nothing to slide in.
            return Ok(());
        }

        let mut appended = self.fetch(source, self.end_block, fetched)?;
        self.lines.append(&mut appended);
        self.end_block = self.end_block + fetched;

        // One chunk in, one chunk out. The cursor arithmetic scales with the
        // blocks actually fetched, which shrinks at the device tail.
        let dropped_lines = (fetched * self.geometry.lines_per_block()) as usize;
        self.lines.drain(..dropped_lines);
        self.start_block = self.start_block + fetched;
        self.offset_in_window = self
            .offset_in_window
            .checked_sub(dropped_lines)
            .expect("the cursor cannot sit inside the blocks a forward shift drops");

        debug!(
            start = self.start_block.as_u64(),
            end = self.end_block.as_u64(),
            blocks = fetched,
            "window shifted forward"
        );

        Ok(())
    }

    /// Slides the window one chunk towards the device start.
    fn shift_backward<S: BlockSource>(&mut self, source: &mut S) -> Result<(), S::Error> {
        let fetch_start = self.start_block.saturating_sub(GROW_SHRINK_CHUNK_BLOCKS);
        let fetched = self.start_block - fetch_start;
        if fetched == 0 {
            // Already abutting the device start.
            return Ok(());
        }

        let mut prepended = self.fetch(source, fetch_start, fetched)?;
        prepended.append(&mut self.lines);
        self.lines = prepended;
        self.start_block = fetch_start;

        // Trim the same number of blocks off the back. Truncating to the
        // block-exact length also discards a short device tail cleanly.
        self.end_block = self.end_block - fetched;
        let kept_lines = ((self.end_block - self.start_block) * self.geometry.lines_per_block()) as usize;
        self.lines.truncate(kept_lines);
        self.offset_in_window += (fetched * self.geometry.lines_per_block()) as usize;

        debug!(
            start = self.start_block.as_u64(),
            end = self.end_block.as_u64(),
            blocks = fetched,
            "window shifted backward"
        );

        Ok(())
    }

    /// Reads and decodes `count` blocks starting at `first`.
    fn fetch<S: BlockSource>(
        &self,
        source: &mut S,
        first: BlockIndex,
        count: u64,
    ) -> Result<Vec<String>, S::Error> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; count as usize * self.geometry.block_len()];
        let bytes = source.read_blocks(first, &mut buf)?;

        debug!(
            first = first.as_u64(),
            blocks = count,
            bytes = bytes.len(),
            "blocks fetched"
        );

        Ok(codec::encode(bytes, first, self.geometry))
    }

    /// The global index of the last line of the device.
    fn last_line(&self) -> LineIndex {
        LineIndex::from(self.total_blocks * self.geometry.lines_per_block() - 1)
    }
}

impl fmt::Debug for LineWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LineWindow(blocks: [{}, {}), line: {} (+{} in window))",
            self.start_block.as_u64(),
            self.end_block.as_u64(),
            self.current_line.as_u64(),
            self.offset_in_window,
        )
    }
}

/// An error reseeding the window around a jump target.
#[derive(Debug)]
pub enum SeekError<SourceErr> {
    /// The requested block lies at or past the end of the device.
    TargetOutOfRange(BlockIndex),
    /// The block source failed.
    Source(SourceErr),
}

impl<SourceErr: fmt::Display> fmt::Display for SeekError<SourceErr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekError::TargetOutOfRange(target) => {
                write!(f, "block {} is past the end of the device", target.as_u64())
            }
            SeekError::Source(err) => err.fmt(f),
        }
    }
}

impl<SourceErr: fmt::Debug + fmt::Display> std::error::Error for SeekError<SourceErr> {}

#[cfg(test)]
mod tests {
    use crate::data::SliceBlocks;

    use super::*;

    fn device_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn offset_of(line: &str) -> u64 {
        u64::from_str_radix(&line[..16], 16).expect("lines must start with a hex offset")
    }

    /// Checks the containment invariant between the cursor and the window.
    fn assert_contained(window: &LineWindow) {
        let geometry = window.geometry();
        let window_start = geometry.first_line(window.start_block()).as_u64();
        let window_end = geometry.first_line(window.end_block()).as_u64();
        let current = window.current_line().as_u64();

        assert!(window_start <= current, "cursor above the window");
        assert!(current <= window_end - 1, "cursor below the window");
    }

    #[test]
    fn seek_to_zero_prefetches_ahead_only() {
        let bytes = device_bytes(20 * 512);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);

        window.seek_to(&mut source, BlockIndex::ZERO).unwrap();

        assert_eq!(window.start_block(), BlockIndex::ZERO);
        assert_eq!(window.end_block(), BlockIndex::from(12));
        assert_eq!(window.current_line(), LineIndex::ZERO);
        assert_eq!(window.lines.len(), 12 * 32);
    }

    #[test]
    fn single_block_device_is_fully_materialized() {
        let bytes = vec![0x41u8; 512];
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);

        window.seek_to(&mut source, BlockIndex::ZERO).unwrap();
        assert_eq!(window.end_block(), BlockIndex::from(1));
        assert_eq!(window.lines.len(), 32);

        let slice = window.scroll(&mut source, 0).unwrap();
        assert_eq!((slice.start, slice.end), (0, 32));
        assert_eq!(
            slice.lines[0],
            format!("0000000000000000{} {}", " 41".repeat(16), "A".repeat(16)),
        );
    }

    #[test]
    fn seek_keeps_blocks_behind_the_target() {
        let bytes = device_bytes(20 * 512);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);

        window.seek_to(&mut source, BlockIndex::from(10)).unwrap();

        assert_eq!(window.start_block(), BlockIndex::from(6));
        assert_eq!(window.end_block(), BlockIndex::from(20));
        assert_eq!(window.current_line(), LineIndex::from(320));
        assert_eq!(window.offset_in_window, 128);
    }

    #[test]
    fn seek_past_the_end_fails() {
        let bytes = device_bytes(20 * 512);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);

        assert!(matches!(
            window.seek_to(&mut source, BlockIndex::from(20)),
            Err(SeekError::TargetOutOfRange(_)),
        ));
        assert!(window.seek_to(&mut source, BlockIndex::from(19)).is_ok());
    }

    #[test]
    fn scroll_zero_changes_nothing() {
        let bytes = device_bytes(20 * 512);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);
        window.seek_to(&mut source, BlockIndex::from(10)).unwrap();

        let first = {
            let slice = window.scroll(&mut source, 0).unwrap();
            (slice.start, slice.end)
        };
        for _ in 0..3 {
            let slice = window.scroll(&mut source, 0).unwrap();
            assert_eq!((slice.start, slice.end), first);
            assert_eq!(window.current_line(), LineIndex::from(320));
            assert_eq!(window.start_block(), BlockIndex::from(6));
            assert_eq!(window.end_block(), BlockIndex::from(20));
        }
    }

    #[test]
    fn scroll_up_at_the_top_is_absorbed() {
        let bytes = device_bytes(20 * 512);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);
        window.seek_to(&mut source, BlockIndex::ZERO).unwrap();

        let slice = window.scroll(&mut source, -1).unwrap();
        assert_eq!(slice.start, 0);
        assert_eq!(window.current_line(), LineIndex::ZERO);
    }

    #[test]
    fn first_visible_line_tracks_the_jump_target() {
        let bytes = device_bytes(20 * 512);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);

        for target in [0u64, 7, 19] {
            window
                .seek_to(&mut source, BlockIndex::from(target))
                .unwrap();
            let slice = window.scroll(&mut source, 0).unwrap();
            assert_eq!(offset_of(&slice.lines[slice.start]), target * 512);
        }
    }

    #[test]
    fn fifty_steps_down_from_the_middle() {
        let bytes = device_bytes(20 * 512);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);
        window.seek_to(&mut source, BlockIndex::from(10)).unwrap();

        for _ in 0..50 {
            let slice = window.scroll(&mut source, 1).unwrap();
            assert!(slice.end <= slice.lines.len());
            assert_contained(&window);
        }

        assert_eq!(window.current_line(), LineIndex::from(10 * 32 + 50));
    }

    #[test]
    fn forward_shifts_move_whole_chunks() {
        // 64-byte blocks decode to 4 lines each, so shifts come up quickly.
        let geometry = Geometry::new(64);
        let bytes = device_bytes(40 * 64);
        let mut source = SliceBlocks::new(&bytes, geometry);
        let mut window = LineWindow::new(&source);
        window.seek_to(&mut source, BlockIndex::from(10)).unwrap();

        assert_eq!(window.start_block(), BlockIndex::from(6));
        assert_eq!(window.end_block(), BlockIndex::from(22));

        for _ in 0..50 {
            window.scroll(&mut source, 1).unwrap();
            assert_contained(&window);
            assert_eq!(window.end_block() - window.start_block(), 16);
        }

        assert_eq!(window.current_line(), LineIndex::from(10 * 4 + 50));
        let advanced = window.start_block() - BlockIndex::from(6);
        assert!(advanced > 0, "the window never slid forward");
        assert_eq!(advanced % 4, 0, "the window slid by partial chunks");
    }

    #[test]
    fn backward_shifts_move_whole_chunks() {
        let geometry = Geometry::new(64);
        let bytes = device_bytes(40 * 64);
        let mut source = SliceBlocks::new(&bytes, geometry);
        let mut window = LineWindow::new(&source);
        window.seek_to(&mut source, BlockIndex::from(30)).unwrap();

        assert_eq!(window.start_block(), BlockIndex::from(26));
        assert_eq!(window.end_block(), BlockIndex::from(40));

        for _ in 0..30 {
            window.scroll(&mut source, -1).unwrap();
            assert_contained(&window);
        }

        assert_eq!(window.current_line(), LineIndex::from(30 * 4 - 30));
        let retreated = BlockIndex::from(26) - window.start_block();
        assert!(retreated > 0, "the window never slid backward");
        assert_eq!(retreated % 4, 0, "the window slid by partial chunks");
    }

    #[test]
    fn mixed_scrolling_preserves_containment() {
        let geometry = Geometry::new(64);
        let bytes = device_bytes(40 * 64);
        let mut source = SliceBlocks::new(&bytes, geometry);
        let mut window = LineWindow::new(&source);
        window.seek_to(&mut source, BlockIndex::from(20)).unwrap();

        // Each pass drifts two lines towards the start, so the walk crosses
        // several chunk boundaries in both directions along the way.
        let steps = [1i64, -1, -1, 1, -1, -1, 1, -1];
        for _ in 0..20 {
            for delta in steps {
                window.scroll(&mut source, delta).unwrap();
                assert_contained(&window);
            }
        }
        assert_eq!(window.current_line(), LineIndex::from(20 * 4 - 40));
    }

    #[test]
    fn short_tail_never_reads_out_of_range() {
        // 19 full blocks plus 40 bytes: the device rounds up to 20 blocks,
        // but the final block only decodes to 3 lines.
        let bytes = device_bytes(19 * 512 + 40);
        let mut source = SliceBlocks::new(&bytes, Geometry::default());
        let mut window = LineWindow::new(&source);
        window.seek_to(&mut source, BlockIndex::from(19)).unwrap();

        assert_eq!(window.lines.len(), 4 * 32 + 3);

        for _ in 0..40 {
            window.scroll(&mut source, 1).unwrap();
            assert!(window.current_line().as_u64() <= 639);
        }
        assert_eq!(window.end_block(), BlockIndex::from(20));

        // Climb back up; the backward shift trims the short tail to a
        // block-exact window again.
        for _ in 0..160 {
            window.scroll(&mut source, -1).unwrap();
            assert_contained(&window);
        }
        let expected = (window.end_block() - window.start_block())
            * window.geometry().lines_per_block();
        assert_eq!(window.lines.len() as u64, expected);
    }
}
