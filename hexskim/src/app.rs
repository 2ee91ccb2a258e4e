//! The single-threaded control loop gluing input, navigation, and drawing.

use tracing::warn;

use hexskim_common::BlockIndex;

use crate::data::BlockSource;
use crate::nav::{Key, NavError, Navigator};
use crate::tui::Screen;
use crate::window::{LineWindow, SeekError};

/// Runs the pager until the operator quits.
///
/// One key is read and handled to completion per iteration, including any
/// block fetch and redraw it triggers, so the window state is only ever
/// touched from this loop. `next_key` returning `None` means "no key this
/// tick" and simply polls again.
pub fn run<S, V, K>(
    source: &mut S,
    screen: &mut V,
    mut next_key: K,
) -> Result<(), NavError<S::Error>>
where
    S: BlockSource,
    V: Screen,
    K: FnMut() -> Option<Key>,
{
    let mut window = LineWindow::new(source);
    let mut nav = Navigator::new();

    match window.seek_to(source, BlockIndex::ZERO) {
        Ok(()) => {}
        Err(SeekError::TargetOutOfRange(_)) => {
            // A zero-block source has nothing to page through.
            warn!("the source has no blocks to show");
            return Ok(());
        }
        Err(SeekError::Source(err)) => return Err(NavError::Source(err)),
    }
    nav.refresh(&mut window, source, screen)?;

    while !nav.is_terminated() {
        if let Some(key) = next_key() {
            nav.handle_key(key, &mut window, source, screen)?;
        }
    }

    Ok(())
}
