//! Interprets key presses into scrolls, jumps, and mode changes.

use std::{fmt, io};

use tracing::debug;

use hexskim_common::BlockIndex;

use crate::data::BlockSource;
use crate::tui::Screen;
use crate::window::{LineWindow, SeekError};

/// The label of the jump prompt.
pub const GOTO_LABEL: &str = "goto: ";
/// The row the jump prompt is drawn on.
pub const GOTO_ROW: u16 = 0;
/// The column the jump prompt starts at.
pub const GOTO_COL: u16 = 1;

/// A key press, reduced to what the pager reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Backspace,
    Esc,
    Char(char),
}

/// The input modes of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys scroll the viewport.
    #[default]
    Normal,
    /// Keys accumulate a decimal block number to jump to.
    GotoDecimal,
    /// Keys accumulate a hexadecimal block number to jump to.
    GotoHex,
    /// The operator asked to quit.
    Terminated,
}

impl Mode {
    /// The numeric base a goto mode parses in.
    fn radix(self) -> Option<u32> {
        match self {
            Mode::GotoDecimal => Some(10),
            Mode::GotoHex => Some(16),
            Mode::Normal | Mode::Terminated => None,
        }
    }
}

/// The key-driven state machine sitting between the input source and the
/// line window.
#[derive(Debug, Default)]
pub struct Navigator {
    /// The active input mode.
    mode: Mode,
    /// The digits typed so far in a goto mode.
    pending: String,
}

impl Navigator {
    /// Creates a navigator in [`Mode::Normal`].
    pub fn new() -> Navigator {
        Navigator::default()
    }

    /// The active input mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Determines if the operator asked to quit.
    pub fn is_terminated(&self) -> bool {
        self.mode == Mode::Terminated
    }

    /// Repaints the viewport without moving it.
    pub fn refresh<S: BlockSource, V: Screen>(
        &mut self,
        window: &mut LineWindow,
        source: &mut S,
        screen: &mut V,
    ) -> Result<(), NavError<S::Error>> {
        self.scroll_by(window, source, screen, 0)
    }

    /// Reacts to one key press to completion, including any block fetch and
    /// redraw it implies.
    pub fn handle_key<S: BlockSource, V: Screen>(
        &mut self,
        key: Key,
        window: &mut LineWindow,
        source: &mut S,
        screen: &mut V,
    ) -> Result<(), NavError<S::Error>> {
        if let Some(radix) = self.mode.radix() {
            return self.handle_goto_key(key, radix, window, source, screen);
        }

        if self.mode == Mode::Terminated {
            return Ok(());
        }

        match key {
            Key::Char('q') | Key::Esc => {
                self.mode = Mode::Terminated;
                Ok(())
            }
            Key::Char('g') => self
                .open_prompt(Mode::GotoDecimal, screen)
                .map_err(NavError::Screen),
            Key::Char('h') => self
                .open_prompt(Mode::GotoHex, screen)
                .map_err(NavError::Screen),
            Key::Up => self.scroll_by(window, source, screen, -1),
            Key::Down => self.scroll_by(window, source, screen, 1),
            _ => Ok(()),
        }
    }

    /// Reacts to a key press while a goto prompt is active.
    fn handle_goto_key<S: BlockSource, V: Screen>(
        &mut self,
        key: Key,
        radix: u32,
        window: &mut LineWindow,
        source: &mut S,
        screen: &mut V,
    ) -> Result<(), NavError<S::Error>> {
        match key {
            Key::Char(c) if c.is_digit(radix) => {
                self.pending.push(c);
                self.echo_prompt(screen).map_err(NavError::Screen)
            }
            Key::Backspace => {
                if self.pending.is_empty() {
                    return Ok(());
                }
                // Repaint the unchanged viewport to wipe the old echo, then
                // draw the shortened one.
                self.scroll_by(window, source, screen, 0)?;
                self.pending.pop();
                self.echo_prompt(screen).map_err(NavError::Screen)
            }
            Key::Enter => {
                let entry = u64::from_str_radix(&self.pending, radix);
                self.pending.clear();
                self.mode = Mode::Normal;

                match entry {
                    Ok(block) => match window.seek_to(source, BlockIndex::from(block)) {
                        Ok(()) => {}
                        Err(SeekError::TargetOutOfRange(target)) => {
                            debug!(block = target.as_u64(), "discarding out-of-range jump");
                        }
                        Err(SeekError::Source(err)) => return Err(NavError::Source(err)),
                    },
                    // An empty or malformed entry is discarded silently.
                    Err(_) => debug!("discarding unparseable jump entry"),
                }

                // Whether the jump landed or not, repaint: the viewport now
                // shows the target or is unchanged, and the prompt is gone.
                self.scroll_by(window, source, screen, 0)
            }
            _ => Ok(()),
        }
    }

    /// Enters a goto mode and draws the empty prompt.
    fn open_prompt<V: Screen>(&mut self, mode: Mode, screen: &mut V) -> io::Result<()> {
        self.mode = mode;
        self.pending.clear();
        screen.show_prompt(GOTO_ROW, GOTO_COL, GOTO_LABEL)
    }

    /// Redraws the prompt with the current entry behind the label.
    fn echo_prompt<V: Screen>(&self, screen: &mut V) -> io::Result<()> {
        let text = format!("{GOTO_LABEL}{}", self.pending);
        screen.show_prompt(GOTO_ROW, GOTO_COL, &text)
    }

    /// Scrolls the window and hands the visible slice to the screen.
    fn scroll_by<S: BlockSource, V: Screen>(
        &mut self,
        window: &mut LineWindow,
        source: &mut S,
        screen: &mut V,
        delta: i64,
    ) -> Result<(), NavError<S::Error>> {
        let slice = window.scroll(source, delta).map_err(NavError::Source)?;
        screen
            .render(slice.lines, slice.start, slice.end)
            .map_err(NavError::Screen)
    }
}

/// An error while reacting to a key press.
#[derive(Debug)]
pub enum NavError<SourceErr> {
    /// The block source failed.
    Source(SourceErr),
    /// Drawing to the terminal failed.
    Screen(io::Error),
}

impl<SourceErr: fmt::Display> fmt::Display for NavError<SourceErr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::Source(err) => err.fmt(f),
            NavError::Screen(err) => write!(f, "cannot draw to the terminal: {err}"),
        }
    }
}

impl<SourceErr: fmt::Debug + fmt::Display> std::error::Error for NavError<SourceErr> {}
