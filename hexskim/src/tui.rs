//! The crossterm-backed screen and key input adapters.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::{self, MoveTo},
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use tracing::warn;

use crate::nav::Key;

/// Where formatted dump lines and the prompt get drawn.
pub trait Screen {
    /// Draws rows `start..end` of `lines` into the viewport, clearing
    /// whatever was shown before.
    fn render(&mut self, lines: &[String], start: usize, end: usize) -> io::Result<()>;

    /// Draws a short status text at a fixed position.
    fn show_prompt(&mut self, row: u16, col: u16, text: &str) -> io::Result<()>;
}

/// Terminal rows not available to dump lines (the border).
const CHROME_ROWS: u16 = 2;

/// A bordered viewport drawn with queued crossterm commands.
///
/// Every frame is queued into the writer and flushed once at the end.
pub struct TerminalScreen<W: Write> {
    /// Where the commands go; a buffered stdout in the binary.
    out: W,
    /// The terminal width in columns.
    cols: u16,
    /// The terminal height in rows.
    rows: u16,
}

impl<W: Write> TerminalScreen<W> {
    /// Creates a screen for a terminal of the given `(cols, rows)` size.
    pub fn new(out: W, (cols, rows): (u16, u16)) -> TerminalScreen<W> {
        TerminalScreen { out, cols, rows }
    }

    /// The number of dump lines that fit the terminal.
    pub fn viewport_rows(&self) -> usize {
        self.rows.saturating_sub(CHROME_ROWS) as usize
    }

    /// Draws the box around the dump area.
    fn draw_border(&mut self) -> io::Result<()> {
        let inner = self.cols.saturating_sub(2) as usize;
        let top = format!("┌{}┐", "─".repeat(inner));
        let bottom = format!("└{}┘", "─".repeat(inner));

        queue!(self.out, MoveTo(0, 0), Print(top))?;
        for row in 1..self.rows.saturating_sub(1) {
            queue!(self.out, MoveTo(0, row), Print("│"))?;
            queue!(self.out, MoveTo(self.cols.saturating_sub(1), row), Print("│"))?;
        }
        queue!(
            self.out,
            MoveTo(0, self.rows.saturating_sub(1)),
            Print(bottom)
        )?;

        Ok(())
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn render(&mut self, lines: &[String], start: usize, end: usize) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        self.draw_border()?;

        let count = std::cmp::min(end.saturating_sub(start), self.viewport_rows());
        let end = start + count;

        // Never index past the lines that actually exist: a window shorter
        // than the requested slice draws an empty frame instead.
        if end <= lines.len() {
            let width = self.cols.saturating_sub(2) as usize;
            for (row, line) in lines[start..end].iter().enumerate() {
                let line = &line[..std::cmp::min(line.len(), width)];
                queue!(self.out, MoveTo(1, row as u16 + 1), Print(line))?;
            }
        }

        self.out.flush()
    }

    fn show_prompt(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        queue!(self.out, MoveTo(col, row), Print(text))?;
        self.out.flush()
    }
}

/// Puts the terminal into raw alternate-screen mode for the pager's
/// lifetime.
///
/// Restoration runs in `Drop`, exactly once on every exit path, so a failed
/// run still leaves the operator with a usable terminal before the error is
/// printed.
pub struct TerminalGuard(());

impl TerminalGuard {
    /// Enters raw mode and the alternate screen.
    pub fn enter() -> io::Result<TerminalGuard> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(TerminalGuard(()))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Waits up to `timeout` for a key press.
///
/// Returns `None` when no key arrived in time, and also on read failures: a
/// transient input hiccup is treated as "no key this tick", not an error.
pub fn next_key(timeout: Duration) -> Option<Key> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(err) => {
            warn!(%err, "polling input failed");
            return None;
        }
    }

    let event = match event::read() {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "reading input failed");
            return None;
        }
    };

    let Event::Key(key) = event else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}
