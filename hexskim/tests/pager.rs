//! Drives the whole pager loop with scripted keys against an in-memory
//! block source.

use std::io;

use hexskim::app;
use hexskim::data::SliceBlocks;
use hexskim::nav::Key;
use hexskim::tui::Screen;
use hexskim_common::Geometry;

/// A screen that records the offset of the first visible line of every
/// frame, plus every prompt drawn.
#[derive(Default)]
struct RecordingScreen {
    frames: Vec<u64>,
    prompts: Vec<String>,
}

impl Screen for RecordingScreen {
    fn render(&mut self, lines: &[String], start: usize, _end: usize) -> io::Result<()> {
        let offset = u64::from_str_radix(&lines[start][..16], 16)
            .expect("lines must start with a hex offset");
        self.frames.push(offset);
        Ok(())
    }

    fn show_prompt(&mut self, _row: u16, _col: u16, text: &str) -> io::Result<()> {
        self.prompts.push(text.to_owned());
        Ok(())
    }
}

fn run_script(bytes: &[u8], keys: &[Key]) -> RecordingScreen {
    let mut source = SliceBlocks::new(bytes, Geometry::default());
    let mut screen = RecordingScreen::default();
    let mut keys = keys.iter().copied();

    app::run(&mut source, &mut screen, || {
        Some(keys.next().expect("the script must end by quitting"))
    })
    .unwrap();

    screen
}

#[test]
fn scrolls_jumps_and_quits() {
    let bytes: Vec<u8> = (0..100usize * 512).map(|i| (i % 256) as u8).collect();

    let screen = run_script(
        &bytes,
        &[
            Key::Down,
            Key::Down,
            Key::Down,
            Key::Char('g'),
            Key::Char('3'),
            Key::Char('2'),
            Key::Enter,
            Key::Down,
            Key::Char('h'),
            Key::Char('1'),
            Key::Char('f'),
            Key::Enter,
            Key::Up,
            Key::Char('q'),
        ],
    );

    // The initial frame, three scrolls, the decimal jump to block 32, one
    // scroll, the hex jump to block 0x1f, one scroll back up.
    assert_eq!(
        screen.frames,
        vec![
            0,
            16,
            32,
            48,
            32 * 512,
            32 * 512 + 16,
            31 * 512,
            31 * 512 - 16,
        ],
    );
    assert_eq!(
        screen.prompts,
        vec!["goto: ", "goto: 3", "goto: 32", "goto: ", "goto: 1", "goto: 1f"],
    );
}

#[test]
fn over_scrolling_both_ends_stays_in_range() {
    let bytes = vec![0u8; 30 * 512];

    let mut keys = vec![Key::Down; 400];
    keys.extend(vec![Key::Up; 500]);
    keys.push(Key::Char('q'));

    let screen = run_script(&bytes, &keys);

    // 400 steps down from line 0 of a 960-line device, then more steps up
    // than down: the viewport is back at the top and never left the device.
    assert_eq!(screen.frames.last(), Some(&0));
    assert_eq!(screen.frames.len(), 901);
}

#[test]
fn a_discarded_jump_redraws_the_same_frame() {
    let bytes = vec![0u8; 10 * 512];

    let screen = run_script(
        &bytes,
        &[
            Key::Char('g'),
            Key::Enter,
            Key::Char('g'),
            Key::Char('9'),
            Key::Char('9'),
            Key::Enter,
            Key::Char('q'),
        ],
    );

    // The empty entry and the out-of-range block 99 both leave the viewport
    // at the top; each Enter still repaints to wipe the prompt.
    assert_eq!(screen.frames, vec![0, 0, 0]);
}

#[test]
fn an_empty_source_quits_cleanly() {
    let mut source = SliceBlocks::new(&[], Geometry::default());
    let mut screen = RecordingScreen::default();

    app::run(&mut source, &mut screen, || {
        unreachable!("an empty source reads no input")
    })
    .unwrap();

    assert!(screen.frames.is_empty());
}
