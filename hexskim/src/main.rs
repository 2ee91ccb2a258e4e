//! The hexskim binary: argument parsing, device discovery, and the terminal
//! lifecycle around the pager loop.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hexskim::data::DeviceBlocks;
use hexskim::tui::{self, TerminalGuard, TerminalScreen};
use hexskim::{IDLE_TIME, app};
use hexskim_common::{Device, Geometry};

/// The stdout buffer size; every frame is queued here before one flush.
const STDOUT_BUF: usize = 8192;

/// hexskim - page through a block device or file as a hex dump
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Config {
    /// The device or file to inspect
    path: PathBuf,
    /// The device size in bytes, for devices that do not report one
    size: Option<u64>,
}

fn main() -> ExitCode {
    init_tracing();

    let config = Config::parse();
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The terminal guard has already restored the screen by the time
            // this prints.
            eprintln!("hexskim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let device = Device::open(&config.path, config.size)?;
    tracing::info!(?device, "input opened");

    let mut source = DeviceBlocks::new(device, Geometry::default());

    let stdout = io::stdout();
    let out = BufWriter::with_capacity(STDOUT_BUF, stdout.lock());

    let _guard = TerminalGuard::enter()?;
    let mut screen = TerminalScreen::new(out, crossterm::terminal::size()?);

    app::run(&mut source, &mut screen, || tui::next_key(IDLE_TIME))?;

    Ok(())
}

fn init_tracing() {
    // RUST_LOG=hexskim=debug with stderr redirected to a file keeps the
    // alternate screen usable while debugging.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
