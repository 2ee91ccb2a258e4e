//! Implements the backbone functionality of the hexskim pager.

#![forbid(unsafe_code)]

use std::time::Duration;

/// The idling time in case no user input is present.
pub const IDLE_TIME: Duration = Duration::from_millis(100);

pub mod app;
pub mod codec;
pub mod data;
pub mod nav;
pub mod tui;
pub mod window;
