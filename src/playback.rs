//! Timed playback of rendered frames.
//!
//! A fixed-cadence emitter: frames are written strictly in sequence
//! order and the driver sleeps the nominal frame interval after each
//! one. No frame is skipped or reordered to catch up with real time,
//! and nothing loops after the last frame.

use anyhow::Result;
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Move the cursor to the origin, leaving the previous frame in place.
pub const CURSOR_HOME: &str = "\x1b[H";
/// Move the cursor to the origin and clear the screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";
/// Reset all colors and attributes.
pub const RESET: &str = "\x1b[0m";

/// Nominal delay between two frames at `frame_rate` frames per second,
/// rounded to whole milliseconds.
pub fn frame_interval(frame_rate: f64) -> Duration {
    Duration::from_millis((1000.0 / frame_rate).round() as u64)
}

/// Play rendered frames in order at a fixed cadence.
///
/// Serves both playback modes: preload passes the converted vector,
/// streaming passes an iterator that decodes and renders on the fly.
/// Each frame overwrites the previous one in place unless
/// `clear_screen` asks for a full clear. Returns the number of frames
/// written.
pub fn play<W, I>(out: &mut W, frames: I, frame_rate: f64, clear_screen: bool) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    let interval = frame_interval(frame_rate);
    let mut shown = 0usize;
    for frame in frames {
        if clear_screen {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        } else {
            out.write_all(CURSOR_HOME.as_bytes())?;
        }
        out.write_all(frame.as_bytes())?;
        out.flush()?;
        shown += 1;
        thread::sleep(interval);
    }
    Ok(shown)
}
