//! # vascii - Terminal ASCII Video Player Library
//!
//! `vascii` converts video frames into true-color ASCII art and plays
//! them back in a terminal at the source frame rate.
//!
//! ## Features
//!
//! - 24-bit ANSI color output, one colored glyph per pixel
//! - Streaming playback: decode, convert and display one frame at a time
//! - Preload mode: buffer every frame, then convert in parallel across
//!   all CPU cores before playback starts
//! - Configurable character ramp, target width and vertical compression
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use vascii::decode::VideoSource;
//! use vascii::{playback, render_frame, ConversionOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = ConversionOptions::default().with_columns(120);
//! let source = VideoSource::open(Path::new("input.mp4"), &options)?;
//! let frame_rate = source.params().frame_rate;
//!
//! let ramp = options.ascii_chars.as_bytes();
//! let frames = source.frames()?.map(|frame| render_frame(&frame, ramp));
//! playback::play(&mut std::io::stdout().lock(), frames, frame_rate, false)?;
//! # Ok(())
//! # }
//! ```

use anyhow::{anyhow, Context, Result};
use image::{Rgb, RgbImage};
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::ops::Range;
use std::path::Path;

pub mod decode;
pub mod playback;
pub mod progress;

use crate::progress::ProgressState;

fn default_ascii_chars() -> String {
    ".-:=+*%#@$".to_string()
}

fn default_columns() -> u32 {
    480
}

fn default_font_ratio() -> f32 {
    0.4
}

/// Application configuration loaded from `vascii.json`.
///
/// Every field is optional in the file; missing fields fall back to the
/// built-in defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Character ramp ordered from sparsest to densest visual weight
    #[serde(default = "default_ascii_chars")]
    pub ascii_chars: String,
    /// Target width in characters
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Vertical compression factor compensating for character cells
    /// being taller than they are wide
    #[serde(default = "default_font_ratio")]
    pub font_ratio: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ascii_chars: default_ascii_chars(),
            columns: default_columns(),
            font_ratio: default_font_ratio(),
        }
    }
}

impl AppConfig {
    /// Load and validate a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text).context("parsing config json")?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Reject configurations that would corrupt output or break scaling.
    pub fn validate(&self) -> Result<()> {
        if self.ascii_chars.is_empty() {
            return Err(anyhow!("ascii_chars must not be empty"));
        }
        if !self.ascii_chars.is_ascii() {
            return Err(anyhow!(
                "ascii_chars contains non-ASCII characters. \
                This will cause corrupted output. Please use only ASCII characters."
            ));
        }
        if self.columns == 0 {
            return Err(anyhow!("columns must be at least 1"));
        }
        if !(self.font_ratio > 0.0) {
            return Err(anyhow!("font_ratio must be positive"));
        }
        Ok(())
    }
}

/// Options for ASCII conversion
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Target width in characters (columns)
    pub columns: u32,
    /// Vertical compression factor applied to the scaled height
    pub font_ratio: f32,
    /// Character ramp to use (from sparsest to densest)
    pub ascii_chars: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            font_ratio: default_font_ratio(),
            ascii_chars: default_ascii_chars(),
        }
    }
}

impl ConversionOptions {
    /// Build options from a loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            columns: config.columns,
            font_ratio: config.font_ratio,
            ascii_chars: config.ascii_chars.clone(),
        }
    }

    /// Create options with a specific width
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    /// Create options with a specific vertical compression factor
    pub fn with_font_ratio(mut self, font_ratio: f32) -> Self {
        self.font_ratio = font_ratio;
        self
    }

    /// Create options with a custom character ramp
    pub fn with_ascii_chars(mut self, ascii_chars: String) -> Self {
        self.ascii_chars = ascii_chars;
        self
    }
}

/// Map a luminance value in `[0, 256)` to a character of the ramp.
///
/// The index `luma * ramp.len() / 256` is monotonic in `luma` and always
/// lands inside the ramp for valid luminance values.
pub fn glyph_for(luma: u32, ramp: &[u8]) -> char {
    ramp[luma as usize * ramp.len() / 256] as char
}

fn push_colored(out: &mut String, pixel: &Rgb<u8>, ramp: &[u8]) {
    let [r, g, b] = pixel.0;
    let luma = (r as u32 + g as u32 + b as u32) / 3;
    let _ = write!(out, "\x1b[38;2;{};{};{}m{}", r, g, b, glyph_for(luma, ramp));
}

/// Convert one decoded frame into a single multi-line colored string.
///
/// Visits every pixel in row-major order; each pixel becomes a
/// true-color escape prefix plus one ramp character, and every row ends
/// with a newline. Deterministic and side-effect free.
pub fn render_frame(frame: &RgbImage, ramp: &[u8]) -> String {
    let (width, height) = frame.dimensions();
    // ~20 bytes per colored glyph
    let mut out = String::with_capacity((width as usize * 20 + 1) * height as usize);
    for y in 0..height {
        for x in 0..width {
            push_colored(&mut out, frame.get_pixel(x, y), ramp);
        }
        out.push('\n');
    }
    out
}

/// Partition `[0, total)` into `workers` contiguous index ranges.
///
/// Every range except the last holds `total / workers` indices; the
/// last absorbs the remainder, so the ranges cover `[0, total)` exactly
/// once with no gaps or overlaps. A zero worker count is treated as
/// one. When `total < workers` the leading ranges are empty.
pub fn chunk_ranges(total: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_chunk = total / workers;
    (0..workers)
        .map(|i| {
            let start = i * per_chunk;
            let end = if i == workers - 1 {
                total
            } else {
                start + per_chunk
            };
            start..end
        })
        .collect()
}

/// Render a preloaded frame sequence in parallel.
///
/// One task per chunk runs the frame renderer over its index range and
/// writes into the matching slots of the output vector, so the result
/// index always matches the source index no matter which task finishes
/// first. Each task reports to `progress` after every frame. Blocks
/// until every chunk is done.
pub fn convert_frames(
    frames: &[RgbImage],
    ramp: &[u8],
    workers: usize,
    progress: &ProgressState,
) -> Vec<String> {
    let mut rendered = vec![String::new(); frames.len()];
    rayon::scope(|s| {
        let mut tail: &mut [String] = &mut rendered;
        for range in chunk_ranges(frames.len(), workers) {
            let (out_chunk, rest) = std::mem::take(&mut tail).split_at_mut(range.len());
            tail = rest;
            let chunk_frames = &frames[range];
            s.spawn(move |_| {
                for (slot, frame) in out_chunk.iter_mut().zip(chunk_frames) {
                    *slot = render_frame(frame, ramp);
                    progress.record_frame();
                }
            });
        }
    });
    rendered
}
