//! Video source handling backed by an ffmpeg process.
//!
//! Parameter probing shells out to ffprobe; frame decoding and resizing
//! are delegated to ffmpeg via `ffmpeg-sidecar`, which yields raw RGB24
//! frames already scaled to the target dimensions.

use anyhow::{anyhow, Context, Result};
use ffmpeg_sidecar::command::FfmpegCommand;
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::process::Command as ProcCommand;

use crate::ConversionOptions;

/// Video parameters probed once at startup, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoParams {
    /// Nominal frame rate in frames per second
    pub frame_rate: f64,
    /// Source width in pixels
    pub source_width: u32,
    /// Source height in pixels
    pub source_height: u32,
    /// Target width in characters
    pub width: u32,
    /// Target height in rows
    pub height: u32,
    /// Total frame count (0 when the container does not report one)
    pub frame_count: u64,
}

/// Raw stream parameters as reported by ffprobe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedStream {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub frame_count: u64,
}

/// An opened video file plus its resolved playback parameters.
pub struct VideoSource {
    path: PathBuf,
    params: VideoParams,
}

impl VideoSource {
    /// Probe `path` and resolve the target dimensions.
    ///
    /// Fails when the file cannot be probed (missing, unsupported codec,
    /// corrupt) or reports no usable video stream.
    pub fn open(path: &Path, options: &ConversionOptions) -> Result<Self> {
        let probed = probe_video(path)?;
        if probed.width == 0 || probed.height == 0 {
            return Err(anyhow!(
                "{} reports a zero-sized video stream",
                path.display()
            ));
        }
        if probed.frame_rate <= 0.0 {
            return Err(anyhow!("{} reports no usable frame rate", path.display()));
        }
        let (width, height) = target_dimensions(
            probed.width,
            probed.height,
            options.columns,
            options.font_ratio,
        );
        Ok(Self {
            path: path.to_path_buf(),
            params: VideoParams {
                frame_rate: probed.frame_rate,
                source_width: probed.width,
                source_height: probed.height,
                width,
                height,
                frame_count: probed.frame_count,
            },
        })
    }

    /// Resolved playback parameters.
    pub fn params(&self) -> &VideoParams {
        &self.params
    }

    /// Stream decoded frames scaled to the target dimensions.
    ///
    /// The iterator ends when the decoder is exhausted; exhaustion is
    /// the natural end of the stream, not an error.
    pub fn frames(&self) -> Result<impl Iterator<Item = RgbImage>> {
        let scale = format!("scale={}:{}", self.params.width, self.params.height);
        let iter = FfmpegCommand::new()
            .input(self.path.to_string_lossy())
            .args(["-vf", scale.as_str()])
            .rawvideo()
            .spawn()
            .with_context(|| format!("spawning ffmpeg for {}", self.path.display()))?
            .iter()
            .context("reading ffmpeg output")?
            .filter_frames()
            .filter_map(|frame| RgbImage::from_raw(frame.width, frame.height, frame.data));
        Ok(iter)
    }
}

/// Make sure the ffmpeg binary is available, downloading it on first use.
pub fn ensure_ffmpeg() -> Result<()> {
    let path = ffmpeg_sidecar::paths::ffmpeg_path();
    if !path.exists() {
        ffmpeg_sidecar::download::auto_download()
            .context("failed to auto-download ffmpeg sidecar binary")?;
    }
    Ok(())
}

fn ffprobe_command() -> ProcCommand {
    let sidecar = ffmpeg_sidecar::ffprobe::ffprobe_path();
    if sidecar.exists() {
        ProcCommand::new(sidecar)
    } else {
        ProcCommand::new("ffprobe")
    }
}

fn probe_video(path: &Path) -> Result<ProbedStream> {
    let output = ffprobe_command()
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,nb_frames:format=duration",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(path)
        .output()
        .context("running ffprobe")?;

    if !output.status.success() {
        return Err(anyhow!(
            "could not open {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse ffprobe `key=value` lines into stream parameters.
///
/// `nb_frames` is `N/A` for many containers; the count is then estimated
/// from the format duration, or left at 0 when that is missing too.
pub fn parse_probe_output(text: &str) -> Result<ProbedStream> {
    let mut width = None;
    let mut height = None;
    let mut frame_rate = None;
    let mut nb_frames: Option<u64> = None;
    let mut duration: Option<f64> = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "width" => width = value.parse::<u32>().ok(),
            "height" => height = value.parse::<u32>().ok(),
            "r_frame_rate" => frame_rate = parse_frame_rate(value),
            "nb_frames" => nb_frames = value.parse::<u64>().ok(),
            "duration" => duration = value.parse::<f64>().ok(),
            _ => {}
        }
    }

    let width = width.ok_or_else(|| anyhow!("probe output missing stream width"))?;
    let height = height.ok_or_else(|| anyhow!("probe output missing stream height"))?;
    let frame_rate = frame_rate.ok_or_else(|| anyhow!("probe output missing frame rate"))?;
    let frame_count = nb_frames
        .unwrap_or_else(|| duration.map(|d| (d * frame_rate).round() as u64).unwrap_or(0));

    Ok(ProbedStream {
        width,
        height,
        frame_rate,
        frame_count,
    })
}

/// Parse an ffprobe rational like `30000/1001`, or a plain number.
pub fn parse_frame_rate(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().ok()?;
            let den = den.parse::<f64>().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => value.parse::<f64>().ok(),
    }
}

/// Scale the source to a fixed character width, compressing vertically
/// to compensate for character cells being taller than they are wide.
pub fn target_dimensions(
    source_width: u32,
    source_height: u32,
    columns: u32,
    font_ratio: f32,
) -> (u32, u32) {
    let rows =
        (source_height as f32 / source_width as f32 * columns as f32 * font_ratio).round() as u32;
    (columns, rows.max(1))
}
