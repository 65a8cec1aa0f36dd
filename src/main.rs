use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use vascii::decode::{ensure_ffmpeg, VideoSource};
use vascii::progress::ProgressState;
use vascii::{convert_frames, playback, render_frame, AppConfig, ConversionOptions};

fn load_config() -> Result<AppConfig> {
    // Look for vascii.json in app support, current dir fallback, then built-in default
    let mut tried: Vec<PathBuf> = Vec::new();
    if let Some(mut d) = dirs::data_dir() {
        d.push("vascii");
        d.push("vascii.json");
        tried.push(d);
    }
    tried.push(PathBuf::from("vascii.json"));

    for p in &tried {
        if p.exists() {
            return AppConfig::load_from(p);
        }
    }

    // Built-in defaults
    Ok(AppConfig::default())
}

#[derive(Parser, Debug)]
#[command(version, about = "Colored ASCII video playback in the terminal.")]
struct Args {
    /// Path to the video file to play
    #[arg(long, short)]
    video: PathBuf,

    /// Decode every frame up front and convert in parallel before playback
    #[arg(long, short, default_value_t = false)]
    preload: bool,

    /// Clear the screen before every frame instead of overwriting in place
    #[arg(long, short, default_value_t = false)]
    clear: bool,

    /// Target width in characters
    #[arg(long)]
    columns: Option<u32>,

    /// Vertical compression factor (terminal cells are taller than wide)
    #[arg(long)]
    font_ratio: Option<f32>,

    /// Number of conversion workers (defaults to available CPU cores)
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = load_config()?;

    let mut options = ConversionOptions::from_config(&cfg);
    if let Some(columns) = args.columns {
        options = options.with_columns(columns);
    }
    if let Some(font_ratio) = args.font_ratio {
        options = options.with_font_ratio(font_ratio);
    }

    ensure_ffmpeg()?;
    let source = VideoSource::open(&args.video, &options)
        .with_context(|| format!("opening video {}", args.video.display()))?;
    let params = source.params().clone();

    let started = Instant::now();
    let shown = if args.preload {
        play_preloaded(&source, &options, args.workers, args.clear)?
    } else {
        play_streaming(&source, &options, args.clear)?
    };
    let elapsed = started.elapsed();

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", playback::RESET)?;
    writeln!(
        stdout,
        "Framerate: {} FPS\nWidth: {}\nHeight: {}\nFrames: {}\nExecution Time: {} ms",
        params.frame_rate,
        params.width,
        params.height,
        shown,
        elapsed.as_millis()
    )?;
    Ok(())
}

/// Buffer the whole video, convert all frames in parallel, then play.
fn play_preloaded(
    source: &VideoSource,
    options: &ConversionOptions,
    workers: Option<usize>,
    clear_screen: bool,
) -> Result<usize> {
    let frames: Vec<_> = source.frames()?.collect();
    let workers = workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    let progress = ProgressState::new(frames.len());
    let rendered = convert_frames(&frames, options.ascii_chars.as_bytes(), workers, &progress);
    progress.finish();

    playback::play(
        &mut io::stdout().lock(),
        rendered,
        source.params().frame_rate,
        clear_screen,
    )
}

/// Decode, convert and display one frame at a time with no lookahead.
fn play_streaming(
    source: &VideoSource,
    options: &ConversionOptions,
    clear_screen: bool,
) -> Result<usize> {
    let ramp = options.ascii_chars.as_bytes();
    let frames = source.frames()?.map(|frame| render_frame(&frame, ramp));
    playback::play(
        &mut io::stdout().lock(),
        frames,
        source.params().frame_rate,
        clear_screen,
    )
}
