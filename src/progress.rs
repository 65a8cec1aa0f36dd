//! Shared conversion progress: an atomic frame counter plus a throttled
//! terminal progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Minimum advance of the completed fraction between two redraws.
const UPDATE_STEP: f64 = 0.05;

/// Progress shared by every conversion task during one run.
///
/// The frame counter is incremented atomically before the display
/// check, so it is exact regardless of completion order. The bar only
/// moves on >=5% advances of the completed fraction; two tasks may both
/// pass that check before either stores the new value, which at worst
/// redraws the bar once too often.
pub struct ProgressState {
    completed: AtomicUsize,
    total: usize,
    last_fraction: Mutex<f64>,
    bar: ProgressBar,
}

impl ProgressState {
    /// Progress over `total` frames, drawn in place on stderr.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self::with_bar(total, bar)
    }

    /// Progress that renders nowhere; used by tests.
    pub fn hidden(total: usize) -> Self {
        Self::with_bar(total, ProgressBar::hidden())
    }

    fn with_bar(total: usize, bar: ProgressBar) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            last_fraction: Mutex::new(0.0),
            bar,
        }
    }

    /// Record one converted frame and redraw the bar if the completed
    /// fraction advanced at least 5% since the last redraw.
    pub fn record_frame(&self) {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let fraction = if self.total == 0 {
            1.0
        } else {
            (done as f64 / self.total as f64).min(1.0)
        };
        let mut last = self.last_fraction.lock().unwrap();
        if fraction - *last >= UPDATE_STEP || done >= self.total {
            *last = fraction;
            self.bar.set_position(done.min(self.total) as u64);
        }
    }

    /// Number of frames recorded so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Fraction most recently written to the display, in `[0, 1]`.
    pub fn displayed_fraction(&self) -> f64 {
        *self.last_fraction.lock().unwrap()
    }

    /// Finish the bar so playback output starts on a fresh line.
    pub fn finish(&self) {
        self.bar.finish();
    }
}
