//! Progress indicator for publish runs
//!
//! Uses `linya`, which draws to stderr, so stdout stays free for step lines and `--json`.

use linya::{Bar, Progress};

/// One bar advanced once per completed pipeline step
pub struct StepProgress {
  progress: Progress,
  bar: Bar,
}

impl StepProgress {
  /// Create a new progress bar with `total` steps
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
