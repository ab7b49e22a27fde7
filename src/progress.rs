//! Optional count-style progress bar. Report lines always land in the caller's writer;
//! the bar is suspended around each one so it is not torn.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

fn count_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         it/s: {per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Count-style progress bar (objects processed out of total), with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(count_style());
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Destination for per-object report lines: stdout directly, or above an active bar.
pub struct ProgressScope<'w> {
    pb: Option<ProgressBar>,
    out: &'w mut dyn Write,
}

impl<'w> ProgressScope<'w> {
    pub fn new(out: &'w mut dyn Write, total: u64, label: Option<&str>, enabled: bool) -> Self {
        let pb = enabled.then(|| make_count_progress(total, label.unwrap_or("")));
        Self { pb, out }
    }

    /// Write one report line to the sink, hiding the bar while it is written.
    pub fn println(&mut self, line: &str) -> io::Result<()> {
        match &self.pb {
            Some(pb) => pb.suspend(|| writeln!(self.out, "{}", line)),
            None => writeln!(self.out, "{}", line),
        }
    }

    /// Extend the bar's length when the total is discovered while iterating.
    #[inline]
    pub fn grow(&self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc_length(delta);
        }
    }

    #[inline]
    pub fn inc(&self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    /// Clear the bar and hand the writer back for the summary.
    pub fn finish(self) -> &'w mut dyn Write {
        if let Some(pb) = self.pb {
            pb.finish_and_clear();
        }
        self.out
    }
}
