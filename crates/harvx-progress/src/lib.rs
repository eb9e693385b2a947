//! # harvx-progress
//!
//! **Tier 2 (Ambient Stack)**
//!
//! Spinner and progress-bar helpers for the `harvx` CLI, behind a `ui`
//! feature so the core pipeline never has a hard `indicatif` dependency.
//! Every method is a complete no-op when the feature is off, when the
//! caller passes `enabled: false`, or when stderr isn't a terminal —
//! piping `harvx`'s output to a file or another process never produces
//! bar-drawing control codes in the byte stream.

use std::io::IsTerminal;

#[cfg(feature = "ui")]
use indicatif::{ProgressBar, ProgressStyle};

fn stderr_is_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// An indeterminate spinner for phases with no known total (discovery,
/// config resolution).
pub struct Progress {
    #[cfg(feature = "ui")]
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        #[cfg(feature = "ui")]
        {
            let bar = if enabled && stderr_is_tty() {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template("{spinner} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.enable_steady_tick(std::time::Duration::from_millis(100));
                Some(bar)
            } else {
                None
            };
            Self { bar }
        }
        #[cfg(not(feature = "ui"))]
        {
            let _ = enabled;
            Self {}
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.set_message(msg.into());
            return;
        }
        let _ = msg.into();
    }

    pub fn finish_and_clear(&self) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// A determinate progress bar with an ETA column, for the bounded
/// parallel content-loading phase where the total file count is known
/// up front.
pub struct ProgressBarWithEta {
    #[cfg(feature = "ui")]
    bar: Option<ProgressBar>,
}

impl ProgressBarWithEta {
    #[must_use]
    pub fn new(enabled: bool, total: u64, unit_label: &str) -> Self {
        #[cfg(feature = "ui")]
        {
            let bar = if enabled && stderr_is_tty() {
                let bar = ProgressBar::new(total);
                let template = format!(
                    "{{bar:40}} {{pos}}/{{len}} {unit_label} ({{eta}}) {{msg}}",
                    unit_label = unit_label
                );
                if let Ok(style) = ProgressStyle::with_template(&template) {
                    bar.set_style(style);
                }
                Some(bar)
            } else {
                None
            };
            Self { bar }
        }
        #[cfg(not(feature = "ui"))]
        {
            let _ = (enabled, total, unit_label);
            Self {}
        }
    }

    pub fn inc(&self) {
        self.inc_by(1);
    }

    pub fn inc_by(&self, delta: u64) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
        #[cfg(not(feature = "ui"))]
        let _ = delta;
    }

    pub fn set_position(&self, pos: u64) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.set_position(pos);
        }
        #[cfg(not(feature = "ui"))]
        let _ = pos;
    }

    pub fn set_length(&self, len: u64) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.set_length(len);
        }
        #[cfg(not(feature = "ui"))]
        let _ = len;
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.set_message(msg.into());
            return;
        }
        let _ = msg.into();
    }

    pub fn finish_with_message(&self, msg: impl Into<String>) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.finish_with_message(msg.into());
            return;
        }
        let _ = msg.into();
    }

    pub fn finish_and_clear(&self) {
        #[cfg(feature = "ui")]
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_spinner_is_a_complete_noop() {
        let p = Progress::new(false);
        p.set_message("scanning");
        p.finish_and_clear();
    }

    #[test]
    fn disabled_bar_is_a_complete_noop() {
        let b = ProgressBarWithEta::new(false, 100, "files");
        b.inc();
        b.inc_by(5);
        b.set_position(10);
        b.set_length(200);
        b.set_message("x");
        b.finish_with_message("done");
    }

    #[test]
    fn enabled_degrades_gracefully_without_a_tty() {
        // The test harness's stderr is never a tty, so `enabled: true`
        // must still behave as a no-op rather than panic or draw.
        let p = Progress::new(true);
        p.set_message("should be a noop here");
        p.finish_and_clear();

        let b = ProgressBarWithEta::new(true, 50, "items");
        for _ in 0..50 {
            b.inc();
        }
        b.finish_with_message("complete");
    }

    #[test]
    fn zero_total_bar_does_not_panic() {
        let b = ProgressBarWithEta::new(false, 0, "");
        b.inc();
        b.set_position(u64::MAX);
        b.set_length(u64::MAX);
        b.finish_and_clear();
    }
}
