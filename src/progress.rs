//! Terminal progress for chart loading and normalization.
//!
//! Bars and spinners draw to stderr so the rendered table on stdout stays
//! clean. In log-only mode they are hidden and per-chart lines go through
//! `log` instead.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static LOG_ONLY: AtomicBool = AtomicBool::new(false);

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// "4.2s" under a minute, "1.5m" above.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

fn hidden_if_log_only(pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(style);
    }
    pb
}

/// One tick per chart fetched.
pub fn chart_progress(total: usize) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{msg:>12} [{bar:30.cyan/blue}] {pos}/{len} charts")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");

    let pb = hidden_if_log_only(ProgressBar::new(total as u64), style);
    pb.set_message("Loading");
    pb
}

/// Report a loaded chart on the bar, or as a log line in log-only mode.
pub fn chart_loaded(pb: &ProgressBar, name: &str, entries: usize) {
    if is_log_only() {
        log::info!("[LOAD] {} ({} entries)", name, entries);
    }
    pb.set_message(name.to_string());
    pb.inc(1);
}

/// Spinner for a phase with no meaningful count.
pub fn phase_spinner(msg: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{msg} {spinner} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let pb = hidden_if_log_only(ProgressBar::new_spinner(), style);
    if !is_log_only() {
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(msg.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(4200)), "4.2s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }
}
