use std::sync::OnceLock;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::ui;

/// Per-sample progress for `batch`, drawn on stderr. Inert when progress is off,
/// so workers can tick it unconditionally.
pub struct Progress {
    bar: Option<ProgressBar>,
}

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

fn bar_template() -> &'static str {
    let columns = std::env::var("COLUMNS").ok().and_then(|v| v.parse::<usize>().ok());
    match columns {
        Some(cols) if cols >= 110 => "{msg} {bar:40.green/white} {pos}/{len} {per_sec} ({eta})",
        Some(cols) if cols >= 80 => "{msg} {wide_bar:.green/white} {pos}/{len}",
        _ => "{msg} {wide_bar:.green/white} {percent}%",
    }
}

impl Progress {
    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
