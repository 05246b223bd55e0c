#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the timetable scraper binary.
//!
//! Two kinds of bar report extraction progress: [`IndicatifProgress::pages_bar`]
//! for PDF pages and [`IndicatifProgress::steps_bar`] for per-year workbook
//! loads. [`init_logger`] routes `log` output through the same
//! [`MultiProgress`] so log lines never tear a bar mid-redraw.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use timetable_scraper_schedule_models::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const PAGES_TEMPLATE: &str = "  {msg} {wide_bar:.cyan/dim} page {pos}/{len} [{elapsed_precise}]";
const STEPS_TEMPLATE: &str = "{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]";
const BAR_CHARS: &str = "##-";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(BAR_CHARS)
}

/// [`ProgressCallback`] over an `indicatif` bar.
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Applied by `set_total`, which is when a length becomes known.
    sized_style: ProgressStyle,
}

impl IndicatifProgress {
    fn boxed(bar: ProgressBar, message: &str, sized_style: ProgressStyle) -> Arc<dyn ProgressCallback> {
        bar.set_message(message.to_owned());
        Arc::new(Self { bar, sized_style })
    }

    /// Page counter for a PDF scan.
    ///
    /// The page count is only known after the document has been parsed, so
    /// this spins until the scanner calls `set_total`.
    #[must_use]
    pub fn pages_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self::boxed(bar, message, bar_style(PAGES_TEMPLATE))
    }

    /// Counter over a fixed number of years.
    #[must_use]
    pub fn steps_bar(
        multi: &MultiProgress,
        message: &str,
        total: u64,
    ) -> Arc<dyn ProgressCallback> {
        let style = bar_style(STEPS_TEMPLATE);
        let bar = multi.add(ProgressBar::new(total).with_style(style.clone()));

        Self::boxed(bar, message, style)
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_style(self.sized_style.clone());
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind an
/// `indicatif-log-bridge` wrapper and hands back the [`MultiProgress`] every
/// bar in the process should be added to.
///
/// Calling it twice keeps the first logger.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_total_sizes_and_rewinds_the_bar() {
        let progress = IndicatifProgress {
            bar: ProgressBar::hidden(),
            sized_style: bar_style(PAGES_TEMPLATE),
        };
        progress.inc(3);
        progress.set_total(5);
        assert_eq!(progress.bar.length(), Some(5));
        assert_eq!(progress.bar.position(), 0);

        progress.inc(2);
        assert_eq!(progress.bar.position(), 2);

        progress.finish("done".to_owned());
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn init_logger_can_be_called_twice() {
        let _first = init_logger();
        let _second = init_logger();
        log::info!("logger installed");
    }
}
