use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress indicator, e.g. a progress bar
///
/// The clustering driver emits one [report](Progress::report) per
/// scanned item followed by a single [finish](Progress::finish).
pub trait Progress {
    /// Record that `processed` out of `total` items have been treated
    fn report(&self, processed: usize, total: usize);
    /// Signal that we are done
    fn finish(&self);
}

impl Progress for indicatif::ProgressBar {
    fn report(&self, processed: usize, _total: usize) {
        self.set_position(processed as u64)
    }

    fn finish(&self) {
        indicatif::ProgressBar::finish(self)
    }
}

// logbar can only advance, so we keep track of the last position
struct LogBar {
    bar: logbar::ProgressBar,
    pos: AtomicUsize,
}

impl Progress for LogBar {
    fn report(&self, processed: usize, _total: usize) {
        let prev = self.pos.swap(processed, Ordering::Relaxed);
        if processed > prev {
            self.bar.inc(processed - prev)
        }
    }

    fn finish(&self) {
        self.bar.finish()
    }
}

/// A progress bar suited for the current terminal
#[derive(Default)]
pub struct ProgressBar {
    bar: Option<Box<dyn Progress>>,
}

impl Progress for ProgressBar {
    fn report(&self, processed: usize, total: usize) {
        if let Some(bar) = &self.bar {
            bar.report(processed, total)
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
            // restore logging
            log::set_max_level(log::LevelFilter::Info);
        }
    }
}

impl ProgressBar {
    /// A bar tracking progress towards treating `len` items
    ///
    /// On an attended terminal this draws an `indicatif` bar, otherwise
    /// a plain log-friendly one. If logging is not at the `Info` level
    /// no bar is shown at all.
    pub fn new(len: usize, message: &str) -> Self {
        if log::max_level().to_level() != Some(log::Level::Info) {
            ProgressBar::default()
        } else if console::Term::stderr().features().is_attended() {
            ProgressBar::indicatif(len, message)
        } else {
            ProgressBar::logbar(len, message)
        }
    }

    fn indicatif(len: usize, message: &str) -> Self {
        let bar = indicatif::ProgressBar::new(len as u64);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{bar:60.cyan/cyan} {msg} {pos}/{len} [{elapsed}]")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_owned());
        // temporarily disable logging to not overwrite the bar
        log::set_max_level(log::LevelFilter::Off);
        ProgressBar {
            bar: Some(Box::new(bar)),
        }
    }

    fn logbar(len: usize, message: &str) -> Self {
        let style = logbar::Style::new().indicator('█');
        eprintln!("{}", message);
        let bar = logbar::ProgressBar::with_style(len, style);
        // temporarily disable logging to not overwrite the bar
        log::set_max_level(log::LevelFilter::Off);
        ProgressBar {
            bar: Some(Box::new(LogBar {
                bar,
                pos: AtomicUsize::new(0),
            })),
        }
    }
}
