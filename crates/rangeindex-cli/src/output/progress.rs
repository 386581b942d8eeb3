//! Progress bars on stderr for the reindex phases

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rangeindex_indexer::{LogProgressFactory, NoProgress, Progress, ProgressFactory};
use std::sync::Arc;

const BAR_TEMPLATE: &str = "{msg:>14} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {elapsed}";

/// Pick a progress reporter. Bars are drawn only for human output on a
/// terminal; otherwise progress goes to the log unless quiet.
pub fn factory(human: bool, quiet: bool) -> Arc<dyn ProgressFactory> {
    if quiet {
        Arc::new(NoProgress)
    } else if human && !ProgressDrawTarget::stderr().is_hidden() {
        Arc::new(BarProgressFactory::new(ProgressDrawTarget::stderr))
    } else {
        Arc::new(LogProgressFactory)
    }
}

/// Creates one progress bar per phase
pub struct BarProgressFactory {
    target: fn() -> ProgressDrawTarget,
}

impl BarProgressFactory {
    pub fn new(target: fn() -> ProgressDrawTarget) -> Self {
        Self { target }
    }
}

impl ProgressFactory for BarProgressFactory {
    fn create(&self, label: &str, total_steps: usize) -> Arc<dyn Progress> {
        let bar = ProgressBar::with_draw_target(Some(total_steps as u64), (self.target)());
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(label.to_string());

        if total_steps == 0 {
            bar.finish();
        }
        Arc::new(BarProgress { bar })
    }
}

struct BarProgress {
    bar: ProgressBar,
}

impl Progress for BarProgress {
    fn step(&self) {
        self.bar.inc(1);
        if self.bar.length().is_some_and(|len| self.bar.position() >= len) {
            self.bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_bar(label: &str, total: usize) -> BarProgress {
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden());
        bar.set_message(label.to_string());
        BarProgress { bar }
    }

    #[test]
    fn test_bar_counts_steps_and_finishes() {
        let progress = hidden_bar("Saving index", 250);
        for _ in 0..249 {
            progress.step();
        }
        assert_eq!(progress.bar.position(), 249);
        assert!(!progress.bar.is_finished());

        progress.step();
        assert_eq!(progress.bar.position(), 250);
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn test_steps_from_many_threads() {
        let progress = Arc::new(hidden_bar("Building index", 400));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let progress = Arc::clone(&progress);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        progress.step();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(progress.bar.position(), 400);
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn test_empty_phase_is_finished_immediately() {
        let factory = BarProgressFactory::new(ProgressDrawTarget::hidden);
        let progress = factory.create("Building index", 0);
        progress.step();
    }
}
