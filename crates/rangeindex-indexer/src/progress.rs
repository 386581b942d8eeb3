//! Progress reporting for the long-running reindex phases

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A counter of completed steps within one phase
pub trait Progress: Send + Sync {
    fn step(&self);
}

/// Creates one [`Progress`] per phase
pub trait ProgressFactory: Send + Sync {
    fn create(&self, label: &str, total_steps: usize) -> Arc<dyn Progress>;
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn step(&self) {}
}

impl ProgressFactory for NoProgress {
    fn create(&self, _label: &str, _total_steps: usize) -> Arc<dyn Progress> {
        Arc::new(NoProgress)
    }
}

/// Reports progress through `tracing` at every tenth of the total
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressFactory;

impl ProgressFactory for LogProgressFactory {
    fn create(&self, label: &str, total_steps: usize) -> Arc<dyn Progress> {
        Arc::new(LogProgress::new(label, total_steps))
    }
}

#[derive(Debug)]
pub struct LogProgress {
    label: String,
    total: usize,
    done: AtomicUsize,
}

impl LogProgress {
    pub fn new(label: &str, total: usize) -> Self {
        Self {
            label: label.to_string(),
            total,
            done: AtomicUsize::new(0),
        }
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

impl Progress for LogProgress {
    fn step(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let tenth = (self.total / 10).max(1);
        if done % tenth == 0 || done == self.total {
            tracing::info!(label = %self.label, done, total = self.total, "progress");
        }
    }
}
