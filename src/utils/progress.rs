//! Progress tracking for relation expansion.
//!
//! A [`RelationProgress`] is a cheap, cloneable handle around a single atomic
//! fraction. The expansion loop is its only writer; a UI thread can read it at
//! any time, or register a callback to be told about each update.
//!
//! # Usage
//!
//! ```ignore
//! use citation_relations::utils::RelationProgress;
//!
//! let progress = RelationProgress::new().on_update(|done, total| {
//!     eprintln!("{done}/{total}");
//! });
//! let observer = progress.clone();
//! // hand `progress` to the resolver, poll `observer.fraction()` elsewhere
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type UpdateCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Shared, thread-safe fractional progress in `[0, 1]`
#[derive(Clone)]
pub struct RelationProgress {
    /// Bit pattern of the current `f64` fraction
    fraction: Arc<AtomicU64>,

    /// Called with `(position, total)` after every update
    callback: Option<UpdateCallback>,
}

impl RelationProgress {
    /// Create a tracker starting at zero
    pub fn new() -> Self {
        Self {
            fraction: Arc::new(AtomicU64::new(0f64.to_bits())),
            callback: None,
        }
    }

    /// Attach a callback invoked after every update
    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Record that `position` of `total` items have been processed
    ///
    /// A zero `total` leaves the value untouched.
    pub fn update(&self, position: usize, total: usize) {
        if total == 0 {
            return;
        }
        let fraction = (position as f64 / total as f64).clamp(0.0, 1.0);
        self.fraction.store(fraction.to_bits(), Ordering::Release);

        if let Some(callback) = &self.callback {
            callback(position, total);
        }
    }

    /// Current fraction in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        f64::from_bits(self.fraction.load(Ordering::Acquire))
    }

    /// Put the tracker back to zero
    pub fn reset(&self) {
        self.fraction.store(0f64.to_bits(), Ordering::Release);
    }

    /// Whether every item has been processed
    pub fn is_done(&self) -> bool {
        self.fraction() >= 1.0
    }
}

impl Default for RelationProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RelationProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationProgress")
            .field("fraction", &self.fraction())
            .field(
                "callback",
                &self.callback.as_ref().map(|_| "Fn(usize, usize)"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_starts_at_zero() {
        let progress = RelationProgress::new();
        assert_eq!(progress.fraction(), 0.0);
        assert!(!progress.is_done());
    }

    #[test]
    fn test_progress_update() {
        let progress = RelationProgress::new();
        progress.update(1, 4);
        assert_eq!(progress.fraction(), 0.25);

        progress.update(4, 4);
        assert_eq!(progress.fraction(), 1.0);
        assert!(progress.is_done());
    }

    #[test]
    fn test_progress_zero_total_keeps_value() {
        let progress = RelationProgress::new();
        progress.update(1, 2);
        progress.update(0, 0);
        assert_eq!(progress.fraction(), 0.5);
    }

    #[test]
    fn test_progress_reset() {
        let progress = RelationProgress::new();
        progress.update(3, 3);
        progress.reset();
        assert_eq!(progress.fraction(), 0.0);
    }

    #[test]
    fn test_clones_share_state() {
        let progress = RelationProgress::new();
        let observer = progress.clone();
        progress.update(2, 5);
        assert_eq!(observer.fraction(), 0.4);
    }

    #[test]
    fn test_callback_receives_updates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = RelationProgress::new().on_update(move |done, total| {
            sink.lock().unwrap().push((done, total));
        });

        progress.update(1, 2);
        progress.update(2, 2);
        progress.update(0, 0);

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_readable_from_another_thread() {
        let progress = RelationProgress::new();
        let observer = progress.clone();

        let writer = std::thread::spawn(move || {
            for i in 1..=100 {
                progress.update(i, 100);
            }
        });

        let mut last = 0.0;
        while !observer.is_done() {
            let now = observer.fraction();
            assert!(now >= last);
            last = now;
            std::thread::yield_now();
        }
        writer.join().unwrap();
        assert_eq!(observer.fraction(), 1.0);
    }
}
