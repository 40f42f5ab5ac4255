//! Scroll progress source
//!
//! Turns document scroll offsets into a progress fraction and notifies
//! observers. Observers are registered through the callback registry, so the
//! scene holds a [`Subscription`] and can detach deterministically.

use std::cell::Cell;

use crate::events::{CallbackRegistry, Subscription};

/// Scroll geometry of a document inside a viewport, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the document
    pub offset: f32,
    /// Total document height
    pub document_height: f32,
    /// Visible viewport height
    pub viewport_height: f32,
}

impl ScrollMetrics {
    /// Progress through the scrollable range
    ///
    /// 0.0 when the document top sits at the viewport top, 1.0 when the
    /// document bottom sits at the viewport bottom. A document that cannot
    /// scroll reports 0.
    pub fn progress(&self) -> f32 {
        let range = self.document_height - self.viewport_height;
        if !(range.is_finite() && range > 0.0 && self.offset.is_finite()) {
            return 0.0;
        }
        (self.offset / range).clamp(0.0, 1.0)
    }
}

/// Host-side scroll event source
pub struct ScrollSource {
    observers: CallbackRegistry<f32>,
    last_progress: Cell<Option<f32>>,
}

impl Default for ScrollSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSource {
    /// Create a source with no observers
    pub fn new() -> Self {
        Self {
            observers: CallbackRegistry::new(),
            last_progress: Cell::new(None),
        }
    }

    /// Be notified of every progress update until the subscription is released
    #[must_use = "dropping the subscription stops observing immediately"]
    pub fn observe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(f32) + 'static,
    {
        let mut observer = observer;
        self.observers.register(move |progress: &f32| observer(*progress))
    }

    /// Report a new scroll position
    pub fn scroll_to(&self, metrics: ScrollMetrics) -> usize {
        self.emit_progress(metrics.progress())
    }

    /// Report a progress fraction directly, returning how many observers saw it
    ///
    /// Values are clamped to [0, 1]; non-finite values are discarded.
    pub fn emit_progress(&self, progress: f32) -> usize {
        if !progress.is_finite() {
            log::warn!("Discarding non-finite scroll progress {}", progress);
            return 0;
        }
        let progress = progress.clamp(0.0, 1.0);
        self.last_progress.set(Some(progress));
        self.observers.dispatch(&progress)
    }

    /// Number of attached observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Most recent progress emitted, if any
    pub fn last_progress(&self) -> Option<f32> {
        self.last_progress.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::rc::Rc;

    fn metrics(offset: f32) -> ScrollMetrics {
        ScrollMetrics { offset, document_height: 4000.0, viewport_height: 900.0 }
    }

    #[test]
    fn test_progress_range() {
        assert_eq!(metrics(0.0).progress(), 0.0);
        assert_eq!(metrics(3100.0).progress(), 1.0);
        assert_relative_eq!(metrics(1550.0).progress(), 0.5);
        assert_eq!(metrics(-50.0).progress(), 0.0);
        assert_eq!(metrics(9999.0).progress(), 1.0);
    }

    #[test]
    fn test_unscrollable_document() {
        let short = ScrollMetrics { offset: 10.0, document_height: 600.0, viewport_height: 900.0 };
        assert_eq!(short.progress(), 0.0);
    }

    #[test]
    fn test_observers_see_clamped_progress() {
        let source = ScrollSource::new();
        let seen = Rc::new(Cell::new(-1.0));
        let sink = Rc::clone(&seen);
        let _subscription = source.observe(move |p| sink.set(p));

        assert_eq!(source.emit_progress(1.7), 1);
        assert_eq!(seen.get(), 1.0);
        assert_eq!(source.last_progress(), Some(1.0));

        assert_eq!(source.emit_progress(f32::NAN), 0);
        assert_eq!(seen.get(), 1.0);
        assert_eq!(source.last_progress(), Some(1.0));
    }

    #[test]
    fn test_released_observer_is_detached() {
        let source = ScrollSource::new();
        let mut subscription = source.observe(|_| {});
        assert_eq!(source.observer_count(), 1);

        subscription.release();
        assert_eq!(source.observer_count(), 0);
        assert_eq!(source.scroll_to(metrics(100.0)), 0);
    }
}
