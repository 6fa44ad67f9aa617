//! Viewport-driven presentation: lazily loaded product pictures and the
//! quick-navigation link.
//!
//! Both follow the intersection observer model. The host feeds batches of
//! [`IntersectionEntry`] values; anything whose visible ratio reaches the
//! observer's threshold counts as intersecting.

use std::collections::HashSet;

use sweetcart_core::ItemId;
use tracing::debug;

use crate::surface::Surface;

/// Visible ratio at which a product picture is loaded.
pub const PICTURE_THRESHOLD: f64 = 0.1;

/// Visible ratio of the header below which quick navigation is shown.
pub const NAVIGATION_THRESHOLD: f64 = 0.7;

/// One observation of a target's visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry<T> {
    pub target: T,
    /// Fraction of the target inside the viewport, `0.0..=1.0`.
    pub ratio: f64,
}

impl<T> IntersectionEntry<T> {
    #[must_use]
    pub const fn new(target: T, ratio: f64) -> Self {
        Self { target, ratio }
    }

    fn is_intersecting(&self, threshold: f64) -> bool {
        self.ratio > 0.0 && self.ratio >= threshold
    }
}

/// Swaps each product picture's deferred sources in the first time it
/// becomes visible.
#[derive(Debug, Clone)]
pub struct LazyPictureObserver {
    threshold: f64,
    observed: HashSet<ItemId>,
}

impl Default for LazyPictureObserver {
    fn default() -> Self {
        Self::new(PICTURE_THRESHOLD)
    }
}

impl LazyPictureObserver {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observed: HashSet::new(),
        }
    }

    /// Start watching the picture of `id`.
    pub fn observe(&mut self, id: ItemId) {
        self.observed.insert(id);
    }

    /// Watch every picture in `ids`.
    pub fn observe_all(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.observed.extend(ids);
    }

    /// Whether `id` is still waiting to be revealed.
    #[must_use]
    pub fn is_observed(&self, id: &ItemId) -> bool {
        self.observed.contains(id)
    }

    /// Number of pictures still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.observed.len()
    }

    /// Reveal every observed picture that is now intersecting and stop
    /// watching it. Returns the revealed ids.
    pub fn handle<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        entries: &[IntersectionEntry<ItemId>],
    ) -> Vec<ItemId> {
        let mut revealed = Vec::new();
        for entry in entries {
            if !entry.is_intersecting(self.threshold) || !self.observed.remove(&entry.target) {
                continue;
            }
            if !surface.reveal_picture(&entry.target) {
                debug!(item_id = %entry.target, "no picture to reveal");
            }
            revealed.push(entry.target.clone());
        }
        revealed
    }
}

/// Shows the quick-navigation link while the page header is out of view.
#[derive(Debug, Clone, Copy)]
pub struct QuickNavigation {
    threshold: f64,
}

impl Default for QuickNavigation {
    fn default() -> Self {
        Self::new(NAVIGATION_THRESHOLD)
    }
}

impl QuickNavigation {
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Update the link from the header's latest visibility. Only the first
    /// entry is considered.
    ///
    /// Returns whether the link is now shown, or `None` for an empty batch.
    pub fn handle<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        entries: &[IntersectionEntry<()>],
    ) -> Option<bool> {
        let entry = entries.first()?;
        let visible = !entry.is_intersecting(self.threshold);
        surface.set_quick_navigation_visible(visible);
        Some(visible)
    }
}
