//! Horizontal pixel intervals ("diapasons") allotted to subtrees.
//!
//! Every level splits its parent's diapason into equal slices, one per
//! sibling. Slice boundaries are computed from the parent start so that
//! neighbouring slices share the exact same edge value.

use serde::Serialize;

/// A `[start, end]` pixel interval with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Diapason {
    pub start: f64,
    pub end: f64,
}

impl Diapason {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The root diapason spanning the whole container.
    pub fn container(width: f64) -> Self {
        Self::new(0.0, width)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Left edge of an item of `item_width` centered in this diapason.
    #[inline]
    pub fn centered(&self, item_width: f64) -> f64 {
        self.start + (self.width() - item_width) / 2.0
    }

    /// Slice `index` of `count` equal slices.
    ///
    /// A slice as wide as the whole container is pinned to `start = 0`.
    /// `count` must be at least 1; callers only split for existing siblings.
    pub fn split(&self, index: usize, count: usize, container_width: f64) -> Diapason {
        debug_assert!(count > 0 && index < count);

        let slice_width = self.width() / count as f64;
        if slice_width == container_width {
            return Diapason::new(0.0, slice_width);
        }

        let start = self.start + slice_width * index as f64;
        let end = if index + 1 == count {
            self.end
        } else {
            self.start + slice_width * (index + 1) as f64
        };
        Diapason::new(start, end)
    }

    /// All `count` slices, left to right.
    pub fn partition(&self, count: usize, container_width: f64) -> Vec<Diapason> {
        (0..count)
            .map(|index| self.split(index, count, container_width))
            .collect()
    }
}
