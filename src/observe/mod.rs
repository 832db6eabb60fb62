//! Viewport visibility: root-margin parsing and intersection evaluation.

/// Intersection observer equivalent over host-provided layout rectangles.
pub mod intersection;
