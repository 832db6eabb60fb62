//! Reference host surface: a minimal retained element tree and a CSS-like
//! selector engine.
//!
//! The controller only touches the tree through narrow accessors (queries,
//! style merge, will-change flag, layout rect), so embedders with their own
//! scene graph can mirror the same surface.

/// CSS-like selector parsing and matching.
pub mod selector;
/// Minimal retained element tree.
pub mod tree;
