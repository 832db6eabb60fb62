//! Animation data model: easing curves, the declarative reveal description,
//! and the playback driver boundary.

/// Animation driver trait and the reference timeline driver.
pub mod driver;
/// Easing identifiers and evaluation.
pub mod ease;
/// Declarative reveal description and visual state.
pub mod spec;
