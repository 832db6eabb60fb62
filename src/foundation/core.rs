pub use kurbo::{Point, Rect, Vec2};

/// Stable identity of a node in the host element tree.
///
/// Ids are handed out by [`crate::ElementTree`] and are never reused within
/// one tree; the controller's registry is keyed by them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

/// A host-clock timestamp in milliseconds.
///
/// The controller never reads a clock itself; hosts pass timestamps into the
/// driver's advance pump.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct TimeMs(pub f64);

impl TimeMs {
    /// Zero timestamp, the driver's state before the first advance.
    pub const ZERO: TimeMs = TimeMs(0.0);

    /// Milliseconds elapsed since `earlier` (negative if `earlier` is later).
    pub fn since(self, earlier: TimeMs) -> f64 {
        self.0 - earlier.0
    }

    /// This timestamp shifted forward by `ms`.
    pub fn offset(self, ms: f64) -> TimeMs {
        TimeMs(self.0 + ms)
    }
}
