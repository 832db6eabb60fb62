use std::collections::BTreeMap;

use crate::{
    dom::tree::ElementTree,
    foundation::core::{NodeId, Rect},
    foundation::error::{UnveilError, UnveilResult},
};

/// One component of a root margin: absolute pixels or a percentage of the
/// matching viewport axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MarginValue {
    /// Absolute pixels.
    Px(f64),
    /// Percent of the viewport's width (left/right) or height (top/bottom).
    Percent(f64),
}

impl Default for MarginValue {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl MarginValue {
    fn resolve(self, axis_len: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => axis_len * pct / 100.0,
        }
    }

    fn parse(token: &str) -> UnveilResult<Self> {
        let token = token.trim();
        let (raw, ctor): (&str, fn(f64) -> Self) = if let Some(raw) = token.strip_suffix('%') {
            (raw, Self::Percent)
        } else if let Some(raw) = token.strip_suffix("px") {
            (raw, Self::Px)
        } else {
            (token, Self::Px)
        };

        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| UnveilError::validation(format!("bad root margin component '{token}'")))?;
        if !value.is_finite() {
            return Err(UnveilError::validation(
                "root margin components must be finite",
            ));
        }
        Ok(ctor(value))
    }
}

/// Margin applied to the viewport before intersection is evaluated.
///
/// Positive components grow the effective viewport (targets count as
/// visible earlier); negative components shrink it. Parsed from the CSS
/// margin shorthand (`"0px 0px -12% 0px"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RootMargin {
    /// Top edge adjustment.
    pub top: MarginValue,
    /// Right edge adjustment.
    pub right: MarginValue,
    /// Bottom edge adjustment.
    pub bottom: MarginValue,
    /// Left edge adjustment.
    pub left: MarginValue,
}

impl RootMargin {
    /// Parse a 1–4 component CSS margin shorthand.
    pub fn parse(input: &str) -> UnveilResult<RootMargin> {
        let parts = input
            .split_whitespace()
            .map(MarginValue::parse)
            .collect::<UnveilResult<Vec<_>>>()?;

        match parts.as_slice() {
            [] => Err(UnveilError::validation("root margin must be non-empty")),
            [all] => Ok(Self {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            }),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(UnveilError::validation(format!(
                "root margin '{input}' has more than 4 components"
            ))),
        }
    }

    /// The viewport expanded (or shrunk, for negative components) by this
    /// margin. Percentages resolve against the viewport's own dimensions.
    pub fn expand(self, viewport: Rect) -> Rect {
        let w = viewport.width();
        let h = viewport.height();
        Rect::new(
            viewport.x0 - self.left.resolve(w),
            viewport.y0 - self.top.resolve(h),
            viewport.x1 + self.right.resolve(w),
            viewport.y1 + self.bottom.resolve(h),
        )
    }
}

/// One visibility report for an observed node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// The observed node.
    pub node: NodeId,
    /// Fraction of the node's rectangle inside the (margin-adjusted)
    /// viewport, in `[0, 1]`.
    pub ratio: f64,
    /// Whether the node counts as visible at the configured threshold.
    pub is_intersecting: bool,
}

/// Viewport-intersection observation with a configurable threshold and
/// root margin.
///
/// [`IntersectionObserver::evaluate`] reports an entry for every observed
/// node the first time it is seen, and afterwards only when the node
/// crosses the visibility threshold in either direction, matching the
/// batched crossing semantics of the web primitive.
#[derive(Clone, Debug)]
pub struct IntersectionObserver {
    threshold: f64,
    margin: RootMargin,
    watched: Vec<NodeId>,
    last: BTreeMap<NodeId, bool>,
}

impl IntersectionObserver {
    /// Create an observer. `threshold` is the fraction of a target's
    /// rectangle that must be inside the viewport to count as visible;
    /// it must be finite and in `[0, 1]`.
    pub fn new(threshold: f64, margin: RootMargin) -> UnveilResult<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(UnveilError::validation(
                "intersection threshold must be in [0, 1]",
            ));
        }
        Ok(Self {
            threshold,
            margin,
            watched: Vec::new(),
            last: BTreeMap::new(),
        })
    }

    /// Begin observing `node`. Observing the same node twice is a no-op.
    pub fn observe(&mut self, node: NodeId) {
        if !self.watched.contains(&node) {
            self.watched.push(node);
        }
    }

    /// Stop observing everything and forget all crossing state.
    pub fn disconnect(&mut self) {
        self.watched.clear();
        self.last.clear();
    }

    /// Nodes currently observed, in observation order.
    pub fn watched(&self) -> &[NodeId] {
        &self.watched
    }

    /// Evaluate visibility of every observed node against `viewport`,
    /// reporting first sightings and threshold crossings.
    pub fn evaluate(&mut self, tree: &ElementTree, viewport: Rect) -> Vec<IntersectionEntry> {
        let root = self.margin.expand(viewport);

        let mut entries = Vec::new();
        for &node in &self.watched {
            let ratio = intersection_ratio(tree.rect(node), root);
            let is_intersecting = if self.threshold == 0.0 {
                overlaps(tree.rect(node), root)
            } else {
                ratio >= self.threshold
            };

            if self.last.get(&node) != Some(&is_intersecting) {
                self.last.insert(node, is_intersecting);
                entries.push(IntersectionEntry {
                    node,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

/// Whether the rectangles overlap, counting shared edges.
fn overlaps(target: Rect, root: Rect) -> bool {
    target.x0 <= root.x1 && root.x0 <= target.x1 && target.y0 <= root.y1 && root.y0 <= target.y1
}

/// Fraction of `target`'s area inside `root`.
///
/// A degenerate (zero-area) target reports 1.0 when its origin lies inside
/// `root` and 0.0 otherwise, so empty elements still produce sane
/// crossings.
fn intersection_ratio(target: Rect, root: Rect) -> f64 {
    let area = target.width().max(0.0) * target.height().max(0.0);
    if area == 0.0 {
        let inside = target.x0 >= root.x0
            && target.x0 <= root.x1
            && target.y0 >= root.y0
            && target.y0 <= root.y1;
        return if inside { 1.0 } else { 0.0 };
    }

    let w = (target.x1.min(root.x1) - target.x0.max(root.x0)).max(0.0);
    let h = (target.y1.min(root.y1) - target.y0.max(root.y0)).max(0.0);
    (w * h / area).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/observe/intersection.rs"]
mod tests;
