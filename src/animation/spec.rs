use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    foundation::error::{UnveilError, UnveilResult},
};

/// Default enter transition duration in milliseconds.
pub(crate) const DEFAULT_DURATION_MS: f64 = 1000.0;

/// Animatable visual property.
///
/// Serialized names use the camel-case spellings (`"translateY"`, `"skewY"`)
/// so descriptions round-trip against existing JSON call sites.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Horizontal offset in pixels.
    TranslateX,
    /// Vertical offset in pixels.
    TranslateY,
    /// Uniform scale factor.
    Scale,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Rotation in degrees.
    Rotate,
    /// Vertical skew in degrees.
    SkewY,
}

impl Property {
    /// All animatable properties, in stable order.
    pub const ALL: [Property; 6] = [
        Property::TranslateX,
        Property::TranslateY,
        Property::Scale,
        Property::Opacity,
        Property::Rotate,
        Property::SkewY,
    ];

    /// The value this property has on an untouched element.
    ///
    /// Used as the implicit start value when a transition animates a
    /// property with no prior state recorded.
    pub fn resting_value(self) -> f64 {
        match self {
            Self::TranslateX | Self::TranslateY | Self::Rotate | Self::SkewY => 0.0,
            Self::Scale | Self::Opacity => 1.0,
        }
    }
}

/// One property's animation form inside a [`RevealSpec`].
///
/// Serializes as a bare number (`To`) or a two-element array (`FromTo`),
/// matching the `value` / `[from, to]` shapes of the description format.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyAnim {
    /// Animate from the element's current value toward a target.
    To(f64),
    /// Animate between an explicit `[from, to]` pair. The `from` half is
    /// what defines the property's hidden state.
    FromTo(f64, f64),
}

impl PropertyAnim {
    /// The target (revealed) value.
    pub fn target(self) -> f64 {
        match self {
            Self::To(v) => v,
            Self::FromTo(_, to) => to,
        }
    }

    /// The hidden value, present only for the `[from, to]` form.
    pub fn hidden(self) -> Option<f64> {
        match self {
            Self::To(_) => None,
            Self::FromTo(from, _) => Some(from),
        }
    }

    fn validate(self, prop: Property) -> UnveilResult<()> {
        let ok = match self {
            Self::To(v) => v.is_finite(),
            Self::FromTo(a, b) => a.is_finite() && b.is_finite(),
        };
        if !ok {
            return Err(UnveilError::validation(format!(
                "property {prop:?} has a non-finite value"
            )));
        }
        Ok(())
    }
}

/// Transition start delay: fixed, absent, or staggered by element index.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Delay {
    /// No delay.
    #[default]
    None,
    /// The same delay for every target, in milliseconds.
    Fixed(f64),
    /// Index-keyed delay: target `i` starts at `start_ms + i * step_ms`.
    Stagger {
        /// Delay of the first target.
        start_ms: f64,
        /// Additional delay per subsequent target.
        step_ms: f64,
    },
}

impl Delay {
    /// Effective delay in milliseconds for the target at `index`.
    pub fn resolve(self, index: usize) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Fixed(ms) => ms,
            Self::Stagger { start_ms, step_ms } => start_ms + step_ms * index as f64,
        }
    }

    /// This delay shifted by a fixed number of milliseconds.
    pub fn offset(self, ms: f64) -> Delay {
        if ms == 0.0 {
            return self;
        }
        match self {
            Self::None => Self::Fixed(ms),
            Self::Fixed(base) => Self::Fixed(base + ms),
            Self::Stagger { start_ms, step_ms } => Self::Stagger {
                start_ms: start_ms + ms,
                step_ms,
            },
        }
    }

    fn validate(self) -> UnveilResult<()> {
        let ok = match self {
            Self::None => true,
            Self::Fixed(ms) => ms.is_finite() && ms >= 0.0,
            Self::Stagger { start_ms, step_ms } => {
                start_ms.is_finite() && start_ms >= 0.0 && step_ms.is_finite() && step_ms >= 0.0
            }
        };
        if !ok {
            return Err(UnveilError::validation(
                "delay values must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Declarative description of a reveal animation.
///
/// A spec is a pure data model: properties mapped to target-or-`[from, to]`
/// forms plus timing metadata. It can be built programmatically or
/// serialized/deserialized via Serde (JSON).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealSpec {
    /// Animated properties keyed by property name.
    pub props: BTreeMap<Property, PropertyAnim>,
    /// Enter transition duration in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Enter transition easing.
    #[serde(default)]
    pub ease: Ease,
    /// Enter transition delay, scalar or staggered by index.
    #[serde(default)]
    pub delay: Delay,
}

fn default_duration_ms() -> f64 {
    DEFAULT_DURATION_MS
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self {
            props: BTreeMap::new(),
            duration_ms: DEFAULT_DURATION_MS,
            ease: Ease::default(),
            delay: Delay::default(),
        }
    }
}

impl RevealSpec {
    /// An empty spec with default timing (1000 ms, ease-out-cubic, no delay).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `[from, to]` property.
    pub fn from_to(mut self, prop: Property, from: f64, to: f64) -> Self {
        self.props.insert(prop, PropertyAnim::FromTo(from, to));
        self
    }

    /// Add a target-only property (not part of the hidden state).
    pub fn to(mut self, prop: Property, target: f64) -> Self {
        self.props.insert(prop, PropertyAnim::To(target));
        self
    }

    /// Set the enter duration in milliseconds.
    pub fn duration(mut self, ms: f64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Set the enter easing.
    pub fn easing(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Set a fixed enter delay in milliseconds.
    pub fn delay_ms(mut self, ms: f64) -> Self {
        self.delay = Delay::Fixed(ms);
        self
    }

    /// Set an index-staggered enter delay.
    pub fn stagger(mut self, start_ms: f64, step_ms: f64) -> Self {
        self.delay = Delay::Stagger { start_ms, step_ms };
        self
    }

    /// Derive the hidden state: the `from` half of every `[from, to]`
    /// property. Target-only properties contribute nothing and are never
    /// reset on exit.
    pub fn hidden_state(&self) -> VisualState {
        let mut state = VisualState::default();
        for (prop, anim) in &self.props {
            if let Some(from) = anim.hidden() {
                state.set(*prop, from);
            }
        }
        state
    }

    /// Derive the revealed state: the target value of every property.
    pub fn target_state(&self) -> VisualState {
        let mut state = VisualState::default();
        for (prop, anim) in &self.props {
            state.set(*prop, anim.target());
        }
        state
    }

    /// Validate static invariants for this description.
    pub fn validate(&self) -> UnveilResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(UnveilError::validation("duration_ms must be finite and > 0"));
        }
        for (prop, anim) in &self.props {
            anim.validate(*prop)?;
        }
        self.delay.validate()
    }
}

/// A partial assignment of visual properties.
///
/// This is the typed replacement for inline style mutation: the controller
/// keeps one `VisualState` per animated target as the authoritative record
/// of what the target currently looks like, and transition updates merge
/// into it. Properties absent from the map are at their resting values.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualState {
    values: BTreeMap<Property, f64>,
}

impl VisualState {
    /// The value recorded for `prop`, if any.
    pub fn get(&self, prop: Property) -> Option<f64> {
        self.values.get(&prop).copied()
    }

    /// The recorded value for `prop`, or its resting value.
    pub fn value_or_resting(&self, prop: Property) -> f64 {
        self.get(prop).unwrap_or_else(|| prop.resting_value())
    }

    /// Record a value for `prop`.
    pub fn set(&mut self, prop: Property, value: f64) {
        self.values.insert(prop, value);
    }

    /// Builder-style [`VisualState::set`].
    pub fn with(mut self, prop: Property, value: f64) -> Self {
        self.set(prop, value);
        self
    }

    /// Merge every assignment in `other` over this state.
    pub fn merge(&mut self, other: &VisualState) {
        for (prop, value) in &other.values {
            self.values.insert(*prop, *value);
        }
    }

    /// Whether no property is recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of recorded properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate recorded `(property, value)` pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, f64)> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spec.rs"]
mod tests;
