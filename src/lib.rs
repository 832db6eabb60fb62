//! Unveil is a viewport-driven reveal animation controller.
//!
//! Given a container node, a CSS-like selector, and a declarative animation
//! description ([`RevealSpec`]), Unveil observes the matched elements and
//! plays an enter transition when they become sufficiently visible, and an
//! exit transition back to the hidden state when they leave again.
//!
//! # Pipeline overview
//!
//! 1. **Register**: `RevealSpec + selector -> Reveal` (hidden state derived
//!    and applied, one intersection observer per registration)
//! 2. **Poll**: `Reveal::poll` evaluates visibility against the current
//!    viewport and dispatches enter/exit transitions to an [`AnimationDriver`]
//! 3. **Advance**: the host rendering loop pumps the driver
//!    ([`TimelineDriver::advance`]) and feeds the resulting updates back via
//!    `Reveal::absorb`
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Typed visual state**: the per-target current state lives in the
//!   controller's registry ([`VisualState`] records), never read back from
//!   the host tree. Interrupted transitions resume from the recorded state.
//! - **No playback in the controller**: interpolation and easing playback
//!   are delegated to the driver; the controller only computes hidden and
//!   target states and sequences transitions.
//! - **Registrations are independent**: each owns one observer and its own
//!   transition handles; nothing is shared across registrations.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod dom;
mod foundation;
mod observe;
mod reveal;

pub use animation::driver::{
    AnimationDriver, PlayRequest, PlayTarget, TimelineDriver, TransitionHandle, TransitionUpdate,
};
pub use animation::ease::Ease;
pub use animation::spec::{Delay, Property, PropertyAnim, RevealSpec, VisualState};
pub use dom::selector::Selector;
pub use dom::tree::ElementTree;
pub use foundation::core::{NodeId, Point, Rect, TimeMs, Vec2};
pub use foundation::error::{UnveilError, UnveilResult};
pub use observe::intersection::{IntersectionEntry, IntersectionObserver, MarginValue, RootMargin};
pub use reveal::controller::{EXIT_DURATION_MS, EXIT_EASE, Phase, Reveal, RevealOptions};
pub use reveal::key::RegistrationKey;
pub use reveal::mount::MountReveal;
