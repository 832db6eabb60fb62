//! The reveal controller: registration, per-target state machine, and
//! transition dispatch.

/// Controller, options, and the per-target phase machine.
pub mod controller;
/// Stable registration fingerprint for reconcile-on-change.
pub mod key;
/// Mount-time one-shot player.
pub mod mount;
