use smallvec::SmallVec;

use crate::{
    animation::driver::{AnimationDriver, PlayRequest, PlayTarget, TransitionHandle, TransitionUpdate},
    animation::spec::RevealSpec,
    dom::selector::Selector,
    dom::tree::ElementTree,
    foundation::core::NodeId,
    foundation::error::{UnveilError, UnveilResult},
};

/// One-shot player: runs a description once on registration, after a fixed
/// delay, with no visibility observation.
///
/// Unlike [`crate::Reveal`], no hidden state is applied and no per-target
/// registry is kept: the animation starts from whatever the targets
/// currently look like and plays exactly once. Tearing down before the
/// delay elapses cancels the pending play.
pub struct MountReveal {
    handle: Option<TransitionHandle>,
    targets: Vec<NodeId>,
    pending: usize,
}

impl MountReveal {
    /// Register and immediately dispatch the delayed play.
    ///
    /// `delay_ms` is added on top of any delay the description itself
    /// carries. `enabled = false`, a missing container, or zero matches
    /// yield an inert player.
    pub fn register(
        tree: &ElementTree,
        container: Option<NodeId>,
        selector: &str,
        spec: RevealSpec,
        delay_ms: f64,
        enabled: bool,
        driver: &mut dyn AnimationDriver,
    ) -> UnveilResult<MountReveal> {
        spec.validate()?;
        let sel = Selector::parse(selector)?;
        if !delay_ms.is_finite() || delay_ms < 0.0 {
            return Err(UnveilError::validation(
                "mount delay must be finite and non-negative",
            ));
        }

        let inert = MountReveal {
            handle: None,
            targets: Vec::new(),
            pending: 0,
        };
        if !enabled {
            return Ok(inert);
        }
        let Some(container) = container else {
            return Ok(inert);
        };
        let matched = sel.query_all(tree, container);
        if matched.is_empty() {
            return Ok(inert);
        }

        let mut targets: SmallVec<[PlayTarget; 4]> = SmallVec::new();
        for (index, node) in matched.iter().enumerate() {
            targets.push(PlayTarget {
                node: *node,
                from: tree.style(*node).clone(),
                index,
            });
        }

        let pending = matched.len();
        let handle = driver.play(PlayRequest {
            targets,
            to: spec.target_state(),
            duration_ms: spec.duration_ms,
            ease: spec.ease,
            delay: spec.delay.offset(delay_ms),
        });

        Ok(MountReveal {
            handle: Some(handle),
            targets: matched,
            pending,
        })
    }

    /// Whether nothing was registered (disabled, no container, or zero
    /// matches).
    pub fn is_inert(&self) -> bool {
        self.handle.is_none() && self.targets.is_empty()
    }

    /// Whether the play finished (or never started).
    pub fn is_finished(&self) -> bool {
        self.handle.is_none()
    }

    /// Apply driver updates belonging to this player to the host tree.
    pub fn absorb(&mut self, updates: &[TransitionUpdate], tree: &mut ElementTree) {
        let Some(handle) = self.handle else {
            return;
        };
        for update in updates {
            if update.handle != handle || !self.targets.contains(&update.node) {
                continue;
            }
            tree.apply_style(update.node, &update.state);
            if update.done {
                self.pending = self.pending.saturating_sub(1);
            }
        }
        if self.pending == 0 {
            self.handle = None;
        }
    }

    /// Cancel the play if it has not completed.
    pub fn teardown(&mut self, driver: &mut dyn AnimationDriver) {
        if let Some(handle) = self.handle.take() {
            driver.cancel(handle);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/mount.rs"]
mod tests;
