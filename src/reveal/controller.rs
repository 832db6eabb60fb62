use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::{
    animation::driver::{AnimationDriver, PlayRequest, PlayTarget, TransitionHandle, TransitionUpdate},
    animation::ease::Ease,
    animation::spec::{Delay, RevealSpec, VisualState},
    dom::selector::Selector,
    dom::tree::ElementTree,
    foundation::core::{NodeId, Rect},
    foundation::error::{UnveilError, UnveilResult},
    observe::intersection::{IntersectionEntry, IntersectionObserver, MarginValue, RootMargin},
    reveal::key::{RegistrationKey, registration_key},
};

/// Exit transitions always run for 600 ms, whatever the description says.
pub const EXIT_DURATION_MS: f64 = 600.0;

/// Exit transitions always ease out quadratically, whatever the
/// description says. Exit delay is likewise forced to zero so staggered
/// lists collapse together instead of trickling out.
pub const EXIT_EASE: Ease = Ease::OutQuad;

/// Visual lifecycle of one observed node.
///
/// The machine runs for the registration's lifetime; there is no terminal
/// state. An interrupted transition hands its current interpolated state to
/// the superseding one, so `Entering -> Exiting` (and back) never snaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// At (or moving back toward) the hidden state; the initial phase.
    Hidden,
    /// Enter transition in flight.
    Entering,
    /// At rest at the description's target values.
    Revealed,
    /// Exit transition in flight.
    Exiting,
}

/// Per-registration observation and behavior options.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealOptions {
    /// Fraction (0–1) of a target's rectangle that must intersect the
    /// viewport to count as visible.
    pub threshold: f64,
    /// Margin applied to the viewport before intersection is evaluated.
    pub root_margin: RootMargin,
    /// When set, transitions animate this selector's matches inside each
    /// observed node instead of the node itself. Visibility is still
    /// evaluated at the observed node's granularity.
    pub child_selector: Option<String>,
    /// When true the first enter is final: later exit and enter crossings
    /// are ignored for that node. The default (`false`) re-triggers on
    /// every crossing, in both directions.
    pub once: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            root_margin: RootMargin::default(),
            child_selector: None,
            once: false,
        }
    }
}

impl RevealOptions {
    /// The one-shot profile used by single-element scroll triggers:
    /// threshold 0.12, bottom margin pulled up by 12%, `once` enabled.
    pub fn one_shot() -> Self {
        Self {
            threshold: 0.12,
            root_margin: RootMargin {
                bottom: MarginValue::Percent(-12.0),
                ..RootMargin::default()
            },
            child_selector: None,
            once: true,
        }
    }

    fn validate(&self) -> UnveilResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(UnveilError::validation(
                "intersection threshold must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

struct TargetRecord {
    /// Authoritative current visual state. Transition updates merge into
    /// this; superseding transitions start from it.
    state: VisualState,
    handle: Option<TransitionHandle>,
    group: NodeId,
    index: usize,
}

struct ObservedGroup {
    phase: Phase,
    targets: Vec<NodeId>,
    /// Tracks of the in-flight transition that have not completed yet.
    pending: usize,
    entered_once: bool,
}

/// One reveal registration: an observed selector, its derived hidden
/// state, and the per-target transition state machine.
///
/// Matching happens exactly once, at registration; nodes inserted later
/// never join (`is_inert` stays true for a registration that matched
/// nothing). The host pumps the registration with [`Reveal::poll`] per
/// layout/scroll change and [`Reveal::absorb`] per driver advance.
pub struct Reveal {
    key: RegistrationKey,
    spec: RevealSpec,
    hidden: VisualState,
    options: RevealOptions,
    observer: Option<IntersectionObserver>,
    groups: BTreeMap<NodeId, ObservedGroup>,
    records: BTreeMap<NodeId, TargetRecord>,
    torn_down: bool,
}

impl Reveal {
    /// Register a reveal over `selector` inside `container`.
    ///
    /// The hidden state (the `from` half of every `[from, to]` property) is
    /// applied to every animated target immediately, before any visibility
    /// event, and each target is flagged for compositor promotion.
    ///
    /// A missing container or a selector matching zero nodes yields an
    /// inert registration rather than an error; malformed selectors,
    /// thresholds, or descriptions are real errors.
    #[tracing::instrument(skip(tree, spec, options))]
    pub fn register(
        tree: &mut ElementTree,
        container: Option<NodeId>,
        selector: &str,
        spec: RevealSpec,
        options: RevealOptions,
    ) -> UnveilResult<Reveal> {
        spec.validate()?;
        options.validate()?;
        let sel = Selector::parse(selector)?;
        let child_sel = options
            .child_selector
            .as_deref()
            .map(Selector::parse)
            .transpose()?;
        let key = registration_key(selector, &spec, &options)?;

        let hidden = spec.hidden_state();
        let mut reveal = Reveal {
            key,
            spec,
            hidden,
            options,
            observer: None,
            groups: BTreeMap::new(),
            records: BTreeMap::new(),
            torn_down: false,
        };

        let Some(container) = container else {
            return Ok(reveal);
        };
        let matched = sel.query_all(tree, container);
        if matched.is_empty() {
            return Ok(reveal);
        }

        let mut observer =
            IntersectionObserver::new(reveal.options.threshold, reveal.options.root_margin)?;
        for node in matched {
            let targets = match &child_sel {
                Some(child) => child.query_all(tree, node),
                None => vec![node],
            };
            for (index, target) in targets.iter().enumerate() {
                tree.set_will_change(*target, true);
                tree.apply_style(*target, &reveal.hidden);
                reveal.records.insert(
                    *target,
                    TargetRecord {
                        state: reveal.hidden.clone(),
                        handle: None,
                        group: node,
                        index,
                    },
                );
            }
            observer.observe(node);
            reveal.groups.insert(
                node,
                ObservedGroup {
                    phase: Phase::Hidden,
                    targets,
                    pending: 0,
                    entered_once: false,
                },
            );
        }

        tracing::debug!(
            observed = reveal.groups.len(),
            targets = reveal.records.len(),
            "reveal registered"
        );
        reveal.observer = Some(observer);
        Ok(reveal)
    }

    /// Tear down an existing registration and build a fresh one when any
    /// registration-key input changed; otherwise hand `existing` back
    /// untouched. Mirrors the owning-lifecycle rule that a changed
    /// registration is recreated, never patched.
    pub fn reconcile(
        existing: Option<Reveal>,
        tree: &mut ElementTree,
        driver: &mut dyn AnimationDriver,
        container: Option<NodeId>,
        selector: &str,
        spec: RevealSpec,
        options: RevealOptions,
    ) -> UnveilResult<Reveal> {
        spec.validate()?;
        options.validate()?;
        let key = registration_key(selector, &spec, &options)?;

        if let Some(mut reveal) = existing {
            if !reveal.torn_down && reveal.key == key {
                return Ok(reveal);
            }
            reveal.teardown(tree, driver);
        }
        Self::register(tree, container, selector, spec, options)
    }

    /// Whether this registration observes nothing (missing container or
    /// zero matches at registration time). Inert registrations never
    /// mutate anything.
    pub fn is_inert(&self) -> bool {
        self.observer.is_none()
    }

    /// Whether [`Reveal::teardown`] ran.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// This registration's input fingerprint.
    pub fn key(&self) -> RegistrationKey {
        self.key
    }

    /// The options this registration was built with.
    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// The derived hidden state.
    pub fn hidden_state(&self) -> &VisualState {
        &self.hidden
    }

    /// Observed (selector-matched) nodes, in document order.
    pub fn observed_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.groups.keys().copied()
    }

    /// The phase of an observed node, if it belongs to this registration.
    pub fn phase(&self, observed: NodeId) -> Option<Phase> {
        self.groups.get(&observed).map(|g| g.phase)
    }

    /// The authoritative recorded state of an animated target.
    pub fn recorded_state(&self, target: NodeId) -> Option<&VisualState> {
        self.records.get(&target).map(|r| &r.state)
    }

    /// Evaluate visibility against `viewport` and dispatch transitions for
    /// every threshold crossing. Returns the crossings for host inspection.
    #[tracing::instrument(skip_all)]
    pub fn poll(
        &mut self,
        tree: &ElementTree,
        viewport: Rect,
        driver: &mut dyn AnimationDriver,
    ) -> Vec<IntersectionEntry> {
        if self.torn_down {
            return Vec::new();
        }
        let Some(observer) = &mut self.observer else {
            return Vec::new();
        };
        let entries = observer.evaluate(tree, viewport);
        self.apply_entries(&entries, driver);
        entries
    }

    /// Dispatch transitions for externally produced visibility entries.
    ///
    /// This is the observer-callback edge of the controller; [`Reveal::poll`]
    /// is a convenience that evaluates and applies in one step.
    pub fn apply_entries(&mut self, entries: &[IntersectionEntry], driver: &mut dyn AnimationDriver) {
        if self.torn_down {
            return;
        }
        for entry in entries {
            if entry.is_intersecting {
                self.begin_enter(entry.node, driver);
            } else {
                self.begin_exit(entry.node, driver);
            }
        }
    }

    /// Consume driver updates: merge interpolated states into the registry,
    /// push them to the host tree, and advance phases on completion.
    ///
    /// Updates whose handle does not match the target's current transition
    /// are stale (superseded or cancelled) and are dropped.
    pub fn absorb(&mut self, updates: &[TransitionUpdate], tree: &mut ElementTree) {
        if self.torn_down {
            return;
        }
        for update in updates {
            let Some(record) = self.records.get_mut(&update.node) else {
                continue;
            };
            if record.handle != Some(update.handle) {
                continue;
            }

            record.state.merge(&update.state);
            tree.apply_style(update.node, &update.state);

            if update.done {
                record.handle = None;
                if let Some(group) = self.groups.get_mut(&record.group) {
                    group.pending = group.pending.saturating_sub(1);
                    if group.pending == 0 {
                        group.phase = match group.phase {
                            Phase::Entering => Phase::Revealed,
                            Phase::Exiting => Phase::Hidden,
                            other => other,
                        };
                    }
                }
            }
        }
    }

    /// Disconnect the observer, cancel in-flight transitions, and clear
    /// the compositor-promotion hint on every target.
    ///
    /// After teardown the registration ignores entries and updates
    /// permanently.
    #[tracing::instrument(skip_all)]
    pub fn teardown(&mut self, tree: &mut ElementTree, driver: &mut dyn AnimationDriver) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if let Some(observer) = &mut self.observer {
            observer.disconnect();
        }
        self.observer = None;

        for (node, record) in self.records.iter_mut() {
            if let Some(handle) = record.handle.take() {
                driver.cancel(handle);
            }
            tree.set_will_change(*node, false);
        }
        tracing::debug!(targets = self.records.len(), "reveal torn down");
    }

    fn begin_enter(&mut self, observed: NodeId, driver: &mut dyn AnimationDriver) {
        let Some(group) = self.groups.get_mut(&observed) else {
            return;
        };
        if self.options.once && group.entered_once {
            return;
        }
        match group.phase {
            Phase::Entering | Phase::Revealed => return,
            Phase::Hidden | Phase::Exiting => {}
        }

        group.entered_once = true;
        if group.targets.is_empty() {
            group.phase = Phase::Revealed;
            return;
        }

        let mut targets: SmallVec<[PlayTarget; 4]> = SmallVec::new();
        for node in &group.targets {
            let Some(record) = self.records.get_mut(node) else {
                continue;
            };
            if let Some(handle) = record.handle.take() {
                driver.cancel(handle);
            }
            targets.push(PlayTarget {
                node: *node,
                from: record.state.clone(),
                index: record.index,
            });
        }

        let handle = driver.play(PlayRequest {
            targets,
            to: self.spec.target_state(),
            duration_ms: self.spec.duration_ms,
            ease: self.spec.ease,
            // Resolved per index inside the driver on every enter, so
            // staggering restarts from zero on each fresh intersection.
            delay: self.spec.delay,
        });

        group.pending = group.targets.len();
        group.phase = Phase::Entering;
        for node in &group.targets {
            if let Some(record) = self.records.get_mut(node) {
                record.handle = Some(handle);
            }
        }
        tracing::trace!(node = ?observed, "enter dispatched");
    }

    fn begin_exit(&mut self, observed: NodeId, driver: &mut dyn AnimationDriver) {
        let Some(group) = self.groups.get_mut(&observed) else {
            return;
        };
        if self.options.once && group.entered_once {
            return;
        }
        match group.phase {
            Phase::Hidden | Phase::Exiting => return,
            Phase::Entering | Phase::Revealed => {}
        }

        if group.targets.is_empty() {
            group.phase = Phase::Hidden;
            return;
        }

        let mut targets: SmallVec<[PlayTarget; 4]> = SmallVec::new();
        for node in &group.targets {
            let Some(record) = self.records.get_mut(node) else {
                continue;
            };
            if let Some(handle) = record.handle.take() {
                driver.cancel(handle);
            }
            targets.push(PlayTarget {
                node: *node,
                from: record.state.clone(),
                index: record.index,
            });
        }

        let handle = driver.play(PlayRequest {
            targets,
            to: self.hidden.clone(),
            duration_ms: EXIT_DURATION_MS,
            ease: EXIT_EASE,
            delay: Delay::None,
        });

        group.pending = group.targets.len();
        group.phase = Phase::Exiting;
        for node in &group.targets {
            if let Some(record) = self.records.get_mut(node) {
                record.handle = Some(handle);
            }
        }
        tracing::trace!(node = ?observed, "exit dispatched");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/controller.rs"]
mod tests;
