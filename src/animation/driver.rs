use smallvec::SmallVec;

use crate::{
    animation::ease::Ease,
    animation::spec::{Delay, VisualState},
    foundation::core::{NodeId, TimeMs},
};

/// Handle to a dispatched transition.
///
/// One handle covers every target of the [`PlayRequest`] that produced it;
/// updates carry the target node alongside the handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionHandle(pub u64);

/// One animated target inside a [`PlayRequest`].
#[derive(Clone, Debug)]
pub struct PlayTarget {
    /// The node to animate.
    pub node: NodeId,
    /// The state the transition starts from. For interrupted transitions
    /// this is the interpolated state at the moment of interruption, not
    /// the hidden state.
    pub from: VisualState,
    /// Position of this target within its group, used by index-keyed delay.
    pub index: usize,
}

/// A playback request handed to the animation driver.
///
/// The controller computes `from`/`to` states and timing; the driver owns
/// interpolation and scheduling.
#[derive(Clone, Debug)]
pub struct PlayRequest {
    /// Targets animated by this request.
    pub targets: SmallVec<[PlayTarget; 4]>,
    /// Common destination state for every target.
    pub to: VisualState,
    /// Transition duration in milliseconds.
    pub duration_ms: f64,
    /// Easing curve identifier.
    pub ease: Ease,
    /// Start delay, resolved per target index by the driver.
    pub delay: Delay,
}

/// One progress report from the driver for a single target.
#[derive(Clone, Debug)]
pub struct TransitionUpdate {
    /// The transition this update belongs to.
    pub handle: TransitionHandle,
    /// The updated target.
    pub node: NodeId,
    /// Interpolated state at the report time, covering the destination
    /// properties of the request.
    pub state: VisualState,
    /// Whether the target's track has completed. A completed track emits
    /// its final state in the same update and is then retired.
    pub done: bool,
}

/// Playback boundary between the reveal controller and the host's
/// animation machinery.
///
/// Starting a new transition on a node does not implicitly stop an earlier
/// one; the controller cancels superseded handles explicitly before
/// replaying.
pub trait AnimationDriver {
    /// Begin playing `request`, returning a handle covering all its targets.
    fn play(&mut self, request: PlayRequest) -> TransitionHandle;

    /// Stop every track belonging to `handle`. Already-retired handles are
    /// ignored.
    fn cancel(&mut self, handle: TransitionHandle);
}

struct TimelineTrack {
    handle: TransitionHandle,
    node: NodeId,
    from: VisualState,
    to: VisualState,
    start: TimeMs,
    duration_ms: f64,
    ease: Ease,
}

/// Reference [`AnimationDriver`] driven by a host rendering loop.
///
/// The driver holds active tracks and interpolates them whenever the host
/// calls [`TimelineDriver::advance`] with the current timestamp. Requests
/// played before the first advance are scheduled relative to
/// [`TimeMs::ZERO`].
#[derive(Default)]
pub struct TimelineDriver {
    now: TimeMs,
    next_handle: u64,
    tracks: Vec<TimelineTrack>,
}

impl TimelineDriver {
    /// An idle driver at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The timestamp of the latest advance.
    pub fn now(&self) -> TimeMs {
        self.now
    }

    /// Number of live (not yet completed or cancelled) tracks.
    pub fn active_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no track is live.
    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Advance the timeline to `now` and report per-target updates.
    ///
    /// Tracks still inside their start delay emit nothing. Completed tracks
    /// emit a final `done` update with their destination state and are
    /// retired. Time never moves backwards; an earlier `now` is clamped to
    /// the current time.
    pub fn advance(&mut self, now: TimeMs) -> Vec<TransitionUpdate> {
        if now.0 > self.now.0 {
            self.now = now;
        }
        let now = self.now;

        let mut updates = Vec::new();
        for track in &self.tracks {
            let elapsed = now.since(track.start);
            if elapsed < 0.0 {
                continue;
            }
            let t = if track.duration_ms <= 0.0 {
                1.0
            } else {
                (elapsed / track.duration_ms).min(1.0)
            };
            let eased = track.ease.apply(t);
            updates.push(TransitionUpdate {
                handle: track.handle,
                node: track.node,
                state: sample(&track.from, &track.to, eased),
                done: t >= 1.0,
            });
        }

        self.tracks
            .retain(|track| now.since(track.start) < track.duration_ms);
        updates
    }
}

impl AnimationDriver for TimelineDriver {
    fn play(&mut self, request: PlayRequest) -> TransitionHandle {
        let handle = TransitionHandle(self.next_handle);
        self.next_handle += 1;

        for target in request.targets {
            let delay = request.delay.resolve(target.index).max(0.0);
            self.tracks.push(TimelineTrack {
                handle,
                node: target.node,
                from: target.from,
                to: request.to.clone(),
                start: self.now.offset(delay),
                duration_ms: request.duration_ms,
                ease: request.ease,
            });
        }
        handle
    }

    fn cancel(&mut self, handle: TransitionHandle) {
        self.tracks.retain(|track| track.handle != handle);
    }
}

/// Interpolate the destination properties at eased progress `t`.
///
/// Only properties named by `to` are produced; a property missing from
/// `from` starts at its resting value.
fn sample(from: &VisualState, to: &VisualState, t: f64) -> VisualState {
    let mut out = VisualState::default();
    for (prop, target) in to.iter() {
        let start = from.value_or_resting(prop);
        out.set(prop, start + (target - start) * t);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
