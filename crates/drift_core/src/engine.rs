//! Scroll engine - activation state machine and timing loop
//!
//! One engine serves every enabled widget on a rendering surface, scrolling
//! at most one of them at a time. Activation records the cursor anchor and
//! wakes a long-lived timing thread; each tick of that thread samples the
//! global cursor, recomputes the [`TickPlan`](crate::speed::TickPlan) when
//! the pointer moved, and posts a callback through the host's
//! [`UiScheduler`] that applies the plan to the widget.
//!
//! The split matters: widget state may only be mutated from the thread that
//! owns the GUI event loop, and the event loop must never sleep. The timing
//! thread decides *what* to do, the posted callback *does* it.
//!
//! # States
//!
//! Idle (no target, thread parked on the condvar) and Scrolling (target set,
//! thread ticking). [`ScrollEngine::deactivate`] returns to Idle without
//! ending the thread; dropping the engine is terminal and joins it.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use drift_platform::{
    CursorProbe, PlatformError, Result, ScreenPoint, ScrollCue, ScrollTarget, UiScheduler,
};

use crate::speed::{SpeedProfile, TickPlan};

/// Drives drag scrolling for one rendering surface.
pub struct ScrollEngine {
    shared: Arc<EngineShared>,
    cue: Arc<dyn ScrollCue>,
    thread: Option<JoinHandle<()>>,
}

/// Everything the timing thread and the posted callbacks can reach.
struct EngineShared {
    cursor: Arc<dyn CursorProbe>,
    scheduler: Arc<dyn UiScheduler>,
    profile: SpeedProfile,
    state: Mutex<ActivationState>,
    wake: Condvar,
}

/// Mutable engine state. Every read and write happens under the engine lock;
/// the plan fields are only ever replaced together.
struct ActivationState {
    /// Widget being scrolled; `Some` iff the engine is Scrolling
    target: Option<Arc<dyn ScrollTarget>>,
    /// Cursor position recorded at activation, fixed until the next one
    anchor: ScreenPoint,
    /// Most recent position observed by the timing loop
    last_sampled: ScreenPoint,
    /// Per-tick deltas and tick interval currently in force
    plan: TickPlan,
    /// True once a tick has carried a nonzero delta this activation
    has_moved: bool,
    /// Terminal flag; set once, at disposal
    shutdown: bool,
}

impl ScrollEngine {
    /// Create an engine and start its timing thread.
    ///
    /// The thread outlives individual activations: it parks on a condition
    /// variable while Idle and is only ended by dropping the engine.
    pub fn new(
        cursor: Arc<dyn CursorProbe>,
        scheduler: Arc<dyn UiScheduler>,
        cue: Arc<dyn ScrollCue>,
        profile: SpeedProfile,
    ) -> Result<Self> {
        let shared = Arc::new(EngineShared {
            cursor,
            scheduler,
            profile,
            state: Mutex::new(ActivationState {
                target: None,
                anchor: ScreenPoint::default(),
                last_sampled: ScreenPoint::default(),
                plan: profile.idle_plan(),
                has_moved: false,
                shutdown: false,
            }),
            wake: Condvar::new(),
        });

        let loop_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("drift-scroll-timer".into())
            .spawn(move || timing_loop(loop_shared))
            .map_err(|e| PlatformError::TimingThread(e.to_string()))?;

        Ok(Self {
            shared,
            cue,
            thread: Some(thread),
        })
    }

    /// True while a widget is being scrolled.
    pub fn is_active(&self) -> bool {
        self.shared.state.lock().unwrap().target.is_some()
    }

    /// True while `target` specifically is the widget being scrolled.
    pub fn is_scrolling(&self, target: &Arc<dyn ScrollTarget>) -> bool {
        let state = self.shared.state.lock().unwrap();
        state
            .target
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, target))
    }

    /// True once the viewport has actually been panned since the last
    /// activation. Release handling uses this to tell a drag from a click.
    pub fn has_scrolled(&self) -> bool {
        self.shared.state.lock().unwrap().has_moved
    }

    /// Start scrolling `target` with the cursor anchored at
    /// `cursor_position`.
    ///
    /// Rejected (returns `false`) while another scroll is in flight; at most
    /// one widget per surface scrolls at a time. On success the anchor cue
    /// appears at the anchor and the timing loop wakes for an immediate
    /// first sample.
    pub fn activate(&self, target: Arc<dyn ScrollTarget>, cursor_position: ScreenPoint) -> bool {
        {
            let mut state = self.shared.state.lock().unwrap();
            if state.shutdown || state.target.is_some() {
                return false;
            }
            state.target = Some(target);
            state.anchor = cursor_position;
            state.last_sampled = cursor_position;
            state.plan = self.shared.profile.idle_plan();
            state.has_moved = false;
            self.shared.wake.notify_all();
        }
        self.cue.show(cursor_position);
        tracing::debug!(
            x = cursor_position.x,
            y = cursor_position.y,
            "Drag scroll activated"
        );
        true
    }

    /// Stop scrolling. Idempotent; a no-op while Idle.
    ///
    /// Level-triggered: this only clears the target. The timing loop observes
    /// the cleared target on its next wake and parks until the next
    /// activation.
    pub fn deactivate(&self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            if state.target.take().is_none() {
                return;
            }
            self.shared.wake.notify_all();
        }
        self.cue.hide();
        tracing::debug!("Drag scroll deactivated");
    }
}

impl Drop for ScrollEngine {
    /// Terminal disposal: end any scroll in flight, interrupt the timing
    /// thread's sleep or park, and join it.
    fn drop(&mut self) {
        let was_active = {
            let mut state = self.shared.state.lock().unwrap();
            let was_active = state.target.take().is_some();
            state.shutdown = true;
            self.shared.wake.notify_all();
            was_active
        };
        if was_active {
            self.cue.hide();
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        tracing::debug!("Scroll engine disposed");
    }
}

/// Timing loop body.
///
/// Parks on the condvar while Idle (wait-with-predicate, so spurious wakes
/// while Idle sample nothing). While Scrolling, waits out the current tick
/// interval on the same condvar so deactivation and disposal interrupt the
/// sleep, then samples the cursor and recomputes the plan if the pointer
/// moved. Every tick ends by posting the apply callback; the loop itself
/// never touches the widget.
fn timing_loop(shared: Arc<EngineShared>) {
    loop {
        {
            let mut state = shared.state.lock().unwrap();
            if state.shutdown {
                return;
            }
            if state.target.is_some() {
                let interval = Duration::from_millis(state.plan.interval_ms);
                state = shared.wake.wait_timeout(state, interval).unwrap().0;
            } else {
                while state.target.is_none() && !state.shutdown {
                    state = shared.wake.wait(state).unwrap();
                }
            }
            if state.shutdown {
                return;
            }
            if state.target.is_none() {
                // Deactivated during the sleep; go back to the park branch.
                continue;
            }
        }

        // Sampling and arithmetic run without the lock; it is taken back only
        // for the read-modify-write of the plan.
        let sampled = shared.cursor.cursor_position();
        {
            let mut state = shared.state.lock().unwrap();
            if state.target.is_some() && sampled != state.last_sampled {
                state.last_sampled = sampled;
                let plan = shared.profile.plan(state.anchor, sampled);
                if plan.has_motion() {
                    state.has_moved = true;
                }
                tracing::trace!(
                    vertical = plan.vertical_px,
                    horizontal = plan.horizontal_px,
                    interval_ms = plan.interval_ms,
                    "Tick plan recomputed"
                );
                state.plan = plan;
            }
        }

        let tick_shared = Arc::clone(&shared);
        shared
            .scheduler
            .post(Box::new(move || apply_tick(&tick_shared)));
    }
}

/// GUI-thread half of a tick: copy the current plan and target out under the
/// lock, then pan the widget outside it.
///
/// The plan is re-read here rather than captured at scheduling time, so a
/// deactivation or recomputation that lands between the post and the
/// delivery wins. A target destroyed in that window is skipped silently.
fn apply_tick(shared: &EngineShared) {
    let (target, vertical, horizontal) = {
        let state = shared.state.lock().unwrap();
        match state.target.as_ref() {
            Some(target) => (
                Arc::clone(target),
                state.plan.vertical_px,
                state.plan.horizontal_px,
            ),
            None => return,
        }
    };
    if target.is_disposed() {
        return;
    }
    if vertical != 0 {
        target.set_vertical_offset(target.vertical_offset() + vertical);
    }
    if horizontal != 0 {
        target.set_horizontal_offset(target.horizontal_offset() + horizontal);
    }
}
