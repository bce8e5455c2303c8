//! Widget registry - per-surface engine ownership and event dispatch
//!
//! The registry is the host-facing surface of Drift. Hosts enable widgets on
//! a rendering surface and forward raw button events; the registry owns one
//! [`ScrollEngine`] per surface, created lazily when the first widget is
//! enabled and disposed when the last one leaves.
//!
//! It also deduplicates parent-window observation: one window commonly hosts
//! several scrollable widgets, and the host's move/resize/dispose hooks must
//! be installed once per window, not once per widget.
//!
//! Every method is owning-thread-only, like the widget APIs it brokers. All
//! operations are idempotent; enabling twice or disabling an unknown target
//! is a no-op, never an error.
//!
//! # Example
//!
//! ```ignore
//! use drift_core::ScrollRegistry;
//!
//! let mut registry = ScrollRegistry::new(cursor, scheduler)
//!     .with_wiring(wiring)
//!     .with_cue(cue);
//!
//! registry.enable(editor.scroll_target(), surface)?;
//! // ... host event filter ...
//! registry.dispatch_press(&target, button, position);
//! registry.dispatch_release();
//! ```

use std::collections::hash_map::Entry;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use drift_platform::{
    CursorProbe, NoCue, NoWiring, PointerButton, Result, ScreenPoint, ScrollCue, ScrollTarget,
    SurfaceId, UiScheduler, WindowId, WindowWiring,
};

use crate::engine::ScrollEngine;
use crate::speed::SpeedProfile;

/// Key for a target handle. Targets have no identity beyond reference
/// equality, so the key is the `Arc`'s data pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TargetKey(usize);

impl TargetKey {
    fn of(target: &Arc<dyn ScrollTarget>) -> Self {
        Self(Arc::as_ptr(target) as *const () as usize)
    }
}

/// Per-surface bookkeeping: the engine, the enabled set, and the parent
/// windows already being watched.
struct SurfaceEntry {
    engine: ScrollEngine,
    targets: FxHashMap<TargetKey, Arc<dyn ScrollTarget>>,
    windows: SmallVec<[WindowId; 2]>,
}

/// Tracks which widgets have drag scrolling enabled and routes press/release
/// events to the right surface's engine.
///
/// A plain owned value; the host decides where it lives and is responsible
/// for calling [`ScrollRegistry::disable`] when a widget is destroyed, loses
/// focus, or its window moves or resizes.
pub struct ScrollRegistry {
    cursor: Arc<dyn CursorProbe>,
    scheduler: Arc<dyn UiScheduler>,
    cue: Arc<dyn ScrollCue>,
    wiring: Arc<dyn WindowWiring>,
    profile: SpeedProfile,
    surfaces: FxHashMap<SurfaceId, SurfaceEntry>,
    /// Reverse index from enabled target to its surface
    index: FxHashMap<TargetKey, SurfaceId>,
}

impl ScrollRegistry {
    /// Create a registry over the two capabilities every host must provide.
    ///
    /// The anchor cue and window wiring default to no-ops; override them with
    /// [`ScrollRegistry::with_cue`] and [`ScrollRegistry::with_wiring`].
    pub fn new(cursor: Arc<dyn CursorProbe>, scheduler: Arc<dyn UiScheduler>) -> Self {
        Self {
            cursor,
            scheduler,
            cue: Arc::new(NoCue),
            wiring: Arc::new(NoWiring),
            profile: SpeedProfile::default(),
            surfaces: FxHashMap::default(),
            index: FxHashMap::default(),
        }
    }

    /// Use `cue` for anchor feedback while a drag is active.
    pub fn with_cue(mut self, cue: Arc<dyn ScrollCue>) -> Self {
        self.cue = cue;
        self
    }

    /// Ask `wiring` to observe parent windows of enabled widgets.
    pub fn with_wiring(mut self, wiring: Arc<dyn WindowWiring>) -> Self {
        self.wiring = wiring;
        self
    }

    /// Override the speed tuning for engines created after this call.
    pub fn with_profile(mut self, profile: SpeedProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Enable drag scrolling for `target` on `surface`. Idempotent.
    ///
    /// Lazily creates the surface's engine; the only failure mode is the
    /// timing thread refusing to spawn. The target's parent window is handed
    /// to the wiring capability the first time any widget of that window is
    /// enabled on this surface.
    pub fn enable(&mut self, target: Arc<dyn ScrollTarget>, surface: SurfaceId) -> Result<()> {
        let key = TargetKey::of(&target);
        if self.index.contains_key(&key) {
            return Ok(());
        }

        let entry = match self.surfaces.entry(surface) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let engine = ScrollEngine::new(
                    Arc::clone(&self.cursor),
                    Arc::clone(&self.scheduler),
                    Arc::clone(&self.cue),
                    self.profile,
                )?;
                tracing::debug!(surface = surface.0, "Scroll engine created");
                vacant.insert(SurfaceEntry {
                    engine,
                    targets: FxHashMap::default(),
                    windows: SmallVec::new(),
                })
            }
        };

        let window = target.window();
        if !entry.windows.contains(&window) {
            entry.windows.push(window);
            self.wiring.watch(window);
        }

        entry.targets.insert(key, target);
        self.index.insert(key, surface);
        Ok(())
    }

    /// Disable drag scrolling for `target`. Idempotent.
    ///
    /// If the target is currently being scrolled the scroll ends first; a
    /// live polling loop never outlasts its target's enabled status. When the
    /// surface's enabled set becomes empty its engine is disposed and the
    /// watched windows are released.
    pub fn disable(&mut self, target: &Arc<dyn ScrollTarget>) {
        let key = TargetKey::of(target);
        let Some(surface) = self.index.remove(&key) else {
            return;
        };
        let Some(entry) = self.surfaces.get_mut(&surface) else {
            return;
        };

        if let Some(removed) = entry.targets.remove(&key) {
            if entry.engine.is_scrolling(&removed) {
                entry.engine.deactivate();
            }
        }

        if entry.targets.is_empty() {
            self.dispose_surface(surface);
        }
    }

    /// Disable every enabled target on every surface. Process-wide teardown.
    pub fn disable_all(&mut self) {
        let surfaces: Vec<SurfaceId> = self.surfaces.keys().copied().collect();
        for surface in surfaces {
            self.dispose_surface(surface);
        }
    }

    /// Route a raw button press observed over `target`.
    ///
    /// A middle press over an enabled target activates its surface's engine,
    /// anchored at `position`. Any other press - a different button, an
    /// unknown target, or a middle press while a scroll is already in flight
    /// - ends whatever scroll is running instead; pressing again is how the
    /// user stops a click-started scroll.
    pub fn dispatch_press(
        &self,
        target: &Arc<dyn ScrollTarget>,
        button: PointerButton,
        position: ScreenPoint,
    ) {
        if button == PointerButton::Middle {
            if let Some(entry) = self.entry_of(target) {
                if !entry.engine.is_active() {
                    entry.engine.activate(Arc::clone(target), position);
                    return;
                }
            }
        }
        for entry in self.surfaces.values() {
            entry.engine.deactivate();
        }
    }

    /// Route a raw button release.
    ///
    /// Ends the scroll only once the viewport has actually been panned; an
    /// immediate release is a plain click and leaves scrolling mode armed
    /// until the next press.
    pub fn dispatch_release(&self) {
        for entry in self.surfaces.values() {
            if entry.engine.is_active() && entry.engine.has_scrolled() {
                entry.engine.deactivate();
            }
        }
    }

    /// True while `target` is enabled on some surface.
    pub fn is_enabled(&self, target: &Arc<dyn ScrollTarget>) -> bool {
        self.index.contains_key(&TargetKey::of(target))
    }

    /// True while some widget on `surface` is being scrolled.
    pub fn is_scrolling(&self, surface: SurfaceId) -> bool {
        self.surfaces
            .get(&surface)
            .is_some_and(|entry| entry.engine.is_active())
    }

    fn entry_of(&self, target: &Arc<dyn ScrollTarget>) -> Option<&SurfaceEntry> {
        let surface = self.index.get(&TargetKey::of(target))?;
        self.surfaces.get(surface)
    }

    /// Tear down one surface: release watched windows, drop the engine
    /// (terminal; its timing thread is joined), and forget its targets.
    fn dispose_surface(&mut self, surface: SurfaceId) {
        let Some(entry) = self.surfaces.remove(&surface) else {
            return;
        };
        for key in entry.targets.keys() {
            self.index.remove(key);
        }
        for window in &entry.windows {
            self.wiring.unwatch(*window);
        }
        tracing::debug!(surface = surface.0, "Scroll engine disposed");
    }
}

impl Drop for ScrollRegistry {
    fn drop(&mut self) {
        self.disable_all();
    }
}
