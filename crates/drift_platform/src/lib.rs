//! Platform abstraction for Drift
//!
//! Drift's scrolling engine never talks to a GUI toolkit directly. Everything
//! it needs from the host lives behind the capability traits in this crate:
//!
//! - [`CursorProbe`]: read the global pointer position
//! - [`UiScheduler`]: post a callback onto the thread that owns widget state
//! - [`ScrollTarget`]: pan a widget's viewport by mutating its pixel offsets
//! - [`ScrollCue`]: show/hide the anchor indicator while a drag is active
//! - [`WindowWiring`]: ask the host to observe a parent window for
//!   move/resize/dispose
//!
//! Hosts implement these once per toolkit; the engine and registry in
//! `drift_core` stay toolkit-agnostic.
//!
//! # Thread contracts
//!
//! GUI toolkits are single-threaded at the widget layer: widget state may only
//! be touched from the thread that runs the event loop. Drift's timing thread
//! therefore never calls [`ScrollTarget`] offset accessors itself; it posts
//! the mutation through [`UiScheduler`]. The traits below document on each
//! method which thread is allowed to call it. Implementations are shared as
//! `Arc<dyn …>` across both threads, hence the `Send + Sync` bounds.

pub mod error;

pub use error::{PlatformError, Result};

/// A position in screen space, integer pixels.
///
/// Cursor coordinates are global (screen-relative, not window-relative) so
/// that displacement stays meaningful when the pointer leaves the widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenPoint {
    /// Horizontal coordinate in pixels
    pub x: i32,
    /// Vertical coordinate in pixels
    pub y: i32,
}

impl ScreenPoint {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Identity of a rendering surface (a display/monitor context).
///
/// Screen coordinates and timers are only meaningful within one surface, so
/// the registry keys engines by this id. The host decides what a surface is
/// and mints the ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Identity of a top-level window hosting scrollable widgets.
///
/// Used only for deduplicating parent-window observation; one window commonly
/// hosts many scrollable widgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Mouse button identity for press dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary (usually left) button
    Primary,
    /// Middle button / wheel press - the drag-scroll trigger
    Middle,
    /// Secondary (usually right) button
    Secondary,
    /// Any other button, by host-specific index
    Other(u8),
}

/// Reads the current global cursor position.
///
/// Must be callable from any thread; the engine's timing thread samples it
/// between ticks without touching the GUI thread.
pub trait CursorProbe: Send + Sync {
    /// Current pointer coordinates in screen space.
    fn cursor_position(&self) -> ScreenPoint;
}

/// Posts callbacks onto the thread that owns widget state.
///
/// Fire-and-forget: `post` must not wait for the callback to run, and
/// submission order must be preserved. Callbacks may arrive after the widgets
/// they reference were destroyed; callers guard with
/// [`ScrollTarget::is_disposed`].
pub trait UiScheduler: Send + Sync {
    /// Enqueue `callback` to run later on the owning thread.
    fn post(&self, callback: Box<dyn FnOnce() + Send>);
}

/// A widget viewport that can be panned.
///
/// The handle itself crosses threads, but the offset accessors are only valid
/// from the owning GUI thread - the same contract the underlying toolkits
/// impose. Offsets are pixel positions of the viewport origin; panning adds a
/// delta to the current value. Implementations clamp out-of-range values
/// however the toolkit does; Drift never inspects the result.
pub trait ScrollTarget: Send + Sync {
    /// Current vertical pixel offset. Owning thread only.
    fn vertical_offset(&self) -> i32;

    /// Replace the vertical pixel offset. Owning thread only.
    fn set_vertical_offset(&self, px: i32);

    /// Current horizontal pixel offset. Owning thread only.
    fn horizontal_offset(&self) -> i32;

    /// Replace the horizontal pixel offset. Owning thread only.
    fn set_horizontal_offset(&self, px: i32);

    /// True once the underlying widget has been destroyed.
    ///
    /// Scheduled callbacks consult this before mutating; a stale callback
    /// against a destroyed widget is skipped silently.
    fn is_disposed(&self) -> bool;

    /// The top-level window hosting this widget.
    fn window(&self) -> WindowId;
}

/// Shows and hides the anchor indicator drawn while a drag scroll is active.
///
/// The circular "scroll tool" image itself is host-drawn; the engine only
/// reports when and where it should appear. Both methods are called from the
/// owning thread.
pub trait ScrollCue: Send + Sync {
    /// Show the indicator centered on the activation anchor.
    fn show(&self, anchor: ScreenPoint);

    /// Hide the indicator.
    fn hide(&self);
}

/// No-op cue for hosts without an overlay surface, and for headless tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCue;

impl ScrollCue for NoCue {
    fn show(&self, _anchor: ScreenPoint) {}
    fn hide(&self) {}
}

/// Host-side wiring of parent-window observation.
///
/// When a window is watched, the host is expected to report that window's
/// move/resize/dispose events back into the registry (`disable` on dispose,
/// `dispatch`-level deactivation on move/resize). The registry deduplicates:
/// each window is watched at most once per surface regardless of how many of
/// its widgets are enabled, and unwatched exactly once at surface teardown.
pub trait WindowWiring: Send + Sync {
    /// Begin observing `window`. Owning thread only.
    fn watch(&self, window: WindowId);

    /// Stop observing `window`. Owning thread only.
    fn unwatch(&self, window: WindowId);
}

/// No-op wiring for hosts that manage their own teardown, and for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWiring;

impl WindowWiring for NoWiring {
    fn watch(&self, _window: WindowId) {}
    fn unwatch(&self, _window: WindowId) {}
}
