//! Drift Core
//!
//! Middle-button drag scrolling for text widgets embedded in a host GUI.
//! Pressing the middle button over an enabled widget anchors a scroll; the
//! viewport then pans continuously with direction and speed taken from the
//! cursor's displacement from that anchor, until the button is released.
//!
//! This crate provides:
//!
//! - **Speed model** ([`speed`]): dead zone plus linear+quadratic response,
//!   turned into per-tick pixel deltas and an adaptive tick interval
//! - **Scroll engine** ([`engine`]): the activation state machine and the
//!   timing thread that samples the cursor and posts viewport mutations onto
//!   the GUI thread
//! - **Registry** ([`registry`]): per-surface engine ownership, enabled-widget
//!   bookkeeping, and press/release dispatch
//!
//! The host side of the picture - reading the cursor, scheduling onto the GUI
//! thread, the widgets themselves - lives behind the capability traits in
//! `drift_platform`.
//!
//! # Example
//!
//! ```ignore
//! use drift_core::ScrollRegistry;
//! use drift_platform::{PointerButton, SurfaceId};
//!
//! let mut registry = ScrollRegistry::new(cursor, scheduler);
//! registry.enable(widget, SurfaceId(0))?;
//!
//! // From the host's mouse filter:
//! registry.dispatch_press(&widget, PointerButton::Middle, position);
//! // ... the widget pans while the cursor strays from the anchor ...
//! registry.dispatch_release();
//! ```

pub mod engine;
pub mod registry;
pub mod speed;

pub use engine::ScrollEngine;
pub use registry::ScrollRegistry;
pub use speed::{SpeedProfile, TickPlan};
