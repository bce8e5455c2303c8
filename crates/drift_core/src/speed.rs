//! Scroll speed model
//!
//! Converts cursor displacement from the activation anchor into per-tick
//! pixel deltas and an adaptive tick interval. The response is linear plus
//! quadratic: small displacements give fine control, large displacements get
//! fast. A dead zone around the anchor absorbs hand tremor right after the
//! press.
//!
//! The model is pure arithmetic over two points; the engine owns when it runs.

use drift_platform::ScreenPoint;

/// Tuning for displacement-to-speed conversion.
///
/// Defaults carry the reference tuning; hosts that want a different feel
/// override individual fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedProfile {
    /// Radius around the anchor, in pixels, within which an axis produces no
    /// scrolling
    pub dead_zone: i32,
    /// Overall gain applied to the axis response, in pixels per millisecond
    /// per unit of response
    pub gain: f64,
    /// Linear term of the response curve
    pub linear: f64,
    /// Quadratic term of the response curve
    pub quadratic: f64,
    /// Floor for the tick interval, in milliseconds
    pub min_tick_ms: u64,
    /// Tick interval while no axis is moving, in milliseconds
    pub idle_tick_ms: u64,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            dead_zone: 12,
            gain: 0.005,
            linear: 0.6,
            quadratic: 0.012,
            min_tick_ms: 30,
            idle_tick_ms: 100,
        }
    }
}

/// One tick's worth of motion: signed pixel deltas plus the interval they
/// were computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickPlan {
    /// Pixels to add to the vertical offset this tick
    pub vertical_px: i32,
    /// Pixels to add to the horizontal offset this tick
    pub horizontal_px: i32,
    /// Sleep duration until the next tick, in milliseconds
    pub interval_ms: u64,
}

impl TickPlan {
    /// True when applying this plan pans the viewport.
    pub fn has_motion(&self) -> bool {
        self.vertical_px != 0 || self.horizontal_px != 0
    }
}

impl SpeedProfile {
    /// The plan while the cursor sits inside the dead zone: no motion, idle
    /// polling cadence.
    pub fn idle_plan(&self) -> TickPlan {
        TickPlan {
            vertical_px: 0,
            horizontal_px: 0,
            interval_ms: self.idle_tick_ms,
        }
    }

    /// Speed for one axis, in pixels per millisecond, from raw displacement.
    ///
    /// Zero inside the dead zone; sign follows the dead-zone-adjusted
    /// displacement.
    pub fn axis_speed(&self, displacement: i32) -> f64 {
        let s = f64::from(trim_dead_zone(displacement, self.dead_zone));
        self.gain * (self.linear * s + self.quadratic * s * s.abs())
    }

    /// Compute the tick plan for the current cursor position relative to the
    /// activation anchor.
    ///
    /// The interval comes from whichever axis needs the shorter wait to move
    /// one pixel, floored at [`SpeedProfile::min_tick_ms`]; each axis then
    /// gets the integer pixel delta it covers in that interval. With both
    /// axes inside the dead zone this degrades to [`SpeedProfile::idle_plan`]
    /// rather than dividing by zero.
    pub fn plan(&self, anchor: ScreenPoint, cursor: ScreenPoint) -> TickPlan {
        let vertical = self.axis_speed(cursor.y - anchor.y);
        let horizontal = self.axis_speed(cursor.x - anchor.x);

        if vertical == 0.0 && horizontal == 0.0 {
            return self.idle_plan();
        }

        let mut interval = u64::MAX;
        for speed in [vertical, horizontal] {
            if speed != 0.0 {
                interval = interval.min((1.0 / speed).abs().round() as u64);
            }
        }
        let interval = interval.max(self.min_tick_ms);

        TickPlan {
            vertical_px: (interval as f64 * vertical).round() as i32,
            horizontal_px: (interval as f64 * horizontal).round() as i32,
            interval_ms: interval,
        }
    }
}

/// Shrink `displacement` toward zero by `radius`, clamping at zero.
fn trim_dead_zone(displacement: i32, radius: i32) -> i32 {
    if displacement > 0 {
        (displacement - radius).max(0)
    } else {
        (displacement + radius).min(0)
    }
}
