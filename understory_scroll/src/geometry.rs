// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point and velocity helpers shared by scroll observers.

use kurbo::{Point, Vec2};

pub use understory_gesture::pan::VerticalDirection;

/// Factor applied to will-end-dragging velocities relayed to a proxy target.
///
/// Regions report end-of-drag velocity as content movement in points per
/// millisecond. Proxy targets receive finger movement in points per second,
/// which has the opposite sign, hence `-1000`.
pub const TARGET_VELOCITY_SCALE: f64 = -1000.0;

/// Returns `point` moved by `delta`.
#[must_use]
pub fn offset_by(point: Point, delta: Vec2) -> Point {
    Point::new(point.x + delta.x, point.y + delta.y)
}

/// Returns `velocity` with both components multiplied by `factor`.
#[must_use]
pub fn scaled(velocity: Vec2, factor: f64) -> Vec2 {
    Vec2::new(velocity.x * factor, velocity.y * factor)
}

/// Returns `true` if `a` and `b` lie strictly on opposite sides of `pivot`.
#[must_use]
pub fn on_opposite_sides(a: f64, b: f64, pivot: f64) -> bool {
    (a - pivot) * (b - pivot) < 0.0
}
