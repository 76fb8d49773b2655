// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan gesture state: translation, velocity and recognition state for one pan.
//!
//! ## Usage
//!
//! 1) Call [`PanGesture::begin`] with the touch-down location and a timestamp.
//! 2) On each move, call [`PanGesture::update`] to get the delta since the last sample.
//! 3) Read [`PanGesture::translation`] for the cumulative movement and
//!    [`PanGesture::velocity`] for the most recent speed in points per second.
//! 4) Finish with [`PanGesture::end`], or abort with [`PanGesture::set_enabled`]`(false)`.
//!
//! Translation and velocity stay readable after [`PanGesture::end`] so that
//! end-of-gesture handlers can use them; they reset on the next
//! [`PanGesture::begin`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_gesture::pan::{GestureId, GestureState, PanGesture};
//!
//! let mut pan = PanGesture::new(GestureId::new(7));
//!
//! pan.begin(Point::new(10.0, 20.0), 1_000);
//! assert!(pan.is_active());
//!
//! let delta = pan.update(Point::new(15.0, 25.0), 1_016).unwrap();
//! assert_eq!(delta, Vec2::new(5.0, 5.0));
//!
//! pan.end();
//! assert_eq!(pan.state(), GestureState::Ended);
//! assert_eq!(pan.translation(), Vec2::new(5.0, 5.0));
//! ```

use kurbo::{Point, Vec2};

/// Identifier for a gesture, assigned by the host.
///
/// Arbitration compares gestures by id, so ids must be unique among the
/// gestures that can compete with each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GestureId(u32);

impl GestureId {
    /// Creates an id from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Recognition state of a [`PanGesture`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No pan in progress.
    #[default]
    Possible,
    /// A pan just started; no movement has been reported yet.
    Began,
    /// The pan moved at least once since it began.
    Changed,
    /// The pan finished normally.
    Ended,
    /// The pan was aborted before finishing.
    Cancelled,
}

impl GestureState {
    /// Returns `true` for [`GestureState::Began`] and [`GestureState::Changed`].
    #[must_use]
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }
}

/// Vertical direction of a velocity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VerticalDirection {
    /// Toward the top of the screen (negative y).
    Up,
    /// Toward the bottom of the screen (positive y).
    Down,
    /// No vertical movement.
    None,
}

impl VerticalDirection {
    /// Classifies the vertical component of `velocity`.
    #[must_use]
    pub fn of(velocity: Vec2) -> Self {
        if velocity.y == 0.0 {
            Self::None
        } else if velocity.y < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Tracks one continuous pan gesture.
#[derive(Clone, Debug)]
pub struct PanGesture {
    id: GestureId,
    enabled: bool,
    state: GestureState,
    start_pos: Option<Point>,
    last_pos: Option<Point>,
    last_time: u64,
    velocity: Vec2,
}

impl PanGesture {
    /// Creates an enabled pan gesture with no pan in progress.
    #[must_use]
    pub fn new(id: GestureId) -> Self {
        Self {
            id,
            enabled: true,
            state: GestureState::Possible,
            start_pos: None,
            last_pos: None,
            last_time: 0,
            velocity: Vec2::ZERO,
        }
    }

    /// Returns the gesture's id.
    #[must_use]
    pub fn id(&self) -> GestureId {
        self.id
    }

    /// Returns the current recognition state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Returns `true` while a pan is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_in_progress()
    }

    /// Returns `true` if the gesture accepts new pans.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the gesture.
    ///
    /// Disabling while a pan is in progress cancels it: the state becomes
    /// [`GestureState::Cancelled`] and the tracked positions are dropped.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.is_active() {
            tracing::trace!(id = self.id.0, "pan cancelled");
            self.state = GestureState::Cancelled;
            self.start_pos = None;
            self.last_pos = None;
            self.velocity = Vec2::ZERO;
        }
        self.enabled = enabled;
    }

    /// Starts a new pan at `pos`.
    ///
    /// Returns `false` (and does nothing) when the gesture is disabled.
    pub fn begin(&mut self, pos: Point, now: u64) -> bool {
        if !self.enabled {
            return false;
        }
        self.state = GestureState::Began;
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.last_time = now;
        self.velocity = Vec2::ZERO;
        true
    }

    /// Moves the pan to `pos`, returning the delta since the previous sample.
    ///
    /// Velocity is recomputed from the delta and the elapsed time. Samples
    /// with the same timestamp as the previous one keep the previous velocity.
    pub fn update(&mut self, pos: Point, now: u64) -> Option<Vec2> {
        if !self.is_active() {
            return None;
        }
        let last = self.last_pos?;
        let delta = pos - last;
        let elapsed = now.saturating_sub(self.last_time);
        if elapsed > 0 {
            self.velocity = delta * (1000.0 / elapsed as f64);
        }
        self.last_pos = Some(pos);
        self.last_time = now;
        self.state = GestureState::Changed;
        Some(delta)
    }

    /// Finishes the pan.
    ///
    /// Returns `false` if no pan was in progress.
    pub fn end(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = GestureState::Ended;
        true
    }

    /// Location where the current (or last) pan started.
    #[must_use]
    pub fn start_location(&self) -> Option<Point> {
        self.start_pos
    }

    /// Most recent location of the current (or last) pan.
    #[must_use]
    pub fn location(&self) -> Option<Point> {
        self.last_pos
    }

    /// Cumulative translation since the pan started.
    ///
    /// Returns [`Vec2::ZERO`] when no pan has been tracked.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        match (self.start_pos, self.last_pos) {
            (Some(start), Some(last)) => last - start,
            _ => Vec2::ZERO,
        }
    }

    /// Rebases the pan so that [`PanGesture::translation`] reads `translation`.
    ///
    /// Subsequent movement accumulates on top of the new value.
    pub fn set_translation(&mut self, translation: Vec2) {
        if let Some(last) = self.last_pos {
            self.start_pos = Some(last - translation);
        }
    }

    /// Velocity of the most recent movement, in points per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overrides the velocity.
    ///
    /// Useful when the platform already provides a filtered velocity estimate.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Vertical direction of the current velocity.
    #[must_use]
    pub fn y_direction(&self) -> VerticalDirection {
        VerticalDirection::of(self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pan() -> PanGesture {
        PanGesture::new(GestureId::new(1))
    }

    #[test]
    fn new_pan_is_possible_and_idle() {
        let pan = pan();
        assert_eq!(pan.state(), GestureState::Possible);
        assert!(!pan.is_active());
        assert_eq!(pan.translation(), Vec2::ZERO);
        assert_eq!(pan.velocity(), Vec2::ZERO);
    }

    #[test]
    fn begin_sets_start_and_last_location() {
        let mut pan = pan();
        let start = Point::new(10.0, 20.0);

        assert!(pan.begin(start, 0));

        assert_eq!(pan.state(), GestureState::Began);
        assert_eq!(pan.start_location(), Some(start));
        assert_eq!(pan.location(), Some(start));
    }

    #[test]
    fn update_returns_incremental_deltas() {
        let mut pan = pan();
        pan.begin(Point::new(0.0, 0.0), 0);

        assert_eq!(
            pan.update(Point::new(5.0, 3.0), 10),
            Some(Vec2::new(5.0, 3.0))
        );
        assert_eq!(
            pan.update(Point::new(8.0, 7.0), 20),
            Some(Vec2::new(3.0, 4.0))
        );
        assert_eq!(pan.translation(), Vec2::new(8.0, 7.0));
        assert_eq!(pan.state(), GestureState::Changed);
    }

    #[test]
    fn update_without_begin_is_ignored() {
        let mut pan = pan();
        assert_eq!(pan.update(Point::new(1.0, 1.0), 5), None);
        assert_eq!(pan.location(), None);
    }

    #[test]
    fn velocity_is_points_per_second() {
        let mut pan = pan();
        pan.begin(Point::new(0.0, 100.0), 1_000);
        pan.update(Point::new(0.0, 90.0), 1_020);
        assert_eq!(pan.velocity(), Vec2::new(0.0, -500.0));
        assert_eq!(pan.y_direction(), VerticalDirection::Up);
    }

    #[test]
    fn same_timestamp_keeps_previous_velocity() {
        let mut pan = pan();
        pan.begin(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(0.0, 10.0), 10);
        pan.update(Point::new(0.0, 30.0), 10);
        assert_eq!(pan.velocity(), Vec2::new(0.0, 1000.0));
        assert_eq!(pan.y_direction(), VerticalDirection::Down);
    }

    #[test]
    fn set_translation_rebases_future_movement() {
        let mut pan = pan();
        pan.begin(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(0.0, -40.0), 10);

        pan.set_translation(Vec2::ZERO);
        assert_eq!(pan.translation(), Vec2::ZERO);

        pan.update(Point::new(0.0, -45.0), 20);
        assert_eq!(pan.translation(), Vec2::new(0.0, -5.0));
    }

    #[test]
    fn end_keeps_translation_readable() {
        let mut pan = pan();
        pan.begin(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(3.0, 4.0), 8);

        assert!(pan.end());
        assert_eq!(pan.state(), GestureState::Ended);
        assert_eq!(pan.translation(), Vec2::new(3.0, 4.0));
        assert!(!pan.end());
    }

    #[test]
    fn disabling_cancels_in_progress_pan() {
        let mut pan = pan();
        pan.begin(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(0.0, 12.0), 16);

        pan.set_enabled(false);

        assert_eq!(pan.state(), GestureState::Cancelled);
        assert_eq!(pan.translation(), Vec2::ZERO);
        assert_eq!(pan.velocity(), Vec2::ZERO);
        assert!(!pan.begin(Point::new(1.0, 1.0), 20));

        pan.set_enabled(true);
        assert!(pan.begin(Point::new(1.0, 1.0), 30));
        assert_eq!(pan.state(), GestureState::Began);
    }

    #[test]
    fn begin_overwrites_previous_pan() {
        let mut pan = pan();
        pan.begin(Point::new(0.0, 0.0), 0);
        pan.update(Point::new(10.0, 10.0), 10);
        pan.end();

        pan.begin(Point::new(50.0, 60.0), 100);
        assert_eq!(pan.translation(), Vec2::ZERO);
        assert_eq!(pan.velocity(), Vec2::ZERO);
        pan.update(Point::new(55.0, 65.0), 110);
        assert_eq!(pan.translation(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn direction_classification() {
        assert_eq!(
            VerticalDirection::of(Vec2::new(3.0, 0.0)),
            VerticalDirection::None
        );
        assert_eq!(
            VerticalDirection::of(Vec2::new(0.0, -0.5)),
            VerticalDirection::Up
        );
        assert_eq!(
            VerticalDirection::of(Vec2::new(0.0, 0.5)),
            VerticalDirection::Down
        );
    }
}
