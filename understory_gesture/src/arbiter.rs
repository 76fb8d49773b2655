// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture arbitration between a pan and the scrollable region it competes with.
//!
//! A draggable surface that hosts scrollable content receives the same touches
//! as that content's own scroll gesture. [`ScrollCaringPan`] is told which
//! gestures drive the scrollable region ("driving gestures"). When the host's
//! gesture system asks whether the pan must wait for another gesture to fail,
//! the pan answers `true` for driving gestures, so the region's scroll wins
//! recognition and the surface follows it through scroll callbacks instead.
//!
//! The set of driving gestures is a list of [`GestureId`]s; the pan does not
//! hold on to the region itself.
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::arbiter::ScrollCaringPan;
//! use understory_gesture::pan::{GestureId, GestureState};
//!
//! let mut pan = ScrollCaringPan::new(GestureId::new(1));
//! pan.set_driving_gestures([GestureId::new(2)]);
//!
//! pan.touches_began(Point::new(20.0, 300.0), 0);
//! assert_eq!(pan.starting_location(), Point::new(20.0, 300.0));
//!
//! // Abort whatever is being recognized.
//! pan.cancel();
//! assert_eq!(pan.state(), GestureState::Cancelled);
//! assert!(pan.pan().is_enabled());
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::pan::{GestureId, GestureState, PanGesture};

/// A pan gesture that defers to a designated scrollable region's gestures.
#[derive(Clone, Debug)]
pub struct ScrollCaringPan {
    pan: PanGesture,
    driving: SmallVec<[GestureId; 2]>,
    starting_location: Point,
}

impl ScrollCaringPan {
    /// Creates a pan with no driving gestures.
    #[must_use]
    pub fn new(id: GestureId) -> Self {
        Self {
            pan: PanGesture::new(id),
            driving: SmallVec::new(),
            starting_location: Point::ZERO,
        }
    }

    /// Returns the underlying pan gesture.
    #[must_use]
    pub fn pan(&self) -> &PanGesture {
        &self.pan
    }

    /// Returns the underlying pan gesture mutably.
    pub fn pan_mut(&mut self) -> &mut PanGesture {
        &mut self.pan
    }

    /// Returns the current recognition state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.pan.state()
    }

    /// Cumulative translation of the current pan.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.pan.translation()
    }

    /// Velocity of the current pan, in points per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.pan.velocity()
    }

    /// Replaces the set of driving gestures.
    pub fn set_driving_gestures(&mut self, gestures: impl IntoIterator<Item = GestureId>) {
        self.driving.clear();
        self.driving.extend(gestures);
        tracing::debug!(
            id = self.pan.id().get(),
            count = self.driving.len(),
            "driving gestures set"
        );
    }

    /// Forgets all driving gestures.
    pub fn clear_driving_gestures(&mut self) {
        self.driving.clear();
    }

    /// Returns the current driving gestures.
    #[must_use]
    pub fn driving_gestures(&self) -> &[GestureId] {
        &self.driving
    }

    /// Returns `true` if this pan must wait for `other` to fail.
    ///
    /// Driving gestures always take precedence. Any other gesture gets the
    /// default answer, which is `false`.
    #[must_use]
    pub fn should_require_failure_of(&self, other: GestureId) -> bool {
        self.driving.contains(&other)
    }

    /// Location of the most recent touch-down.
    #[must_use]
    pub fn starting_location(&self) -> Point {
        self.starting_location
    }

    /// Feeds a touch-down.
    pub fn touches_began(&mut self, location: Point, now: u64) {
        self.starting_location = location;
        self.pan.begin(location, now);
    }

    /// Feeds a touch move, returning the delta since the previous sample.
    pub fn touches_moved(&mut self, location: Point, now: u64) -> Option<Vec2> {
        self.pan.update(location, now)
    }

    /// Feeds a touch-up.
    pub fn touches_ended(&mut self) -> bool {
        self.pan.end()
    }

    /// Aborts the current recognition by disabling and re-enabling the pan.
    pub fn cancel(&mut self) {
        self.pan.set_enabled(false);
        self.pan.set_enabled(true);
    }
}
