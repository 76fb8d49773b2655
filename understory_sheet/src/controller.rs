// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bottom sheet state machine.
//!
//! [`SheetController`] owns the sheet height and decides, frame by frame,
//! whether a drag moves the sheet or the content inside it. It is fed from two
//! sources:
//!
//! - its own pan ([`SheetController::pan_mut`] + [`SheetController::handle_pan`])
//!   for drags that start on non-scrolling parts of the sheet;
//! - the [`ScrollObserver`] callbacks of the hosted scroll region, for drags
//!   that start on the content.
//!
//! ## Who moves
//!
//! While the region is tracking a finger, each `did_scroll` checks the sheet's
//! [`TranslationPosition`]:
//!
//! | position     | the sheet follows the drag when                         |
//! |--------------|---------------------------------------------------------|
//! | `Bottom`     | the content is scrolled away from its start and the drag moves up |
//! | `Top`        | the content rests at its start and the drag does not move up |
//! | `InFlight`   | the content rests at its start, or the drag moves up     |
//! | `Stationary` | never                                                   |
//!
//! When the sheet follows, the content offset is pinned so that the content
//! does not scroll at the same time.
//!
//! ## Settling
//!
//! When a drag ends (and, for content drags, once momentum scrolling has
//! stopped), the sheet animates to the closer notch. A sheet exactly halfway
//! goes to the lower notch.

use kurbo::{Point, Rect, Vec2};
use understory_gesture::arbiter::ScrollCaringPan;
use understory_gesture::pan::{GestureId, GestureState};
use understory_scroll::geometry::on_opposite_sides;
use understory_scroll::observer::{ScrollCallbacks, ScrollObserver};
use understory_scroll::region::ScrollRegion;
use understory_timing::Millis;

use crate::animation::{Easing, HeightAnimation};
use crate::notch::{BottomSheetContent, NotchError, Notches, TranslationPosition};

/// Timing of the sheet's animations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SheetConfig {
    /// Duration of the presentation animation from zero to the lower notch.
    pub present_duration: Millis,
    /// Duration of the animation to the nearest notch after a drag.
    pub settle_duration: Millis,
    /// Easing used by both animations.
    pub easing: Easing,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            present_duration: 300,
            settle_duration: 200,
            easing: Easing::EaseInOut,
        }
    }
}

/// Accumulators of one content drag; reset when the finger lifts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct DragSession {
    scroll_translation: f64,
    sheet_translation: f64,
    last_content_offset: Point,
}

/// Height state machine of one bottom sheet.
///
/// The sheet is pinned to the left, bottom and right edges of the host bounds.
/// Its height is always recomputed against notches freshly queried from the
/// content.
#[derive(Debug)]
pub struct SheetController<C> {
    content: C,
    config: SheetConfig,
    host_bounds: Rect,
    current_height: f64,
    destination: f64,
    session: DragSession,
    animation: Option<HeightAnimation>,
    pan: ScrollCaringPan,
    presented: bool,
}

impl<C: BottomSheetContent> SheetController<C> {
    /// Creates a hidden sheet with the default configuration.
    ///
    /// `pan` is the id of the sheet's own pan gesture.
    pub fn new(content: C, pan: GestureId) -> Self {
        Self::with_config(content, pan, SheetConfig::default())
    }

    /// Creates a hidden sheet.
    pub fn with_config(content: C, pan: GestureId, config: SheetConfig) -> Self {
        Self {
            content,
            config,
            host_bounds: Rect::ZERO,
            current_height: 0.0,
            destination: 0.0,
            session: DragSession::default(),
            animation: None,
            pan: ScrollCaringPan::new(pan),
            presented: false,
        }
    }

    /// Returns the hosted content.
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Returns the hosted content mutably.
    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    /// Returns the animation configuration.
    pub fn config(&self) -> SheetConfig {
        self.config
    }

    /// Replaces the animation configuration; running animations keep theirs.
    pub fn set_config(&mut self, config: SheetConfig) {
        self.config = config;
    }

    /// Area the sheet is presented in.
    pub fn host_bounds(&self) -> Rect {
        self.host_bounds
    }

    /// Updates the host area, clamping the sheet to the new notches.
    pub fn set_host_bounds(&mut self, bounds: Rect) {
        self.host_bounds = bounds;
        if self.presented && self.animation.is_none() {
            let notches = self.notches();
            self.current_height = notches.clamp(self.current_height);
            self.destination = notches.clamp(self.destination);
        }
    }

    /// Queries and validates the content's notches for the current host height.
    pub fn try_notches(&self) -> Result<Notches, NotchError> {
        let available = self.host_bounds.height();
        Notches::new(
            self.content.min_notch_height(available),
            self.content.max_notch_height(available),
        )
    }

    /// The content's notches for the current host height.
    ///
    /// Invalid heights from the content are a bug in the content; they trip a
    /// debug assertion and are repaired with [`Notches::sanitized`] otherwise.
    pub fn notches(&self) -> Notches {
        let available = self.host_bounds.height();
        let min = self.content.min_notch_height(available);
        let max = self.content.max_notch_height(available);
        let notches = Notches::new(min, max);
        debug_assert!(
            notches.is_ok(),
            "bottom sheet content reported invalid notches: min {min}, max {max}"
        );
        notches.unwrap_or_else(|err| {
            tracing::warn!(%err, "invalid notch heights sanitized");
            Notches::sanitized(min, max)
        })
    }

    /// Height of the sheet as currently displayed.
    pub fn current_height(&self) -> f64 {
        self.current_height
    }

    /// Height the sheet last committed to.
    pub fn destination_height(&self) -> f64 {
        self.destination
    }

    /// Where the sheet currently sits relative to its notches.
    pub fn translation_position(&self) -> TranslationPosition {
        self.notches().position(self.current_height)
    }

    /// Returns `true` between [`present`](Self::present) and [`dismiss`](Self::dismiss).
    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// Returns `true` while a height animation runs.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// The sheet's own pan gesture.
    pub fn pan(&self) -> &ScrollCaringPan {
        &self.pan
    }

    /// The sheet's own pan gesture, for feeding touches.
    pub fn pan_mut(&mut self) -> &mut ScrollCaringPan {
        &mut self.pan
    }

    /// Makes the sheet's pan defer to `region`'s gestures.
    pub fn follow_region(&mut self, region: &ScrollRegion) {
        self.pan.set_driving_gestures(region.gesture_ids());
    }

    /// Shows the sheet in `host_bounds`, animating from zero to the lower notch.
    pub fn present(&mut self, host_bounds: Rect, now: Millis) {
        self.host_bounds = host_bounds;
        self.presented = true;
        self.session = DragSession::default();
        let min = self.notches().min();
        self.current_height = 0.0;
        self.destination = min;
        self.animation = Some(HeightAnimation::new(
            0.0,
            min,
            self.config.present_duration,
            self.config.easing,
            Some(now),
        ));
        tracing::debug!(height = min, "bottom sheet presented");
    }

    /// Hides the sheet immediately and forgets its driving gestures.
    pub fn dismiss(&mut self) {
        self.presented = false;
        self.animation = None;
        self.session = DragSession::default();
        self.current_height = 0.0;
        self.destination = 0.0;
        self.pan.clear_driving_gestures();
        tracing::debug!("bottom sheet dismissed");
    }

    /// Follows a drag of the sheet's own pan by `translation_y` points.
    ///
    /// Ignored while the sheet is hidden.
    pub fn on_drag_changed(&mut self, translation_y: f64) {
        if !self.presented {
            return;
        }
        self.interrupt_animation();
        self.current_height = self.notches().clamp(self.destination - translation_y);
        tracing::trace!(height = self.current_height, "sheet dragged");
    }

    /// The sheet's own pan ended; settles to the nearest notch.
    pub fn on_drag_ended(&mut self, now: Millis) {
        self.settle(now);
    }

    /// Dispatches on the state of the sheet's own pan.
    ///
    /// Hosts call this after feeding each touch to [`pan_mut`](Self::pan_mut).
    pub fn handle_pan(&mut self, now: Millis) {
        match self.pan.state() {
            GestureState::Changed => self.on_drag_changed(self.pan.translation().y),
            GestureState::Ended => self.on_drag_ended(now),
            GestureState::Possible | GestureState::Began | GestureState::Cancelled => {}
        }
    }

    /// Animates to the notch closest to the current height, starting at `now`.
    pub fn settle(&mut self, now: Millis) {
        self.settle_from(Some(now));
    }

    fn settle_from(&mut self, start: Option<Millis>) {
        if !self.presented {
            return;
        }
        let from = self.current_height;
        self.destination = self.notches().nearest(from);
        tracing::debug!(from, to = self.destination, "sheet settling");
        self.animation = (self.destination != from).then(|| {
            HeightAnimation::new(
                from,
                self.destination,
                self.config.settle_duration,
                self.config.easing,
                start,
            )
        });
    }

    fn interrupt_animation(&mut self) {
        if self.animation.take().is_some() {
            self.destination = self.current_height;
            tracing::trace!(height = self.current_height, "sheet animation interrupted");
        }
    }

    /// Advances the running animation; returns `true` while it keeps running.
    pub fn tick(&mut self, now: Millis) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let (height, finished) = animation.sample(now);
        self.current_height = height;
        if finished {
            self.animation = None;
            tracing::debug!(height, "sheet animation finished");
        }
        !finished
    }

    /// Frame of the sheet in host coordinates.
    pub fn sheet_frame(&self) -> Rect {
        let host = self.host_bounds;
        Rect::new(host.x0, host.y1 - self.current_height, host.x1, host.y1)
    }

    /// Hit-tests a point in host coordinates.
    ///
    /// Returns the point in sheet coordinates if it lands on the sheet, and
    /// `None` if it should fall through to whatever lies beneath the overlay.
    pub fn hit_test(&self, point: Point) -> Option<Point> {
        let frame = self.sheet_frame();
        (self.presented && frame.height() > 0.0 && frame.contains(point))
            .then(|| point - frame.origin().to_vec2())
    }

    fn should_drag_sheet(&self, region: &ScrollRegion, position: TranslationPosition) -> bool {
        if !region.is_tracking() {
            return false;
        }
        let moves_up = region.pan().velocity().y < 0.0;
        match position {
            TranslationPosition::Bottom => {
                !region.is_content_origin_in_bounds() && region.scrolls_up()
            }
            TranslationPosition::Top => region.is_content_origin_in_bounds() && !moves_up,
            TranslationPosition::InFlight => {
                region.is_content_origin_in_bounds() || region.scrolls_up()
            }
            TranslationPosition::Stationary => false,
        }
    }

    fn adjusted_content_offset(&self, region: &ScrollRegion, position: TranslationPosition) -> Point {
        let mut offset = self.session.last_content_offset;
        let top = region.top_content_offset();
        // Momentum from a previous drag may have carried the content past its start.
        if matches!(
            position,
            TranslationPosition::InFlight | TranslationPosition::Top
        ) && offset.y < top
        {
            offset.y = top;
        }
        // The content crossed its start between two frames.
        if on_opposite_sides(offset.y, region.content_offset().y, top) {
            offset.y = top;
        }
        offset
    }
}

impl<C: BottomSheetContent> ScrollObserver for SheetController<C> {
    fn callbacks(&self) -> ScrollCallbacks {
        ScrollCallbacks::DID_SCROLL
            | ScrollCallbacks::WILL_END_DRAGGING
            | ScrollCallbacks::DID_END_DRAGGING
            | ScrollCallbacks::DID_END_DECELERATING
    }

    fn did_scroll(&mut self, region: &mut ScrollRegion) {
        if !self.presented {
            return;
        }
        let notches = self.notches();
        let position = notches.position(self.current_height);
        let previous = self.session.scroll_translation;
        self.session.scroll_translation = region.pan().translation().y;

        if !self.should_drag_sheet(region, position) {
            self.session.last_content_offset = region.content_offset();
            return;
        }

        self.interrupt_animation();
        let offset = self.adjusted_content_offset(region, position);
        self.session.last_content_offset = offset;
        region.set_content_offset(offset);
        self.session.sheet_translation += self.session.scroll_translation - previous;
        let height = notches.clamp(self.destination - self.session.sheet_translation);
        if height != self.current_height {
            self.current_height = height;
            tracing::trace!(height, ?position, "sheet follows content drag");
        }
    }

    fn will_end_dragging(
        &mut self,
        region: &mut ScrollRegion,
        velocity: Vec2,
        target_offset: &mut Point,
    ) {
        if !self.presented {
            return;
        }
        self.session.sheet_translation = 0.0;
        self.session.scroll_translation = 0.0;
        region.pan_mut().set_translation(Vec2::ZERO);

        let top = region.top_content_offset();
        match self.translation_position() {
            TranslationPosition::Bottom if target_offset.y > top => target_offset.y = top,
            TranslationPosition::InFlight => {
                target_offset.y = self.session.last_content_offset.y;
            }
            TranslationPosition::Top
            | TranslationPosition::Bottom
            | TranslationPosition::Stationary => {}
        }
        tracing::trace!(
            velocity = velocity.y,
            target = target_offset.y,
            "content drag released"
        );
    }

    fn did_end_dragging(&mut self, _region: &mut ScrollRegion, will_decelerate: bool) {
        if !will_decelerate {
            self.settle_from(None);
        }
    }

    fn did_end_decelerating(&mut self, _region: &mut ScrollRegion) {
        self.settle_from(None);
    }
}
