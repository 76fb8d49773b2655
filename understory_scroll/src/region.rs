// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless model of a vertically scrollable region.

use alloc::rc::Weak;
use core::cell::RefCell;

use kurbo::{Insets, Point, Size, Vec2};
use smallvec::SmallVec;
use understory_gesture::pan::{GestureId, PanGesture, VerticalDirection};

use crate::geometry::scaled;
use crate::observer::{SharedObserver, WeakObserver, same_observer};
use crate::proxy::{self, ProxyLink};

/// Identifier for a scroll region, assigned by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u32);

impl RegionId {
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

/// A scrollable region: content geometry, drag state, its own pan gesture and
/// one observer slot.
///
/// Offsets follow the usual convention that the content rests at its start
/// when `content_offset.y == -adjusted_content_inset().y0`; scrolling toward
/// the end of the content increases `content_offset.y`.
///
/// The observer slot holds a non-owning handle. Whoever installs an observer
/// keeps it alive. Reassigning the slot through [`ScrollRegion::set_observer`]
/// notifies any forwarding proxy watching the region. If a forwarding proxy
/// is dropped while it occupies the slot, the next notification puts the
/// observer it displaced back in the slot.
#[derive(Debug)]
pub struct ScrollRegion {
    id: RegionId,
    viewport: Size,
    content_offset: Point,
    content_size: Size,
    content_size_revision: u64,
    content_inset: Insets,
    safe_area_inset: Insets,
    scroll_enabled: bool,
    bounces: bool,
    shows_vertical_indicator: bool,
    tracking: bool,
    decelerating: bool,
    pan: PanGesture,
    observer: Option<WeakObserver>,
    proxy_fallback: Option<WeakObserver>,
    watchers: SmallVec<[Weak<RefCell<ProxyLink>>; 1]>,
}

impl ScrollRegion {
    /// Creates a region with an empty viewport and content.
    ///
    /// `pan` is the id of the region's own pan gesture.
    #[must_use]
    pub fn new(id: RegionId, pan: GestureId) -> Self {
        Self {
            id,
            viewport: Size::ZERO,
            content_offset: Point::ZERO,
            content_size: Size::ZERO,
            content_size_revision: 0,
            content_inset: Insets::ZERO,
            safe_area_inset: Insets::ZERO,
            scroll_enabled: true,
            bounces: true,
            shows_vertical_indicator: true,
            tracking: false,
            decelerating: false,
            pan: PanGesture::new(pan),
            observer: None,
            proxy_fallback: None,
            watchers: SmallVec::new(),
        }
    }

    /// Returns the region's id.
    #[must_use]
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Returns the size of the visible viewport.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Sets the size of the visible viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Returns the content offset.
    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    /// Sets the content offset without notifying the observer.
    ///
    /// Hosts call [`ScrollRegion::notify_did_scroll`] once their own scroll
    /// position has been applied.
    pub fn set_content_offset(&mut self, offset: Point) {
        self.content_offset = offset;
    }

    /// Returns the content size.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Sets the content size; returns `true` if it changed.
    ///
    /// Every change bumps [`ScrollRegion::content_size_revision`].
    pub fn set_content_size(&mut self, size: Size) -> bool {
        if self.content_size == size {
            return false;
        }
        self.content_size = size;
        self.content_size_revision += 1;
        true
    }

    /// Monotonic counter bumped each time the content size changes.
    #[must_use]
    pub fn content_size_revision(&self) -> u64 {
        self.content_size_revision
    }

    /// Returns the content inset set by the host.
    #[must_use]
    pub fn content_inset(&self) -> Insets {
        self.content_inset
    }

    /// Sets the content inset.
    pub fn set_content_inset(&mut self, inset: Insets) {
        self.content_inset = inset;
    }

    /// Returns the safe-area inset applied on top of the content inset.
    #[must_use]
    pub fn safe_area_inset(&self) -> Insets {
        self.safe_area_inset
    }

    /// Sets the safe-area inset.
    pub fn set_safe_area_inset(&mut self, inset: Insets) {
        self.safe_area_inset = inset;
    }

    /// Content inset plus safe-area inset.
    #[must_use]
    pub fn adjusted_content_inset(&self) -> Insets {
        let (a, b) = (self.content_inset, self.safe_area_inset);
        Insets::new(a.x0 + b.x0, a.y0 + b.y0, a.x1 + b.x1, a.y1 + b.y1)
    }

    /// Offset at which the content rests at its start.
    #[must_use]
    pub fn top_content_offset(&self) -> f64 {
        -self.adjusted_content_inset().y0
    }

    /// Largest offset reachable without overscrolling.
    #[must_use]
    pub fn bottom_content_offset(&self) -> f64 {
        let inset = self.adjusted_content_inset();
        let bottom = self.content_size.height + inset.y1 - self.viewport.height;
        bottom.max(self.top_content_offset())
    }

    /// Returns `true` if the content has no room left to scroll toward its start.
    #[must_use]
    pub fn is_content_origin_in_bounds(&self) -> bool {
        self.content_offset.y <= self.top_content_offset()
    }

    /// Returns `true` if the region's pan currently moves toward the top of the screen.
    #[must_use]
    pub fn scrolls_up(&self) -> bool {
        self.pan.y_direction() == VerticalDirection::Up
    }

    /// Moves the content back to its start.
    pub fn scroll_to_top(&mut self) {
        self.content_offset.y = self.top_content_offset();
    }

    /// Returns `true` if user drags scroll the content.
    #[must_use]
    pub fn is_scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    /// Enables or disables user scrolling.
    pub fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
    }

    /// Returns `true` if drags may overscroll past the content edges.
    #[must_use]
    pub fn bounces(&self) -> bool {
        self.bounces
    }

    /// Allows or forbids overscrolling.
    pub fn set_bounces(&mut self, bounces: bool) {
        self.bounces = bounces;
    }

    /// Returns `true` if the host should draw a vertical scroll indicator.
    #[must_use]
    pub fn shows_vertical_indicator(&self) -> bool {
        self.shows_vertical_indicator
    }

    /// Shows or hides the vertical scroll indicator.
    pub fn set_shows_vertical_indicator(&mut self, shows: bool) {
        self.shows_vertical_indicator = shows;
    }

    /// Returns `true` while a finger is on the content.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Sets the tracking state directly.
    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
    }

    /// Returns `true` during momentum scrolling.
    #[must_use]
    pub fn is_decelerating(&self) -> bool {
        self.decelerating
    }

    /// Returns the region's own pan gesture.
    #[must_use]
    pub fn pan(&self) -> &PanGesture {
        &self.pan
    }

    /// Returns the region's own pan gesture mutably.
    pub fn pan_mut(&mut self) -> &mut PanGesture {
        &mut self.pan
    }

    /// Ids of the gestures that drive this region.
    #[must_use]
    pub fn gesture_ids(&self) -> [GestureId; 1] {
        [self.pan.id()]
    }

    // -------------------------------------------------------------------------
    // Observer slot
    // -------------------------------------------------------------------------

    /// Returns the installed observer.
    #[must_use]
    pub fn observer(&self) -> Option<WeakObserver> {
        self.observer.clone()
    }

    /// Returns `true` if `observer` is the installed observer.
    #[must_use]
    pub fn observer_is(&self, observer: &WeakObserver) -> bool {
        self.observer
            .as_ref()
            .is_some_and(|installed| same_observer(installed, observer))
    }

    /// Replaces the observer and notifies watching proxies.
    pub fn set_observer(&mut self, observer: Option<WeakObserver>) {
        self.observer = observer;
        self.proxy_fallback = None;
        let watchers = self.watchers.clone();
        for watcher in &watchers {
            if let Some(link) = watcher.upgrade() {
                proxy::observer_slot_changed(&link, self);
            }
        }
        self.watchers.retain(|w| w.strong_count() > 0);
    }

    pub(crate) fn install_observer_silently(&mut self, observer: Option<WeakObserver>) {
        self.observer = observer;
    }

    /// Records the observer to restore if the proxy in the slot goes away.
    pub(crate) fn set_proxy_fallback(&mut self, original: Option<WeakObserver>) {
        self.proxy_fallback = original;
    }

    /// Upgrades the observer in the slot.
    ///
    /// A slot whose proxy was dropped falls back to the observer that proxy
    /// displaced.
    fn live_observer(&mut self) -> Option<SharedObserver> {
        if let Some(observer) = self.observer.as_ref().and_then(Weak::upgrade) {
            return Some(observer);
        }
        let original = self.proxy_fallback.take()?;
        tracing::debug!(
            region = self.id.get(),
            "forwarding proxy gone; original observer restored"
        );
        self.observer = Some(original);
        self.watchers.retain(|w| w.strong_count() > 0);
        self.observer.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn add_watcher(&mut self, watcher: Weak<RefCell<ProxyLink>>) {
        self.watchers.push(watcher);
    }

    pub(crate) fn remove_watcher(&mut self, watcher: &Weak<RefCell<ProxyLink>>) {
        self.watchers.retain(|w| !Weak::ptr_eq(w, watcher));
    }

    #[cfg(test)]
    pub(crate) fn watcher_count(&self) -> usize {
        self.watchers.iter().filter(|w| w.strong_count() > 0).count()
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Delivers `will_begin_dragging` to the observer.
    pub fn notify_will_begin_dragging(&mut self) {
        if let Some(observer) = self.live_observer() {
            observer.borrow_mut().will_begin_dragging(self);
        }
    }

    /// Delivers `did_scroll` to the observer.
    pub fn notify_did_scroll(&mut self) {
        if let Some(observer) = self.live_observer() {
            observer.borrow_mut().did_scroll(self);
        }
    }

    /// Delivers `will_end_dragging` and returns the possibly adjusted target offset.
    pub fn notify_will_end_dragging(&mut self, velocity: Vec2, target_offset: Point) -> Point {
        let mut target = target_offset;
        if let Some(observer) = self.live_observer() {
            observer
                .borrow_mut()
                .will_end_dragging(self, velocity, &mut target);
        }
        target
    }

    /// Delivers `did_end_dragging` to the observer.
    pub fn notify_did_end_dragging(&mut self, will_decelerate: bool) {
        if let Some(observer) = self.live_observer() {
            observer.borrow_mut().did_end_dragging(self, will_decelerate);
        }
    }

    /// Delivers `did_end_decelerating` to the observer.
    pub fn notify_did_end_decelerating(&mut self) {
        if let Some(observer) = self.live_observer() {
            observer.borrow_mut().did_end_decelerating(self);
        }
    }

    // -------------------------------------------------------------------------
    // Touch driving
    // -------------------------------------------------------------------------

    /// A finger touched down on the content and started dragging.
    pub fn begin_drag(&mut self, location: Point, now: u64) {
        if !self.pan.begin(location, now) {
            return;
        }
        self.tracking = true;
        self.decelerating = false;
        self.notify_will_begin_dragging();
    }

    /// The dragging finger moved to `location`.
    ///
    /// When scrolling is enabled the content follows the finger; without
    /// bouncing the offset is kept inside the content. Observers are notified
    /// with `did_scroll` either way.
    pub fn drag_to(&mut self, location: Point, now: u64) {
        let Some(delta) = self.pan.update(location, now) else {
            return;
        };
        if self.scroll_enabled {
            let mut y = self.content_offset.y - delta.y;
            if !self.bounces {
                y = y.clamp(self.top_content_offset(), self.bottom_content_offset());
            }
            self.content_offset.y = y;
        }
        self.notify_did_scroll();
    }

    /// The dragging finger lifted.
    ///
    /// Reports the content velocity (points per millisecond) derived from the
    /// pan, with the current offset as the predicted target. Returns the target
    /// offset after observers adjusted it.
    pub fn end_drag(&mut self, will_decelerate: bool) -> Point {
        if !self.tracking {
            return self.content_offset;
        }
        let velocity = scaled(self.pan.velocity(), -1.0 / 1000.0);
        let target = self.notify_will_end_dragging(velocity, self.content_offset);
        self.pan.end();
        self.tracking = false;
        self.decelerating = will_decelerate;
        self.notify_did_end_dragging(will_decelerate);
        target
    }

    /// Momentum scrolling reached `offset` and stopped.
    pub fn finish_deceleration(&mut self, offset: Point) {
        if !self.decelerating {
            return;
        }
        self.content_offset = offset;
        self.notify_did_scroll();
        self.decelerating = false;
        self.notify_did_end_decelerating();
    }
}
