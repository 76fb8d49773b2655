// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scroll observer interface.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use kurbo::{Point, Vec2};

use crate::region::ScrollRegion;

bitflags::bitflags! {
    /// The set of callbacks a [`ScrollObserver`] handles.
    ///
    /// Callers that need to know whether an observer cares about a callback
    /// (for example to skip expensive work) query [`ScrollObserver::callbacks`]
    /// instead of probing the observer dynamically.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ScrollCallbacks: u8 {
        /// [`ScrollObserver::will_begin_dragging`].
        const WILL_BEGIN_DRAGGING  = 0b0000_0001;
        /// [`ScrollObserver::did_scroll`].
        const DID_SCROLL           = 0b0000_0010;
        /// [`ScrollObserver::will_end_dragging`].
        const WILL_END_DRAGGING    = 0b0000_0100;
        /// [`ScrollObserver::did_end_dragging`].
        const DID_END_DRAGGING     = 0b0000_1000;
        /// [`ScrollObserver::did_end_decelerating`].
        const DID_END_DECELERATING = 0b0001_0000;
    }
}

/// Receives the event stream of a [`ScrollRegion`].
///
/// Every handler has a no-op default. Implementors override the handlers they
/// need and report them from [`ScrollObserver::callbacks`].
///
/// Handlers receive the region mutably: observers may adjust the content offset
/// or reset the region's pan translation while handling an event.
pub trait ScrollObserver {
    /// The callbacks this observer handles.
    fn callbacks(&self) -> ScrollCallbacks;

    /// The user put a finger down and started dragging the content.
    fn will_begin_dragging(&mut self, region: &mut ScrollRegion) {
        let _ = region;
    }

    /// The content offset changed.
    fn did_scroll(&mut self, region: &mut ScrollRegion) {
        let _ = region;
    }

    /// The user lifted the finger.
    ///
    /// `velocity` is the content velocity in points per millisecond, unless
    /// the observer is a proxy target (see
    /// [`TARGET_VELOCITY_SCALE`](crate::geometry::TARGET_VELOCITY_SCALE)).
    /// `target_offset` is where the content is predicted to come to rest; an
    /// observer may move it.
    fn will_end_dragging(
        &mut self,
        region: &mut ScrollRegion,
        velocity: Vec2,
        target_offset: &mut Point,
    ) {
        let _ = (region, velocity, target_offset);
    }

    /// Dragging ended; `will_decelerate` tells whether momentum scrolling follows.
    fn did_end_dragging(&mut self, region: &mut ScrollRegion, will_decelerate: bool) {
        let _ = (region, will_decelerate);
    }

    /// Momentum scrolling came to rest.
    fn did_end_decelerating(&mut self, region: &mut ScrollRegion) {
        let _ = region;
    }

    /// Hands this observer the observer that was installed before a proxy.
    ///
    /// Only forwarding proxies accept; they return `true` and forward to
    /// `original` from then on. Everything else returns `false`.
    fn adopt_original_observer(&mut self, original: Option<WeakObserver>) -> bool {
        let _ = original;
        false
    }
}

/// Strong handle to a shared observer.
pub type SharedObserver = Rc<RefCell<dyn ScrollObserver>>;

/// Non-owning handle to a shared observer.
pub type WeakObserver = Weak<RefCell<dyn ScrollObserver>>;

/// Returns `true` if both handles point at the same observer.
#[must_use]
pub fn same_observer(a: &WeakObserver, b: &WeakObserver) -> bool {
    Weak::ptr_eq(a, b)
}
