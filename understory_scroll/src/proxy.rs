// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding proxy: share one region's observer slot between a target and the
//! observer that was already installed.
//!
//! A [`ScrollRegion`] has a single observer slot. A component that needs the
//! region's event stream without evicting whoever else listens installs a
//! [`ForwardingProxy`]. The proxy becomes the region's observer and relays each
//! event to:
//!
//! 1. its **target**, then
//! 2. the **original** observer that occupied the slot before it.
//!
//! The proxy watches the slot. If the host later assigns a different observer,
//! the proxy treats it as the new original and puts itself back in front. If
//! the new observer is another proxy, the original observer is handed over to
//! it and this proxy steps aside, so the original is never invoked twice.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_gesture::pan::GestureId;
//! use understory_scroll::observer::{ScrollCallbacks, ScrollObserver, SharedObserver};
//! use understory_scroll::proxy::ForwardingProxy;
//! use understory_scroll::region::{RegionId, ScrollRegion};
//!
//! #[derive(Default)]
//! struct Log(Vec<&'static str>);
//!
//! struct Named(&'static str, Rc<RefCell<Log>>);
//!
//! impl ScrollObserver for Named {
//!     fn callbacks(&self) -> ScrollCallbacks {
//!         ScrollCallbacks::DID_SCROLL
//!     }
//!     fn did_scroll(&mut self, _: &mut ScrollRegion) {
//!         self.1.borrow_mut().0.push(self.0);
//!     }
//! }
//!
//! let log = Rc::new(RefCell::new(Log::default()));
//! let original: SharedObserver = Rc::new(RefCell::new(Named("original", log.clone())));
//! let target: SharedObserver = Rc::new(RefCell::new(Named("target", log.clone())));
//!
//! let mut region = ScrollRegion::new(RegionId::new(1), GestureId::new(1));
//! region.set_observer(Some(Rc::downgrade(&original)));
//!
//! let proxy = ForwardingProxy::new();
//! proxy.forward(Rc::downgrade(&target), &mut region);
//!
//! region.notify_did_scroll();
//! assert_eq!(log.borrow().0, ["target", "original"]);
//!
//! proxy.cancel_forwarding(&mut region).unwrap();
//! assert!(region.observer_is(&Rc::downgrade(&original)));
//! ```

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::geometry::{TARGET_VELOCITY_SCALE, scaled};
use crate::observer::{ScrollCallbacks, ScrollObserver, SharedObserver, WeakObserver};
use crate::region::{RegionId, ScrollRegion};

/// Errors reported by [`ForwardingProxy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// The proxy was asked to stop forwarding a region it does not observe.
    #[error("proxy observes {observed:?}, not {given:?}")]
    RegionMismatch {
        /// The region the proxy observes, if any.
        observed: Option<RegionId>,
        /// The region passed by the caller.
        given: RegionId,
    },
}

/// The proxy's state; this is what sits in the region's observer slot.
pub(crate) struct ProxyLink {
    target: Option<WeakObserver>,
    original: Option<WeakObserver>,
    region: Option<RegionId>,
    active: bool,
}

impl fmt::Debug for ProxyLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyLink")
            .field("has_target", &self.target.is_some())
            .field("has_original", &self.original.is_some())
            .field("region", &self.region)
            .field("active", &self.active)
            .finish()
    }
}

impl ProxyLink {
    fn live_target(&self) -> Option<Rc<RefCell<dyn ScrollObserver>>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    fn live_original(&self) -> Option<Rc<RefCell<dyn ScrollObserver>>> {
        self.original.as_ref().and_then(Weak::upgrade)
    }

    fn clear(&mut self) {
        self.target = None;
        self.original = None;
        self.region = None;
        self.active = false;
    }
}

impl ScrollObserver for ProxyLink {
    /// Everything the target or the original handles.
    ///
    /// An observer that is mid-dispatch cannot be asked and contributes nothing.
    fn callbacks(&self) -> ScrollCallbacks {
        [self.live_target(), self.live_original()]
            .into_iter()
            .flatten()
            .filter_map(|observer| observer.try_borrow().ok().map(|o| o.callbacks()))
            .fold(ScrollCallbacks::empty(), |all, callbacks| all | callbacks)
    }

    fn will_begin_dragging(&mut self, region: &mut ScrollRegion) {
        if let Some(target) = self.live_target() {
            target.borrow_mut().will_begin_dragging(region);
        }
        if let Some(original) = self.live_original() {
            original.borrow_mut().will_begin_dragging(region);
        }
    }

    fn did_scroll(&mut self, region: &mut ScrollRegion) {
        if let Some(target) = self.live_target() {
            target.borrow_mut().did_scroll(region);
        }
        if let Some(original) = self.live_original() {
            original.borrow_mut().did_scroll(region);
        }
    }

    fn will_end_dragging(
        &mut self,
        region: &mut ScrollRegion,
        velocity: Vec2,
        target_offset: &mut Point,
    ) {
        if let Some(target) = self.live_target() {
            target.borrow_mut().will_end_dragging(
                region,
                scaled(velocity, TARGET_VELOCITY_SCALE),
                target_offset,
            );
        }
        if let Some(original) = self.live_original() {
            original
                .borrow_mut()
                .will_end_dragging(region, velocity, target_offset);
        }
    }

    fn did_end_dragging(&mut self, region: &mut ScrollRegion, will_decelerate: bool) {
        if let Some(target) = self.live_target() {
            target.borrow_mut().did_end_dragging(region, will_decelerate);
        }
        if let Some(original) = self.live_original() {
            original
                .borrow_mut()
                .did_end_dragging(region, will_decelerate);
        }
    }

    fn did_end_decelerating(&mut self, region: &mut ScrollRegion) {
        if let Some(target) = self.live_target() {
            target.borrow_mut().did_end_decelerating(region);
        }
        if let Some(original) = self.live_original() {
            original.borrow_mut().did_end_decelerating(region);
        }
    }

    fn adopt_original_observer(&mut self, original: Option<WeakObserver>) -> bool {
        tracing::debug!(region = ?self.region, "proxy adopted original observer");
        self.original = original;
        true
    }
}

/// The handle a link occupies the observer slot with.
fn slot_handle(link: &Rc<RefCell<ProxyLink>>) -> WeakObserver {
    let shared: SharedObserver = link.clone();
    Rc::downgrade(&shared)
}

/// Reacts to the region's observer slot being reassigned.
pub(crate) fn observer_slot_changed(link: &Rc<RefCell<ProxyLink>>, region: &mut ScrollRegion) {
    let this = slot_handle(link);
    if region.observer_is(&this) {
        return;
    }
    let original = match link.try_borrow() {
        Ok(state) if state.active => state.original.clone(),
        Ok(_) => return,
        Err(_) => {
            tracing::warn!(
                region = region.id().get(),
                "observer slot reassigned while its proxy was dispatching; ignored"
            );
            return;
        }
    };

    if let Some(new_observer) = region.observer().as_ref().and_then(Weak::upgrade) {
        let handed_over = new_observer
            .try_borrow_mut()
            .is_ok_and(|mut observer| observer.adopt_original_observer(original));
        if handed_over {
            tracing::debug!(region = region.id().get(), "proxy replaced by another proxy");
            link.borrow_mut().clear();
            region.remove_watcher(&Rc::downgrade(link));
            return;
        }
    }

    tracing::debug!(
        region = region.id().get(),
        "observer slot reassigned; proxy reinstalled in front"
    );
    let original = region.observer();
    link.borrow_mut().original.clone_from(&original);
    region.install_observer_silently(Some(this));
    region.set_proxy_fallback(original);
}

/// Installs itself as a region's observer and relays every event to a target
/// first and the previously installed observer second.
///
/// The owner of the proxy (typically the component that owns the target) keeps
/// it alive; the region only holds a non-owning handle. Call
/// [`ForwardingProxy::cancel_forwarding`] on teardown to put the original
/// observer back. A proxy dropped without cancelling is replaced by its
/// original the next time the region notifies.
pub struct ForwardingProxy {
    link: Rc<RefCell<ProxyLink>>,
}

impl fmt::Debug for ForwardingProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ForwardingProxy")
            .field(&*self.link.borrow())
            .finish()
    }
}

impl Default for ForwardingProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl ForwardingProxy {
    /// Creates an idle proxy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            link: Rc::new(RefCell::new(ProxyLink {
                target: None,
                original: None,
                region: None,
                active: false,
            })),
        }
    }

    /// The handle that sits in a region's observer slot while forwarding.
    #[must_use]
    pub fn as_observer(&self) -> WeakObserver {
        slot_handle(&self.link)
    }

    /// Returns `true` while the proxy is installed on a region.
    #[must_use]
    pub fn is_forwarding(&self) -> bool {
        self.link.borrow().active
    }

    /// The region this proxy observes.
    #[must_use]
    pub fn observed_region(&self) -> Option<RegionId> {
        self.link.borrow().region
    }

    /// The observer events are relayed to after the target.
    #[must_use]
    pub fn original_observer(&self) -> Option<WeakObserver> {
        self.link.borrow().original.clone()
    }

    /// The callbacks of the target OR'd with those of the original observer.
    #[must_use]
    pub fn callbacks(&self) -> ScrollCallbacks {
        self.link.borrow().callbacks()
    }

    /// Starts relaying `region`'s events to `target`.
    ///
    /// Does nothing if the proxy already is the region's observer. If the proxy
    /// was forwarding the same region with another target, that forwarding is
    /// cancelled first.
    pub fn forward(&self, target: WeakObserver, region: &mut ScrollRegion) {
        if region.observer_is(&self.as_observer()) {
            return;
        }
        let previous = self.observed_region();
        if previous == Some(region.id()) {
            self.cancel(region);
        } else if let Some(previous) = previous {
            tracing::warn!(
                from = previous.get(),
                to = region.id().get(),
                "proxy moved to another region without cancelling the first"
            );
            self.link.borrow_mut().clear();
        }

        {
            let mut link = self.link.borrow_mut();
            link.target = Some(target);
            link.original = region.observer();
            link.region = Some(region.id());
            link.active = true;
        }
        region.set_observer(Some(self.as_observer()));
        region.add_watcher(Rc::downgrade(&self.link));
        // Installing may have handed this proxy another proxy's original.
        region.set_proxy_fallback(self.original_observer());
        tracing::debug!(region = region.id().get(), "forwarding installed");
    }

    /// Stops forwarding and restores the original observer.
    ///
    /// The original observer is only put back if this proxy still occupies
    /// the slot; a proxy that was replaced leaves the slot alone.
    pub fn cancel_forwarding(&self, region: &mut ScrollRegion) -> Result<(), ProxyError> {
        let observed = self.observed_region();
        if observed.is_some() && observed != Some(region.id()) {
            return Err(ProxyError::RegionMismatch {
                observed,
                given: region.id(),
            });
        }
        self.cancel(region);
        Ok(())
    }

    fn cancel(&self, region: &mut ScrollRegion) {
        region.remove_watcher(&Rc::downgrade(&self.link));
        let original = self.link.borrow().original.clone();
        self.link.borrow_mut().clear();
        if region.observer_is(&self.as_observer()) {
            region.set_observer(original);
            tracing::debug!(region = region.id().get(), "original observer restored");
        }
    }
}

impl Drop for ForwardingProxy {
    fn drop(&mut self) {
        if let Ok(link) = self.link.try_borrow()
            && link.active
        {
            tracing::debug!(
                region = ?link.region,
                "forwarding proxy dropped while installed; region falls back to the original"
            );
        }
    }
}
