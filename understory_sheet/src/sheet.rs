// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A presented bottom sheet: its controller plus the forwarding proxy that
//! connects it to the hosted scroll region.

use alloc::rc::Rc;
use core::cell::{Ref, RefCell, RefMut};

use kurbo::Rect;
use understory_gesture::pan::GestureId;
use understory_scroll::observer::SharedObserver;
use understory_scroll::proxy::{ForwardingProxy, ProxyError};
use understory_scroll::region::{RegionId, ScrollRegion};
use understory_timing::Millis;

use crate::controller::{SheetConfig, SheetController};
use crate::notch::BottomSheetContent;

/// Errors reported when dismissing a [`BottomSheet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    /// The sheet still forwards a region's events; that region must be passed
    /// so its original observer can be restored.
    #[error("sheet still follows region {0:?}")]
    RegionRequired(RegionId),
    /// The forwarding proxy rejected the region.
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

/// Owns a [`SheetController`] and the [`ForwardingProxy`] that feeds it.
///
/// The controller is shared with the proxy, so it lives behind a `RefCell`.
/// Do not hold the guard returned by [`BottomSheet::controller_mut`] while the
/// region delivers notifications.
///
/// Dropping a presented sheet without dismissing it hands the region back to
/// its original observer on the region's next notification.
#[derive(Debug)]
pub struct BottomSheet<C: BottomSheetContent + 'static> {
    controller: Rc<RefCell<SheetController<C>>>,
    proxy: ForwardingProxy,
}

impl<C: BottomSheetContent + 'static> BottomSheet<C> {
    /// Creates a hidden sheet with the default configuration.
    pub fn new(content: C, pan: GestureId) -> Self {
        Self::with_config(content, pan, SheetConfig::default())
    }

    /// Creates a hidden sheet.
    pub fn with_config(content: C, pan: GestureId, config: SheetConfig) -> Self {
        Self {
            controller: Rc::new(RefCell::new(SheetController::with_config(
                content, pan, config,
            ))),
            proxy: ForwardingProxy::new(),
        }
    }

    /// Borrows the controller.
    pub fn controller(&self) -> Ref<'_, SheetController<C>> {
        self.controller.borrow()
    }

    /// Borrows the controller mutably.
    pub fn controller_mut(&self) -> RefMut<'_, SheetController<C>> {
        self.controller.borrow_mut()
    }

    /// The proxy installed on the hosted region while presented.
    pub fn proxy(&self) -> &ForwardingProxy {
        &self.proxy
    }

    /// Presents the sheet in `host_bounds`.
    ///
    /// With a `region`, the sheet starts following its scroll events: the
    /// forwarding proxy is installed in the region's observer slot and the
    /// sheet's pan defers to the region's gestures.
    pub fn present(&self, host_bounds: Rect, region: Option<&mut ScrollRegion>, now: Millis) {
        self.controller.borrow_mut().present(host_bounds, now);
        let Some(region) = region else {
            return;
        };
        let expected = self.controller.borrow().content().scroll_region();
        if expected.is_some_and(|id| id != region.id()) {
            tracing::warn!(
                expected = ?expected,
                given = region.id().get(),
                "sheet presented over a region its content does not report"
            );
        }
        self.controller.borrow_mut().follow_region(region);
        let target: SharedObserver = self.controller.clone();
        self.proxy.forward(Rc::downgrade(&target), region);
    }

    /// Advances the sheet's animation.
    pub fn tick(&self, now: Millis) -> bool {
        self.controller.borrow_mut().tick(now)
    }

    /// Hides the sheet and restores the original observer of the region it
    /// follows.
    ///
    /// A sheet presented over a region must be given that region back; on
    /// error nothing changes.
    pub fn dismiss(&self, region: Option<&mut ScrollRegion>) -> Result<(), SheetError> {
        match (region, self.proxy.observed_region()) {
            (Some(region), _) => self.proxy.cancel_forwarding(region)?,
            (None, Some(observed)) => return Err(SheetError::RegionRequired(observed)),
            (None, None) => {}
        }
        self.controller.borrow_mut().dismiss();
        Ok(())
    }
}
