// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for a presented `BottomSheet` following its content's scroll region.
//!
//! The region already has an observer of its own; the sheet must share the
//! region's events with it instead of replacing it.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_gesture::pan::GestureId;
use understory_scroll::observer::{ScrollCallbacks, ScrollObserver, SharedObserver};
use understory_scroll::proxy::ProxyError;
use understory_scroll::region::{RegionId, ScrollRegion};
use understory_sheet::notch::{FractionContent, TranslationPosition};
use understory_sheet::sheet::{BottomSheet, SheetError};

const HOST: Rect = Rect::new(0.0, 0.0, 400.0, 1_000.0);

#[derive(Default)]
struct Counter {
    scrolls: usize,
    ended: usize,
}

impl ScrollObserver for Counter {
    fn callbacks(&self) -> ScrollCallbacks {
        ScrollCallbacks::DID_SCROLL | ScrollCallbacks::DID_END_DRAGGING
    }

    fn did_scroll(&mut self, _: &mut ScrollRegion) {
        self.scrolls += 1;
    }

    fn did_end_dragging(&mut self, _: &mut ScrollRegion, _: bool) {
        self.ended += 1;
    }
}

fn scroll_region(id: u32) -> ScrollRegion {
    let mut region = ScrollRegion::new(RegionId::new(id), GestureId::new(100 + id));
    region.set_viewport(Size::new(400.0, 700.0));
    region.set_content_size(Size::new(400.0, 3_000.0));
    region
}

fn sheet(region: u32) -> BottomSheet<FractionContent> {
    BottomSheet::new(
        FractionContent {
            min_fraction: 0.2,
            max_fraction: 0.8,
            region: Some(RegionId::new(region)),
        },
        GestureId::new(region),
    )
}

#[test]
fn sheet_follows_content_and_original_observer_keeps_listening() {
    let counter = Rc::new(RefCell::new(Counter::default()));
    let original: SharedObserver = counter.clone();
    let mut region = scroll_region(1);
    region.set_observer(Some(Rc::downgrade(&original)));

    let sheet = sheet(1);
    sheet.present(HOST, Some(&mut region), 0);
    while sheet.tick(300) {}
    assert!(sheet.proxy().is_forwarding());
    assert!(
        sheet
            .controller()
            .pan()
            .should_require_failure_of(GestureId::new(101))
    );

    region.begin_drag(Point::new(0.0, 600.0), 1_000);
    region.drag_to(Point::new(0.0, 400.0), 1_016);
    assert_eq!(sheet.controller().current_height(), 400.0);
    region.drag_to(Point::new(0.0, 250.0), 1_032);
    assert_eq!(sheet.controller().current_height(), 550.0);

    region.end_drag(false);
    assert_eq!(sheet.controller().destination_height(), 800.0);
    sheet.tick(1_040);
    sheet.tick(1_240);
    assert_eq!(sheet.controller().current_height(), 800.0);
    assert_eq!(
        sheet.controller().translation_position(),
        TranslationPosition::Top
    );

    assert_eq!(counter.borrow().scrolls, 2);
    assert_eq!(counter.borrow().ended, 1);
}

#[test]
fn dismiss_restores_original_observer() {
    let counter = Rc::new(RefCell::new(Counter::default()));
    let original: SharedObserver = counter.clone();
    let mut region = scroll_region(1);
    region.set_observer(Some(Rc::downgrade(&original)));

    let sheet = sheet(1);
    sheet.present(HOST, Some(&mut region), 0);
    sheet.dismiss(Some(&mut region)).unwrap();

    assert!(region.observer_is(&Rc::downgrade(&original)));
    assert!(!sheet.controller().is_presented());
    assert!(sheet.controller().pan().driving_gestures().is_empty());
}

#[test]
fn dismiss_with_wrong_region_is_an_error() {
    let mut region = scroll_region(1);
    let mut other = scroll_region(2);
    let sheet = sheet(1);
    sheet.present(HOST, Some(&mut region), 0);

    assert_eq!(
        sheet.dismiss(Some(&mut other)),
        Err(SheetError::Proxy(ProxyError::RegionMismatch {
            observed: Some(RegionId::new(1)),
            given: RegionId::new(2),
        }))
    );
    assert!(sheet.controller().is_presented());
}

#[test]
fn dismiss_without_followed_region_is_an_error() {
    let counter = Rc::new(RefCell::new(Counter::default()));
    let original: SharedObserver = counter.clone();
    let mut region = scroll_region(1);
    region.set_observer(Some(Rc::downgrade(&original)));
    let sheet = sheet(1);
    sheet.present(HOST, Some(&mut region), 0);
    while sheet.tick(300) {}

    assert_eq!(
        sheet.dismiss(None),
        Err(SheetError::RegionRequired(RegionId::new(1)))
    );
    assert!(sheet.controller().is_presented());
    assert!(sheet.proxy().is_forwarding());

    sheet.dismiss(Some(&mut region)).unwrap();
    region.begin_drag(Point::new(0.0, 300.0), 1_000);
    region.drag_to(Point::new(0.0, 500.0), 1_016);
    assert_eq!(sheet.controller().current_height(), 0.0);
    assert_eq!(region.content_offset().y, -200.0);
    assert_eq!(counter.borrow().scrolls, 1);
}

#[test]
fn dismiss_without_region_is_fine_when_nothing_is_followed() {
    let sheet = sheet(1);
    sheet.present(HOST, None, 0);
    assert_eq!(sheet.dismiss(None), Ok(()));
    assert!(!sheet.controller().is_presented());
}

#[test]
fn dropped_sheet_hands_region_back_to_original_observer() {
    let counter = Rc::new(RefCell::new(Counter::default()));
    let original: SharedObserver = counter.clone();
    let mut region = scroll_region(1);
    region.set_observer(Some(Rc::downgrade(&original)));
    {
        let sheet = sheet(1);
        sheet.present(HOST, Some(&mut region), 0);
    }

    region.notify_did_scroll();

    assert_eq!(counter.borrow().scrolls, 1);
    assert!(region.observer_is(&Rc::downgrade(&original)));
}

#[test]
fn sheets_are_independent() {
    let mut first_region = scroll_region(1);
    let mut second_region = scroll_region(2);
    let first = sheet(1);
    let second = sheet(2);
    first.present(HOST, Some(&mut first_region), 0);
    second.present(HOST, Some(&mut second_region), 0);
    while first.tick(300) {}
    while second.tick(300) {}

    first_region.begin_drag(Point::new(0.0, 600.0), 1_000);
    first_region.drag_to(Point::new(0.0, 500.0), 1_016);

    assert_eq!(first.controller().current_height(), 300.0);
    assert_eq!(second.controller().current_height(), 200.0);
}

#[test]
fn points_outside_the_sheet_fall_through() {
    let sheet = sheet(1);
    sheet.present(HOST, None, 0);
    while sheet.tick(300) {}

    assert!(sheet.controller().hit_test(Point::new(200.0, 500.0)).is_none());
    assert_eq!(
        sheet.controller().hit_test(Point::new(200.0, 900.0)),
        Some(Point::new(200.0, 100.0))
    );
}
