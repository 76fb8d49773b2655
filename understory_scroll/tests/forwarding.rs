// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for observer forwarding across a whole drag.
//!
//! These drive a `ScrollRegion` the way a host would and check what each
//! observer sees, including when a second proxy takes over the region.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use understory_gesture::pan::GestureId;
use understory_scroll::observer::{ScrollCallbacks, ScrollObserver, SharedObserver, WeakObserver};
use understory_scroll::proxy::ForwardingProxy;
use understory_scroll::region::{RegionId, ScrollRegion};

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    fn push(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{event}", self.name));
    }
}

impl ScrollObserver for Recorder {
    fn callbacks(&self) -> ScrollCallbacks {
        ScrollCallbacks::all()
    }

    fn will_begin_dragging(&mut self, _: &mut ScrollRegion) {
        self.push("begin");
    }

    fn did_scroll(&mut self, _: &mut ScrollRegion) {
        self.push("scroll");
    }

    fn will_end_dragging(&mut self, _: &mut ScrollRegion, velocity: Vec2, _: &mut Point) {
        self.push(&format!("will_end({})", velocity.y));
    }

    fn did_end_dragging(&mut self, _: &mut ScrollRegion, will_decelerate: bool) {
        self.push(&format!("did_end({will_decelerate})"));
    }

    fn did_end_decelerating(&mut self, _: &mut ScrollRegion) {
        self.push("rest");
    }
}

fn recorder(name: &'static str, log: &Log) -> SharedObserver {
    Rc::new(RefCell::new(Recorder {
        name,
        log: log.clone(),
    }))
}

fn weak(observer: &SharedObserver) -> WeakObserver {
    Rc::downgrade(observer)
}

fn region() -> ScrollRegion {
    let mut region = ScrollRegion::new(RegionId::new(3), GestureId::new(30));
    region.set_viewport(Size::new(320.0, 400.0));
    region.set_content_size(Size::new(320.0, 1_600.0));
    region
}

#[test]
fn full_drag_reaches_target_then_original() {
    let log = Log::default();
    let original = recorder("original", &log);
    let target = recorder("target", &log);
    let mut region = region();
    region.set_observer(Some(weak(&original)));

    let proxy = ForwardingProxy::new();
    proxy.forward(weak(&target), &mut region);

    region.begin_drag(Point::new(0.0, 300.0), 0);
    region.drag_to(Point::new(0.0, 290.0), 10);
    region.end_drag(true);
    region.finish_deceleration(Point::new(0.0, 40.0));

    assert_eq!(
        *log.borrow(),
        [
            "target:begin",
            "original:begin",
            "target:scroll",
            "original:scroll",
            // The finger moved up at 1000 pt/s; the content moves down the
            // page at 1 pt/ms.
            "target:will_end(-1000)",
            "original:will_end(1)",
            "target:did_end(true)",
            "original:did_end(true)",
            "target:scroll",
            "original:scroll",
            "target:rest",
            "original:rest",
        ]
    );
}

#[test]
fn second_proxy_inherits_original_without_duplicates() {
    let log = Log::default();
    let original = recorder("original", &log);
    let first_target = recorder("first", &log);
    let second_target = recorder("second", &log);
    let mut region = region();
    region.set_observer(Some(weak(&original)));

    let first = ForwardingProxy::new();
    first.forward(weak(&first_target), &mut region);
    let second = ForwardingProxy::new();
    second.forward(weak(&second_target), &mut region);

    assert!(!first.is_forwarding());
    assert!(second.is_forwarding());
    assert!(
        second
            .original_observer()
            .is_some_and(|o| o.ptr_eq(&weak(&original)))
    );

    region.notify_did_scroll();
    assert_eq!(*log.borrow(), ["second:scroll", "original:scroll"]);
}

#[test]
fn cancelling_replaced_proxy_leaves_slot_alone() {
    let log = Log::default();
    let original = recorder("original", &log);
    let first_target = recorder("first", &log);
    let second_target = recorder("second", &log);
    let mut region = region();
    region.set_observer(Some(weak(&original)));

    let first = ForwardingProxy::new();
    first.forward(weak(&first_target), &mut region);
    let second = ForwardingProxy::new();
    second.forward(weak(&second_target), &mut region);

    first.cancel_forwarding(&mut region).unwrap();
    assert!(region.observer_is(&second.as_observer()));

    second.cancel_forwarding(&mut region).unwrap();
    assert!(region.observer_is(&weak(&original)));
}

#[test]
fn proxy_survives_host_reassigning_the_slot() {
    let log = Log::default();
    let target = recorder("target", &log);
    let replacement = recorder("replacement", &log);
    let mut region = region();

    let proxy = ForwardingProxy::new();
    proxy.forward(weak(&target), &mut region);
    region.set_observer(Some(weak(&replacement)));

    region.begin_drag(Point::new(0.0, 100.0), 0);
    assert_eq!(*log.borrow(), ["target:begin", "replacement:begin"]);

    proxy.cancel_forwarding(&mut region).unwrap();
    assert!(region.observer_is(&weak(&replacement)));
}
