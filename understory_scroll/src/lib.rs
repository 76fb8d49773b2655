// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scroll: a headless scrollable region and ordered observer forwarding.
//!
//! This crate models the parts of a vertically scrolling region that
//! interaction code depends on, without drawing anything or owning an event loop:
//!
//! - [`region`]: [`ScrollRegion`](region::ScrollRegion) keeps viewport and
//!   content geometry, insets, the drag/deceleration state, its own pan
//!   gesture, and a single observer slot.
//! - [`observer`]: the [`ScrollObserver`](observer::ScrollObserver) trait and
//!   the [`ScrollCallbacks`](observer::ScrollCallbacks) capability set.
//! - [`proxy`]: [`ForwardingProxy`](proxy::ForwardingProxy) shares one region's
//!   observer slot between a new target and the observer that was already
//!   installed, calling the target first and the original second, exactly once each.
//! - [`geometry`]: small point and velocity helpers used by observers.
//!
//! ## Ownership
//!
//! Regions are owned by the host. Observers are shared as
//! `Rc<RefCell<dyn ScrollObserver>>` and the observer slot only keeps a
//! non-owning handle, so a region never keeps its observer alive and an
//! observer can safely outlive (or be outlived by) the region. Everything is
//! single-threaded.
//!
//! ## Driving a region
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Size};
//! use understory_gesture::pan::GestureId;
//! use understory_scroll::observer::{ScrollCallbacks, ScrollObserver, SharedObserver};
//! use understory_scroll::region::{RegionId, ScrollRegion};
//!
//! #[derive(Default)]
//! struct Offsets(Vec<f64>);
//!
//! impl ScrollObserver for Offsets {
//!     fn callbacks(&self) -> ScrollCallbacks {
//!         ScrollCallbacks::DID_SCROLL
//!     }
//!     fn did_scroll(&mut self, region: &mut ScrollRegion) {
//!         self.0.push(region.content_offset().y);
//!     }
//! }
//!
//! let offsets = Rc::new(RefCell::new(Offsets::default()));
//! let observer: SharedObserver = offsets.clone();
//!
//! let mut region = ScrollRegion::new(RegionId::new(1), GestureId::new(1));
//! region.set_viewport(Size::new(320.0, 480.0));
//! region.set_content_size(Size::new(320.0, 2_000.0));
//! region.set_observer(Some(Rc::downgrade(&observer)));
//!
//! region.begin_drag(Point::new(0.0, 400.0), 0);
//! region.drag_to(Point::new(0.0, 350.0), 16);
//! region.drag_to(Point::new(0.0, 300.0), 32);
//!
//! assert_eq!(offsets.borrow().0, [50.0, 100.0]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod geometry;
pub mod observer;
pub mod proxy;
pub mod region;
