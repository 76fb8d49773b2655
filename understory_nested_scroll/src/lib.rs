// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Nested Scroll: a vertical stack of views and scroll regions that
//! scrolls as one.
//!
//! [`NestedScrollView`](view::NestedScrollView) keeps an append-only list of
//! rows. Each row hosts a [`NestedChild`](child::NestedChild):
//!
//! - a plain [`ChildView`](child::ChildView), laid out at its forced height or
//!   its frame height;
//! - a [`ScrollRegion`](understory_scroll::region::ScrollRegion), laid out at
//!   its full content height with its own scrolling turned off;
//! - another `NestedScrollView`, which is itself a scroll region.
//!
//! When a scrollable child's content grows or shrinks, the container does not
//! relayout on the spot. It schedules a relayout a short delay later (see
//! [`NestedConfig`](view::NestedConfig)); triggers inside that window collapse
//! into one. The host calls [`tick`](view::NestedScrollView::tick) with its
//! clock and applies the recorded [`RowUpdate`](view::RowUpdate)s to its own
//! list widget.
//!
//! The container's own region can be handed to a bottom sheet or any other
//! scroll observer like any other region.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_gesture::pan::GestureId;
//! use understory_nested_scroll::child::ChildView;
//! use understory_nested_scroll::view::{NestedScrollView, RowUpdate};
//! use understory_scroll::region::{RegionId, ScrollRegion};
//!
//! let mut nested = NestedScrollView::new(RegionId::new(1), GestureId::new(1));
//!
//! let mut list = ScrollRegion::new(RegionId::new(2), GestureId::new(2));
//! list.set_content_size(Size::new(320.0, 400.0));
//!
//! nested.add_child(ChildView::new(Size::new(320.0, 60.0)), None, None);
//! nested.add_child(list, None, None);
//! assert_eq!(nested.region().content_size().height, 460.0);
//!
//! // The list loads more items.
//! nested
//!     .child_mut(1, 1_000)
//!     .unwrap()
//!     .region_mut()
//!     .unwrap()
//!     .set_content_size(Size::new(320.0, 800.0));
//!
//! assert!(!nested.tick(1_005));
//! assert!(nested.tick(1_010));
//! assert_eq!(nested.region().content_size().height, 860.0);
//! assert_eq!(
//!     nested.drain_updates().last(),
//!     Some(RowUpdate::Resized { row: 1, height: 800.0 })
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod child;
pub mod view;
