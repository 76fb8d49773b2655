// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Sheet: a headless bottom sheet that cooperates with the scrollable
//! content it hosts.
//!
//! A bottom sheet is an overlay pinned to the bottom of a host area. It rests at
//! one of two heights ("notches") reported by its content, and the user drags
//! it between them. When the content scrolls, a single drag has to be shared:
//! pulling the content down while it rests at its start lowers the sheet, and
//! pushing it up while the sheet is low raises the sheet before any scrolling
//! happens.
//!
//! - [`notch`]: the [`BottomSheetContent`](notch::BottomSheetContent) trait,
//!   validated [`Notches`](notch::Notches) and the sheet's
//!   [`TranslationPosition`](notch::TranslationPosition).
//! - [`controller`]: [`SheetController`](controller::SheetController), the
//!   height state machine. It observes the content's scroll region.
//! - [`animation`]: eased height animations sampled with host timestamps.
//! - [`sheet`]: [`BottomSheet`](sheet::BottomSheet) wires a controller to a
//!   region through a forwarding proxy, so whoever observed the region
//!   before keeps receiving its events.
//!
//! Nothing here draws. The host lays out the sheet at
//! [`SheetController::sheet_frame`](controller::SheetController::sheet_frame),
//! routes pointer events through
//! [`SheetController::hit_test`](controller::SheetController::hit_test) (points
//! outside the sheet fall through), and calls `tick` every frame.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_gesture::pan::GestureId;
//! use understory_sheet::notch::{FractionContent, TranslationPosition};
//! use understory_sheet::sheet::BottomSheet;
//!
//! let sheet = BottomSheet::new(FractionContent::default(), GestureId::new(1));
//! sheet.present(Rect::new(0.0, 0.0, 400.0, 1_000.0), None, 0);
//! while sheet.tick(300) {}
//! assert_eq!(sheet.controller().current_height(), 300.0);
//!
//! // Drag the sheet itself upward by 350 points and let go.
//! {
//!     let mut controller = sheet.controller_mut();
//!     controller.pan_mut().touches_began(Point::new(200.0, 800.0), 1_000);
//!     controller.pan_mut().touches_moved(Point::new(200.0, 450.0), 1_016);
//!     controller.handle_pan(1_016);
//!     controller.pan_mut().touches_ended();
//!     controller.handle_pan(1_020);
//! }
//! while sheet.tick(1_220) {}
//!
//! assert_eq!(sheet.controller().current_height(), 800.0);
//! assert_eq!(
//!     sheet.controller().translation_position(),
//!     TranslationPosition::Top
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod animation;
pub mod controller;
pub mod notch;
pub mod sheet;
