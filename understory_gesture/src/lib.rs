// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Gesture: headless pan gesture state and gesture arbitration.
//!
//! This crate provides two small building blocks for touch-driven UI:
//!
//! - [`pan`]: [`PanGesture`](pan::PanGesture) tracks one continuous pan: where
//!   it started, its cumulative translation, its velocity and vertical direction,
//!   and its recognition state.
//! - [`arbiter`]: [`ScrollCaringPan`](arbiter::ScrollCaringPan) is a pan that is
//!   told which scrollable region it competes with, and that yields to that
//!   region's own gestures when the host asks it to arbitrate.
//!
//! Neither type receives platform events directly. Hosts feed them touch
//! locations with millisecond timestamps and read state back out, in the same
//! way `understory_event_state` consumes pre-computed pointer positions.
//!
//! ## Tracking a pan
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_gesture::pan::{GestureId, GestureState, PanGesture, VerticalDirection};
//!
//! let mut pan = PanGesture::new(GestureId::new(1));
//!
//! pan.begin(Point::new(100.0, 400.0), 0);
//! pan.update(Point::new(100.0, 380.0), 10);
//!
//! assert_eq!(pan.state(), GestureState::Changed);
//! assert_eq!(pan.translation(), Vec2::new(0.0, -20.0));
//! // 20 points in 10 ms, moving toward the top of the screen.
//! assert_eq!(pan.velocity(), Vec2::new(0.0, -2000.0));
//! assert_eq!(pan.y_direction(), VerticalDirection::Up);
//! ```
//!
//! ## Arbitration
//!
//! ```rust
//! use understory_gesture::arbiter::ScrollCaringPan;
//! use understory_gesture::pan::GestureId;
//!
//! let region_pan = GestureId::new(10);
//! let mut sheet_pan = ScrollCaringPan::new(GestureId::new(1));
//! sheet_pan.set_driving_gestures([region_pan]);
//!
//! assert!(sheet_pan.should_require_failure_of(region_pan));
//! assert!(!sheet_pan.should_require_failure_of(GestureId::new(99)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod arbiter;
pub mod pan;
