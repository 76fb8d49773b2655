// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI code regularly needs to say "do this a little later, on a later turn of
//! the event loop": relayout after a child finished settling, hide a scrollbar
//! after inactivity, retry a measurement once fonts are loaded. This crate
//! keeps the bookkeeping for those deferred actions without owning an event
//! loop or a clock.
//!
//! The core type is [`TimerQueue`], a keyed queue of deadlines:
//!
//! - Keys are caller-chosen identifiers (row indices, widget ids, ...).
//! - At most one timer is pending per key. Scheduling a key that is already
//!   pending **coalesces**: the earlier deadline wins, so a burst of triggers
//!   inside one delay window fires once.
//! - Timers can be cancelled at any point before they fire.
//! - The host drives time explicitly by calling [`TimerQueue::take_due`] with
//!   its current timestamp (milliseconds, in whatever epoch the host uses).
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::{ScheduleOutcome, TimerQueue};
//!
//! let mut timers = TimerQueue::<u32>::new();
//!
//! // Two triggers for the same key inside the delay window collapse into one.
//! assert_eq!(timers.schedule_after(7, 1_000, 10), ScheduleOutcome::Scheduled);
//! assert_eq!(timers.schedule_after(7, 1_004, 10), ScheduleOutcome::Coalesced);
//!
//! // Nothing is due yet.
//! assert!(timers.take_due(1_005).is_empty());
//!
//! // The first deadline (1_010) wins.
//! let due = timers.take_due(1_010);
//! assert_eq!(due.as_slice(), &[7]);
//! assert!(timers.is_empty());
//! ```
//!
//! Handlers for due keys should re-query whatever state they act on rather
//! than rely on values captured when the timer was scheduled; a timer that
//! fires after the state already moved on must be harmless.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod queue;

pub use queue::{Millis, ScheduleOutcome, TimerQueue};
