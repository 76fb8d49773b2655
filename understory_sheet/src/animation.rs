// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Height animations driven by host timestamps.
//!
//! A [`HeightAnimation`] interpolates between two heights over a fixed
//! duration. It does not own a clock: the host samples it with its own
//! millisecond timestamps. An animation created without a start time starts at
//! the first sample, which lets observer callbacks (that carry no timestamp)
//! schedule an animation for the next frame.
//!
//! ```
//! use understory_sheet::animation::{Easing, HeightAnimation};
//!
//! let mut anim = HeightAnimation::new(0.0, 300.0, 300, Easing::Linear, Some(1_000));
//! assert_eq!(anim.sample(1_150), (150.0, false));
//! assert_eq!(anim.sample(1_300), (300.0, true));
//! ```

use understory_timing::Millis;

/// Easing curve applied to animation progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Starts slow, ends fast.
    EaseIn,
    /// Starts fast, ends slow.
    EaseOut,
    /// Slow start and end, fast middle.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Maps progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// An animation of the sheet height from one value to another.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeightAnimation {
    from: f64,
    to: f64,
    duration: Millis,
    easing: Easing,
    start: Option<Millis>,
}

impl HeightAnimation {
    /// Creates an animation; `start == None` starts it at the first sample.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Millis, easing: Easing, start: Option<Millis>) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            start,
        }
    }

    /// Height the animation ends at.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Returns the height at `now` and whether the animation has finished.
    ///
    /// Timestamps earlier than the start count as the start.
    pub fn sample(&mut self, now: Millis) -> (f64, bool) {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        if elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed as f64 / self.duration as f64;
        let eased = self.easing.apply(t);
        (self.from + (self.to - self.from) * eased, false)
    }
}
