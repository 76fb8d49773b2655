// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notch heights and the sheet's position between them.

use understory_scroll::region::RegionId;

/// Content hosted in a bottom sheet.
///
/// Notch heights are queried again every time the sheet needs them, with the
/// height of the host area as `available`, so content may derive them from the
/// current layout.
pub trait BottomSheetContent {
    /// The scroll region the sheet should follow, if the content scrolls.
    fn scroll_region(&self) -> Option<RegionId>;

    /// Height of the sheet when fully raised.
    fn max_notch_height(&self, available: f64) -> f64;

    /// Height of the sheet when lowered.
    fn min_notch_height(&self, available: f64) -> f64;
}

/// Content whose notches are fixed fractions of the available height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractionContent {
    /// Fraction of the available height used for the lowered notch.
    pub min_fraction: f64,
    /// Fraction of the available height used for the raised notch.
    pub max_fraction: f64,
    /// Scroll region hosted by the content.
    pub region: Option<RegionId>,
}

impl Default for FractionContent {
    fn default() -> Self {
        Self {
            min_fraction: 0.3,
            max_fraction: 0.8,
            region: None,
        }
    }
}

impl BottomSheetContent for FractionContent {
    fn scroll_region(&self) -> Option<RegionId> {
        self.region
    }

    fn max_notch_height(&self, available: f64) -> f64 {
        available * self.max_fraction
    }

    fn min_notch_height(&self, available: f64) -> f64 {
        available * self.min_fraction
    }
}

/// Errors reported when validating notch heights.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum NotchError {
    /// The lowered notch is above the raised one.
    #[error("minimum notch {min} is above maximum notch {max}")]
    Inverted {
        /// Reported minimum height.
        min: f64,
        /// Reported maximum height.
        max: f64,
    },
    /// A notch height is negative, infinite or NaN.
    #[error("notch heights must be finite and non-negative (min {min}, max {max})")]
    OutOfRange {
        /// Reported minimum height.
        min: f64,
        /// Reported maximum height.
        max: f64,
    },
}

/// Where the sheet sits relative to its notches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TranslationPosition {
    /// At the raised notch.
    Top,
    /// At the lowered notch.
    Bottom,
    /// Between the notches.
    InFlight,
    /// Both notches coincide; the sheet cannot move.
    Stationary,
}

/// A validated pair of notch heights, `0 <= min <= max`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Notches {
    min: f64,
    max: f64,
}

impl Notches {
    /// Validates a pair of notch heights.
    pub fn new(min: f64, max: f64) -> Result<Self, NotchError> {
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || max < 0.0 {
            return Err(NotchError::OutOfRange { min, max });
        }
        if min > max {
            return Err(NotchError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    /// Builds notches from untrusted heights, repairing them if needed.
    ///
    /// `max` is forced to be finite and non-negative, then `min` is clamped
    /// into `[0, max]`.
    #[must_use]
    pub fn sanitized(min: f64, max: f64) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        let min = if min.is_finite() { min.clamp(0.0, max) } else { 0.0 };
        Self { min, max }
    }

    /// Height of the lowered notch.
    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    /// Height of the raised notch.
    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    /// Clamps a requested height to `[min, max]`, and never below zero.
    #[must_use]
    pub fn clamp(self, height: f64) -> f64 {
        self.min.max(height.min(self.max)).max(0.0)
    }

    /// Classifies `height`.
    ///
    /// Only exact notch heights count as `Top` or `Bottom`.
    #[must_use]
    pub fn position(self, height: f64) -> TranslationPosition {
        let at_top = height == self.max;
        let at_bottom = height == self.min;
        match (at_top, at_bottom) {
            (true, true) => TranslationPosition::Stationary,
            (true, false) => TranslationPosition::Top,
            (false, true) => TranslationPosition::Bottom,
            (false, false) => TranslationPosition::InFlight,
        }
    }

    /// The notch a sheet at `height` settles to.
    ///
    /// The closer notch wins; an exact midpoint goes to `min`.
    #[must_use]
    pub fn nearest(self, height: f64) -> f64 {
        let to_max = self.max - height;
        let to_min = height - self.min;
        if to_max < to_min {
            self.max
        } else if to_min <= to_max {
            self.min
        } else {
            height
        }
    }
}
