// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The nested scroll container.

use alloc::vec::{Drain, Vec};
use core::ops::{Deref, DerefMut};

use kurbo::Size;
use understory_gesture::pan::GestureId;
use understory_scroll::region::{RegionId, ScrollRegion};
use understory_timing::{Millis, TimerQueue};

use crate::child::NestedChild;

/// Tuning of a [`NestedScrollView`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NestedConfig {
    /// Delay between a child's content-size change and the relayout it triggers.
    pub relayout_delay: Millis,
}

impl Default for NestedConfig {
    fn default() -> Self {
        Self { relayout_delay: 10 }
    }
}

/// A change to the row list that the host applies to its list widget.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RowUpdate {
    /// A row was appended at this index.
    Inserted(usize),
    /// A row's laid-out height changed.
    Resized {
        /// Index of the row.
        row: usize,
        /// New height.
        height: f64,
    },
    /// Every row was re-measured.
    Reloaded,
}

/// Errors from row access.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChildError {
    /// No row exists at the index.
    #[error("row {index} is out of range ({len} rows)")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of rows.
        len: usize,
    },
}

#[derive(Debug)]
struct NestedRow {
    child: NestedChild,
    forced_height: Option<f64>,
    laid_out_height: f64,
    observed_revision: u64,
}

impl NestedRow {
    fn height(&self) -> f64 {
        match &self.child {
            NestedChild::View(view) => self.forced_height.unwrap_or(view.size.height),
            NestedChild::Scroll(region) => region.content_size().height,
            NestedChild::Nested(nested) => nested.region().content_size().height,
        }
    }

    /// Returns `true` once per content-size change of a scrollable child.
    fn take_size_change(&mut self) -> bool {
        let Some(revision) = self.child.region().map(ScrollRegion::content_size_revision) else {
            return false;
        };
        if revision == self.observed_revision {
            return false;
        }
        self.observed_revision = revision;
        true
    }
}

/// A vertical stack of children that scrolls as one region.
///
/// Rows are append-only. A scrollable child is laid out at its full content
/// height, with its own scrolling, bouncing and indicator turned off; other
/// children use their forced height or their frame height.
///
/// When a scrollable child's content size changes, a relayout is scheduled
/// [`NestedConfig::relayout_delay`] later and runs on the first
/// [`NestedScrollView::tick`] at or after that time. Relayouts re-measure every
/// row, so a relayout that finds nothing new does nothing.
#[derive(Debug)]
pub struct NestedScrollView {
    region: ScrollRegion,
    rows: Vec<NestedRow>,
    timers: TimerQueue<usize>,
    updates: Vec<RowUpdate>,
    config: NestedConfig,
}

impl NestedScrollView {
    /// Creates an empty container with the default configuration.
    ///
    /// `id` and `pan` identify the container's own scroll region and its pan.
    pub fn new(id: RegionId, pan: GestureId) -> Self {
        Self::with_config(id, pan, NestedConfig::default())
    }

    /// Creates an empty container.
    pub fn with_config(id: RegionId, pan: GestureId, config: NestedConfig) -> Self {
        Self {
            region: ScrollRegion::new(id, pan),
            rows: Vec::new(),
            timers: TimerQueue::new(),
            updates: Vec::new(),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> NestedConfig {
        self.config
    }

    /// The container's own scroll region.
    pub fn region(&self) -> &ScrollRegion {
        &self.region
    }

    /// The container's own scroll region, mutably.
    pub fn region_mut(&mut self) -> &mut ScrollRegion {
        &mut self.region
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a child and returns its row index.
    ///
    /// Rows are never reordered: a position hint other than the end is
    /// ignored. A nested container is reloaded before it is added.
    pub fn add_child(
        &mut self,
        child: impl Into<NestedChild>,
        at: Option<usize>,
        forced_height: Option<f64>,
    ) -> usize {
        let mut child = child.into();
        let index = self.rows.len();
        if at.is_some_and(|at| at != index) {
            tracing::debug!(hint = ?at, index, "row position hint ignored; rows are append-only");
        }
        if let Some(nested) = child.as_nested_mut() {
            nested.reload();
        }
        let observed_revision = match child.region_mut() {
            Some(region) => {
                region.set_scroll_enabled(false);
                region.set_bounces(false);
                region.set_shows_vertical_indicator(false);
                region.content_size_revision()
            }
            None => 0,
        };

        let mut row = NestedRow {
            child,
            forced_height,
            laid_out_height: 0.0,
            observed_revision,
        };
        row.laid_out_height = row.height();
        tracing::debug!(index, height = row.laid_out_height, "row inserted");
        self.rows.push(row);
        self.updates.push(RowUpdate::Inserted(index));
        self.sync_content_size();
        index
    }

    /// Current height of a row, measured now.
    ///
    /// This can differ from [`NestedScrollView::laid_out_height`] while a
    /// relayout is pending.
    pub fn row_height(&self, index: usize) -> Option<f64> {
        self.rows.get(index).map(NestedRow::height)
    }

    /// Height of a row as of the last layout.
    pub fn laid_out_height(&self, index: usize) -> Option<f64> {
        self.rows.get(index).map(|row| row.laid_out_height)
    }

    /// Forced height given when the row was added.
    pub fn forced_height(&self, index: usize) -> Option<f64> {
        self.rows.get(index).and_then(|row| row.forced_height)
    }

    /// The child of a row.
    pub fn child(&self, index: usize) -> Option<&NestedChild> {
        self.rows.get(index).map(|row| &row.child)
    }

    /// Mutable access to the child of a row.
    ///
    /// When the guard is dropped, a content-size change of a scrollable child
    /// schedules a relayout relative to `now`.
    pub fn child_mut(&mut self, index: usize, now: Millis) -> Result<ChildGuard<'_>, ChildError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(ChildError::OutOfRange { index, len })?;
        Ok(ChildGuard {
            row,
            timers: &mut self.timers,
            index,
            now,
            delay: self.config.relayout_delay,
        })
    }

    /// Sum of all laid-out row heights.
    pub fn content_height(&self) -> f64 {
        self.rows.iter().map(|row| row.laid_out_height).sum()
    }

    /// Offset of the top of row `index`; `index == len()` gives the content height.
    pub fn row_offset(&self, index: usize) -> Option<f64> {
        (index <= self.rows.len()).then(|| {
            self.rows[..index]
                .iter()
                .map(|row| row.laid_out_height)
                .sum()
        })
    }

    /// The row covering vertical offset `y`.
    pub fn row_at_offset(&self, y: f64) -> Option<usize> {
        if y < 0.0 {
            return None;
        }
        let mut top = 0.0;
        for (index, row) in self.rows.iter().enumerate() {
            let bottom = top + row.laid_out_height;
            if y < bottom {
                return Some(index);
            }
            top = bottom;
        }
        None
    }

    /// Returns `true` while a relayout is scheduled, here or in a nested child.
    pub fn is_relayout_pending(&self) -> bool {
        self.next_deadline().is_some()
    }

    /// Earliest scheduled relayout, here or in a nested child.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.rows
            .iter()
            .filter_map(|row| match &row.child {
                NestedChild::Nested(nested) => nested.next_deadline(),
                NestedChild::View(_) | NestedChild::Scroll(_) => None,
            })
            .chain(self.timers.next_deadline())
            .min()
    }

    /// Advances time: runs nested children's relayouts first, schedules
    /// relayouts for children whose content size changed, then runs the
    /// relayouts that are due.
    ///
    /// Returns `true` if a row changed height.
    pub fn tick(&mut self, now: Millis) -> bool {
        let delay = self.config.relayout_delay;
        for (index, row) in self.rows.iter_mut().enumerate() {
            if let Some(nested) = row.child.as_nested_mut() {
                nested.tick(now);
            }
            if row.take_size_change() {
                self.timers.schedule_after(index, now, delay);
                tracing::trace!(row = index, "child content size changed");
            }
        }
        if self.timers.take_due(now).is_empty() {
            return false;
        }
        self.relayout()
    }

    fn relayout(&mut self) -> bool {
        let mut changed = false;
        for (index, row) in self.rows.iter_mut().enumerate() {
            let height = row.height();
            if height != row.laid_out_height {
                row.laid_out_height = height;
                self.updates.push(RowUpdate::Resized { row: index, height });
                changed = true;
            }
        }
        if changed {
            self.sync_content_size();
            tracing::debug!(height = self.content_height(), "nested rows relaid out");
        } else {
            tracing::trace!("relayout found no height changes");
        }
        changed
    }

    /// Re-measures every row at once and drops pending relayouts.
    pub fn reload(&mut self) {
        self.timers.clear();
        for row in &mut self.rows {
            row.take_size_change();
            row.laid_out_height = row.height();
        }
        self.updates.push(RowUpdate::Reloaded);
        self.sync_content_size();
    }

    /// Takes the row updates recorded since the last call.
    pub fn drain_updates(&mut self) -> Drain<'_, RowUpdate> {
        self.updates.drain(..)
    }

    fn sync_content_size(&mut self) {
        let width = self.region.viewport().width;
        let height = self.content_height();
        self.region.set_content_size(Size::new(width, height));
    }
}

/// Mutable access to one row's child; see [`NestedScrollView::child_mut`].
#[derive(Debug)]
pub struct ChildGuard<'a> {
    row: &'a mut NestedRow,
    timers: &'a mut TimerQueue<usize>,
    index: usize,
    now: Millis,
    delay: Millis,
}

impl Deref for ChildGuard<'_> {
    type Target = NestedChild;

    fn deref(&self) -> &NestedChild {
        &self.row.child
    }
}

impl DerefMut for ChildGuard<'_> {
    fn deref_mut(&mut self) -> &mut NestedChild {
        &mut self.row.child
    }
}

impl Drop for ChildGuard<'_> {
    fn drop(&mut self) {
        if self.row.take_size_change() {
            let outcome = self.timers.schedule_after(self.index, self.now, self.delay);
            tracing::trace!(row = self.index, ?outcome, "relayout scheduled");
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::child::ChildView;

    fn container(id: u32) -> NestedScrollView {
        let mut nested = NestedScrollView::new(RegionId::new(id), GestureId::new(id));
        nested.region_mut().set_viewport(Size::new(320.0, 600.0));
        nested
    }

    fn scroll(id: u32, height: f64) -> ScrollRegion {
        let mut region = ScrollRegion::new(RegionId::new(id), GestureId::new(id));
        region.set_content_size(Size::new(320.0, height));
        region
    }

    fn resize(nested: &mut NestedScrollView, index: usize, height: f64, now: Millis) {
        let mut child = nested.child_mut(index, now).unwrap();
        child
            .region_mut()
            .unwrap()
            .set_content_size(Size::new(320.0, height));
    }

    #[test]
    fn rows_append_in_order_and_ignore_position_hint() {
        let mut nested = container(1);
        assert_eq!(nested.add_child(ChildView::new(Size::new(320.0, 40.0)), None, None), 0);
        assert_eq!(nested.add_child(scroll(2, 300.0), None, None), 1);
        assert_eq!(
            nested.add_child(ChildView::new(Size::new(320.0, 10.0)), Some(0), Some(25.0)),
            2
        );

        assert_eq!(nested.len(), 3);
        assert_eq!(nested.row_height(0), Some(40.0));
        assert_eq!(nested.row_height(1), Some(300.0));
        assert_eq!(nested.row_height(2), Some(25.0));
        assert_eq!(nested.region().content_size().height, 365.0);
        assert_eq!(
            nested.drain_updates().collect::<Vec<_>>(),
            [
                RowUpdate::Inserted(0),
                RowUpdate::Inserted(1),
                RowUpdate::Inserted(2)
            ]
        );
    }

    #[test]
    fn scrollable_child_is_flattened() {
        let mut nested = container(1);
        nested.add_child(scroll(2, 300.0), None, Some(10.0));
        let region = nested.child(0).and_then(NestedChild::region).unwrap();

        assert!(!region.is_scroll_enabled());
        assert!(!region.bounces());
        assert!(!region.shows_vertical_indicator());
        // Forced heights do not apply to scrollable children.
        assert_eq!(nested.row_height(0), Some(300.0));
        assert_eq!(nested.forced_height(0), Some(10.0));
    }

    #[test]
    fn row_height_is_measured_at_query_time() {
        let mut nested = container(1);
        nested.add_child(scroll(2, 300.0), None, None);
        resize(&mut nested, 0, 450.0, 1_000);

        assert_eq!(nested.row_height(0), Some(450.0));
        assert_eq!(nested.laid_out_height(0), Some(300.0));
        assert!(nested.is_relayout_pending());
    }

    #[test]
    fn relayout_runs_after_delay_and_coalesces() {
        let mut nested = container(1);
        nested.add_child(scroll(2, 300.0), None, None);
        nested.drain_updates().for_each(drop);

        resize(&mut nested, 0, 350.0, 1_000);
        resize(&mut nested, 0, 400.0, 1_004);
        assert_eq!(nested.next_deadline(), Some(1_010));

        assert!(!nested.tick(1_009));
        assert!(nested.tick(1_010));
        assert_eq!(nested.region().content_size().height, 400.0);
        assert_eq!(
            nested.drain_updates().collect::<Vec<_>>(),
            [RowUpdate::Resized {
                row: 0,
                height: 400.0
            }]
        );
        assert!(!nested.is_relayout_pending());
        assert!(!nested.tick(1_020));
    }

    #[test]
    fn stale_relayout_is_a_no_op() {
        let mut nested = container(1);
        nested.add_child(scroll(2, 300.0), None, None);
        nested.drain_updates().for_each(drop);

        resize(&mut nested, 0, 500.0, 0);
        resize(&mut nested, 0, 300.0, 2);

        assert!(!nested.tick(10));
        assert_eq!(nested.drain_updates().count(), 0);
        assert_eq!(nested.region().content_size().height, 300.0);
    }

    #[test]
    fn nested_container_change_propagates_on_later_ticks() {
        let mut inner = container(10);
        inner.add_child(scroll(11, 200.0), None, None);

        let mut outer = container(1);
        outer.add_child(ChildView::new(Size::new(320.0, 50.0)), None, None);
        outer.add_child(inner, None, None);
        assert_eq!(outer.row_height(1), Some(200.0));
        outer.drain_updates().for_each(drop);

        {
            let mut child = outer.child_mut(1, 0).unwrap();
            let inner = child.as_nested_mut().unwrap();
            resize(inner, 0, 260.0, 0);
        }
        assert_eq!(outer.next_deadline(), Some(10));

        // The inner container relays out at 10; the outer one notices then.
        assert!(!outer.tick(10));
        assert_eq!(outer.row_height(1), Some(260.0));
        assert_eq!(outer.next_deadline(), Some(20));

        assert!(outer.tick(20));
        assert_eq!(
            outer.drain_updates().collect::<Vec<_>>(),
            [RowUpdate::Resized {
                row: 1,
                height: 260.0
            }]
        );
        assert_eq!(outer.region().content_size().height, 310.0);
    }

    #[test]
    fn adding_nested_container_reloads_it() {
        let mut inner = container(10);
        inner.add_child(scroll(11, 200.0), None, None);
        inner.drain_updates().for_each(drop);

        let mut outer = container(1);
        outer.add_child(inner, None, None);
        let mut child = outer.child_mut(0, 0).unwrap();
        let inner = child.as_nested_mut().unwrap();
        assert_eq!(
            inner.drain_updates().collect::<Vec<_>>(),
            [RowUpdate::Reloaded]
        );
    }

    #[test]
    fn reload_remeasures_and_cancels_pending() {
        let mut nested = container(1);
        nested.add_child(scroll(2, 300.0), None, None);
        resize(&mut nested, 0, 120.0, 0);
        nested.drain_updates().for_each(drop);

        nested.reload();

        assert!(!nested.is_relayout_pending());
        assert_eq!(nested.laid_out_height(0), Some(120.0));
        assert_eq!(
            nested.drain_updates().collect::<Vec<_>>(),
            [RowUpdate::Reloaded]
        );
        assert!(!nested.tick(100));
    }

    #[test]
    fn offsets_follow_laid_out_heights() {
        let mut nested = container(1);
        nested.add_child(ChildView::new(Size::new(320.0, 40.0)), None, None);
        nested.add_child(ChildView::new(Size::new(320.0, 0.0)), None, None);
        nested.add_child(scroll(2, 100.0), None, None);

        assert_eq!(nested.row_offset(0), Some(0.0));
        assert_eq!(nested.row_offset(2), Some(40.0));
        assert_eq!(nested.row_offset(3), Some(140.0));
        assert_eq!(nested.row_offset(4), None);

        assert_eq!(nested.row_at_offset(0.0), Some(0));
        assert_eq!(nested.row_at_offset(40.0), Some(2));
        assert_eq!(nested.row_at_offset(139.9), Some(2));
        assert_eq!(nested.row_at_offset(140.0), None);
        assert_eq!(nested.row_at_offset(-1.0), None);
    }

    #[test]
    fn child_mut_out_of_range_is_an_error() {
        let mut nested = container(1);
        nested.add_child(ChildView::default(), None, None);
        assert_eq!(
            nested.child_mut(3, 0).err(),
            Some(ChildError::OutOfRange { index: 3, len: 1 })
        );
    }
}
