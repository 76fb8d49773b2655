// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Children hosted in a nested scroll container.

use alloc::boxed::Box;

use kurbo::Size;
use understory_scroll::region::ScrollRegion;

use crate::view::NestedScrollView;

/// A plain, non-scrolling child with a fixed size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ChildView {
    /// Size of the child's frame.
    pub size: Size,
}

impl ChildView {
    /// Creates a child with the given frame size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

/// One child of a [`NestedScrollView`].
///
/// Scrollable children are laid out at their full content height; the
/// container scrolls for them.
#[derive(Debug)]
pub enum NestedChild {
    /// A non-scrolling child.
    View(ChildView),
    /// A scroll region.
    Scroll(ScrollRegion),
    /// Another nested container.
    Nested(Box<NestedScrollView>),
}

impl NestedChild {
    /// Returns `true` for scroll regions and nested containers.
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        !matches!(self, Self::View(_))
    }

    /// The scroll region of a scrollable child.
    #[must_use]
    pub fn region(&self) -> Option<&ScrollRegion> {
        match self {
            Self::View(_) => None,
            Self::Scroll(region) => Some(region),
            Self::Nested(nested) => Some(nested.region()),
        }
    }

    /// The scroll region of a scrollable child, mutably.
    pub fn region_mut(&mut self) -> Option<&mut ScrollRegion> {
        match self {
            Self::View(_) => None,
            Self::Scroll(region) => Some(region),
            Self::Nested(nested) => Some(nested.region_mut()),
        }
    }

    /// The nested container, if this child is one.
    pub fn as_nested_mut(&mut self) -> Option<&mut NestedScrollView> {
        match self {
            Self::Nested(nested) => Some(nested),
            Self::View(_) | Self::Scroll(_) => None,
        }
    }
}

impl From<ChildView> for NestedChild {
    fn from(view: ChildView) -> Self {
        Self::View(view)
    }
}

impl From<ScrollRegion> for NestedChild {
    fn from(region: ScrollRegion) -> Self {
        Self::Scroll(region)
    }
}

impl From<NestedScrollView> for NestedChild {
    fn from(nested: NestedScrollView) -> Self {
        Self::Nested(Box::new(nested))
    }
}
