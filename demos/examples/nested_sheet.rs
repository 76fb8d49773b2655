// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom sheet over a nested scroll container.
//!
//! Present a sheet whose content stacks a header and ten lists in one
//! `NestedScrollView`, drag it up through the content, then let every list
//! load more rows and watch the container relayout while the sheet follows it.
//!
//! Run:
//! - `cargo run -p understory_examples --example nested_sheet`

use kurbo::{Point, Rect, Size};
use understory_gesture::pan::GestureId;
use understory_nested_scroll::child::ChildView;
use understory_nested_scroll::view::NestedScrollView;
use understory_scroll::region::{RegionId, ScrollRegion};
use understory_sheet::notch::FractionContent;
use understory_sheet::sheet::BottomSheet;

const WIDTH: f64 = 390.0;
const ROW_HEIGHT: f64 = 44.0;
const FRAME: u64 = 16;

fn list(id: u32, rows: u32) -> ScrollRegion {
    let mut region = ScrollRegion::new(RegionId::new(id), GestureId::new(id));
    region.set_content_size(Size::new(WIDTH, f64::from(rows) * ROW_HEIGHT));
    region
}

fn main() {
    let host = Rect::new(0.0, 0.0, WIDTH, 844.0);

    let mut nested = NestedScrollView::new(RegionId::new(1), GestureId::new(1));
    nested
        .region_mut()
        .set_viewport(Size::new(WIDTH, host.height()));
    nested.add_child(ChildView::new(Size::new(WIDTH, 120.0)), None, None);
    for i in 0..10 {
        nested.add_child(list(100 + i, 50), None, None);
    }
    nested.drain_updates().for_each(drop);
    println!(
        "{} rows, content height {:.0}",
        nested.len(),
        nested.region().content_size().height
    );

    let sheet = BottomSheet::new(
        FractionContent {
            min_fraction: 0.3,
            max_fraction: 0.85,
            region: Some(RegionId::new(1)),
        },
        GestureId::new(1_000),
    );
    let mut now = 0;
    sheet.present(host, Some(nested.region_mut()), now);
    while sheet.tick(now) {
        now += FRAME;
    }
    println!("presented at {:.1}", sheet.controller().current_height());

    // Push the content up: the sheet rises first, then the rows scroll.
    {
        let region = nested.region_mut();
        let mut y = 700.0;
        region.begin_drag(Point::new(WIDTH / 2.0, y), now);
        for _ in 0..20 {
            now += FRAME;
            y -= 30.0;
            region.drag_to(Point::new(WIDTH / 2.0, y), now);
            println!(
                "  sheet {:>6.1}  content offset {:>6.1}",
                sheet.controller().current_height(),
                region.content_offset().y
            );
        }
        region.end_drag(false);
    }
    while sheet.tick(now) {
        now += FRAME;
    }
    println!(
        "settled at {:.1} ({:?})",
        sheet.controller().current_height(),
        sheet.controller().translation_position()
    );

    // Every list loads thirty more rows.
    for row in 1..nested.len() {
        if let Ok(mut child) = nested.child_mut(row, now)
            && let Some(region) = child.region_mut()
        {
            region.set_content_size(Size::new(WIDTH, 80.0 * ROW_HEIGHT));
        }
    }
    while let Some(deadline) = nested.next_deadline() {
        now = deadline;
        nested.tick(now);
    }
    for update in nested.drain_updates() {
        println!("  {update:?}");
    }
    println!(
        "content height {:.0} at {now} ms",
        nested.region().content_size().height
    );

    if let Err(err) = sheet.dismiss(Some(nested.region_mut())) {
        eprintln!("dismiss failed: {err}");
    }
}
