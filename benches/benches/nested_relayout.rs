// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_gesture::pan::GestureId;
use understory_nested_scroll::child::ChildView;
use understory_nested_scroll::view::NestedScrollView;
use understory_scroll::region::{RegionId, ScrollRegion};

fn build(rows: u32) -> NestedScrollView {
    let mut nested = NestedScrollView::new(RegionId::new(0), GestureId::new(0));
    for i in 0..rows {
        if i % 2 == 0 {
            nested.add_child(ChildView::new(Size::new(320.0, 44.0)), None, None);
        } else {
            let mut region = ScrollRegion::new(RegionId::new(i + 1), GestureId::new(i + 1));
            region.set_content_size(Size::new(320.0, 200.0));
            nested.add_child(region, None, None);
        }
    }
    nested.drain_updates().for_each(drop);
    nested
}

fn bench_relayout_after_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested/relayout_after_resize");

    for rows in [8u32, 128, 1_024] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter_batched(
                || build(rows),
                |mut nested| {
                    if let Ok(mut child) = nested.child_mut(1, 0)
                        && let Some(region) = child.region_mut()
                    {
                        region.set_content_size(Size::new(320.0, 480.0));
                    }
                    black_box(nested.tick(10));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_row_at_offset(c: &mut Criterion) {
    let nested = build(1_024);
    let height = nested.content_height();
    c.bench_function("nested/row_at_offset", |b| {
        b.iter(|| black_box(nested.row_at_offset(black_box(height * 0.75))));
    });
}

criterion_group!(benches, bench_relayout_after_resize, bench_row_at_offset);
criterion_main!(benches);
