// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_timing::TimerQueue;

fn bench_schedule_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing/schedule_then_take_due");

    for len in [16usize, 256, 4_096] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter_batched(
                TimerQueue::<usize>::new,
                |mut timers| {
                    for key in 0..len {
                        timers.schedule_after(key, key as u64, 10);
                    }
                    black_box(timers.take_due(u64::MAX));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_coalescing_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing/coalescing_burst");

    // Many triggers for a handful of keys inside one delay window, as a row
    // that keeps reporting content-size changes while it loads.
    for triggers in [64usize, 1_024] {
        group.throughput(Throughput::Elements(triggers as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(triggers),
            &triggers,
            |b, &triggers| {
                b.iter_batched(
                    TimerQueue::<usize>::new,
                    |mut timers| {
                        for i in 0..triggers {
                            timers.schedule_after(i % 4, 1_000, 10);
                        }
                        black_box(timers.take_due(1_010));
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_schedule_and_drain, bench_coalescing_burst);
criterion_main!(benches);
