// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the per-width copy, compare and fill loops and the
//! dispatched move/find entry points.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use raw_memory::ops::{compare_with, copy_with, set_with};
use raw_memory::{find_slice, move_within, Wide};

const SIZES: [usize; 3] = [64, 4096, 65536];

fn bench_copy_widths(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_with");
    for size in SIZES {
        let src = vec![0xA5u8; size];
        let mut dst = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("u8", size), &size, |b, &n| {
            b.iter(|| unsafe { copy_with::<u8>(dst.as_mut_ptr(), black_box(src.as_ptr()), n) })
        });
        group.bench_with_input(BenchmarkId::new("u64", size), &size, |b, &n| {
            b.iter(|| unsafe { copy_with::<u64>(dst.as_mut_ptr(), black_box(src.as_ptr()), n) })
        });
        group.bench_with_input(BenchmarkId::new("wide", size), &size, |b, &n| {
            b.iter(|| unsafe { copy_with::<Wide>(dst.as_mut_ptr(), black_box(src.as_ptr()), n) })
        });
    }
    group.finish();
}

fn bench_compare_and_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_fill");
    for size in SIZES {
        let lhs = vec![7u8; size];
        let rhs = lhs.clone();
        let mut buf = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("compare_wide", size), &size, |b, &n| {
            b.iter(|| unsafe { compare_with::<Wide>(black_box(lhs.as_ptr()), rhs.as_ptr(), n) })
        });
        group.bench_with_input(BenchmarkId::new("set_wide", size), &size, |b, &n| {
            b.iter(|| unsafe { set_with::<Wide>(buf.as_mut_ptr(), black_box(0x11), n) })
        });
    }
    group.finish();
}

fn bench_move_and_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatched");
    let size = 4096;
    let mut buf: Vec<u8> = (0..size + 16).map(|i| i as u8).collect();
    group.bench_function("move_overlap_forward", |b| {
        b.iter(|| move_within(&mut buf, 0..size, black_box(5)))
    });

    let mut hay = vec![b'a'; size];
    hay[size - 4..].copy_from_slice(b"abcd");
    group.bench_function("find_tail", |b| {
        b.iter(|| find_slice(black_box(&hay), b"bcd"))
    });
    group.finish();
}

criterion_group!(benches, bench_copy_widths, bench_compare_and_fill, bench_move_and_find);
criterion_main!(benches);
