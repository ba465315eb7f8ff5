// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecureBufferPool benchmarks: rent/release cycles vs fresh allocation

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hushmem_pool::{
    BufferSource, LockFailure, OwnedSecureBuffer, PoolConfig, SecureBufferPool, StorageStrategy,
};

fn bench_rent_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("secure_pool/rent_release");

    group.bench_function("pooled/heap/32B", |b| {
        let pool = SecureBufferPool::<u8>::default();
        b.iter(|| {
            let mut lease = pool.rent(black_box(32)).expect("failed to rent");
            lease.content_mut().expect("failed to get content")[0] = 0xAB;
        });
    });

    group.bench_function("pooled/locked/32B", |b| {
        let config = PoolConfig::default()
            .with_strategy(StorageStrategy::LockedPages)
            .with_lock_failure(LockFailure::Tolerate);
        let pool = SecureBufferPool::<u8>::new(config).expect("failed to create pool");
        b.iter(|| {
            let mut lease = pool.rent(black_box(32)).expect("failed to rent");
            lease.content_mut().expect("failed to get content")[0] = 0xAB;
        });
    });

    group.bench_function("unpooled/heap/4096B", |b| {
        b.iter(|| {
            let mut lease = OwnedSecureBuffer::<u8>::allocate(black_box(4096)).expect("failed to allocate");
            lease.content_mut().expect("failed to get content")[0] = 0xAB;
        });
    });

    group.bench_function("oversized/heap/16KiB", |b| {
        let pool = SecureBufferPool::<u8>::default();
        b.iter(|| {
            let lease = pool.rent(black_box(16 * 1024)).expect("failed to rent");
            black_box(lease.len());
        });
    });

    group.finish();
}

fn bench_buffer_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_source/48B");
    let source = BufferSource::<u8>::default();

    group.bench_function("sensitive", |b| {
        b.iter(|| {
            let mut rented = source.rent(black_box(48), true).expect("failed to rent");
            rented.as_mut_slice().expect("failed to get view").fill(0x5A);
        });
    });

    group.bench_function("plain", |b| {
        b.iter(|| {
            let mut rented = source.rent(black_box(48), false).expect("failed to rent");
            rented.as_mut_slice().expect("failed to get view").fill(0x5A);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_rent_release, bench_buffer_source);
criterion_main!(benches);
