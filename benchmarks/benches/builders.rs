//! Cost of error builders: message formatting, filtered logging and tees

use criterion::{criterion_group, criterion_main, Criterion};
use faultline_api::prelude::*;
use faultline_api::{Logger, Standard};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[inline(never)]
fn failing(domain: &Standard, id: u64) -> Result<(), Status> {
    verify!(in domain; id == 0, |b| b.describe(format_args!("id={id}")));
    Ok(())
}

/// Builders that format a message and nothing else
fn bench_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("message");

    let plain = standard();
    group.bench_function("standard", |b| {
        b.iter(|| black_box(failing(&plain, black_box(7))))
    });

    let nested = standard().describe("outer").describe("inner");
    group.bench_function("two_descriptions", |b| {
        b.iter(|| black_box(failing(&nested, black_box(7))))
    });

    let undecomposed = standard().print_operands(false);
    group.bench_function("no_operands", |b| {
        b.iter(|| black_box(failing(&undecomposed, black_box(7))))
    });

    group.finish();
}

/// Logging through a callback, with and without a site filter
fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    let count = Arc::new(AtomicUsize::new(0));

    let counter = count.clone();
    let every = standard().log(
        Logger::callback(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
        None,
    );
    group.bench_function("every_error", |b| {
        b.iter(|| black_box(failing(&every, black_box(7))))
    });

    let counter = count.clone();
    let sampled = standard().log(
        Logger::callback(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }),
        Some(Filter::EveryN(100)),
    );
    group.bench_function("every_100th", |b| {
        b.iter(|| black_box(failing(&sampled, black_box(7))))
    });

    group.finish();
    black_box(count.load(Ordering::Relaxed));
}

/// Fan-out to a sink receiving the status
fn bench_tee(c: &mut Criterion) {
    let mut group = c.benchmark_group("tee");
    let seen = Arc::new(AtomicUsize::new(0));

    let counter = seen.clone();
    let domain = standard().tee(move |status: Status| {
        counter.fetch_add(status.message().len(), Ordering::Relaxed);
    });
    group.bench_function("receive_status", |b| {
        b.iter(|| black_box(failing(&domain, black_box(7))))
    });

    group.finish();
}

fn get_criterion_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .warm_up_time(std::time::Duration::from_secs(1))
}

criterion_group! {
    name = builder_benches;
    config = get_criterion_config();
    targets = bench_message, bench_logging, bench_tee
}
criterion_main!(builder_benches);
