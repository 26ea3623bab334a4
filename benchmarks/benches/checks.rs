//! Cost of `verify!` and `attempt!` on the success and error paths

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use faultline_api::{Code, Status};
use faultline_benchmarks::{bounded, flagged, gauge, lookup, quiet, relay};
use std::hint::black_box;

/// Checks that pass; this is the path every call site pays for
fn bench_success_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("success");
    let domain = quiet();
    let table: Vec<u32> = (0..64).collect();

    group.bench_function("verify_bool", |b| {
        b.iter(|| black_box(flagged(&domain, black_box(true))))
    });
    group.bench_function("verify_relation", |b| {
        b.iter(|| black_box(bounded(&domain, black_box(3), black_box(8))))
    });
    group.bench_function("attempt_option", |b| {
        b.iter(|| black_box(lookup(&domain, black_box(&table), black_box(7))))
    });
    group.bench_function("attempt_result", |b| {
        b.iter(|| black_box(relay(&domain, black_box(Ok(1)))))
    });
    group.bench_function("verify_bare_domain", |b| {
        b.iter(|| black_box(gauge(black_box(true))))
    });

    group.finish();
}

/// Checks that fail and build a status
fn bench_error_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("error");
    let domain = quiet();

    group.bench_function("verify_bool", |b| {
        b.iter(|| black_box(flagged(&domain, black_box(false))))
    });
    group.bench_function("verify_relation", |b| {
        b.iter(|| black_box(bounded(&domain, black_box(9), black_box(8))))
    });
    group.bench_function("attempt_option", |b| {
        b.iter(|| black_box(lookup(&domain, black_box(&[]), black_box(7))))
    });
    group.bench_function("verify_bare_domain", |b| {
        b.iter(|| black_box(gauge(black_box(false))))
    });

    let denied = Status::new(Code::PermissionDenied, "denied");
    group.bench_function("attempt_result_passthrough", |b| {
        b.iter(|| black_box(relay(&domain, Err(black_box(denied.clone())))))
    });

    group.finish();
}

/// Error path cost as the culprit message grows
fn bench_culprit_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("culprit_size");
    let domain = quiet();

    for len in [8, 256, 4096] {
        let message = "x".repeat(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &message, |b, message| {
            b.iter(|| {
                let input = Err(Status::new(Code::Unavailable, message.as_str()));
                black_box(relay(&domain, input))
            })
        });
    }

    group.finish();
}

criterion_group!(
    check_benches,
    bench_success_path,
    bench_error_path,
    bench_culprit_size
);
criterion_main!(check_benches);
