mod common;

use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate};
use common::write_fixture;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use recon::prelude::*;
use tokio::runtime::Runtime;

fn january() -> ReconciliationWindow {
    ReconciliationWindow::from_dates(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        FixedOffset::east_opt(7 * 3600).unwrap(),
    )
    .unwrap()
}

async fn run_once(
    ledger: &PathBuf,
    statements: &[PathBuf],
    workers: usize,
    queue_capacity: usize,
) -> ReconciliationReport<FixedPoint> {
    statements
        .iter()
        .fold(
            Reconciliation::<FixedPoint>::new(january())
                .with_transaction_file(ledger)
                .with_workers(workers)
                .with_queue_capacity(queue_capacity)
                .with_statement_policy(SilentSkip),
            |recon, path| recon.add_statement_file(path),
        )
        .run()
        .await
        .unwrap()
}

/// End-to-end pipeline over growing datasets
fn bench_dataset_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation_sizes");
    let runtime = Runtime::new().unwrap();

    for (size_name, num_transactions) in [("small_1k", 1_000), ("medium_10k", 10_000), ("large_100k", 100_000)] {
        let dir = tempfile::tempdir().unwrap();
        let (ledger, statements) = write_fixture(dir.path(), num_transactions, 3, 0.9).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size_name), &num_transactions, |b, _| {
            b.to_async(&runtime).iter(|| async {
                black_box(run_once(&ledger, &statements, 5, 10).await);
            });
        });
    }

    group.finish();
}

/// Worker pool size against a fixed dataset
fn bench_worker_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation_workers");
    let runtime = Runtime::new().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let (ledger, statements) = write_fixture(dir.path(), 20_000, 4, 0.8).unwrap();

    for workers in [1, 2, 5, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.to_async(&runtime).iter(|| async {
                black_box(run_once(&ledger, &statements, workers, 10).await);
            });
        });
    }

    group.finish();
}

/// Queue capacity, from fully synchronous hand-off to generous buffering
fn bench_queue_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation_queue_capacity");
    let runtime = Runtime::new().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let (ledger, statements) = write_fixture(dir.path(), 20_000, 4, 0.8).unwrap();

    for capacity in [1, 10, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            b.to_async(&runtime).iter(|| async {
                black_box(run_once(&ledger, &statements, 5, capacity).await);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dataset_sizes, bench_worker_counts, bench_queue_capacity);
criterion_main!(benches);
