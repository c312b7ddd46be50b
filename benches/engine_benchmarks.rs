//! Performance benchmarks for the shift engine.
//!
//! This benchmark suite tracks the hot paths behind interactive screens:
//! - Pricing a single shift (runs on every tick of a live display)
//! - Rolling up a full history into aggregates
//! - A full achievement evaluation pass over growing histories
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use shift_engine::achievements::{AchievementCatalog, AchievementEngine};
use shift_engine::calculation::{aggregate_history, compute_earnings};
use shift_engine::config::EngineConfig;
use shift_engine::models::{Job, Shift, ShiftType};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()
}

/// Builds a history of completed shifts cycling through the shift types.
fn build_history(job: &Job, count: usize) -> Vec<Shift> {
    (0..count)
        .map(|i| {
            let start = base_time() + Duration::days(i as i64);
            let (hours, shift_type) = match i % 3 {
                0 => (8, ShiftType::Regular),
                1 => (9, ShiftType::Overtime),
                _ => (4, ShiftType::Flexible),
            };
            let mut shift = Shift::begin(job.id, start);
            shift.end_time = Some(start + Duration::hours(hours));
            shift.is_active = false;
            shift.shift_type = Some(shift_type);
            shift.bonus_amount = Decimal::new((i % 5) as i64 * 500, 2);
            shift
        })
        .collect()
}

fn bench_single_shift_pricing(c: &mut Criterion) {
    let config = EngineConfig::default();
    let job = Job::new("Barista", Decimal::new(2000, 2), base_time());
    let shift = &build_history(&job, 1)[0];
    let now = base_time() + Duration::hours(8);

    c.bench_function("price_single_shift", |b| {
        b.iter(|| {
            compute_earnings(
                black_box(shift),
                black_box(Some(&job)),
                black_box(&[]),
                now,
                &config,
            )
        })
    });
}

fn bench_history_aggregation(c: &mut Criterion) {
    let config = EngineConfig::default();
    let job = Job::new("Barista", Decimal::new(2000, 2), base_time());
    let jobs = vec![job.clone()];

    let mut group = c.benchmark_group("aggregate_history");
    for count in [14usize, 100, 1000] {
        let shifts = build_history(&job, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &shifts, |b, shifts| {
            b.iter(|| aggregate_history(black_box(shifts), &jobs, &[], &config))
        });
    }
    group.finish();
}

fn bench_achievement_evaluation(c: &mut Criterion) {
    let engine = AchievementEngine::new(AchievementCatalog::builtin(), EngineConfig::default());
    let job = Job::new("Barista", Decimal::new(2000, 2), base_time());
    let jobs = vec![job.clone()];
    let records = engine.seed(&[]);
    let now = base_time() + Duration::days(1500);

    let mut group = c.benchmark_group("evaluate_achievements");
    for count in [14usize, 100, 1000] {
        let shifts = build_history(&job, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &shifts, |b, shifts| {
            b.iter(|| engine.evaluate(black_box(shifts), &jobs, &[], &records, now))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_shift_pricing,
    bench_history_aggregation,
    bench_achievement_evaluation
);
criterion_main!(benches);
