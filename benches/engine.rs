//! Benchmarks for the rollups, the holiday index and the detectors.

use aadhaar_analytics::aggregate::{aggregate_by_region, aggregate_by_region_weekday, aggregate_by_time};
use aadhaar_analytics::calendar::holidays_for;
use aadhaar_analytics::clustering::{kmeans, KMeansConfig};
use aadhaar_analytics::core::{Frame, Record, RegionTable, INDIA_REGIONS};
use aadhaar_analytics::daytype::{classify, daily_volume_by_day_type};
use aadhaar_analytics::detection::{detect_anomalies, IsolationForestConfig};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// One row per region per day, starting 2024-01-01.
fn generate_frame(days: i64) -> Frame {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let records = (0..days)
        .flat_map(|d| {
            INDIA_REGIONS.iter().enumerate().map(move |(i, (name, _))| {
                let base = 100.0 + (i * 37 % 101) as f64;
                Record::new(
                    *name,
                    start + Duration::days(d),
                    vec![base + (d % 7) as f64 * 3.0, base / 2.0, 560001.0],
                )
            })
        })
        .collect();
    Frame::from_records(["age_0_5", "age_5_17", "pincode"], records).unwrap()
}

fn bench_rollups(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollups");
    let table = RegionTable::india();

    for days in [90_i64, 365, 730].iter() {
        let frame = generate_frame(*days);
        let measures = frame.measures();

        group.bench_with_input(BenchmarkId::new("by_time", days), days, |b, _| {
            b.iter(|| aggregate_by_time(black_box(&frame), &measures))
        });

        group.bench_with_input(BenchmarkId::new("by_region", days), days, |b, _| {
            b.iter(|| aggregate_by_region(black_box(&frame), &measures, &table))
        });

        group.bench_with_input(BenchmarkId::new("by_region_weekday", days), days, |b, _| {
            b.iter(|| aggregate_by_region_weekday(black_box(&frame), &measures, &table))
        });
    }

    group.finish();
}

fn bench_calendar(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar");
    let table = RegionTable::india();
    let frame = generate_frame(730);
    let measures = frame.measures();

    group.bench_function("holidays_for", |b| {
        b.iter(|| holidays_for(black_box(frame.regions()), frame.years(), &table))
    });

    let index = holidays_for(frame.regions(), frame.years(), &table);

    group.bench_function("classify", |b| {
        b.iter(|| classify(black_box(frame.date_regions()), &index))
    });

    group.bench_function("daily_volume_by_day_type", |b| {
        b.iter(|| daily_volume_by_day_type(black_box(&frame), &measures, &index))
    });

    group.finish();
}

fn bench_detectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("detectors");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for size in [128_usize, 512, 2048].iter() {
        let daily: Vec<(NaiveDate, f64)> = (0..*size)
            .map(|i| (start + Duration::days(i as i64), 1000.0 + (i % 7) as f64 * 40.0))
            .collect();
        let config = IsolationForestConfig::default();

        group.bench_with_input(BenchmarkId::new("isolation_forest", size), size, |b, _| {
            b.iter(|| detect_anomalies(black_box(&daily), &config))
        });
    }

    let points: Vec<Vec<f64>> = (0..INDIA_REGIONS.len())
        .map(|i| vec![(i * 13 % 17) as f64, (i * 7 % 11) as f64])
        .collect();
    let config = KMeansConfig::default();
    group.bench_function("kmeans_regions", |b| {
        b.iter(|| kmeans(black_box(&points), &config))
    });

    group.finish();
}

criterion_group!(benches, bench_rollups, bench_calendar, bench_detectors);
criterion_main!(benches);
