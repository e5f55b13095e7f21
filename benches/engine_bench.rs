//! Benchmarks for the mealmood pattern engine
//!
//! Run with: cargo bench

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mealmood::events::{Energy, MealEvent, MealSlot, MealTag, MoodEvent, Stress, Valence};
use mealmood::patterns::{calculate_segmentation, FixedClock, PatternEngine, SequentialIds};
use mealmood::seed::generate_seed_data;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 17, 22, 0, 0).unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn engine() -> PatternEngine {
    PatternEngine::new(utc())
        .with_clock(FixedClock(now()))
        .with_ids(SequentialIds::new("bench"))
}

/// `days` of history with five meals and three moods per day
fn create_history(days: i64) -> (Vec<MealEvent>, Vec<MoodEvent>) {
    let mut meals = Vec::new();
    let mut moods = Vec::new();

    for day in 0..days {
        let base = now() - Duration::days(day + 1);
        let slots = [
            (MealSlot::Breakfast, 8, vec![MealTag::Light, MealTag::HighFiber]),
            (MealSlot::Lunch, 13, vec![MealTag::Regular, MealTag::Savory]),
            (MealSlot::Snack, 16, vec![MealTag::Sweet, MealTag::Packaged]),
            (MealSlot::Dinner, 19, vec![MealTag::Heavy, MealTag::FriedGreasy]),
            (MealSlot::Snack, 22, vec![MealTag::HighSugar, MealTag::Sweet]),
        ];
        for (slot, hour, tags) in slots {
            meals.push(MealEvent::new(slot, base + Duration::hours(hour), tags));
        }

        let valence = if day % 2 == 0 { Valence::Negative } else { Valence::Positive };
        for hour in [10, 18, 21] {
            moods.push(MoodEvent::new(
                valence,
                Energy::Low,
                Stress::High,
                base + Duration::hours(hour),
            ));
        }
    }

    (meals, moods)
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    let (meals, moods) = generate_seed_data(now(), utc());
    let engine = engine();
    group.bench_function("run_seed_week", |b| {
        b.iter(|| engine.run(black_box(&meals), black_box(&moods)))
    });

    for days in [7, 30, 90] {
        let (meals, moods) = create_history(days);
        group.throughput(Throughput::Elements((meals.len() + moods.len()) as u64));
        group.bench_with_input(BenchmarkId::new("run", days), &days, |b, _| {
            b.iter(|| engine.run(black_box(&meals), black_box(&moods)))
        });
    }

    group.finish();
}

fn bench_concurrent(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (meals, moods) = create_history(30);
    let engine = engine();

    c.bench_function("run_concurrent_30d", |b| {
        b.iter(|| runtime.block_on(engine.run_concurrent(black_box(&meals), black_box(&moods))))
    });
}

fn bench_segmentation(c: &mut Criterion) {
    let (meals, _) = create_history(90);

    c.bench_function("segmentation_90d", |b| {
        b.iter(|| calculate_segmentation(black_box(&meals), utc()))
    });
}

criterion_group!(benches, bench_engine, bench_concurrent, bench_segmentation);
criterion_main!(benches);
