use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use season_engine::car_model::{CarModelConfig, derive_car_stats};
use season_engine::points::{DriverRaceInput, PointsConfig, STANDARD_POINTS, score_race};
use season_engine::predictions::{
    PredictionCar, PredictionDriver, compute_constructor_predictions, compute_driver_predictions,
};
use season_engine::sponsor::{ObjectiveKind, SponsorObjective, evaluate_objectives};
use season_engine::standings::{RaceResult, RosterEntry, compute_standings};
use season_engine::surperformance::{
    DriverSurperformanceInput, SurperformanceConfig, calculate_all_driver_surperformances,
};

const TEAMS: usize = 10;
const DRIVERS: usize = 20;

fn grid() -> (Vec<PredictionDriver>, Vec<PredictionCar>) {
    let cfg = CarModelConfig::default();
    let cars = (0..TEAMS)
        .map(|idx| {
            let base = (idx % 7) as u8 + 3;
            PredictionCar {
                team_id: format!("team{idx}"),
                total: derive_car_stats(base, base + 1, base, idx % 3 == 0, &cfg).total,
            }
        })
        .collect();
    let drivers = (0..DRIVERS)
        .map(|idx| PredictionDriver {
            driver_id: format!("driver{idx}"),
            team_id: Some(format!("team{}", idx / 2)),
            rating: (idx % 10) as u8 + 1,
        })
        .collect();
    (drivers, cars)
}

fn season_races(count: usize) -> Vec<RaceResult> {
    (0..count)
        .map(|race| RaceResult {
            circuit_id: format!("circuit{race}"),
            results: (0..DRIVERS)
                .map(|idx| {
                    let pos = ((idx + race * 7) % DRIVERS) as u32 + 1;
                    DriverRaceInput {
                        driver_id: format!("driver{idx}"),
                        finish_position: if pos == DRIVERS as u32 { None } else { Some(pos) },
                        fastest_lap: pos == 2,
                    }
                })
                .collect(),
        })
        .collect()
}

fn roster() -> Vec<RosterEntry> {
    (0..DRIVERS)
        .map(|idx| RosterEntry {
            driver_id: format!("driver{idx}"),
            team_id: format!("team{}", idx / 2),
        })
        .collect()
}

fn bench_predictions(c: &mut Criterion) {
    let (drivers, cars) = grid();
    let cfg = CarModelConfig::default();
    c.bench_function("predictions_20_drivers", |b| {
        b.iter(|| {
            let d = compute_driver_predictions(black_box(&drivers), black_box(&cars), &cfg).unwrap();
            let t = compute_constructor_predictions(black_box(&drivers), black_box(&cars), &cfg)
                .unwrap();
            black_box((d.len(), t.len()));
        })
    });
}

fn bench_race_scoring(c: &mut Criterion) {
    let races = season_races(1);
    let cfg = PointsConfig::default();
    c.bench_function("score_race_20_drivers", |b| {
        b.iter(|| {
            let scored = score_race(black_box(&races[0].results), &STANDARD_POINTS, &cfg).unwrap();
            black_box(scored.len());
        })
    });
}

fn bench_standings_and_objectives(c: &mut Criterion) {
    let races = season_races(24);
    let roster = roster();
    let teams: Vec<String> = (0..TEAMS).map(|idx| format!("team{idx}")).collect();
    let objectives: Vec<SponsorObjective> = teams
        .iter()
        .enumerate()
        .map(|(idx, team_id)| SponsorObjective {
            team_id: team_id.clone(),
            kind: match idx % 4 {
                0 => ObjectiveKind::Wins { target: 2 },
                1 => ObjectiveKind::Podiums { target: 5 },
                2 => ObjectiveKind::BeatDriver {
                    rival_driver_id: "driver0".to_string(),
                },
                _ => ObjectiveKind::ConstructorPosition { target: 5 },
            },
        })
        .collect();

    c.bench_function("standings_24_races", |b| {
        b.iter(|| {
            let ctx = compute_standings(
                black_box(&races),
                &roster,
                &teams,
                &STANDARD_POINTS,
                &PointsConfig::default(),
            )
            .unwrap();
            black_box(ctx.drivers.len());
        })
    });

    let ctx = compute_standings(&races, &roster, &teams, &STANDARD_POINTS, &PointsConfig::default())
        .unwrap();
    c.bench_function("sponsor_objectives_10_teams", |b| {
        b.iter(|| {
            let results = evaluate_objectives(black_box(&objectives), &ctx).unwrap();
            black_box(results.len());
        })
    });
}

fn bench_surperformance(c: &mut Criterion) {
    let inputs: Vec<DriverSurperformanceInput> = (0..DRIVERS)
        .map(|idx| DriverSurperformanceInput {
            driver_id: format!("driver{idx}"),
            predicted_position: idx as u32 + 1,
            final_position: ((idx * 7) % DRIVERS) as u32 + 1,
            age: 19 + idx as u32,
        })
        .collect();
    let cfg = SurperformanceConfig::default();
    c.bench_function("driver_surperformance_20", |b| {
        b.iter(|| {
            let out = calculate_all_driver_surperformances(black_box(&inputs), &cfg).unwrap();
            black_box(out.len());
        })
    });
}

criterion_group!(
    benches,
    bench_predictions,
    bench_race_scoring,
    bench_standings_and_objectives,
    bench_surperformance
);
criterion_main!(benches);
