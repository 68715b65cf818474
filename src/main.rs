use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use season_engine::config::EngineConfig;
use season_engine::season::{SeasonFile, SeasonReport, run_season};

struct Args {
    path: PathBuf,
    seed: Option<u64>,
    json: bool,
}

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let raw = fs::read_to_string(&args.path)
        .with_context(|| format!("read season file {}", args.path.display()))?;
    let season: SeasonFile = serde_json::from_str(&raw).context("parse season file")?;

    let cfg = EngineConfig::from_env();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let report = run_season(&season, &cfg, &mut rng)
        .with_context(|| format!("evaluate season {}", args.path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut path = None;
    let mut seed = None;
    let mut json = false;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--seed" => {
                let raw = it.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                seed = Some(raw.parse::<u64>().context("parse --seed")?);
            }
            other if other.starts_with("--") => return Err(anyhow!("unknown flag {other}")),
            other => path = Some(PathBuf::from(other)),
        }
    }

    let path =
        path.ok_or_else(|| anyhow!("usage: season_engine <season.json> [--seed N] [--json]"))?;
    Ok(Args { path, seed, json })
}

fn print_report(report: &SeasonReport) {
    if !report.season.is_empty() {
        println!("Season {}", report.season);
    }

    println!("\nCars");
    for car in &report.cars {
        let s = &car.stats;
        print!(
            "  {:<12} total={:>2} speed={:>2} grip={:>2} accel={:>2}",
            car.team_id, s.total, s.speed, s.grip, s.acceleration
        );
        match s.effective_chassis {
            Some(chassis) => println!("  penalty: chassis {chassis}, total {}", s.effective_total),
            None => println!(),
        }
    }

    println!("\nPredicted drivers");
    for p in &report.driver_predictions {
        println!("  P{:<2} {:<12} {:>5.1}", p.predicted_position, p.entity_id, p.score);
    }
    println!("\nPredicted constructors");
    for p in &report.constructor_predictions {
        println!("  P{:<2} {:<12} {:>5.1}", p.predicted_position, p.entity_id, p.score);
    }

    if !report.forecasts.is_empty() {
        println!("\nRain");
        for f in &report.forecasts {
            println!("  {:<12} {:>3}%", f.circuit_id, f.rain_probability);
        }
    }

    println!("\nDriver standings");
    for d in &report.standings.drivers {
        println!(
            "  P{:<2} {:<12} {:>4} pts  {} W  {} Pod",
            d.position, d.driver_id, d.points, d.wins, d.podiums
        );
    }
    println!("\nConstructor standings");
    for c in &report.standings.constructors {
        println!("  P{:<2} {:<12} {:>4} pts", c.position, c.team_id, c.points);
    }

    println!("\nDriver surperformance");
    for s in &report.driver_surperformances {
        println!(
            "  {:<12} delta={:+} {:?} potential {:+}",
            s.driver_id, s.delta, s.effect, s.potential_change
        );
    }
    for u in &report.potential_updates {
        println!("  {:<12} potential {} -> {}", u.driver_id, u.before, u.after);
    }
    println!("\nTeam surperformance");
    for s in &report.team_surperformances {
        println!(
            "  {:<12} delta={:+} {:?} budget {:+}",
            s.team_id, s.delta, s.effect, s.budget_change
        );
    }

    if !report.objectives.is_empty() {
        println!("\nSponsor objectives");
        for o in &report.objectives {
            let mark = if o.result.is_met { "OK " } else { "NOK" };
            println!(
                "  [{mark}] {:<12} {:<20} {}",
                o.objective.team_id,
                o.objective.kind.to_string(),
                o.result.label
            );
        }
    }
}
