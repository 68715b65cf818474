use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;

use season_engine::config::EngineConfig;
use season_engine::weather::calculate_rain_probability;

// Usage: rain_roll <base|none> [seed] [samples]
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env");

    let mut args = std::env::args().skip(1);
    let base_raw = args
        .next()
        .ok_or_else(|| anyhow!("usage: rain_roll <base|none> [seed] [samples]"))?;
    let base = match base_raw.trim().to_lowercase().as_str() {
        "none" | "null" | "-" => None,
        other => Some(other.parse::<f64>().context("parse base probability")?),
    };
    let seed = args
        .next()
        .map(|s| s.parse::<u64>().context("parse seed"))
        .transpose()?;
    let samples = args
        .next()
        .map(|s| s.parse::<usize>().context("parse samples"))
        .transpose()?
        .unwrap_or(10)
        .clamp(1, 10_000);

    let cfg = EngineConfig::from_env();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let rolls: Vec<u8> = (0..samples)
        .map(|_| calculate_rain_probability(base, &cfg.rain, &mut rng))
        .collect();
    let min = rolls.iter().copied().min().unwrap_or(0);
    let max = rolls.iter().copied().max().unwrap_or(0);
    let mean = rolls.iter().map(|&r| f64::from(r)).sum::<f64>() / rolls.len() as f64;

    println!("Base: {}", base.map_or("none".to_string(), |b| format!("{b:.1}")));
    println!("Variation: +/-{:.1}", cfg.rain.variation);
    println!("Samples: {samples}");
    println!("Min/Mean/Max: {min} / {mean:.1} / {max}");
    if samples <= 20 {
        let list: Vec<String> = rolls.iter().map(|r| r.to_string()).collect();
        println!("Rolls: {}", list.join(", "));
    }
    Ok(())
}
