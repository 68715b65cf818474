use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::car_model::CarModelConfig;
use crate::points::PointsConfig;
use crate::surperformance::SurperformanceConfig;
use crate::weather::RainConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub car: CarModelConfig,
    #[serde(default)]
    pub points: PointsConfig,
    #[serde(default)]
    pub surperformance: SurperformanceConfig,
    #[serde(default)]
    pub rain: RainConfig,
}

impl EngineConfig {
    // Unparseable variables fall back to the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        cfg.car.rating_max = env_or("SEASON_ENGINE_RATING_MAX", cfg.car.rating_max)
            .max(cfg.car.rating_min);
        cfg.car.engine_penalty_malus =
            env_or("SEASON_ENGINE_ENGINE_PENALTY_MALUS", cfg.car.engine_penalty_malus)
                .min(cfg.car.rating_max);

        cfg.points.fastest_lap_bonus =
            env_or("SEASON_ENGINE_FASTEST_LAP_BONUS", cfg.points.fastest_lap_bonus);

        let sp = &mut cfg.surperformance;
        sp.neutral_band = env_or("SEASON_ENGINE_NEUTRAL_BAND", sp.neutral_band);
        sp.step = env_or("SEASON_ENGINE_PROGRESSION_STEP", sp.step).max(1);
        sp.cap = env_or("SEASON_ENGINE_PROGRESSION_CAP", sp.cap);
        sp.young_driver_max_age =
            env_or("SEASON_ENGINE_YOUNG_DRIVER_MAX_AGE", sp.young_driver_max_age);

        cfg.rain.variation =
            env_or("SEASON_ENGINE_RAIN_VARIATION", cfg.rain.variation).clamp(0.0, 100.0);

        cfg
    }
}

// Partial config as embedded in a season file. Only the fields present replace the
// corresponding values of the config it is laid over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub car: CarOverrides,
    pub points: PointsOverrides,
    pub surperformance: SurperformanceOverrides,
    pub rain: RainOverrides,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarOverrides {
    pub rating_min: Option<u8>,
    pub rating_max: Option<u8>,
    pub engine_penalty_malus: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsOverrides {
    pub fastest_lap_bonus: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurperformanceOverrides {
    pub neutral_band: Option<u32>,
    pub step: Option<u32>,
    pub cap: Option<u32>,
    pub young_driver_max_age: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainOverrides {
    pub variation: Option<f64>,
}

impl ConfigOverrides {
    pub fn apply(&self, base: &EngineConfig) -> EngineConfig {
        let mut cfg = *base;

        let car = &mut cfg.car;
        car.rating_min = self.car.rating_min.unwrap_or(car.rating_min);
        car.rating_max = self.car.rating_max.unwrap_or(car.rating_max).max(car.rating_min);
        car.engine_penalty_malus = self
            .car
            .engine_penalty_malus
            .unwrap_or(car.engine_penalty_malus)
            .min(car.rating_max);

        cfg.points.fastest_lap_bonus = self
            .points
            .fastest_lap_bonus
            .unwrap_or(cfg.points.fastest_lap_bonus);

        let sp = &mut cfg.surperformance;
        sp.neutral_band = self.surperformance.neutral_band.unwrap_or(sp.neutral_band);
        sp.step = self.surperformance.step.unwrap_or(sp.step).max(1);
        sp.cap = self.surperformance.cap.unwrap_or(sp.cap);
        sp.young_driver_max_age = self
            .surperformance
            .young_driver_max_age
            .unwrap_or(sp.young_driver_max_age);

        cfg.rain.variation = self
            .rain
            .variation
            .filter(|v| v.is_finite())
            .unwrap_or(cfg.rain.variation)
            .clamp(0.0, 100.0);

        cfg
    }
}

fn env_or<T: FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .filter(|val| !val.trim().is_empty())
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(fallback)
}
