use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarModelConfig {
    pub rating_min: u8,
    pub rating_max: u8,
    // Chassis points lost while an engine penalty is active.
    pub engine_penalty_malus: u8,
}

impl Default for CarModelConfig {
    fn default() -> Self {
        Self {
            rating_min: 1,
            rating_max: 10,
            engine_penalty_malus: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRatings {
    pub motor: u8,
    pub aero: u8,
    pub chassis: u8,
    #[serde(default)]
    pub engine_penalty: bool,
}

impl CarRatings {
    pub fn new(
        team_id: &str,
        motor: i32,
        aero: i32,
        chassis: i32,
        engine_penalty: bool,
        cfg: &CarModelConfig,
    ) -> Result<Self> {
        Ok(Self {
            motor: in_scale(team_id, "motor", motor, cfg)?,
            aero: in_scale(team_id, "aero", aero, cfg)?,
            chassis: in_scale(team_id, "chassis", chassis, cfg)?,
            engine_penalty,
        })
    }

    pub fn validate(&self, team_id: &str, cfg: &CarModelConfig) -> Result<()> {
        Self::new(
            team_id,
            self.motor as i32,
            self.aero as i32,
            self.chassis as i32,
            self.engine_penalty,
            cfg,
        )
        .map(|_| ())
    }

    pub fn derive(&self, cfg: &CarModelConfig) -> DerivedCarStats {
        derive_car_stats(self.motor, self.aero, self.chassis, self.engine_penalty, cfg)
    }
}

fn in_scale(entity_id: &str, field: &'static str, value: i32, cfg: &CarModelConfig) -> Result<u8> {
    if value < cfg.rating_min as i32 || value > cfg.rating_max as i32 {
        return Err(EngineError::RatingOutOfScale {
            entity_id: entity_id.to_string(),
            field,
            value,
            min: cfg.rating_min,
            max: cfg.rating_max,
        });
    }
    Ok(value as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedCarStats {
    pub total: u32,
    pub speed: u32,
    pub grip: u32,
    pub acceleration: u32,
    pub effective_chassis: Option<u32>,
    // Display total with the penalised chassis; equals `total` without a penalty.
    pub effective_total: u32,
}

// Halves round away from zero, so 9 + 8 gives 9.
pub fn derive_car_stats(
    motor: u8,
    aero: u8,
    chassis: u8,
    engine_penalty: bool,
    cfg: &CarModelConfig,
) -> DerivedCarStats {
    let (motor, aero, chassis) = (motor as u32, aero as u32, chassis as u32);
    let total = motor + aero + chassis;
    let half_sum = round_half_away(f64::from(aero + motor) / 2.0);

    let effective_chassis = engine_penalty.then(|| {
        chassis
            .saturating_sub(cfg.engine_penalty_malus as u32)
            .max(cfg.rating_min as u32)
    });
    let effective_total = match effective_chassis {
        Some(effective) => motor + aero + effective,
        None => total,
    };

    DerivedCarStats {
        total,
        speed: half_sum,
        grip: half_sum,
        acceleration: motor,
        effective_chassis,
        effective_total,
    }
}

fn round_half_away(v: f64) -> u32 {
    v.round().max(0.0) as u32
}
