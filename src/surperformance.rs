use serde::{Deserialize, Serialize};

use crate::car_model::CarModelConfig;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurperformanceConfig {
    // |delta| at or below this is neutral.
    pub neutral_band: u32,
    // Places of deviation per point of potential/budget change.
    pub step: u32,
    pub cap: u32,
    // Oldest age still eligible for a potential bonus.
    pub young_driver_max_age: u32,
}

impl Default for SurperformanceConfig {
    fn default() -> Self {
        Self {
            neutral_band: 1,
            step: 3,
            cap: 2,
            young_driver_max_age: 26,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSurperformanceInput {
    pub driver_id: String,
    pub predicted_position: u32,
    pub final_position: u32,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSurperformanceInput {
    pub team_id: String,
    pub predicted_position: u32,
    pub final_position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSurperformance {
    pub driver_id: String,
    pub delta: i32,
    pub effect: Effect,
    pub potential_change: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSurperformance {
    pub team_id: String,
    pub delta: i32,
    pub effect: Effect,
    pub budget_change: i32,
}

pub fn calculate_all_driver_surperformances(
    inputs: &[DriverSurperformanceInput],
    cfg: &SurperformanceConfig,
) -> Result<Vec<DriverSurperformance>> {
    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        let delta = position_delta(&input.driver_id, input.predicted_position, input.final_position)?;
        let effect = classify(delta, cfg);
        let mut potential_change = change_for(delta, effect, cfg);
        // Bonuses are reserved for young drivers; penalties apply at any age.
        if effect == Effect::Positive && input.age > cfg.young_driver_max_age {
            potential_change = 0;
        }
        out.push(DriverSurperformance {
            driver_id: input.driver_id.clone(),
            delta,
            effect,
            potential_change,
        });
    }
    out.sort_by_key(|r| std::cmp::Reverse(r.delta.unsigned_abs()));
    tracing::debug!(drivers = out.len(), "driver surperformances computed");
    Ok(out)
}

pub fn calculate_all_team_surperformances(
    inputs: &[TeamSurperformanceInput],
    cfg: &SurperformanceConfig,
) -> Result<Vec<TeamSurperformance>> {
    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        let delta = position_delta(&input.team_id, input.predicted_position, input.final_position)?;
        let effect = classify(delta, cfg);
        out.push(TeamSurperformance {
            team_id: input.team_id.clone(),
            delta,
            effect,
            budget_change: change_for(delta, effect, cfg),
        });
    }
    out.sort_by_key(|r| std::cmp::Reverse(r.delta.unsigned_abs()));
    tracing::debug!(teams = out.len(), "team surperformances computed");
    Ok(out)
}

pub fn apply_potential_change(potential: u8, change: i32, cfg: &CarModelConfig) -> u8 {
    (i32::from(potential) + change).clamp(i32::from(cfg.rating_min), i32::from(cfg.rating_max)) as u8
}

pub fn apply_budget_change(budget: u32, change: i32) -> u32 {
    budget.saturating_add_signed(change)
}

// Positive = finished better (lower number) than predicted.
fn position_delta(entity_id: &str, predicted: u32, actual: u32) -> Result<i32> {
    for position in [predicted, actual] {
        if position == 0 {
            return Err(EngineError::InvalidPosition {
                entity_id: entity_id.to_string(),
                position,
            });
        }
    }
    Ok(predicted as i32 - actual as i32)
}

fn classify(delta: i32, cfg: &SurperformanceConfig) -> Effect {
    if delta.unsigned_abs() <= cfg.neutral_band {
        Effect::Neutral
    } else if delta > 0 {
        Effect::Positive
    } else {
        Effect::Negative
    }
}

fn change_for(delta: i32, effect: Effect, cfg: &SurperformanceConfig) -> i32 {
    let magnitude = (delta.unsigned_abs() / cfg.step.max(1)).min(cfg.cap) as i32;
    match effect {
        Effect::Positive => magnitude,
        Effect::Negative => -magnitude,
        Effect::Neutral => 0,
    }
}
