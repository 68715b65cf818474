use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    pub fastest_lap_bonus: u32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            fastest_lap_bonus: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRow {
    pub position: u32,
    pub points: u32,
}

// Positions without a row score 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsMap {
    by_position: HashMap<u32, u32>,
}

impl PointsMap {
    pub fn get(&self, position: u32) -> u32 {
        self.by_position.get(&position).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}

pub static STANDARD_POINTS: Lazy<PointsMap> = Lazy::new(|| PointsMap {
    by_position: [25, 18, 15, 12, 10, 8, 6, 4, 2, 1]
        .into_iter()
        .enumerate()
        .map(|(idx, pts)| (idx as u32 + 1, pts))
        .collect(),
});

pub fn build_points_map(rows: &[PointsRow]) -> Result<PointsMap> {
    let mut by_position = HashMap::with_capacity(rows.len());
    for row in rows {
        if row.position == 0 {
            return Err(EngineError::InvalidPointsPosition {
                position: row.position,
            });
        }
        if by_position.insert(row.position, row.points).is_some() {
            return Err(EngineError::DuplicatePointsPosition {
                position: row.position,
            });
        }
    }
    Ok(PointsMap { by_position })
}

// DNF scores nothing, fastest lap included. The bonus still applies on 0-point positions.
pub fn calculate_driver_points(
    finish_position: Option<u32>,
    is_fastest_lap: bool,
    points_map: &PointsMap,
    cfg: &PointsConfig,
) -> u32 {
    let Some(position) = finish_position else {
        return 0;
    };
    let bonus = if is_fastest_lap {
        cfg.fastest_lap_bonus
    } else {
        0
    };
    points_map.get(position) + bonus
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRaceInput {
    pub driver_id: String,
    // None = did not finish / disqualified.
    pub finish_position: Option<u32>,
    #[serde(default)]
    pub fastest_lap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRacePoints {
    pub driver_id: String,
    pub finish_position: Option<u32>,
    pub points: u32,
}

pub fn score_race(
    results: &[DriverRaceInput],
    points_map: &PointsMap,
    cfg: &PointsConfig,
) -> Result<Vec<DriverRacePoints>> {
    let mut seen_positions: HashMap<u32, &str> = HashMap::new();
    let mut fastest: Option<&str> = None;

    for r in results {
        if let Some(position) = r.finish_position {
            if position == 0 {
                return Err(EngineError::InvalidPosition {
                    entity_id: r.driver_id.clone(),
                    position,
                });
            }
            if let Some(first) = seen_positions.insert(position, r.driver_id.as_str()) {
                return Err(EngineError::DuplicateFinishPosition {
                    position,
                    first: first.to_string(),
                    second: r.driver_id.clone(),
                });
            }
        }
        if r.fastest_lap {
            if let Some(first) = fastest {
                return Err(EngineError::MultipleFastestLaps {
                    first: first.to_string(),
                    second: r.driver_id.clone(),
                });
            }
            fastest = Some(r.driver_id.as_str());
        }
    }

    Ok(results
        .iter()
        .map(|r| DriverRacePoints {
            driver_id: r.driver_id.clone(),
            finish_position: r.finish_position,
            points: calculate_driver_points(r.finish_position, r.fastest_lap, points_map, cfg),
        })
        .collect())
}
