use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::car_model::{CarRatings, DerivedCarStats};
use crate::config::{ConfigOverrides, EngineConfig};
use crate::error::Result;
use crate::points::{PointsMap, PointsRow, STANDARD_POINTS, build_points_map};
use crate::predictions::{
    PredictionCar, PredictionDriver, PredictionEntry, compute_constructor_predictions,
    compute_driver_predictions,
};
use crate::sponsor::{EvaluationResult, SponsorObjective, evaluate_objective};
use crate::standings::{RaceResult, RosterEntry, StandingsContext, compute_standings};
use crate::surperformance::{
    DriverSurperformance, DriverSurperformanceInput, TeamSurperformance, TeamSurperformanceInput,
    apply_potential_change, calculate_all_driver_surperformances,
    calculate_all_team_surperformances,
};
use crate::weather::calculate_rain_probability;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: String,
    pub name: String,
    // Display only; never used to group drivers.
    #[serde(default)]
    pub color: Option<String>,
    pub car: CarRatings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team_id: Option<String>,
    pub rating: u8,
    pub age: u32,
    #[serde(default)]
    pub potential: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub circuit_id: String,
    #[serde(default)]
    pub rain_base: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonFile {
    #[serde(default)]
    pub season: String,
    pub teams: Vec<TeamEntry>,
    pub drivers: Vec<DriverEntry>,
    // Empty means the standard 25-18-15 table.
    #[serde(default)]
    pub points_table: Vec<PointsRow>,
    #[serde(default)]
    pub calendar: Vec<CalendarEntry>,
    #[serde(default)]
    pub races: Vec<RaceResult>,
    #[serde(default)]
    pub objectives: Vec<SponsorObjective>,
    #[serde(default)]
    pub config: Option<ConfigOverrides>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamCarStats {
    pub team_id: String,
    pub stats: DerivedCarStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct RainForecast {
    pub circuit_id: String,
    pub rain_probability: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct PotentialUpdate {
    pub driver_id: String,
    pub before: u8,
    pub after: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveOutcome {
    pub objective: SponsorObjective,
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonReport {
    pub season: String,
    pub cars: Vec<TeamCarStats>,
    pub driver_predictions: Vec<PredictionEntry>,
    pub constructor_predictions: Vec<PredictionEntry>,
    pub forecasts: Vec<RainForecast>,
    pub standings: StandingsContext,
    pub driver_surperformances: Vec<DriverSurperformance>,
    pub team_surperformances: Vec<TeamSurperformance>,
    pub potential_updates: Vec<PotentialUpdate>,
    pub objectives: Vec<ObjectiveOutcome>,
}

// Fields present in the file's embedded config win over `cfg`; the rest come from `cfg`.
pub fn run_season(season: &SeasonFile, cfg: &EngineConfig, rng: &mut impl Rng) -> Result<SeasonReport> {
    let cfg = season
        .config
        .as_ref()
        .map_or(*cfg, |overrides| overrides.apply(cfg));

    let mut cars = Vec::with_capacity(season.teams.len());
    for team in &season.teams {
        team.car.validate(&team.id, &cfg.car)?;
        cars.push(TeamCarStats {
            team_id: team.id.clone(),
            stats: team.car.derive(&cfg.car),
        });
    }

    let prediction_cars: Vec<PredictionCar> = cars
        .iter()
        .map(|c| PredictionCar {
            team_id: c.team_id.clone(),
            total: c.stats.total,
        })
        .collect();
    let prediction_drivers: Vec<PredictionDriver> = season
        .drivers
        .iter()
        .map(|d| PredictionDriver {
            driver_id: d.id.clone(),
            team_id: d.team_id.clone(),
            rating: d.rating,
        })
        .collect();
    let driver_predictions =
        compute_driver_predictions(&prediction_drivers, &prediction_cars, &cfg.car)?;
    let constructor_predictions =
        compute_constructor_predictions(&prediction_drivers, &prediction_cars, &cfg.car)?;

    let forecasts: Vec<RainForecast> = season
        .calendar
        .iter()
        .map(|entry| RainForecast {
            circuit_id: entry.circuit_id.clone(),
            rain_probability: calculate_rain_probability(entry.rain_base, &cfg.rain, rng),
        })
        .collect();

    let points_map: PointsMap = if season.points_table.is_empty() {
        (*STANDARD_POINTS).clone()
    } else {
        build_points_map(&season.points_table)?
    };
    let roster: Vec<RosterEntry> = season
        .drivers
        .iter()
        .filter_map(|d| {
            d.team_id.as_ref().map(|team_id| RosterEntry {
                driver_id: d.id.clone(),
                team_id: team_id.clone(),
            })
        })
        .collect();
    let team_ids: Vec<String> = season.teams.iter().map(|t| t.id.clone()).collect();
    let standings = compute_standings(&season.races, &roster, &team_ids, &points_map, &cfg.points)?;

    // Re-rank within the classified drivers so predicted and final positions share a field.
    let predicted_driver: HashMap<&str, u32> = driver_predictions
        .iter()
        .filter(|p| standings.driver(&p.entity_id).is_some())
        .enumerate()
        .map(|(idx, p)| (p.entity_id.as_str(), idx as u32 + 1))
        .collect();
    let driver_inputs: Vec<DriverSurperformanceInput> = season
        .drivers
        .iter()
        .filter_map(|d| {
            let predicted = *predicted_driver.get(d.id.as_str())?;
            let standing = standings.driver(&d.id)?;
            Some(DriverSurperformanceInput {
                driver_id: d.id.clone(),
                predicted_position: predicted,
                final_position: standing.position,
                age: d.age,
            })
        })
        .collect();
    let driver_surperformances =
        calculate_all_driver_surperformances(&driver_inputs, &cfg.surperformance)?;

    let team_inputs: Vec<TeamSurperformanceInput> = constructor_predictions
        .iter()
        .filter_map(|p| {
            let standing = standings.constructor(&p.entity_id)?;
            Some(TeamSurperformanceInput {
                team_id: p.entity_id.clone(),
                predicted_position: p.predicted_position,
                final_position: standing.position,
            })
        })
        .collect();
    let team_surperformances =
        calculate_all_team_surperformances(&team_inputs, &cfg.surperformance)?;

    let potentials: HashMap<&str, u8> = season
        .drivers
        .iter()
        .filter_map(|d| d.potential.map(|p| (d.id.as_str(), p)))
        .collect();
    let potential_updates: Vec<PotentialUpdate> = driver_surperformances
        .iter()
        .filter(|s| s.potential_change != 0)
        .filter_map(|s| {
            let before = *potentials.get(s.driver_id.as_str())?;
            Some(PotentialUpdate {
                driver_id: s.driver_id.clone(),
                before,
                after: apply_potential_change(before, s.potential_change, &cfg.car),
            })
        })
        .collect();

    let mut objectives = Vec::with_capacity(season.objectives.len());
    for objective in &season.objectives {
        objectives.push(ObjectiveOutcome {
            objective: objective.clone(),
            result: evaluate_objective(objective, &standings)?,
        });
    }

    tracing::info!(
        season = %season.season,
        drivers = season.drivers.len(),
        teams = season.teams.len(),
        races = season.races.len(),
        "season evaluated"
    );

    Ok(SeasonReport {
        season: season.season.clone(),
        cars,
        driver_predictions,
        constructor_predictions,
        forecasts,
        standings,
        driver_surperformances,
        team_surperformances,
        potential_updates,
        objectives,
    })
}
