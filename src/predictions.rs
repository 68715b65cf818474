use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::car_model::CarModelConfig;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDriver {
    pub driver_id: String,
    pub team_id: Option<String>,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionCar {
    pub team_id: String,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEntry {
    pub entity_id: String,
    pub predicted_position: u32,
    pub score: f64,
}

pub fn compute_driver_predictions(
    drivers: &[PredictionDriver],
    cars: &[PredictionCar],
    cfg: &CarModelConfig,
) -> Result<Vec<PredictionEntry>> {
    check_driver_ratings(drivers, cfg)?;
    let car_totals = car_totals_by_team(cars);

    let scored = drivers
        .iter()
        .map(|d| {
            let car_total = match d.team_id.as_deref().and_then(|t| car_totals.get(t)) {
                Some(total) => *total,
                None => {
                    tracing::warn!(driver = %d.driver_id, "no car resolved for driver, scoring rating only");
                    0
                }
            };
            (d.driver_id.clone(), f64::from(d.rating) + f64::from(car_total))
        })
        .collect();

    Ok(rank(scored))
}

// car total + mean driver rating; a team without drivers keeps its bare car total.
pub fn compute_constructor_predictions(
    drivers: &[PredictionDriver],
    cars: &[PredictionCar],
    cfg: &CarModelConfig,
) -> Result<Vec<PredictionEntry>> {
    check_driver_ratings(drivers, cfg)?;

    let scored = cars
        .iter()
        .map(|car| {
            let ratings: Vec<f64> = drivers
                .iter()
                .filter(|d| d.team_id.as_deref() == Some(car.team_id.as_str()))
                .map(|d| f64::from(d.rating))
                .collect();
            let avg = if ratings.is_empty() {
                0.0
            } else {
                ratings.iter().sum::<f64>() / ratings.len() as f64
            };
            (car.team_id.clone(), f64::from(car.total) + avg)
        })
        .collect();

    Ok(rank(scored))
}

fn car_totals_by_team(cars: &[PredictionCar]) -> HashMap<&str, u32> {
    let mut out = HashMap::with_capacity(cars.len());
    for car in cars {
        // First car listed for a team wins.
        out.entry(car.team_id.as_str()).or_insert(car.total);
    }
    out
}

fn check_driver_ratings(drivers: &[PredictionDriver], cfg: &CarModelConfig) -> Result<()> {
    for d in drivers {
        if d.rating < cfg.rating_min || d.rating > cfg.rating_max {
            return Err(EngineError::RatingOutOfScale {
                entity_id: d.driver_id.clone(),
                field: "driver",
                value: d.rating as i32,
                min: cfg.rating_min,
                max: cfg.rating_max,
            });
        }
    }
    Ok(())
}

// `sort_by` is stable: equal scores keep their input order and still get distinct positions.
fn rank(mut scored: Vec<(String, f64)>) -> Vec<PredictionEntry> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (entity_id, score))| PredictionEntry {
            entity_id,
            predicted_position: idx as u32 + 1,
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(id: &str, team: Option<&str>, rating: u8) -> PredictionDriver {
        PredictionDriver {
            driver_id: id.to_string(),
            team_id: team.map(str::to_string),
            rating,
        }
    }

    fn car(team: &str, total: u32) -> PredictionCar {
        PredictionCar {
            team_id: team.to_string(),
            total,
        }
    }

    #[test]
    fn ties_keep_input_order_with_dense_positions() {
        let drivers = vec![
            driver("a", Some("t1"), 9),
            driver("b", Some("t2"), 9),
            driver("c", Some("t1"), 8),
            driver("d", Some("t2"), 8),
        ];
        // Scores: a 34, b 33, c 33, d 32.
        let cars = vec![car("t1", 25), car("t2", 24)];
        let out = compute_driver_predictions(&drivers, &cars, &CarModelConfig::default()).unwrap();

        let ids: Vec<&str> = out.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        let positions: Vec<u32> = out.iter().map(|e| e.predicted_position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert_eq!(out[1].score, out[2].score);
    }

    #[test]
    fn driver_without_car_scores_rating_only() {
        let drivers = vec![driver("free", None, 7), driver("lost", Some("ghost"), 6)];
        let out =
            compute_driver_predictions(&drivers, &[car("t1", 20)], &CarModelConfig::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].score, 7.0);
        assert_eq!(out[1].score, 6.0);
    }

    #[test]
    fn constructor_score_uses_mean_driver_rating() {
        let drivers = vec![
            driver("a", Some("t1"), 9),
            driver("c", Some("t1"), 8),
            driver("b", Some("t2"), 10),
        ];
        let cars = vec![car("t1", 25), car("t2", 24), car("t3", 30)];
        let out =
            compute_constructor_predictions(&drivers, &cars, &CarModelConfig::default()).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].entity_id, "t2");
        assert_eq!(out[0].score, 34.0);
        assert_eq!(out[1].entity_id, "t1");
        assert_eq!(out[1].score, 33.5);
        // Empty roster still ranked, car total only.
        assert_eq!(out[2].entity_id, "t3");
        assert_eq!(out[2].score, 30.0);
    }

    #[test]
    fn driver_rating_above_scale_fails() {
        let drivers = vec![driver("x", Some("t1"), 12)];
        let err =
            compute_driver_predictions(&drivers, &[car("t1", 20)], &CarModelConfig::default())
                .unwrap_err();
        assert!(matches!(err, EngineError::RatingOutOfScale { ref entity_id, .. } if entity_id == "x"));
    }
}
