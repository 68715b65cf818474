use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::standings::StandingsContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "objective_type", rename_all = "snake_case")]
pub enum ObjectiveKind {
    ConstructorPosition { target: u32 },
    DriverPosition { driver_id: String, target: u32 },
    Wins { target: u32 },
    Podiums { target: u32 },
    PointsMinimum { target: u32 },
    BeatTeam { rival_team_id: String },
    BeatDriver { rival_driver_id: String },
    RaceWinAtCircuit { circuit_id: String },
    Custom {
        #[serde(default)]
        is_met: Option<bool>,
    },
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectiveKind::ConstructorPosition { .. } => "constructor_position",
            ObjectiveKind::DriverPosition { .. } => "driver_position",
            ObjectiveKind::Wins { .. } => "wins",
            ObjectiveKind::Podiums { .. } => "podiums",
            ObjectiveKind::PointsMinimum { .. } => "points_minimum",
            ObjectiveKind::BeatTeam { .. } => "beat_team",
            ObjectiveKind::BeatDriver { .. } => "beat_driver",
            ObjectiveKind::RaceWinAtCircuit { .. } => "race_win_at_circuit",
            ObjectiveKind::Custom { .. } => "custom",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorObjective {
    pub team_id: String,
    #[serde(flatten)]
    pub kind: ObjectiveKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_met: bool,
    pub evaluated_value: Option<f64>,
    pub label: String,
}

impl EvaluationResult {
    fn unresolved() -> Self {
        Self {
            is_met: false,
            evaluated_value: None,
            label: NO_VALUE.to_string(),
        }
    }
}

const NO_VALUE: &str = "—";
const AHEAD: &str = "Devant";
const BEHIND: &str = "Derriere";

// Membership only via `ctx.driver_team`. Unknown own team is an error; a missing rival or
// target is a not-met result.
pub fn evaluate_objective(
    objective: &SponsorObjective,
    ctx: &StandingsContext,
) -> Result<EvaluationResult> {
    let team_id = objective.team_id.as_str();
    if !ctx.knows_team(team_id) {
        return Err(EngineError::UnknownTeam {
            team_id: team_id.to_string(),
        });
    }

    let result = match &objective.kind {
        ObjectiveKind::ConstructorPosition { target } => {
            position_result(ctx.constructor(team_id).map(|c| c.position), *target)
        }
        ObjectiveKind::DriverPosition { driver_id, target } => {
            position_result(ctx.driver(driver_id).map(|d| d.position), *target)
        }
        ObjectiveKind::Wins { target } => {
            let wins: u32 = ctx.team_drivers(team_id).map(|d| d.wins).sum();
            count_result(wins, *target, "victoire")
        }
        ObjectiveKind::Podiums { target } => {
            let podiums: u32 = ctx.team_drivers(team_id).map(|d| d.podiums).sum();
            count_result(podiums, *target, "podium")
        }
        ObjectiveKind::PointsMinimum { target } => {
            let points = ctx.constructor(team_id).map_or(0, |c| c.points);
            EvaluationResult {
                is_met: points >= *target,
                evaluated_value: Some(f64::from(points)),
                label: format!("{points} pts"),
            }
        }
        ObjectiveKind::BeatTeam { rival_team_id } => {
            let own = ctx.constructor(team_id).map(|c| c.position);
            let rival = ctx.constructor(rival_team_id).map(|c| c.position);
            head_to_head(own, rival)
        }
        ObjectiveKind::BeatDriver { rival_driver_id } => {
            let best = ctx.team_drivers(team_id).map(|d| d.position).min();
            let rival = ctx.driver(rival_driver_id).map(|d| d.position);
            head_to_head(best, rival)
        }
        ObjectiveKind::RaceWinAtCircuit { circuit_id } => {
            let won = ctx.has_won_at(team_id, circuit_id);
            EvaluationResult {
                is_met: won,
                evaluated_value: Some(if won { 1.0 } else { 0.0 }),
                label: if won { "Victoire" } else { "Non" }.to_string(),
            }
        }
        ObjectiveKind::Custom { is_met } => EvaluationResult {
            is_met: is_met.unwrap_or(false),
            evaluated_value: None,
            label: "Manuel".to_string(),
        },
    };

    tracing::debug!(
        team = team_id,
        objective = %objective.kind,
        met = result.is_met,
        label = %result.label,
        "sponsor objective evaluated"
    );
    Ok(result)
}

pub fn evaluate_objectives(
    objectives: &[SponsorObjective],
    ctx: &StandingsContext,
) -> Result<Vec<EvaluationResult>> {
    objectives.iter().map(|o| evaluate_objective(o, ctx)).collect()
}

fn position_result(position: Option<u32>, target: u32) -> EvaluationResult {
    match position {
        Some(p) => EvaluationResult {
            is_met: p <= target,
            evaluated_value: Some(f64::from(p)),
            label: format!("P{p}"),
        },
        None => EvaluationResult::unresolved(),
    }
}

fn count_result(count: u32, target: u32, noun: &str) -> EvaluationResult {
    let plural = if count >= 2 { "s" } else { "" };
    EvaluationResult {
        is_met: count >= target,
        evaluated_value: Some(f64::from(count)),
        label: format!("{count} {noun}{plural}"),
    }
}

// Lower position number is better.
fn head_to_head(own: Option<u32>, rival: Option<u32>) -> EvaluationResult {
    let (Some(own), Some(rival)) = (own, rival) else {
        return EvaluationResult::unresolved();
    };
    let ahead = own < rival;
    EvaluationResult {
        is_met: ahead,
        evaluated_value: Some(f64::from(own)),
        label: if ahead { AHEAD } else { BEHIND }.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::standings::{ConstructorStanding, DriverStanding};

    fn ds(id: &str, position: u32, points: u32, wins: u32, podiums: u32) -> DriverStanding {
        DriverStanding {
            driver_id: id.to_string(),
            position,
            points,
            wins,
            podiums,
        }
    }

    fn cs(id: &str, position: u32, points: u32) -> ConstructorStanding {
        ConstructorStanding {
            team_id: id.to_string(),
            position,
            points,
            wins: 0,
            podiums: 0,
        }
    }

    fn ctx() -> StandingsContext {
        StandingsContext {
            drivers: vec![
                ds("ver", 1, 200, 6, 9),
                ds("lec", 2, 150, 2, 6),
                ds("nor", 3, 140, 1, 5),
                ds("sai", 4, 120, 1, 4),
                ds("pia", 5, 110, 0, 3),
            ],
            constructors: vec![cs("fer", 1, 270), cs("mcl", 2, 250), cs("rbr", 3, 230)],
            won_circuits: HashMap::from([(
                "fer".to_string(),
                HashSet::from(["monza".to_string(), "monaco".to_string()]),
            )]),
            driver_team: HashMap::from([
                ("ver".to_string(), "rbr".to_string()),
                ("lec".to_string(), "fer".to_string()),
                ("sai".to_string(), "fer".to_string()),
                ("nor".to_string(), "mcl".to_string()),
                ("pia".to_string(), "mcl".to_string()),
            ]),
        }
    }

    fn objective(team: &str, kind: ObjectiveKind) -> SponsorObjective {
        SponsorObjective {
            team_id: team.to_string(),
            kind,
        }
    }

    fn eval(team: &str, kind: ObjectiveKind) -> EvaluationResult {
        evaluate_objective(&objective(team, kind), &ctx()).unwrap()
    }

    #[test]
    fn constructor_position_at_or_above_target() {
        let r = eval("mcl", ObjectiveKind::ConstructorPosition { target: 2 });
        assert!(r.is_met);
        assert_eq!(r.evaluated_value, Some(2.0));
        assert_eq!(r.label, "P2");

        let r = eval("rbr", ObjectiveKind::ConstructorPosition { target: 2 });
        assert!(!r.is_met);
        assert_eq!(r.label, "P3");
    }

    #[test]
    fn driver_position_missing_target_is_unresolved() {
        let r = eval(
            "fer",
            ObjectiveKind::DriverPosition {
                driver_id: "nobody".to_string(),
                target: 3,
            },
        );
        assert!(!r.is_met);
        assert_eq!(r.evaluated_value, None);
        assert_eq!(r.label, "—");
    }

    #[test]
    fn wins_and_podiums_sum_team_drivers() {
        let r = eval("fer", ObjectiveKind::Wins { target: 3 });
        assert!(r.is_met);
        assert_eq!(r.evaluated_value, Some(3.0));
        assert_eq!(r.label, "3 victoires");

        let r = eval("mcl", ObjectiveKind::Wins { target: 2 });
        assert!(!r.is_met);
        assert_eq!(r.label, "1 victoire");

        let r = eval("mcl", ObjectiveKind::Podiums { target: 8 });
        assert!(r.is_met);
        assert_eq!(r.label, "8 podiums");
    }

    #[test]
    fn points_minimum() {
        let r = eval("rbr", ObjectiveKind::PointsMinimum { target: 230 });
        assert!(r.is_met);
        assert_eq!(r.label, "230 pts");
        assert!(!eval("rbr", ObjectiveKind::PointsMinimum { target: 231 }).is_met);
    }

    #[test]
    fn beat_team_and_driver() {
        let r = eval(
            "mcl",
            ObjectiveKind::BeatTeam {
                rival_team_id: "rbr".to_string(),
            },
        );
        assert!(r.is_met);
        assert_eq!(r.label, "Devant");
        assert_eq!(r.evaluated_value, Some(2.0));

        let r = eval(
            "mcl",
            ObjectiveKind::BeatDriver {
                rival_driver_id: "lec".to_string(),
            },
        );
        assert!(!r.is_met);
        assert_eq!(r.label, "Derriere");
        assert_eq!(r.evaluated_value, Some(3.0));

        let r = eval(
            "mcl",
            ObjectiveKind::BeatTeam {
                rival_team_id: "ghost".to_string(),
            },
        );
        assert_eq!(r.label, "—");
        assert!(!r.is_met);
    }

    #[test]
    fn race_win_at_circuit() {
        let won = eval(
            "fer",
            ObjectiveKind::RaceWinAtCircuit {
                circuit_id: "monza".to_string(),
            },
        );
        assert!(won.is_met);
        assert_eq!(won.evaluated_value, Some(1.0));
        assert_eq!(won.label, "Victoire");

        let lost = eval(
            "mcl",
            ObjectiveKind::RaceWinAtCircuit {
                circuit_id: "monza".to_string(),
            },
        );
        assert!(!lost.is_met);
        assert_eq!(lost.evaluated_value, Some(0.0));
        assert_eq!(lost.label, "Non");
    }

    #[test]
    fn custom_uses_stored_flag() {
        let r = eval("fer", ObjectiveKind::Custom { is_met: Some(true) });
        assert!(r.is_met);
        assert_eq!(r.evaluated_value, None);
        assert_eq!(r.label, "Manuel");
        assert!(!eval("fer", ObjectiveKind::Custom { is_met: None }).is_met);
    }

    #[test]
    fn unknown_own_team_fails_fast() {
        let err = evaluate_objective(
            &objective("haas", ObjectiveKind::Wins { target: 1 }),
            &ctx(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownTeam {
                team_id: "haas".to_string()
            }
        );
    }

    #[test]
    fn known_team_without_standing_reads_as_no_position() {
        let mut c = ctx();
        c.driver_team.insert("bea".to_string(), "haas".to_string());
        let r = evaluate_objective(
            &objective("haas", ObjectiveKind::ConstructorPosition { target: 10 }),
            &c,
        )
        .unwrap();
        assert_eq!(r.label, "—");
        let r = evaluate_objective(
            &objective("haas", ObjectiveKind::PointsMinimum { target: 1 }),
            &c,
        )
        .unwrap();
        assert_eq!(r.label, "0 pts");
        assert!(!r.is_met);
    }

    #[test]
    fn stored_record_deserializes_into_kind() {
        let raw = r#"{"team_id":"fer","objective_type":"beat_driver","rival_driver_id":"ver"}"#;
        let o: SponsorObjective = serde_json::from_str(raw).unwrap();
        assert_eq!(
            o.kind,
            ObjectiveKind::BeatDriver {
                rival_driver_id: "ver".to_string()
            }
        );
        assert_eq!(o.kind.to_string(), "beat_driver");

        let raw = r#"{"team_id":"fer","objective_type":"custom"}"#;
        let o: SponsorObjective = serde_json::from_str(raw).unwrap();
        assert_eq!(o.kind, ObjectiveKind::Custom { is_met: None });
    }
}
