use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::points::{DriverRaceInput, PointsConfig, PointsMap, score_race};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult {
    pub circuit_id: String,
    pub results: Vec<DriverRaceInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub driver_id: String,
    pub team_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverStanding {
    pub driver_id: String,
    pub position: u32,
    pub points: u32,
    pub wins: u32,
    pub podiums: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorStanding {
    pub team_id: String,
    pub position: u32,
    pub points: u32,
    pub wins: u32,
    pub podiums: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsContext {
    pub drivers: Vec<DriverStanding>,
    pub constructors: Vec<ConstructorStanding>,
    // Team id -> circuit ids where one of its drivers won.
    #[serde(default)]
    pub won_circuits: HashMap<String, HashSet<String>>,
    // Driver id -> team id. The only source of team membership.
    pub driver_team: HashMap<String, String>,
}

impl StandingsContext {
    pub fn driver(&self, driver_id: &str) -> Option<&DriverStanding> {
        self.drivers.iter().find(|d| d.driver_id == driver_id)
    }

    pub fn constructor(&self, team_id: &str) -> Option<&ConstructorStanding> {
        self.constructors.iter().find(|c| c.team_id == team_id)
    }

    pub fn team_drivers<'a>(&'a self, team_id: &'a str) -> impl Iterator<Item = &'a DriverStanding> + 'a {
        self.drivers.iter().filter(move |d| {
            self.driver_team
                .get(&d.driver_id)
                .is_some_and(|t| t == team_id)
        })
    }

    pub fn knows_team(&self, team_id: &str) -> bool {
        self.constructor(team_id).is_some() || self.driver_team.values().any(|t| t == team_id)
    }

    pub fn has_won_at(&self, team_id: &str, circuit_id: &str) -> bool {
        self.won_circuits
            .get(team_id)
            .is_some_and(|set| set.contains(circuit_id))
    }
}

#[derive(Default)]
struct Tally {
    points: u32,
    wins: u32,
    podiums: u32,
}

// Every roster driver and every listed team gets a row, scored or not. Ties on points and
// wins keep roster/team list order.
pub fn compute_standings(
    races: &[RaceResult],
    roster: &[RosterEntry],
    teams: &[String],
    points_map: &PointsMap,
    cfg: &PointsConfig,
) -> Result<StandingsContext> {
    if let Some(r) = roster.iter().find(|r| !teams.contains(&r.team_id)) {
        return Err(EngineError::UnknownTeam {
            team_id: r.team_id.clone(),
        });
    }

    let driver_team: HashMap<String, String> = roster
        .iter()
        .map(|r| (r.driver_id.clone(), r.team_id.clone()))
        .collect();

    let mut driver_tally: HashMap<String, Tally> = HashMap::new();
    let mut team_tally: HashMap<&str, Tally> = HashMap::new();
    let mut won_circuits: HashMap<String, HashSet<String>> = HashMap::new();

    for race in races {
        let scored = score_race(&race.results, points_map, cfg)?;
        for row in &scored {
            let Some(team_id) = driver_team.get(&row.driver_id) else {
                return Err(EngineError::UnknownDriver {
                    driver_id: row.driver_id.clone(),
                });
            };
            let win = row.finish_position == Some(1);
            let podium = row.finish_position.is_some_and(|p| p <= 3);

            for tally in [
                driver_tally.entry(row.driver_id.clone()).or_default(),
                team_tally.entry(team_id.as_str()).or_default(),
            ] {
                tally.points += row.points;
                tally.wins += u32::from(win);
                tally.podiums += u32::from(podium);
            }
            if win {
                won_circuits
                    .entry(team_id.clone())
                    .or_default()
                    .insert(race.circuit_id.clone());
            }
        }
    }

    let mut drivers: Vec<DriverStanding> = roster
        .iter()
        .map(|r| {
            let t = driver_tally.get(r.driver_id.as_str());
            DriverStanding {
                driver_id: r.driver_id.clone(),
                position: 0,
                points: t.map_or(0, |t| t.points),
                wins: t.map_or(0, |t| t.wins),
                podiums: t.map_or(0, |t| t.podiums),
            }
        })
        .collect();
    drivers.sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
    for (idx, d) in drivers.iter_mut().enumerate() {
        d.position = idx as u32 + 1;
    }

    let mut constructors: Vec<ConstructorStanding> = teams
        .iter()
        .map(|team_id| {
            let t = team_tally.get(team_id.as_str());
            ConstructorStanding {
                team_id: team_id.clone(),
                position: 0,
                points: t.map_or(0, |t| t.points),
                wins: t.map_or(0, |t| t.wins),
                podiums: t.map_or(0, |t| t.podiums),
            }
        })
        .collect();
    constructors.sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
    for (idx, c) in constructors.iter_mut().enumerate() {
        c.position = idx as u32 + 1;
    }

    tracing::debug!(
        races = races.len(),
        drivers = drivers.len(),
        teams = constructors.len(),
        "standings folded"
    );

    Ok(StandingsContext {
        drivers,
        constructors,
        won_circuits,
        driver_team,
    })
}
