use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{field} rating {value} for {entity_id} is outside {min}..={max}")]
    RatingOutOfScale {
        entity_id: String,
        field: &'static str,
        value: i32,
        min: u8,
        max: u8,
    },
    #[error("points table row uses invalid position {position}")]
    InvalidPointsPosition { position: u32 },
    #[error("points table lists position {position} twice")]
    DuplicatePointsPosition { position: u32 },
    #[error("{entity_id} has invalid position {position} (positions start at 1)")]
    InvalidPosition { entity_id: String, position: u32 },
    #[error("finish position {position} claimed by both {first} and {second}")]
    DuplicateFinishPosition {
        position: u32,
        first: String,
        second: String,
    },
    #[error("fastest lap claimed by both {first} and {second}")]
    MultipleFastestLaps { first: String, second: String },
    #[error("objective for team {team_id} references a team unknown to the standings")]
    UnknownTeam { team_id: String },
    #[error("driver {driver_id} is not on any roster")]
    UnknownDriver { driver_id: String },
}
