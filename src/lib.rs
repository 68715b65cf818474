pub mod car_model;
pub mod config;
pub mod error;
pub mod points;
pub mod predictions;
pub mod season;
pub mod sponsor;
pub mod standings;
pub mod surperformance;
pub mod weather;

pub use error::{EngineError, Result};
