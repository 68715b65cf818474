use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    // Maximum swing, in percentage points, either side of the circuit base.
    pub variation: f64,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self { variation: 15.0 }
    }
}

// No base: dry circuit, rng untouched.
pub fn calculate_rain_probability(
    base_probability: Option<f64>,
    cfg: &RainConfig,
    rng: &mut impl Rng,
) -> u8 {
    let Some(base) = base_probability else {
        return 0;
    };
    if !base.is_finite() {
        tracing::warn!(base, "non-finite rain base probability, using 0");
        return 0;
    }
    let u: f64 = rng.r#gen();
    let swing = (u * 2.0 - 1.0) * cfg.variation;
    (base + swing).clamp(0.0, 100.0).round() as u8
}

pub fn calculate_rain_probability_default(base_probability: Option<f64>, cfg: &RainConfig) -> u8 {
    let mut rng = rand::thread_rng();
    calculate_rain_probability(base_probability, cfg, &mut rng)
}
