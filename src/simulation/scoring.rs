/// Condition classification.
///
/// Priority order: snow cover, then standing water, then a friction/comfort
/// score for dry rock. Only dry rock earns a nonzero score.

use crate::model::ConditionStatus;

/// Snowpack (mm water equivalent) above which the crag is snowed in.
pub const SNOW_COVER_MM: f64 = 1.0;

/// Surface water (mm) above which damp becomes soaked.
pub const SOAKED_MM: f64 = 1.5;

/// Most comfortable climbing temperature.
pub const IDEAL_TEMP_C: f64 = 10.0;

/// Dew point spread at which friction is as good as it gets.
const FULL_FRICTION_SPREAD_C: f64 = 15.0;

const COMFORT_PENALTY_PER_C: f64 = 4.0;
const WIND_CHILL_ONSET_KMH: f64 = 20.0;
const WIND_CHILL_PENALTY: f64 = 20.0;

const FRICTION_WEIGHT: f64 = 0.6;
const COMFORT_WEIGHT: f64 = 0.4;

/// Status plus the unrounded score it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub status: ConditionStatus,
    pub score: f64,
}

/// Drier air grips better, up to a 15C spread.
pub fn friction_score(spread_c: f64) -> f64 {
    (spread_c.min(FULL_FRICTION_SPREAD_C) / FULL_FRICTION_SPREAD_C) * 100.0
}

/// 100 at 10C, losing 4 points per degree either way; cold wind costs 20 more.
pub fn comfort_score(temperature_c: f64, wind_speed_kmh: f64) -> f64 {
    let mut score = 100.0 - (temperature_c - IDEAL_TEMP_C).abs() * COMFORT_PENALTY_PER_C;
    if wind_speed_kmh > WIND_CHILL_ONSET_KMH && temperature_c < IDEAL_TEMP_C {
        score -= WIND_CHILL_PENALTY;
    }
    score
}

/// Weighted dry-rock score, clamped to 0..=100.
pub fn dry_score(spread_c: f64, temperature_c: f64, wind_speed_kmh: f64) -> f64 {
    let score = friction_score(spread_c) * FRICTION_WEIGHT
        + comfort_score(temperature_c, wind_speed_kmh) * COMFORT_WEIGHT;
    score.clamp(0.0, 100.0)
}

/// Thresholds are strict: exactly 80 is `Good`, not `Prime`.
pub fn status_for_score(score: f64) -> ConditionStatus {
    if score > 80.0 {
        ConditionStatus::Prime
    } else if score > 60.0 {
        ConditionStatus::Good
    } else if score > 40.0 {
        ConditionStatus::Okay
    } else {
        ConditionStatus::Poor
    }
}

pub fn classify(
    water_level_mm: f64,
    snow_pack_mm: f64,
    spread_c: f64,
    temperature_c: f64,
    wind_speed_kmh: f64,
) -> Classification {
    if snow_pack_mm > SNOW_COVER_MM {
        Classification { status: ConditionStatus::Snowy, score: 0.0 }
    } else if water_level_mm == 0.0 {
        let score = dry_score(spread_c, temperature_c, wind_speed_kmh);
        Classification { status: status_for_score(score), score }
    } else if water_level_mm > SOAKED_MM {
        Classification { status: ConditionStatus::Soaked, score: 0.0 }
    } else {
        Classification { status: ConditionStatus::Damp, score: 0.0 }
    }
}
