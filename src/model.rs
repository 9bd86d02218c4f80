/// Core data types for the crag conditions service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond parsing and display, and no I/O.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One hour of weather at a crag, as produced by `series::adapt`.
///
/// All quantities are metric. `time` is the crag's local wall-clock time,
/// which is what the sun model keys on.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyReading {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    /// Supplied by the source, or derived as `temp - (100 - humidity) / 5`.
    pub dew_point_c: f64,
    pub precipitation_mm: f64, // water equivalent, includes snow
    pub rain_mm: f64,          // informational
    pub snowfall_cm: f64,      // informational, not accumulated separately
    pub wind_speed_kmh: f64,
    pub cloud_cover_pct: f64,
}

// ---------------------------------------------------------------------------
// Crag profile
// ---------------------------------------------------------------------------

/// Compass direction a crag's main face points toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Aspect::N => "N",
            Aspect::NE => "NE",
            Aspect::E => "E",
            Aspect::SE => "SE",
            Aspect::S => "S",
            Aspect::SW => "SW",
            Aspect::W => "W",
            Aspect::NW => "NW",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Aspect {
    type Err = ConditionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Aspect::N),
            "NE" => Ok(Aspect::NE),
            "E" => Ok(Aspect::E),
            "SE" => Ok(Aspect::SE),
            "S" => Ok(Aspect::S),
            "SW" => Ok(Aspect::SW),
            "W" => Ok(Aspect::W),
            "NW" => Ok(Aspect::NW),
            other => Err(ConditionsError::Config(format!("unknown aspect '{}'", other))),
        }
    }
}

/// Whether a crag is roped routes or low boulders.
///
/// Boulders sit close to damp ground under tree cover, so they dry slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    Route,
    Boulder,
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceType::Route => write!(f, "route"),
            SurfaceType::Boulder => write!(f, "boulder"),
        }
    }
}

impl FromStr for SurfaceType {
    type Err = ConditionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "route" => Ok(SurfaceType::Route),
            "boulder" => Ok(SurfaceType::Boulder),
            other => Err(ConditionsError::Config(format!("unknown surface type '{}'", other))),
        }
    }
}

/// The only crag attributes the simulator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CragProfile {
    pub aspect: Aspect,
    pub surface: SurfaceType,
}

// ---------------------------------------------------------------------------
// Prediction types
// ---------------------------------------------------------------------------

/// Condition label for one hour, in the order the dashboard ranks them.
///
/// `Dry`-family labels (`Prime`, `Good`, `Okay`, `Poor`) only occur when the
/// rock carries no water; `Damp`/`Soaked` carry a score of 0, as does `Snowy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionStatus {
    Prime,
    Good,
    Okay,
    Poor,
    Damp,
    Soaked,
    Snowy,
}

impl ConditionStatus {
    /// True for the labels that mean the rock is not climbable.
    pub fn is_wet(&self) -> bool {
        matches!(
            self,
            ConditionStatus::Damp | ConditionStatus::Soaked | ConditionStatus::Snowy
        )
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionStatus::Prime => "PRIME",
            ConditionStatus::Good => "GOOD",
            ConditionStatus::Okay => "OKAY",
            ConditionStatus::Poor => "POOR",
            ConditionStatus::Damp => "DAMP",
            ConditionStatus::Soaked => "SOAKED",
            ConditionStatus::Snowy => "SNOWY",
        };
        write!(f, "{}", s)
    }
}

/// Display-oriented values attached to each prediction.
///
/// Temperatures and wind are imperial and rounded to integers; water
/// quantities stay metric with an inch projection alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionDetails {
    pub temp_f: i64,
    pub humidity_pct: f64,
    pub dew_point_f: i64,
    pub wind_speed_mph: i64,
    pub precip_mm: f64,
    pub precip_in: f64,      // 2 decimals
    pub snow_pack_mm: f64,   // 1 decimal
    pub snow_pack_in: f64,   // 1 decimal
    pub melt_mm: f64,        // 1 decimal
    pub evap_coeff: String,  // e.g. "12%"
}

/// Simulator output for one hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub time: NaiveDateTime,
    pub water_level_mm: f64, // 2 decimals
    pub score: u8,
    pub status: ConditionStatus,
    pub details: PredictionDetails,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching, adapting or configuring.
///
/// The simulator itself is infallible; every error here originates at a
/// boundary (payload, network, or configuration).
#[derive(Debug, PartialEq)]
pub enum ConditionsError {
    /// The weather payload is missing an array, has mismatched array
    /// lengths, is empty, or carries unusable timestamps.
    MalformedData(String),
    /// The forecast service could not be reached or returned garbage.
    UpstreamUnavailable { crag: String, reason: String },
    /// Registry file or environment configuration is invalid.
    Config(String),
}

impl fmt::Display for ConditionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionsError::MalformedData(msg) => write!(f, "Malformed data: {}", msg),
            ConditionsError::UpstreamUnavailable { crag, reason } => {
                write!(f, "Upstream unavailable for crag {}: {}", crag, reason)
            }
            ConditionsError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ConditionsError {}
