/// Hour-by-hour crag condition simulation.
///
/// The simulator folds over a crag's readings in time order, carrying the
/// surface water level and the snowpack from one hour to the next, and
/// emits one `PredictionRecord` per reading. It is a pure function of its
/// inputs: no clock, no randomness, no shared state between runs.
///
/// Each hour, in order:
///   1. route precipitation to snowpack (below 0C) or surface water (capped)
///   2. work out sun exposure for the crag's aspect
///   3. melt snowpack into surface water
///   4. compute the evaporation coefficient
///   5. decay surface water, snapping residue to zero
///   6. classify
///
/// Submodules:
/// - `sun`    : aspect/hour sun exposure weighting
/// - `drying` : melt, evaporation coefficient, runoff cap and decay
/// - `scoring`: status and score for the post-update state

pub mod drying;
pub mod scoring;
pub mod sun;

use chrono::Timelike;

use crate::model::{CragProfile, HourlyReading, PredictionDetails, PredictionRecord};
use scoring::Classification;
use sun::SunExposure;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Water carried between hours. Lives for exactly one run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationState {
    /// Liquid water on the surface, 0..=SATURATION_CAP_MM.
    pub water_level_mm: f64,
    /// Frozen water equivalent, unbounded above.
    pub snow_pack_mm: f64,
}

/// Intermediate values from one hour, kept for the record's details.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourOutcome {
    pub sun: SunExposure,
    pub melt_mm: f64,
    pub evaporation_coeff: f64,
    pub dew_point_spread_c: f64,
    pub classification: Classification,
}

impl SimulationState {
    /// Dry rock, no snow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the state by one hour of weather.
    pub fn step(&mut self, reading: &HourlyReading, profile: CragProfile) -> HourOutcome {
        let temp = reading.temperature_c;
        let precip = reading.precipitation_mm;

        if temp < 0.0 && precip > 0.0 {
            self.snow_pack_mm += precip;
        } else if precip > 0.0 {
            self.water_level_mm = drying::add_water(self.water_level_mm, precip);
        }

        let sun = sun::sun_exposure(profile.aspect, reading.time.hour(), reading.cloud_cover_pct);

        let melt_mm = drying::melt_amount(temp, self.snow_pack_mm, sun);
        if melt_mm > 0.0 {
            self.snow_pack_mm -= melt_mm;
            self.water_level_mm = drying::add_water(self.water_level_mm, melt_mm);
        }

        let spread = drying::dew_point_spread(temp, reading.dew_point_c);
        let evaporation_coeff =
            drying::evaporation_coefficient(reading.wind_speed_kmh, sun, profile.surface, spread);
        self.water_level_mm = drying::decay(self.water_level_mm, evaporation_coeff);

        let classification = scoring::classify(
            self.water_level_mm,
            self.snow_pack_mm,
            spread,
            temp,
            reading.wind_speed_kmh,
        );

        HourOutcome {
            sun,
            melt_mm,
            evaporation_coeff,
            dew_point_spread_c: spread,
            classification,
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Runs the simulation over a crag's full series, starting dry.
///
/// The output has one record per reading, in reading order.
pub fn simulate(readings: &[HourlyReading], profile: CragProfile) -> Vec<PredictionRecord> {
    readings
        .iter()
        .scan(SimulationState::new(), |state, reading| {
            let outcome = state.step(reading, profile);
            Some(project(reading, state, &outcome))
        })
        .collect()
}

/// Builds the emitted record. All unit conversion happens here.
pub fn project(
    reading: &HourlyReading,
    state: &SimulationState,
    outcome: &HourOutcome,
) -> PredictionRecord {
    PredictionRecord {
        time: reading.time,
        water_level_mm: round_to(state.water_level_mm, 2),
        score: round_half_up(outcome.classification.score) as u8,
        status: outcome.classification.status,
        details: PredictionDetails {
            temp_f: round_half_up(celsius_to_fahrenheit(reading.temperature_c)) as i64,
            humidity_pct: reading.humidity_pct,
            dew_point_f: round_half_up(celsius_to_fahrenheit(reading.dew_point_c)) as i64,
            wind_speed_mph: round_half_up(kmh_to_mph(reading.wind_speed_kmh)) as i64,
            precip_mm: reading.precipitation_mm,
            precip_in: round_to(mm_to_inches(reading.precipitation_mm), 2),
            snow_pack_mm: round_to(state.snow_pack_mm, 1),
            snow_pack_in: round_to(mm_to_inches(state.snow_pack_mm), 1),
            melt_mm: round_to(outcome.melt_mm, 1),
            evap_coeff: format!("{}%", round_half_up(outcome.evaporation_coeff * 100.0) as i64),
        },
    }
}

// ---------------------------------------------------------------------------
// Unit conversion
// ---------------------------------------------------------------------------

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * 0.621371
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm / 25.4
}

/// Rounds halves toward positive infinity (-2.5 becomes -2).
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub fn round_to(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    round_half_up(x * factor) / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Aspect, ConditionStatus, SurfaceType};
    use chrono::NaiveDate;

    const ROUTE_S: CragProfile = CragProfile { aspect: Aspect::S, surface: SurfaceType::Route };

    fn reading(hour: u32, temp: f64, precip: f64) -> HourlyReading {
        HourlyReading {
            time: NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            temperature_c: temp,
            humidity_pct: 40.0,
            dew_point_c: temp - 14.0,
            precipitation_mm: precip,
            rain_mm: 0.0,
            snowfall_cm: 0.0,
            wind_speed_kmh: 10.0,
            cloud_cover_pct: 10.0,
        }
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(celsius_to_fahrenheit(20.0), 68.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert!((kmh_to_mph(100.0) - 62.1371).abs() < 1e-9);
        assert_eq!(mm_to_inches(25.4), 1.0);
    }

    #[test]
    fn test_round_half_up_matches_display_convention() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.75, 1), 0.8);
    }

    #[test]
    fn test_freezing_precip_goes_to_snowpack() {
        let mut state = SimulationState::new();
        state.step(&reading(3, -5.0, 2.0), ROUTE_S);
        assert_eq!(state.snow_pack_mm, 2.0);
        assert_eq!(state.water_level_mm, 0.0);
    }

    #[test]
    fn test_rain_capped_before_decay() {
        let mut state = SimulationState::new();
        // Night, no sun: coeff = (0.02 + 0.05 + 0.016) * 1.0
        state.step(&reading(2, 10.0, 40.0), ROUTE_S);
        assert!((state.water_level_mm - 5.0 * (1.0 - 0.086)).abs() < 1e-9);
    }

    #[test]
    fn test_step_reports_melt() {
        let mut state = SimulationState { water_level_mm: 0.0, snow_pack_mm: 4.0 };
        // 12:00, S face, clear: melt = 0.2 * 5 + 1.0 * 1.5
        let outcome = state.step(&reading(12, 5.0, 0.0), ROUTE_S);
        assert!((outcome.melt_mm - 2.5).abs() < 1e-9);
        assert!((state.snow_pack_mm - 1.5).abs() < 1e-9);
        assert_eq!(outcome.classification.status, ConditionStatus::Snowy);
    }

    #[test]
    fn test_projection_fields() {
        let r = reading(12, 20.0, 0.0);
        let mut state = SimulationState::new();
        let outcome = state.step(&r, ROUTE_S);
        let record = project(&r, &state, &outcome);
        assert_eq!(record.details.temp_f, 68);
        assert_eq!(record.details.dew_point_f, 43); // 6C = 42.8F
        assert_eq!(record.details.wind_speed_mph, 6);
        assert_eq!(record.details.evap_coeff, "15%");
        assert_eq!(record.details.precip_in, 0.0);
        assert_eq!(record.score, 80);
        assert_eq!(record.status, ConditionStatus::Good);
    }

    #[test]
    fn test_simulate_preserves_length() {
        let readings: Vec<_> = (0..24).map(|h| reading(h, 8.0, 0.0)).collect();
        assert_eq!(simulate(&readings, ROUTE_S).len(), 24);
        assert!(simulate(&[], ROUTE_S).is_empty());
    }
}
