/// Runoff-decay physics: snowmelt and the hourly evaporation coefficient.

use super::sun::SunExposure;
use crate::model::SurfaceType;

/// Most liquid water (mm) the rock surface retains; the rest runs off.
pub const SATURATION_CAP_MM: f64 = 5.0;

/// Below this the surface is treated as fully dry.
pub const DRY_SNAP_MM: f64 = 0.05;

const BASE_EVAPORATION: f64 = 0.02;
const WIND_EVAPORATION_PER_KMH: f64 = 0.005;
const SUN_EVAPORATION: f64 = 0.08;
const BOULDER_WIND_SHELTER_PER_KMH: f64 = 0.002;
const BOULDER_SHELTER_ONSET_KMH: f64 = 10.0;
const BOULDER_MICROCLIMATE: f64 = 0.7;
const MAX_EVAPORATION: f64 = 0.5;

const THERMAL_MELT_PER_C: f64 = 0.2;
const SUN_MELT: f64 = 1.5;

/// Temperature minus dew point, floored at zero.
pub fn dew_point_spread(temperature_c: f64, dew_point_c: f64) -> f64 {
    (temperature_c - dew_point_c).max(0.0)
}

/// How much near-saturated air suppresses evaporation.
pub fn humidity_factor(spread_c: f64) -> f64 {
    if spread_c < 1.0 {
        0.1
    } else if spread_c < 3.0 {
        0.5
    } else {
        1.0
    }
}

/// Snowpack released as liquid this hour (mm water equivalent).
///
/// Zero at or below freezing or with no snow on the ground.
pub fn melt_amount(temperature_c: f64, snow_pack_mm: f64, sun: SunExposure) -> f64 {
    if !(temperature_c > 0.0 && snow_pack_mm > 0.0) {
        return 0.0;
    }
    let mut rate = THERMAL_MELT_PER_C * temperature_c;
    if sun.sunny {
        rate += sun.multiplier * SUN_MELT;
    }
    snow_pack_mm.min(rate)
}

/// Evaporation coefficient before the 0.5 ceiling is applied.
pub fn raw_evaporation_coefficient(
    wind_speed_kmh: f64,
    sun: SunExposure,
    surface: SurfaceType,
    spread_c: f64,
) -> f64 {
    let mut coeff = BASE_EVAPORATION;
    coeff += wind_speed_kmh * WIND_EVAPORATION_PER_KMH;
    coeff += sun.multiplier * SUN_EVAPORATION;

    if surface == SurfaceType::Boulder {
        if wind_speed_kmh > BOULDER_SHELTER_ONSET_KMH {
            coeff -= wind_speed_kmh * BOULDER_WIND_SHELTER_PER_KMH;
        }
        coeff *= BOULDER_MICROCLIMATE;
    }

    coeff * humidity_factor(spread_c)
}

/// Fraction of surface water removed this hour.
pub fn evaporation_coefficient(
    wind_speed_kmh: f64,
    sun: SunExposure,
    surface: SurfaceType,
    spread_c: f64,
) -> f64 {
    let coeff = raw_evaporation_coefficient(wind_speed_kmh, sun, surface, spread_c);
    if coeff > MAX_EVAPORATION { MAX_EVAPORATION } else { coeff }
}

/// Adds liquid water to the surface, discarding anything over the cap.
pub fn add_water(water_level_mm: f64, added_mm: f64) -> f64 {
    let level = water_level_mm + added_mm;
    if level > SATURATION_CAP_MM { SATURATION_CAP_MM } else { level }
}

/// Applies one hour of exponential drying.
///
/// Anything not at least `DRY_SNAP_MM`, including a NaN from an unknown
/// input, leaves the rock dry.
pub fn decay(water_level_mm: f64, coeff: f64) -> f64 {
    let level = water_level_mm * (1.0 - coeff);
    if level >= DRY_SNAP_MM { level } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::sun::{DIRECT_SUN, INDIRECT_SUN, NO_SUN};

    const NIGHT: SunExposure = SunExposure { sunny: false, multiplier: NO_SUN };
    const DIRECT: SunExposure = SunExposure { sunny: true, multiplier: DIRECT_SUN };
    const INDIRECT: SunExposure = SunExposure { sunny: true, multiplier: INDIRECT_SUN };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_humidity_factor_steps() {
        assert_eq!(humidity_factor(0.5), 0.1);
        assert_eq!(humidity_factor(1.0), 0.5);
        assert_eq!(humidity_factor(2.99), 0.5);
        assert_eq!(humidity_factor(3.0), 1.0);
    }

    #[test]
    fn test_spread_is_floored_at_zero() {
        assert_eq!(dew_point_spread(5.0, 7.0), 0.0);
        assert_eq!(dew_point_spread(20.0, 6.0), 14.0);
    }

    #[test]
    fn test_no_melt_at_or_below_freezing() {
        assert_eq!(melt_amount(0.0, 3.0, DIRECT), 0.0);
        assert_eq!(melt_amount(-4.0, 3.0, DIRECT), 0.0);
        assert_eq!(melt_amount(5.0, 0.0, DIRECT), 0.0);
    }

    #[test]
    fn test_thermal_melt_without_sun() {
        // 0.2 * 3C, sun bonus only applies when sunny
        assert!(approx(melt_amount(3.0, 2.0, NIGHT), 0.6));
    }

    #[test]
    fn test_sun_accelerates_melt() {
        assert!(approx(melt_amount(3.0, 10.0, INDIRECT), 0.6 + 0.75));
        assert!(approx(melt_amount(3.0, 10.0, DIRECT), 0.6 + 1.5));
    }

    #[test]
    fn test_melt_limited_by_snowpack() {
        assert_eq!(melt_amount(10.0, 0.4, DIRECT), 0.4);
    }

    #[test]
    fn test_route_coefficient_dry_air() {
        // 0.02 + 10 * 0.005 + 1.0 * 0.08
        let c = evaporation_coefficient(10.0, DIRECT, SurfaceType::Route, 14.0);
        assert!(approx(c, 0.15));
    }

    #[test]
    fn test_boulder_coefficient_applies_shelter_and_penalty() {
        // (0.02 + 20 * 0.005 + 0.2 * 0.08 - 20 * 0.002) * 0.7
        let c = evaporation_coefficient(20.0, NIGHT, SurfaceType::Boulder, 10.0);
        assert!(approx(c, (0.02 + 0.1 + 0.016 - 0.04) * 0.7));
    }

    #[test]
    fn test_boulder_shelter_only_above_onset() {
        let c = evaporation_coefficient(10.0, NIGHT, SurfaceType::Boulder, 10.0);
        assert!(approx(c, (0.02 + 0.05 + 0.016) * 0.7));
    }

    #[test]
    fn test_coefficient_capped() {
        assert_eq!(evaporation_coefficient(200.0, DIRECT, SurfaceType::Route, 20.0), 0.5);
        assert!(raw_evaporation_coefficient(200.0, DIRECT, SurfaceType::Route, 20.0) > 0.5);
    }

    #[test]
    fn test_humid_air_suppresses_drying() {
        let dry = evaporation_coefficient(10.0, DIRECT, SurfaceType::Route, 10.0);
        let humid = evaporation_coefficient(10.0, DIRECT, SurfaceType::Route, 0.5);
        assert!(approx(humid, dry * 0.1));
    }

    #[test]
    fn test_add_water_caps_at_saturation() {
        assert_eq!(add_water(4.0, 3.0), SATURATION_CAP_MM);
        assert_eq!(add_water(1.0, 2.0), 3.0);
    }

    #[test]
    fn test_decay_snaps_residue_to_zero() {
        assert_eq!(decay(0.052, 0.1), 0.0);
        assert!(approx(decay(2.0, 0.25), 1.5));
    }

    #[test]
    fn test_decay_never_carries_nan() {
        assert_eq!(decay(2.0, f64::NAN), 0.0);
        assert_eq!(decay(f64::NAN, 0.1), 0.0);
    }
}
