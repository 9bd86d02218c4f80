/// Sun exposure by aspect and hour.
///
/// Melt and drying both scale with how directly the sun hits the face. The
/// weighting depends only on (aspect, local hour, cloud cover), so it is
/// computed once here and shared by both processes.

use crate::model::Aspect;

/// Full sun on a face pointed at it.
pub const DIRECT_SUN: f64 = 1.0;
/// Sunny, but the face is outside its peak window.
pub const INDIRECT_SUN: f64 = 0.5;
/// Night, or too cloudy for direct sun.
pub const NO_SUN: f64 = 0.2;

/// Cloud cover at or above this percentage blocks direct sun.
pub const SUNNY_CLOUD_LIMIT_PCT: f64 = 50.0;

/// Sun state for one hour at one crag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunExposure {
    pub sunny: bool,
    pub multiplier: f64,
}

/// Daylight hours, inclusive on both ends.
pub fn is_daytime(hour: u32) -> bool {
    (6..=19).contains(&hour)
}

pub fn is_sunny(hour: u32, cloud_cover_pct: f64) -> bool {
    is_daytime(hour) && cloud_cover_pct < SUNNY_CLOUD_LIMIT_PCT
}

/// Hours during which the sun sits squarely on a face, if it has any.
///
/// Only the southern aspects get a peak window; every other face is at
/// best indirectly lit.
pub fn peak_window(aspect: Aspect) -> Option<(u32, u32)> {
    match aspect {
        Aspect::S => Some((10, 14)),
        Aspect::SE => Some((8, 12)),
        Aspect::SW => Some((13, 17)),
        _ => None,
    }
}

pub fn sun_exposure(aspect: Aspect, hour: u32, cloud_cover_pct: f64) -> SunExposure {
    let sunny = is_sunny(hour, cloud_cover_pct);
    let multiplier = if !sunny {
        NO_SUN
    } else {
        match peak_window(aspect) {
            Some((start, end)) if (start..=end).contains(&hour) => DIRECT_SUN,
            _ => INDIRECT_SUN,
        }
    };
    SunExposure { sunny, multiplier }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daytime_bounds_are_inclusive() {
        assert!(!is_daytime(5));
        assert!(is_daytime(6));
        assert!(is_daytime(19));
        assert!(!is_daytime(20));
    }

    #[test]
    fn test_south_face_at_noon_gets_direct_sun() {
        let sun = sun_exposure(Aspect::S, 12, 10.0);
        assert!(sun.sunny);
        assert_eq!(sun.multiplier, DIRECT_SUN);
    }

    #[test]
    fn test_peak_windows_per_aspect() {
        assert_eq!(sun_exposure(Aspect::SE, 8, 0.0).multiplier, DIRECT_SUN);
        assert_eq!(sun_exposure(Aspect::SE, 13, 0.0).multiplier, INDIRECT_SUN);
        assert_eq!(sun_exposure(Aspect::SW, 17, 0.0).multiplier, DIRECT_SUN);
        assert_eq!(sun_exposure(Aspect::SW, 12, 0.0).multiplier, INDIRECT_SUN);
        assert_eq!(sun_exposure(Aspect::S, 9, 0.0).multiplier, INDIRECT_SUN);
    }

    #[test]
    fn test_north_face_never_gets_direct_sun() {
        for hour in 0..24 {
            assert_ne!(sun_exposure(Aspect::N, hour, 0.0).multiplier, DIRECT_SUN);
        }
    }

    #[test]
    fn test_clouds_and_night_mean_no_sun() {
        assert_eq!(sun_exposure(Aspect::S, 12, 50.0).multiplier, NO_SUN);
        assert!(!sun_exposure(Aspect::S, 12, 50.0).sunny);
        assert_eq!(sun_exposure(Aspect::S, 2, 0.0).multiplier, NO_SUN);
    }

    #[test]
    fn test_missing_cloud_cover_is_not_sunny() {
        assert!(!is_sunny(12, f64::NAN));
    }
}
