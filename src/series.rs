/// Weather series adapter.
///
/// Turns the parallel hourly arrays of a forecast payload into an ordered
/// `Vec<HourlyReading>`. Structural problems (missing arrays, length
/// mismatches, bad or decreasing timestamps) are fatal for the crag and
/// reported as `MalformedData`. Absent or non-finite numbers are not: they
/// are replaced (zero for amounts, wind and cloud cover; `NaN` for
/// temperature and humidity), logged, and their hour indices are returned
/// in `WeatherSeries::flagged_hours` so callers can decide what to trust.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use crate::logging::{self, DataSource};
use crate::model::{ConditionsError, HourlyReading};

// ---------------------------------------------------------------------------
// Raw payload
// ---------------------------------------------------------------------------

/// The `hourly` object of an Open-Meteo forecast response.
///
/// Every array is optional at the type level so a missing array surfaces as
/// a `MalformedData` error naming it, rather than a generic decode failure.
/// Elements are optional because the API emits `null` for unknown values.
/// Both the current and the legacy Open-Meteo variable names are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHourlyPayload {
    pub time: Option<Vec<String>>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<Vec<Option<f64>>>,
    #[serde(rename = "relative_humidity_2m", alias = "relativehumidity_2m")]
    pub humidity: Option<Vec<Option<f64>>>,
    #[serde(rename = "dew_point_2m", alias = "dewpoint_2m")]
    pub dew_point: Option<Vec<Option<f64>>>,
    pub precipitation: Option<Vec<Option<f64>>>,
    pub rain: Option<Vec<Option<f64>>>,
    pub snowfall: Option<Vec<Option<f64>>>,
    #[serde(rename = "wind_speed_10m", alias = "windspeed_10m")]
    pub wind_speed: Option<Vec<Option<f64>>>,
    #[serde(rename = "cloud_cover", alias = "cloudcover")]
    pub cloud_cover: Option<Vec<Option<f64>>>,
}

/// Adapter output: the readings plus the hours that carried unusable numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries {
    pub readings: Vec<HourlyReading>,
    pub flagged_hours: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Linear dew point approximation used when the source omits dew point.
pub fn derive_dew_point(temperature_c: f64, humidity_pct: f64) -> f64 {
    temperature_c - (100.0 - humidity_pct) / 5.0
}

/// Parses an hourly timestamp into local wall-clock time.
///
/// Accepts Open-Meteo's `2024-05-01T12:00` form, the same with seconds, and
/// RFC 3339 with an offset (the offset's local time is kept).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ConditionsError> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.naive_local()))
        .map_err(|_| ConditionsError::MalformedData(format!("unparseable timestamp '{}'", raw)))
}

/// Builds the ordered reading sequence from a raw payload.
pub fn adapt(payload: &RawHourlyPayload) -> Result<WeatherSeries, ConditionsError> {
    let times = payload
        .time
        .as_ref()
        .ok_or_else(|| missing("time"))?;
    let n = times.len();
    if n == 0 {
        return Err(ConditionsError::MalformedData("payload contains no hours".to_string()));
    }

    let temperature = required(&payload.temperature, "temperature_2m", n)?;
    let humidity = required(&payload.humidity, "relative_humidity_2m", n)?;
    let precipitation = required(&payload.precipitation, "precipitation", n)?;
    let snowfall = required(&payload.snowfall, "snowfall", n)?;
    let wind_speed = required(&payload.wind_speed, "wind_speed_10m", n)?;
    let cloud_cover = required(&payload.cloud_cover, "cloud_cover", n)?;
    let dew_point = optional(&payload.dew_point, "dew_point_2m", n)?;
    let rain = optional(&payload.rain, "rain", n)?;

    let mut readings = Vec::with_capacity(n);
    let mut flagged_hours = Vec::new();
    let mut previous: Option<NaiveDateTime> = None;

    for i in 0..n {
        let time = parse_timestamp(&times[i])?;
        if let Some(prev) = previous {
            if time < prev {
                return Err(ConditionsError::MalformedData(format!(
                    "timestamp '{}' at hour {} is earlier than the hour before it",
                    times[i], i
                )));
            }
        }
        previous = Some(time);

        let mut flagged = false;
        let mut take = |values: &[Option<f64>], stand_in: f64| match values[i] {
            Some(v) if v.is_finite() => v,
            _ => {
                flagged = true;
                stand_in
            }
        };

        // Unknown amounts, wind and cloud read as zero. Temperature and
        // humidity have no neutral value and stay NaN.
        let temperature_c = take(temperature, f64::NAN);
        let humidity_pct = take(humidity, f64::NAN);
        let precipitation_mm = take(precipitation, 0.0);
        let snowfall_cm = take(snowfall, 0.0);
        let wind_speed_kmh = take(wind_speed, 0.0);
        let cloud_cover_pct = take(cloud_cover, 0.0);
        let rain_mm = rain.map_or(0.0, |r| take(r, 0.0));
        let dew_point_c = match dew_point.and_then(|d| d[i]) {
            Some(v) if v.is_finite() => v,
            _ => derive_dew_point(temperature_c, humidity_pct),
        };

        if flagged {
            flagged_hours.push(i);
        }

        readings.push(HourlyReading {
            time,
            temperature_c,
            humidity_pct,
            dew_point_c,
            precipitation_mm,
            rain_mm,
            snowfall_cm,
            wind_speed_kmh,
            cloud_cover_pct,
        });
    }

    if !flagged_hours.is_empty() {
        logging::warn(
            DataSource::Adapter,
            None,
            &format!(
                "{} of {} hours carry missing or non-finite values (first at hour {})",
                flagged_hours.len(),
                n,
                flagged_hours[0]
            ),
        );
    }

    Ok(WeatherSeries { readings, flagged_hours })
}

fn missing(name: &str) -> ConditionsError {
    ConditionsError::MalformedData(format!("required array '{}' is missing", name))
}

fn required<'a>(
    values: &'a Option<Vec<Option<f64>>>,
    name: &str,
    n: usize,
) -> Result<&'a [Option<f64>], ConditionsError> {
    let values = values.as_deref().ok_or_else(|| missing(name))?;
    check_len(values, name, n)?;
    Ok(values)
}

fn optional<'a>(
    values: &'a Option<Vec<Option<f64>>>,
    name: &str,
    n: usize,
) -> Result<Option<&'a [Option<f64>]>, ConditionsError> {
    match values.as_deref() {
        Some(v) => check_len(v, name, n).map(|_| Some(v)),
        None => Ok(None),
    }
}

fn check_len(values: &[Option<f64>], name: &str, n: usize) -> Result<(), ConditionsError> {
    if values.len() != n {
        return Err(ConditionsError::MalformedData(format!(
            "array '{}' has {} entries, expected {}",
            name,
            values.len(),
            n
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
