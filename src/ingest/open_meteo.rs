/// Open-Meteo Forecast API Client
///
/// Retrieves hourly weather for a crag: a few days of recent history (so the
/// simulator can warm up wetness before the forecast starts) concatenated
/// with a few days of forecast. Times are requested in the crag's local
/// timezone so the sun model sees local hours.
///
/// API Documentation: https://open-meteo.com/en/docs

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::crags::Crag;
use crate::model::ConditionsError;
use crate::series::RawHourlyPayload;

const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

/// Hourly variables requested from the API.
///
/// `showers` and `wind_direction_10m` are not used by the simulator but are
/// kept in the request so saved payloads stay useful for replay and review.
pub const HOURLY_VARIABLES: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "cloud_cover",
    "wind_speed_10m",
    "wind_direction_10m",
];

/// Days of history and forecast to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindow {
    pub past_days: u32,
    pub forecast_days: u32,
}

impl Default for ForecastWindow {
    fn default() -> Self {
        Self {
            past_days: 2,
            forecast_days: 3,
        }
    }
}

// ============================================================================
// API Response Structures
// ============================================================================

/// Top-level forecast response
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub utc_offset_seconds: Option<i64>,
    pub hourly: Option<RawHourlyPayload>,
}

/// What the rest of the service needs from a response: the hourly arrays
/// and the offset that turns "now" into the crag's local time.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub utc_offset_seconds: i64,
    pub hourly: RawHourlyPayload,
}

impl Forecast {
    /// `utc` expressed in the same local wall-clock time as the hourly series.
    pub fn local_time_at(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        (utc + Duration::seconds(self.utc_offset_seconds)).naive_utc()
    }
}

/// Error body returned alongside 4xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: String,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Builds the forecast URL for a coordinate pair.
pub fn build_forecast_url(latitude: f64, longitude: f64, window: ForecastWindow) -> String {
    format!(
        "{}/v1/forecast?latitude={}&longitude={}&hourly={}&timezone=auto&past_days={}&forecast_days={}",
        OPEN_METEO_BASE_URL,
        latitude,
        longitude,
        HOURLY_VARIABLES.join(","),
        window.past_days,
        window.forecast_days
    )
}

/// Fetch the hourly series for one crag
///
/// # Returns
/// The raw hourly arrays, ready for `series::adapt`, plus the UTC offset. Any transport or
/// decoding failure is reported as `UpstreamUnavailable`; no retry is made.
pub fn fetch_forecast(
    client: &reqwest::blocking::Client,
    crag: &Crag,
    window: ForecastWindow,
) -> Result<Forecast, ConditionsError> {
    let url = build_forecast_url(crag.latitude, crag.longitude, window);
    let unavailable = |reason: String| ConditionsError::UpstreamUnavailable {
        crag: crag.id.clone(),
        reason,
    };

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                unavailable(format!("request timed out: {}", e))
            } else {
                unavailable(format!("request failed: {}", e))
            }
        })?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| unavailable(format!("could not read body: {}", e)))?;

    if !status.is_success() {
        return Err(status_error(&crag.id, status, &body));
    }

    parse_forecast(&body, &crag.id)
}

/// Maps a non-2xx response to `UpstreamUnavailable` with an
/// `HTTP <code> <reason>` message.
///
/// The reason is the API's own `reason` field when the body carries one,
/// otherwise the standard phrase for the status code.
pub fn status_error(crag_id: &str, status: reqwest::StatusCode, body: &str) -> ConditionsError {
    let reason = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.reason)
        .ok()
        .or_else(|| status.canonical_reason().map(String::from))
        .unwrap_or_default();
    ConditionsError::UpstreamUnavailable {
        crag: crag_id.to_string(),
        reason: format!("HTTP {} {}", status.as_u16(), reason).trim_end().to_string(),
    }
}

/// Decodes a forecast response body.
///
/// A body that is not valid JSON is an upstream failure; a valid response
/// without an `hourly` block is malformed data.
pub fn parse_forecast(body: &str, crag_id: &str) -> Result<Forecast, ConditionsError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| ConditionsError::UpstreamUnavailable {
            crag: crag_id.to_string(),
            reason: format!("could not decode response: {}", e),
        })?;

    let hourly = response.hourly.ok_or_else(|| {
        ConditionsError::MalformedData("forecast response has no hourly block".to_string())
    })?;

    Ok(Forecast {
        utc_offset_seconds: response.utc_offset_seconds.unwrap_or(0),
        hourly,
    })
}

// ============================================================================
// Tests
// ============================================================================
