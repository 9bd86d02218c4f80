/// Development mode utilities for working offline
///
/// When the forecast API is unavailable (or to reproduce a past day),
/// replay a saved Open-Meteo response from disk instead of fetching live.
/// Save one with e.g.
/// `curl "$(url)" > farley.json` using `ingest::open_meteo::build_forecast_url`.

use std::path::{Path, PathBuf};

use crate::ingest::open_meteo::{self, Forecast};
use crate::logging::{self, DataSource};
use crate::model::ConditionsError;

/// Configuration for replaying a saved forecast payload
pub struct DevMode {
    /// Saved forecast response body
    pub payload_path: PathBuf,
}

impl DevMode {
    pub fn new<P: Into<PathBuf>>(payload_path: P) -> Self {
        Self {
            payload_path: payload_path.into(),
        }
    }

    /// Load the saved payload as if it had just been fetched for `crag_id`.
    ///
    /// The same payload is served for every crag; replay exercises the
    /// pipeline, it does not pretend the crags share weather.
    pub fn load_payload(&self, crag_id: &str) -> Result<Forecast, ConditionsError> {
        let body = read_body(&self.payload_path, crag_id)?;
        logging::debug(
            DataSource::Replay,
            Some(crag_id),
            &format!("replaying {}", self.payload_path.display()),
        );
        open_meteo::parse_forecast(&body, crag_id)
    }
}

fn read_body(path: &Path, crag_id: &str) -> Result<String, ConditionsError> {
    std::fs::read_to_string(path).map_err(|e| ConditionsError::UpstreamUnavailable {
        crag: crag_id.to_string(),
        reason: format!("cannot read replay file {}: {}", path.display(), e),
    })
}
