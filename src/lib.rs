/// Rock-climbing conditions for fixed crags.
///
/// Pipeline: a forecast payload (`ingest::open_meteo` or `dev_mode`) is
/// validated into hourly readings (`series`), folded through the wetness
/// and snow model (`simulation`) into one `PredictionRecord` per hour, and
/// summarised for display (`report`).

pub mod config;
pub mod crags;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod series;
pub mod simulation;

use crate::crags::Crag;
use crate::model::{ConditionsError, PredictionRecord};
use crate::series::RawHourlyPayload;

/// Adapts and simulates one crag's payload.
///
/// A malformed payload fails this crag only; callers running a batch should
/// log the error and move on.
pub fn run_crag(crag: &Crag, payload: &RawHourlyPayload) -> Result<Vec<PredictionRecord>, ConditionsError> {
    let series = series::adapt(payload)?;
    if !series.flagged_hours.is_empty() {
        logging::warn(
            logging::DataSource::Simulator,
            Some(&crag.id),
            &format!(
                "simulating with {} flagged hours; results after hour {} may be unreliable",
                series.flagged_hours.len(),
                series.flagged_hours[0]
            ),
        );
    }
    let predictions = simulation::simulate(&series.readings, crag.profile());
    logging::debug(
        logging::DataSource::Simulator,
        Some(&crag.id),
        &format!("simulated {} hours", predictions.len()),
    );
    Ok(predictions)
}
