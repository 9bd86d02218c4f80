/// Weather data retrieval.
///
/// Submodules:
/// - `open_meteo`: hourly forecast + recent history from api.open-meteo.com

pub mod open_meteo;
