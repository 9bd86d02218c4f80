/// Live checks against api.open-meteo.com.
///
/// Marked #[ignore] so normal test runs do not depend on network access.
///
/// Run with: cargo test --test open_meteo_live -- --ignored

use crag_conditions::crags::builtin_crags;
use crag_conditions::ingest::open_meteo::{fetch_forecast, ForecastWindow};
use crag_conditions::run_crag;

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap()
}

#[test]
#[ignore] // Depends on external API
fn test_live_forecast_covers_full_window() {
    let crags = builtin_crags();
    let window = ForecastWindow::default();
    let forecast = fetch_forecast(&client(), &crags[0], window)
        .unwrap_or_else(|e| panic!("live fetch failed: {}", e));

    let hours = forecast.hourly.time.as_ref().map(|t| t.len()).unwrap_or(0);
    assert_eq!(hours as u32, (window.past_days + window.forecast_days) * 24);
    // Western Mass is UTC-4 or UTC-5.
    assert!(matches!(forecast.utc_offset_seconds, -18000 | -14400));
}

#[test]
#[ignore] // Depends on external API
fn test_live_payload_simulates_for_every_crag() {
    let client = client();
    for crag in builtin_crags() {
        let forecast = fetch_forecast(&client, &crag, ForecastWindow::default())
            .unwrap_or_else(|e| panic!("{}: live fetch failed: {}", crag.id, e));
        let predictions = run_crag(&crag, &forecast.hourly)
            .unwrap_or_else(|e| panic!("{}: adapt failed: {}", crag.id, e));
        assert!(!predictions.is_empty(), "{} produced no predictions", crag.id);
        println!("   ✓ {}: {} hours, now-ish {}", crag.id, predictions.len(), predictions[48].status);
    }
}
