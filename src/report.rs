/// What the dashboard derives from a crag's prediction series.
///
/// The simulator emits the whole window (history plus forecast); these
/// helpers pick out "now", the best upcoming hour, per-day summaries and
/// the detail table, and render them as plain text for the console.
///
/// # Clock injection
/// Every function takes `now` (crag-local wall-clock time) instead of
/// reading the clock, so the derivations are deterministic in tests.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use std::fmt::Write;

use crate::crags::Crag;
use crate::model::{ConditionStatus, PredictionRecord};

/// Hours shown in the per-day detail table.
pub const DETAIL_HOURS: [u32; 4] = [9, 12, 15, 18];

/// How far ahead the best-window search looks.
pub const BEST_WINDOW_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// The record describing conditions at `now`: the first at or after it,
/// or the last record if the series ends before `now`.
pub fn current_at(predictions: &[PredictionRecord], now: NaiveDateTime) -> Option<&PredictionRecord> {
    predictions
        .iter()
        .find(|p| p.time >= now)
        .or_else(|| predictions.last())
}

/// Highest-scoring hour strictly within the next 24 hours. Earliest wins ties.
pub fn best_window_at(predictions: &[PredictionRecord], now: NaiveDateTime) -> Option<&PredictionRecord> {
    let horizon = now + Duration::hours(BEST_WINDOW_HOURS);
    predictions
        .iter()
        .filter(|p| p.time > now && p.time < horizon)
        .fold(None, |best: Option<&PredictionRecord>, p| match best {
            Some(b) if b.score >= p.score => Some(b),
            _ => Some(p),
        })
}

/// Summary of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPreview {
    pub date: NaiveDate,
    /// Any hour that day had water on the rock.
    pub wet: bool,
    /// Status of the day's highest-scoring hour (first wins ties).
    pub best_status: ConditionStatus,
}

impl DayPreview {
    /// Label for the dashboard tile: snow first, then wetness, then the
    /// best dry status.
    pub fn label(&self) -> ConditionStatus {
        if self.best_status == ConditionStatus::Snowy {
            ConditionStatus::Snowy
        } else if self.wet {
            if self.best_status == ConditionStatus::Soaked {
                ConditionStatus::Soaked
            } else {
                ConditionStatus::Damp
            }
        } else {
            self.best_status
        }
    }
}

/// Previews for `days` consecutive dates starting at `today`.
///
/// Dates with no records yield `None` so the caller can show a gap.
pub fn daily_previews_at(
    predictions: &[PredictionRecord],
    today: NaiveDate,
    days: u32,
) -> Vec<(NaiveDate, Option<DayPreview>)> {
    (0..days)
        .map(|offset| {
            let date = today + Duration::days(i64::from(offset));
            (date, day_preview(predictions, date))
        })
        .collect()
}

fn day_preview(predictions: &[PredictionRecord], date: NaiveDate) -> Option<DayPreview> {
    let mut day = predictions.iter().filter(|p| p.time.date() == date);
    let first = day.next()?;
    let mut wet = first.water_level_mm > 0.0;
    let mut best = first;
    for p in day {
        wet |= p.water_level_mm > 0.0;
        if p.score > best.score {
            best = p;
        }
    }
    Some(DayPreview {
        date,
        wet,
        best_status: best.status,
    })
}

/// Future records grouped by date (first `days` dates), keeping only the
/// detail-table hours.
pub fn detail_rows_at(
    predictions: &[PredictionRecord],
    now: NaiveDateTime,
    days: usize,
) -> Vec<(NaiveDate, Vec<&PredictionRecord>)> {
    let mut groups: Vec<(NaiveDate, Vec<&PredictionRecord>)> = Vec::new();
    for p in predictions.iter().filter(|p| p.time > now) {
        let date = p.time.date();
        match groups.last_mut() {
            Some((d, rows)) if *d == date => rows.push(p),
            _ => {
                if groups.len() == days {
                    break;
                }
                groups.push((date, vec![p]));
            }
        }
    }
    for (_, rows) in groups.iter_mut() {
        rows.retain(|p| DETAIL_HOURS.contains(&p.time.hour()));
    }
    groups
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Plain-text report for one crag.
pub fn render_crag_report(crag: &Crag, predictions: &[PredictionRecord], now: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} - {} facing, {})",
        crag.name, crag.rock_type, crag.aspect, crag.surface
    );

    let Some(current) = current_at(predictions, now) else {
        let _ = writeln!(out, "   no data");
        return out;
    };

    let _ = writeln!(
        out,
        "   Now: {} ({})  {}°F  RH {}%  wind {} mph",
        current.status,
        current.score,
        current.details.temp_f,
        current.details.humidity_pct,
        current.details.wind_speed_mph
    );
    if current.water_level_mm > 0.0 {
        let _ = writeln!(out, "   Wetness: {}mm", current.water_level_mm);
    }

    if let Some(best) = best_window_at(predictions, now) {
        if best.score > current.score {
            let _ = writeln!(
                out,
                "   Best window: {} (score {})",
                best.time.format("%a %H:00"),
                best.score
            );
        }
    }

    let previews = daily_previews_at(predictions, now.date(), 3);
    let tiles: Vec<String> = previews
        .iter()
        .map(|(date, preview)| {
            let label = preview.map(|p| p.label().to_string()).unwrap_or_else(|| "-".to_string());
            format!("{} {}", date.format("%a"), label)
        })
        .collect();
    let _ = writeln!(out, "   {}", tiles.join(" | "));

    for (date, rows) in detail_rows_at(predictions, now, 3) {
        let _ = writeln!(out, "   {}", date.format("%A, %b %-d"));
        let _ = writeln!(out, "     Time   Score  Status  Temp   RH    Rain    Wind    Notes");
        for p in rows {
            let _ = writeln!(out, "     {}", detail_line(p));
        }
    }
    out
}

fn detail_line(p: &PredictionRecord) -> String {
    let wet = p.water_level_mm > 0.0;
    let score = if wet { "-".to_string() } else { p.score.to_string() };
    let rain = if p.details.precip_mm > 0.0 {
        format!("{:.2}\"", p.details.precip_in)
    } else {
        "-".to_string()
    };
    let notes = if p.details.snow_pack_mm > 0.0 {
        format!("Snow: {:.1}\"", p.details.snow_pack_in)
    } else if wet {
        format!("Wet: {}mm", p.water_level_mm)
    } else {
        format!("Hum: {}%", p.details.humidity_pct)
    };
    format!(
        "{:<6} {:<6} {:<7} {:<6} {:<5} {:<7} {:<7} {}",
        p.time.format("%H:%M").to_string(),
        score,
        p.status,
        format!("{}°F", p.details.temp_f),
        format!("{}%", p.details.humidity_pct),
        rain,
        format!("{}mph", p.details.wind_speed_mph),
        notes
    )
}

/// Report for a crag whose run failed.
pub fn render_no_data(crag: &Crag) -> String {
    format!(
        "{} ({} - {} facing, {})\n   no data\n",
        crag.name, crag.rock_type, crag.aspect, crag.surface
    )
}

pub fn print_crag_report(crag: &Crag, predictions: &[PredictionRecord], now: NaiveDateTime) {
    println!("{}", render_crag_report(crag, predictions, now));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
