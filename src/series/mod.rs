//! Rebuilds the dated consumption series out of the portal's chart payload.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::QueryWindow;
use crate::error::SeriesError;

pub mod extract;
pub mod resolve;

pub use extract::{extract_dataset, parse_body, RawSample};
pub use resolve::resolve_label;

/// One day of consumption with its year worked out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSample {
    pub date: NaiveDate,
    /// `YYYY-MM-DD`
    pub iso_date: String,
    /// `None` when the portal had no value for that day
    pub kwh: Option<f64>,
}

impl ResolvedSample {
    pub fn new(date: NaiveDate, kwh: Option<f64>) -> Self {
        ResolvedSample {
            date,
            iso_date: date.format("%Y-%m-%d").to_string(),
            kwh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesReport {
    pub samples: Vec<ResolvedSample>,
    /// Sum of every known value
    pub total: f64,
}

impl SeriesReport {
    pub fn new(samples: Vec<ResolvedSample>) -> Self {
        let total = samples.iter().filter_map(|s| s.kwh).fold(0.0, |acc, kwh| acc + kwh);
        SeriesReport { samples, total }
    }

    /// Values ready for charting, unknown days counted as zero.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.kwh.unwrap_or(0.0)).collect()
    }

    pub fn as_polars_df(&self) -> Result<DataFrame, anyhow::Error> {
        let mut dates: Vec<String> = vec![];
        let mut kwh: Vec<Option<f64>> = vec![];

        for sample in self.samples.iter() {
            dates.push(sample.iso_date.clone());
            kwh.push(sample.kwh);
        }

        let df = DataFrame::new(vec![
            Series::new("date".into(), dates),
            Series::new("kwh".into(), kwh),
        ])?;

        Ok(df)
    }
}

/// Turns a chart payload into a dated report.
///
/// Samples keep the payload order, which the portal already sorts by day.
/// Any bad label aborts the whole report.
pub fn reconstruct(
    payload: &Value,
    window: &QueryWindow,
    chart: &str,
    target: &str,
) -> Result<SeriesReport, SeriesError> {
    let raw = extract_dataset(payload, chart, target)?;
    debug!("{} samples in '{}'", raw.len(), target);

    let samples = raw
        .into_iter()
        .map(|RawSample { label, value }| {
            let date = resolve_label(&label, window)?;
            if !window.contains(date) {
                warn!(
                    "label '{}' resolved to {}, outside {} .. {}",
                    label,
                    date,
                    window.start(),
                    window.end()
                );
            }
            Ok(ResolvedSample::new(date, value))
        })
        .collect::<Result<Vec<_>, SeriesError>>()?;

    Ok(SeriesReport::new(samples))
}
