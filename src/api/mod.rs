use chrono::{Datelike, Duration, NaiveDate};

use crate::error::SeriesError;

pub mod load_curve;

/// Date format used by the portal in query parameters, e.g. `29-12-2025`
pub const API_DATE_FORMAT: &str = "%d-%m-%Y";

pub trait FormatToApiFmt {
    fn to_api_format(&self) -> String;
}

impl FormatToApiFmt for NaiveDate {
    fn to_api_format(&self) -> String {
        self.format(API_DATE_FORMAT).to_string()
    }
}

pub fn parse_api_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), API_DATE_FORMAT)
}

/// Inclusive date range requested from the portal.
///
/// The portal labels its samples with `day/month` only, so the window is also
/// what gives each sample its year. That only works while the window crosses
/// at most one new year and its end month comes before its start month, which
/// [`QueryWindow::new`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl QueryWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SeriesError> {
        if start > end {
            return Err(SeriesError::InvalidWindow(format!(
                "start {} is after end {}",
                start, end
            )));
        }

        let crosses = end.year() - start.year();
        if crosses > 1 || (crosses == 1 && end.month() >= start.month()) {
            return Err(SeriesError::InvalidWindow(format!(
                "{} .. {} spans 12 months or more, labels without a year would be ambiguous",
                start, end
            )));
        }

        Ok(QueryWindow { start, end })
    }

    /// The `days`-long window (both ends included) that ends on `end`.
    pub fn ending_on(end: NaiveDate, days: u32) -> Result<Self, SeriesError> {
        let days = i64::from(days.max(1));
        let start = Duration::try_days(days - 1)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                SeriesError::InvalidWindow(format!("{} days before {} is out of range", days, end))
            })?;
        QueryWindow::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    fn to_query_string(&self) -> Vec<(String, String)> {
        vec![
            (
                "graficas[0][parms][fechaInicial]".to_string(),
                self.start.to_api_format(),
            ),
            (
                "graficas[0][parms][fechaFinal]".to_string(),
                self.end.to_api_format(),
            ),
        ]
    }
}
