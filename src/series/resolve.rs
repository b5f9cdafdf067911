use chrono::{Datelike, NaiveDate};

use crate::api::QueryWindow;
use crate::error::SeriesError;

/// Resolves a portal label such as `"Lun 29/12"` to a full date.
///
/// Months from the window's start month onwards belong to the start year,
/// earlier months to the end year. A month equal to the start month therefore
/// resolves to the start year.
pub fn resolve_label(label: &str, window: &QueryWindow) -> Result<NaiveDate, SeriesError> {
    let (day, month) = parse_day_month(label)?;

    let year = if month >= window.start().month() {
        window.start().year()
    } else {
        window.end().year()
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| parse_error(label, format!("{day}/{month} is not a valid date in {year}")))
}

fn parse_day_month(label: &str) -> Result<(u32, u32), SeriesError> {
    let day_month = label
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| parse_error(label, "expected '<weekday> <day>/<month>'"))?;

    let (day, month) = day_month
        .split_once('/')
        .ok_or_else(|| parse_error(label, "missing '/' between day and month"))?;

    let day = day
        .parse::<u32>()
        .map_err(|e| parse_error(label, format!("day '{day}': {e}")))?;
    let month = month
        .parse::<u32>()
        .map_err(|e| parse_error(label, format!("month '{month}': {e}")))?;

    Ok((day, month))
}

fn parse_error(label: &str, reason: impl Into<String>) -> SeriesError {
    SeriesError::LabelParse {
        label: label.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_year_window() -> QueryWindow {
        QueryWindow::new(date(2025, 12, 29), date(2026, 1, 18)).unwrap()
    }

    #[test]
    fn december_label_keeps_start_year() {
        assert_eq!(
            resolve_label("Lun 29/12", &new_year_window()).unwrap(),
            date(2025, 12, 29)
        );
    }

    #[test]
    fn january_label_moves_to_end_year() {
        assert_eq!(
            resolve_label("Vie 02/01", &new_year_window()).unwrap(),
            date(2026, 1, 2)
        );
    }

    #[test]
    fn start_month_ties_to_start_year() {
        let window = QueryWindow::new(date(2025, 10, 15), date(2026, 2, 1)).unwrap();
        assert_eq!(resolve_label("Mie 01/10", &window).unwrap(), date(2025, 10, 1));
        assert_eq!(resolve_label("Lun 01/12", &window).unwrap(), date(2025, 12, 1));
        assert_eq!(resolve_label("Lun 05/01", &window).unwrap(), date(2026, 1, 5));
    }

    #[test]
    fn year_rule_holds_for_every_month() {
        let window = QueryWindow::new(date(2025, 7, 1), date(2026, 6, 30)).unwrap();
        for month in 1..=12 {
            let resolved = resolve_label(&format!("Lun 01/{month:02}"), &window).unwrap();
            let expected = if month >= 7 { 2025 } else { 2026 };
            assert_eq!(resolved.year(), expected, "month {month}");
        }
    }

    #[test]
    fn same_year_window() {
        let window = QueryWindow::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap();
        assert_eq!(resolve_label("Sab 15/03", &window).unwrap(), date(2025, 3, 15));
    }

    #[test]
    fn resolving_twice_gives_the_same_date() {
        let window = new_year_window();
        assert_eq!(
            resolve_label("Dom 04/01", &window).unwrap(),
            resolve_label("Dom 04/01", &window).unwrap()
        );
    }

    #[test]
    fn malformed_labels_are_reported() {
        let window = new_year_window();
        for label in ["29/12", "Lun 2912", "Lun xx/12", "Lun 29/", "Lun 31/02", "Lun 01/13"] {
            match resolve_label(label, &window) {
                Err(SeriesError::LabelParse { label: reported, .. }) => {
                    assert_eq!(reported, label)
                }
                other => panic!("{label}: unexpected result {:?}", other),
            }
        }
    }
}
