use std::cell::RefCell;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

use ute_consumo::api::load_curve::LoadCurve;
use ute_consumo::api::QueryWindow;
use ute_consumo::error::SeriesError;
use ute_consumo::series::ResolvedSample;
use ute_consumo::{ApiClient, HttpResponse};

/// Answers the chart request with a canned body and records every path hit.
struct CannedPortal {
    chart_status: u16,
    chart_body: String,
    calls: RefCell<Vec<String>>,
}

impl CannedPortal {
    fn new(chart_status: u16, chart_body: String) -> Self {
        CannedPortal {
            chart_status,
            chart_body,
            calls: RefCell::new(vec![]),
        }
    }
}

impl ApiClient for CannedPortal {
    fn http_get(
        &self,
        path: &str,
        _query_string: &[(String, String)],
    ) -> Result<HttpResponse, anyhow::Error> {
        self.calls.borrow_mut().push(path.to_string());
        if path.ends_with("cmgraficar") {
            Ok(HttpResponse {
                status: self.chart_status,
                body: self.chart_body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 200,
                body: "<html>curva de carga</html>".to_string(),
            })
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn window() -> QueryWindow {
    QueryWindow::new(date(2025, 12, 29), date(2026, 1, 18)).unwrap()
}

fn chart_body() -> String {
    json!({
        "CURVA_DE_CONSUMO": {
            "data": {
                "labels": ["Lun 29/12", "Mar 30/12", "Mie 31/12", "Jue 01/01", "Vie 02/01"],
                "datasets": [
                    { "label": "Energia Activa Entrante kWh", "data": [7.25, "8.5", null, 4, 6] },
                    { "label": "Energia Reactiva Q1 kVArh", "data": [1, 1, 1, 1, 1] }
                ]
            }
        }
    })
    .to_string()
}

#[test]
fn daily_report_across_new_year() {
    let portal = CannedPortal::new(200, chart_body());
    let curve = LoadCurve::new(&portal, "111", "222");

    let report = curve.daily(&window()).unwrap();

    assert_eq!(
        *portal.calls.borrow(),
        vec![
            "/SSvcController/cmvisualizarcurvadecarga".to_string(),
            "/SSvcController/cmgraficar".to_string(),
        ]
    );
    assert_eq!(
        report.samples,
        vec![
            ResolvedSample::new(date(2025, 12, 29), Some(7.25)),
            ResolvedSample::new(date(2025, 12, 30), Some(8.5)),
            ResolvedSample::new(date(2025, 12, 31), None),
            ResolvedSample::new(date(2026, 1, 1), Some(4.0)),
            ResolvedSample::new(date(2026, 1, 2), Some(6.0)),
        ]
    );
    assert_eq!(report.total, 25.75);
}

#[test]
fn html_answer_is_reported_with_a_snippet() {
    let portal = CannedPortal::new(
        200,
        "\n<html><body>Sesion expirada</body></html>".to_string(),
    );
    let curve = LoadCurve::new(&portal, "111", "222");

    let err = curve.daily(&window()).unwrap_err();

    assert_eq!(
        err.downcast_ref::<SeriesError>(),
        Some(&SeriesError::NonJsonResponse {
            snippet: "<html><body>Sesion expirada</body></html>".to_string()
        })
    );
}

#[test]
fn unknown_dataset_lists_what_the_portal_sent() {
    let portal = CannedPortal::new(200, chart_body());
    let curve = LoadCurve::new(&portal, "111", "222").with_dataset("Energia Activa Saliente kWh");

    let err = curve.daily(&window()).unwrap_err();

    assert_eq!(
        err.downcast_ref::<SeriesError>(),
        Some(&SeriesError::DatasetNotFound {
            target: "Energia Activa Saliente kWh".to_string(),
            available: vec![
                "Energia Activa Entrante kWh".to_string(),
                "Energia Reactiva Q1 kVArh".to_string(),
            ],
        })
    );
}

#[test]
fn error_status_with_json_body_still_parses() {
    let portal = CannedPortal::new(500, chart_body());
    let curve = LoadCurve::new(&portal, "111", "222");

    assert_eq!(curve.daily(&window()).unwrap().samples.len(), 5);
}
