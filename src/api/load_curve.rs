use std::fmt;

use serde_json::Value;
use tracing::{debug, info};

use crate::series::{self, SeriesReport};
use crate::ApiClient;

use super::QueryWindow;

/// Name of the consumption chart in the portal's payload
pub const CHART_NAME: &str = "CURVA_DE_CONSUMO";

/// Dataset holding the energy drawn from the grid
pub const DEFAULT_DATASET: &str = "Energia Activa Entrante kWh";

/// Daily load curve of one service point.
pub struct LoadCurve<'a> {
    client: &'a dyn ApiClient,
    sa_id: String,
    ps_id: String,
    dataset: String,
}

/// Quantities the chart can be asked for
#[derive(Debug, Clone, Copy)]
pub enum Magnitude {
    /// Active energy drawn from the grid
    ImportActiveEnergy,
    /// Reactive energy, first quadrant
    Q1ReactiveEnergy,
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = match self {
            Magnitude::ImportActiveEnergy => "IMPORT_ACTIVE_ENERGY",
            Magnitude::Q1ReactiveEnergy => "Q1_REACTIVE_ENERGY",
        };
        write!(f, "{}", m)
    }
}

impl<'a> LoadCurve<'a> {
    const CONTEXT_URL: &'static str = "/SSvcController/cmvisualizarcurvadecarga";
    const CHART_URL: &'static str = "/SSvcController/cmgraficar";
    const MAGNITUDES: [Magnitude; 2] = [Magnitude::ImportActiveEnergy, Magnitude::Q1ReactiveEnergy];

    pub fn new(client: &'a dyn ApiClient, sa_id: &str, ps_id: &str) -> Self {
        Self {
            client,
            sa_id: sa_id.to_string(),
            ps_id: ps_id.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
        }
    }

    pub fn with_dataset(mut self, dataset: &str) -> Self {
        self.dataset = dataset.to_string();
        self
    }

    /// Opens the load curve page, which the portal expects before it serves
    /// chart data for the service point.
    pub fn open_context(&self) -> Result<(), anyhow::Error> {
        let qs = vec![
            ("saId".to_string(), self.sa_id.clone()),
            ("spId".to_string(), self.ps_id.clone()),
        ];
        info!("opening load curve page");
        self.client.http_get(LoadCurve::CONTEXT_URL, &qs)?;
        Ok(())
    }

    fn chart_query_string(&self, window: &QueryWindow) -> Vec<(String, String)> {
        let magnitudes = LoadCurve::MAGNITUDES
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut qs: Vec<(String, String)> = vec![
            ("graficas[0][name]".to_string(), CHART_NAME.to_string()),
            ("graficas[0][parms][psId]".to_string(), self.ps_id.clone()),
            ("graficas[0][parms][meterId]".to_string(), String::new()),
        ];
        qs.append(&mut window.to_query_string());
        qs.push(("graficas[0][parms][agrupacion]".to_string(), "D".to_string()));
        qs.push(("graficas[0][parms][magnitudes]".to_string(), magnitudes));
        qs
    }

    /// Fetches the raw chart payload for `window`.
    pub fn payload(&self, window: &QueryWindow) -> Result<Value, anyhow::Error> {
        let qs = self.chart_query_string(window);
        info!("requesting daily chart {} .. {}", window.start(), window.end());

        let response = self.client.http_get(LoadCurve::CHART_URL, &qs)?;
        debug!("{} bytes received", response.body.len());

        Ok(series::parse_body(&response.body)?)
    }

    /// Daily consumption over `window`, one sample per day.
    pub fn daily(&self, window: &QueryWindow) -> Result<SeriesReport, anyhow::Error> {
        self.open_context()?;
        let payload = self.payload(window)?;
        let report = series::reconstruct(&payload, window, CHART_NAME, &self.dataset)?;
        info!("{} days, {:.2} kWh", report.samples.len(), report.total);
        Ok(report)
    }
}
