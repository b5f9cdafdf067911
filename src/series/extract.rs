use serde_json::Value;
use tracing::warn;

use crate::error::SeriesError;

/// Characters of a non-JSON body kept for diagnostics
pub const SNIPPET_LEN: usize = 500;

/// One entry of the payload: a year-less label and its value, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub label: String,
    pub value: Option<f64>,
}

/// Parses a response body, rejecting anything that is not a JSON object.
///
/// When the session is gone the portal answers with an HTML page, so a body
/// that does not start with `{` is reported with its first characters.
pub fn parse_body(body: &str) -> Result<Value, SeriesError> {
    let trimmed = body.trim();
    let non_json = || SeriesError::NonJsonResponse {
        snippet: trimmed.chars().take(SNIPPET_LEN).collect(),
    };

    if !trimmed.starts_with('{') {
        return Err(non_json());
    }
    serde_json::from_str(trimmed).map_err(|_| non_json())
}

/// Pulls the `target` dataset out of `payload[chart].data`, paired with the
/// chart labels.
pub fn extract_dataset(
    payload: &Value,
    chart: &str,
    target: &str,
) -> Result<Vec<RawSample>, SeriesError> {
    if !payload.is_object() {
        return Err(SeriesError::MalformedPayload(
            "payload is not a JSON object".to_string(),
        ));
    }

    let data = &payload[chart]["data"];
    let datasets = data["datasets"].as_array().map(Vec::as_slice).unwrap_or(&[]);

    let values = datasets
        .iter()
        .find(|d| d["label"].as_str() == Some(target))
        .and_then(|d| d["data"].as_array())
        .ok_or_else(|| SeriesError::DatasetNotFound {
            target: target.to_string(),
            available: datasets
                .iter()
                .filter_map(|d| d["label"].as_str().map(str::to_string))
                .collect(),
        })?;

    let labels = data["labels"].as_array().ok_or_else(|| {
        SeriesError::MalformedPayload(format!("{chart}.data.labels is missing"))
    })?;

    if values.len() > labels.len() {
        warn!(
            "dataset '{}' has {} values for {} labels, ignoring the extra ones",
            target,
            values.len(),
            labels.len()
        );
    }

    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let label = label.as_str().ok_or_else(|| {
                SeriesError::MalformedPayload(format!("label #{i} is not a string: {label}"))
            })?;
            Ok(RawSample {
                label: label.to_string(),
                value: values.get(i).and_then(to_number),
            })
        })
        .collect::<Result<Vec<_>, SeriesError>>()
}

/// `null` is an absent sample. Numbers pass through, numeric strings are
/// parsed, any other present value counts as zero.
fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Some(
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
        ),
        _ => Some(0.0),
    }
}
