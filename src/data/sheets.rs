//! Google Sheets API client for form responses
//!
//! Reads the raw values of the form-responses sheet through the Sheets v4
//! values endpoint, authenticating with an API key passed as a query parameter.

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::RawRow;
use crate::config::SheetsConfig;

/// Errors that can occur when fetching testimonials
#[derive(Debug, Error)]
pub enum FetchError {
    /// Sheet id or API key is not configured
    #[error("Google Sheets configuration missing: set GOOGLE_SHEETS_ID and GOOGLE_SHEETS_API_KEY")]
    ConfigurationMissing,

    /// HTTP request failed or returned an error status
    #[error("Google Sheets request failed: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Malformed Google Sheets response: {0}")]
    MalformedResponse(String),
}

/// Response from the Sheets values endpoint
#[derive(Debug, Deserialize)]
struct ValuesResponse {
    /// Row-major cell values; absent when the range holds no data
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

/// Renders a JSON cell as text; nulls and nested values count as blank
fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Client for the Google Sheets values API
#[derive(Debug, Clone)]
pub struct SheetsClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API root, e.g. `https://sheets.googleapis.com`
    base_url: Url,
    /// Spreadsheet identifier
    sheet_id: String,
    /// API key sent as the `key` query parameter
    api_key: String,
    /// A1-notation range to read
    range: String,
}

impl SheetsClient {
    /// Creates a client from configuration.
    ///
    /// Returns `Ok(None)` when the sheet id or API key is missing, so callers
    /// can degrade gracefully instead of failing startup.
    pub fn from_config(config: &SheetsConfig) -> Result<Option<Self>, FetchError> {
        let Some((sheet_id, api_key)) = config.credentials() else {
            return Ok(None);
        };

        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Some(Self {
            http_client,
            base_url: config.base_url.clone(),
            sheet_id: sheet_id.to_string(),
            api_key: api_key.to_string(),
            range: config.range.clone(),
        }))
    }

    /// Builds the values URL: `{base}/v4/spreadsheets/{id}/values/{range}?key={key}`
    fn values_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "v4",
                "spreadsheets",
                self.sheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    /// Fetches every row in the configured range.
    ///
    /// # Returns
    /// * `Ok(rows)` - Rows in sheet order; empty when the range has no data
    /// * `Err(FetchError::UpstreamUnavailable)` - Transport failure or non-2xx status
    /// * `Err(FetchError::MalformedResponse)` - Body is not JSON or lacks `values`
    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>, FetchError> {
        let body = self
            .http_client
            .get(self.values_url())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: ValuesResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {e}")))?;

        let values = response.values.ok_or_else(|| {
            debug!(body = %body, "Sheets response without values");
            FetchError::MalformedResponse("response has no values field".to_string())
        })?;

        Ok(values
            .iter()
            .map(|cells| {
                let cells: Vec<String> = cells.iter().map(cell_text).collect();
                RawRow::from_cells(&cells)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn test_config(base_url: &str) -> SheetsConfig {
        SheetsConfig {
            base_url: base_url.parse().unwrap(),
            timeout: Duration::from_secs(5),
            ..SheetsConfig::new(Some("sheet-123".to_string()), Some("test-key".to_string()))
        }
    }

    #[test]
    fn test_from_config_without_credentials_returns_none() {
        let config = SheetsConfig::new(None, Some("key".to_string()));
        assert!(SheetsClient::from_config(&config).unwrap().is_none());

        let config = SheetsConfig::new(Some("id".to_string()), Some("  ".to_string()));
        assert!(SheetsClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = SheetsClient::from_config(&test_config("https://sheets.googleapis.com"))
            .unwrap()
            .unwrap();

        assert_eq!(
            client.values_url().as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Form%20Responses%201!A2:K?key=test-key"
        );
    }

    #[test]
    fn test_values_url_keeps_base_path_prefix() {
        let client = SheetsClient::from_config(&test_config("http://proxy.local/sheets/"))
            .unwrap()
            .unwrap();

        assert!(client
            .values_url()
            .as_str()
            .starts_with("http://proxy.local/sheets/v4/spreadsheets/sheet-123/values/"));
    }

    #[test]
    fn test_cell_text_renders_scalars() {
        assert_eq!(cell_text(&json!("text")), "text");
        assert_eq!(cell_text(&json!(5)), "5");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!(["nested"])), "");
    }

    #[test]
    fn test_values_response_without_values_field() {
        let response: ValuesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.values.is_none());

        let response: ValuesResponse =
            serde_json::from_str(r#"{"range":"A2:K","majorDimension":"ROWS","values":[]}"#)
                .unwrap();
        assert_eq!(response.values.map(|v| v.len()), Some(0));
    }
}
