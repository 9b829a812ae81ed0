//! Blocking client for the Google Sheets v4 values API.

use crate::error::{RemoteError, RemoteResult};
use crate::token::TokenSource;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;
use simplesheet_sheet::a1_notation::to_a1_notation;
use std::time::Duration;
use tracing::debug;

/// Production endpoint of the Sheets API.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Options for building a [`SheetsClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientOptions {
    /// Point the client at a different endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Build the blocking HTTP client shared by the token source and the API client.
pub fn build_http_client(timeout_secs: u64) -> RemoteResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        // Disable system proxy lookup to avoid macOS system-configuration issues
        .no_proxy()
        .build()?;
    Ok(client)
}

/// `ValueRange` resource of the Sheets API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Quote a worksheet title for use in A1 ranges: `'My Sheet'`.
#[must_use]
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// A1 range covering a whole worksheet.
#[must_use]
pub fn sheet_range(worksheet: &str) -> String {
    quote_sheet_name(worksheet)
}

/// A1 range for a single 1-based cell of a worksheet.
#[must_use]
pub fn cell_range(worksheet: &str, row: usize, col: usize) -> String {
    format!("{}!{}", quote_sheet_name(worksheet), to_a1_notation(row, col))
}

/// Client for the `spreadsheets.values` endpoints.
pub struct SheetsClient {
    http: Client,
    base_url: Url,
    tokens: Box<dyn TokenSource>,
}

impl SheetsClient {
    /// Create a client with an existing HTTP client and token source
    pub fn new(http: Client, tokens: Box<dyn TokenSource>, base_url: &str) -> RemoteResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::credentials(format!("invalid API base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::credentials(format!(
                "invalid API base url {base_url}"
            )));
        }
        Ok(SheetsClient {
            http,
            base_url,
            tokens,
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str, action: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        let last = match action {
            Some(action) => format!("{range}:{action}"),
            None => range.to_string(),
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", spreadsheet_id, "values"])
                .push(&last);
        }
        url
    }

    fn send(&mut self, request: RequestBuilder) -> RemoteResult<Response> {
        let token = self.tokens.access_token()?;
        let response = request.bearer_auth(token).send()?;
        check_status(response)
    }

    /// Read every value in `range`. Trailing empty rows and cells are omitted
    /// by the service, so rows may be ragged.
    pub fn get_values(
        &mut self,
        spreadsheet_id: &str,
        range: &str,
    ) -> RemoteResult<Vec<Vec<String>>> {
        let url = self.values_url(spreadsheet_id, range, None);
        debug!(%url, "reading values");
        let request = self.http.get(url).query(&[
            ("majorDimension", "ROWS"),
            ("valueRenderOption", "FORMATTED_VALUE"),
        ]);
        let body: ValueRange = self.send(request)?.json()?;
        Ok(body.values)
    }

    /// Write a single value into a one-cell range.
    pub fn update_cell(
        &mut self,
        spreadsheet_id: &str,
        range: &str,
        value: &str,
    ) -> RemoteResult<()> {
        let url = self.values_url(spreadsheet_id, range, None);
        debug!(%url, "updating cell");
        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values: vec![vec![value.to_string()]],
        };
        let request = self
            .http
            .put(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body);
        self.send(request)?;
        Ok(())
    }

    /// Append one row after the last row of the table in `range`.
    pub fn append_row(
        &mut self,
        spreadsheet_id: &str,
        range: &str,
        values: &[String],
    ) -> RemoteResult<()> {
        let url = self.values_url(spreadsheet_id, range, Some("append"));
        debug!(%url, cells = values.len(), "appending row");
        let body = ValueRange {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: vec![values.to_vec()],
        };
        let request = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        self.send(request)?;
        Ok(())
    }

    /// Clear every value in `range`.
    pub fn clear(&mut self, spreadsheet_id: &str, range: &str) -> RemoteResult<()> {
        let url = self.values_url(spreadsheet_id, range, Some("clear"));
        debug!(%url, "clearing range");
        let request = self.http.post(url).json(&json!({}));
        self.send(request)?;
        Ok(())
    }
}

fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&text) {
        Ok(envelope) if envelope.error.status.is_empty() => envelope.error.message,
        Ok(envelope) => format!("{} ({})", envelope.error.message, envelope.error.status),
        Err(_) => status
            .canonical_reason()
            .map_or_else(|| text.trim().to_string(), str::to_string),
    };

    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}
