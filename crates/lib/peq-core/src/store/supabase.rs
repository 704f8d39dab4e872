use std::{error::Error, fmt, time::Duration};

use chrono::NaiveDate;
use peq_store::models::{PePercentilePoint, PeSnapshotRow, StockCode};
use peq_store::schema::{
    COL_PE_PERCENTILE_3Y,
    COL_STOCK_CODE,
    COL_TRADE_DATE,
    HISTORY_SELECT,
    TABLE_PE_HISTORY,
    TABLE_STOCKS,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode, Url};

#[derive(Debug)]
pub enum StoreError {
    Http(reqwest::Error),
    Status { status: StatusCode, body: String },
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "Supabase request failed: {err}"),
            Self::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "Supabase returned {status}")
                } else {
                    write!(f, "Supabase returned {status}: {body}")
                }
            }
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only `PostgREST` client for the hosted Supabase backend.
///
/// Every request carries the project API key both as the `apikey` header and
/// as a bearer token, which is what `PostgREST` expects from anonymous
/// clients.
#[derive(Clone)]
pub struct SupabaseStore {
    http: Client,
    rest_url: Url,
}

impl SupabaseStore {
    /// Builds a client for the Supabase project at `base_url`.
    ///
    /// # Errors
    /// Returns `StoreError` if the URL or API key is malformed or the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let rest_url = build_rest_url(base_url)?;
        let mut headers = HeaderMap::new();
        headers.insert("apikey", auth_header_value(api_key)?);
        headers.insert(AUTHORIZATION, auth_header_value(&format!("Bearer {api_key}"))?);
        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, rest_url })
    }

    #[must_use]
    pub const fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    /// Fetches the dated percentile series for a stock from `since` onwards,
    /// oldest record first.
    ///
    /// # Errors
    /// Returns `StoreError` if the request fails, the backend answers with a
    /// non-success status, or the payload does not decode.
    pub async fn pe_history(
        &self,
        code: &StockCode,
        since: NaiveDate,
    ) -> StoreResult<Vec<PePercentilePoint>> {
        let code_filter = format!("eq.{code}");
        let date_filter = format!("gte.{since}");
        let response = self
            .http
            .get(self.table_url(TABLE_PE_HISTORY)?)
            .query(&[
                ("select", HISTORY_SELECT),
                (COL_STOCK_CODE, code_filter.as_str()),
                (COL_TRADE_DATE, date_filter.as_str()),
                ("order", "trade_date.asc"),
            ])
            .send()
            .await?;
        let response = require_success(response).await?;
        let points: Vec<PePercentilePoint> = response.json().await?;
        Ok(points)
    }

    /// Fetches the current percentile row for a stock, or `None` when the
    /// stock is not in the backend at all.
    ///
    /// # Errors
    /// Returns `StoreError` if the request fails, the backend answers with a
    /// non-success status, or the payload does not decode.
    pub async fn latest_percentile(&self, code: &StockCode) -> StoreResult<Option<PeSnapshotRow>> {
        let code_filter = format!("eq.{code}");
        let response = self
            .http
            .get(self.table_url(TABLE_STOCKS)?)
            .query(&[
                ("select", COL_PE_PERCENTILE_3Y),
                (COL_STOCK_CODE, code_filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let response = require_success(response).await?;
        let mut rows: Vec<PeSnapshotRow> = response.json().await?;
        Ok(rows.pop())
    }

    fn table_url(&self, table: &str) -> StoreResult<Url> {
        self.rest_url
            .join(table)
            .map_err(|err| StoreError::InvalidInput(format!("invalid table name {table}: {err}")))
    }
}

async fn require_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

fn build_rest_url(base_url: &str) -> StoreResult<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput(
            "Supabase project URL is required".to_string(),
        ));
    }
    Url::parse(&format!("{trimmed}/rest/v1/"))
        .map_err(|err| StoreError::InvalidInput(format!("invalid Supabase URL: {err}")))
}

fn auth_header_value(value: &str) -> StoreResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        StoreError::InvalidInput("API key is not a valid header value".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_url_gets_the_postgrest_path() {
        let url = build_rest_url("https://demo.supabase.co").expect("url should build");
        assert_eq!(url.as_str(), "https://demo.supabase.co/rest/v1/");
    }

    #[test]
    fn rest_url_tolerates_trailing_slashes() {
        let url = build_rest_url("https://demo.supabase.co//").expect("url should build");
        assert_eq!(url.as_str(), "https://demo.supabase.co/rest/v1/");
    }

    #[test]
    fn rest_url_rejects_empty_input() {
        assert!(build_rest_url("  ").is_err());
    }

    #[test]
    fn rest_url_rejects_relative_input() {
        assert!(build_rest_url("demo.supabase.co").is_err());
    }

    #[test]
    fn api_key_must_be_header_safe() {
        assert!(auth_header_value("sb-anon-key").is_ok());
        assert!(auth_header_value("bad\nkey").is_err());
    }
}
