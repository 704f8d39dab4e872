use std::{error::Error, fmt};

use chrono::{NaiveDate, Utc};
use peq_store::models::{InvalidStockCode, PePercentilePoint, StockCode};
use peq_store::schema::history_window_start;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::{StoreError, SupabaseStore};

#[derive(Debug)]
pub enum QueryError {
    InvalidIdentifier(InvalidStockCode),
    BackendUnavailable(StoreError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier(err) => write!(f, "{err}"),
            Self::BackendUnavailable(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QueryError {}

impl From<InvalidStockCode> for QueryError {
    fn from(err: InvalidStockCode) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        Self::BackendUnavailable(err)
    }
}

/// Current trailing three-year PE percentile for one stock.
///
/// `pe_percentile_3y` is `None` for stocks the backend lists without a
/// computed percentile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeSnapshot {
    pub stock_code: String,
    pub pe_percentile_3y: Option<f64>,
}

/// Dated percentile series for one stock over the trailing three-year
/// window, oldest point first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeHistory {
    pub stock_code: String,
    pub window_start: NaiveDate,
    pub points: Vec<PePercentilePoint>,
}

/// Query plane joining stock code normalization with windowed store reads.
#[derive(Clone)]
pub struct PeQueryPlane {
    store: SupabaseStore,
}

impl PeQueryPlane {
    #[must_use]
    pub const fn new(store: SupabaseStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &SupabaseStore {
        &self.store
    }

    /// Looks up the current trailing three-year PE percentile for `code`.
    ///
    /// Returns `Ok(None)` when the normalized code is not in the backend.
    ///
    /// # Errors
    /// Returns `QueryError::InvalidIdentifier` when `code` matches neither
    /// accepted spelling (no backend request is made), or
    /// `QueryError::BackendUnavailable` when the store request fails.
    pub async fn pe_snapshot(&self, code: &str) -> Result<Option<PeSnapshot>, QueryError> {
        let code = StockCode::parse(code)?;
        info!("pe percentile query for {code}");
        let row = self.store.latest_percentile(&code).await?;
        Ok(row.map(|row| PeSnapshot {
            stock_code: code.into_string(),
            pe_percentile_3y: row.pe_percentile_3y,
        }))
    }

    /// Fetches the dated percentile series for `code` over the trailing
    /// three-year window ending today.
    ///
    /// A valid code with no stored records yields an empty `points` vec.
    ///
    /// # Errors
    /// Returns `QueryError::InvalidIdentifier` when `code` matches neither
    /// accepted spelling (no backend request is made), or
    /// `QueryError::BackendUnavailable` when the store request fails.
    pub async fn pe_history(&self, code: &str) -> Result<PeHistory, QueryError> {
        let code = StockCode::parse(code)?;
        let window_start = history_window_start(Utc::now().date_naive());
        info!("pe history query for {code} since {window_start}");
        let points = self.store.pe_history(&code, window_start).await?;
        Ok(PeHistory {
            stock_code: code.into_string(),
            window_start,
            points,
        })
    }
}
