use std::error::Error;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical stock identifier as stored in the backend.
///
/// Two input spellings are accepted and normalized to the same key:
///
/// * Tushare style, six digits plus an exchange suffix: `600519.SH`
/// * Exchange-prefixed style: `sh600519`
///
/// The canonical form is the lowercase exchange prefix followed by the six
/// digit code. Only the Shanghai (`sh`) and Shenzhen (`sz`) exchanges are
/// recognized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StockCode(String);

impl StockCode {
    /// Parses and normalizes a stock code from user input.
    ///
    /// Surrounding whitespace is ignored. Matching is case-insensitive in
    /// the exchange part. A bare six digit code is rejected because the
    /// exchange cannot be inferred from it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStockCode`] when the input matches neither accepted
    /// spelling.
    pub fn parse(input: &str) -> Result<Self, InvalidStockCode> {
        let trimmed = input.trim();
        if let Some((digits, market)) = trimmed.split_once('.') {
            if is_six_digits(digits)
                && let Some(prefix) = market_prefix(market)
            {
                return Ok(Self(format!("{prefix}{digits}")));
            }
        } else if trimmed.len() == 8 && trimmed.is_ascii() {
            let (market, digits) = trimmed.split_at(2);
            if is_six_digits(digits)
                && let Some(prefix) = market_prefix(market)
            {
                return Ok(Self(format!("{prefix}{digits}")));
            }
        }
        Err(InvalidStockCode::new(input))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StockCode {
    type Err = InvalidStockCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Rejection raised for stock codes that match neither accepted spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStockCode {
    input: String,
}

impl InvalidStockCode {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The offending input, exactly as supplied.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for InvalidStockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized stock code '{}': use the '000603.SZ' or 'sz000603' format",
            self.input
        )
    }
}

impl Error for InvalidStockCode {}

/// One dated observation of a stock's PE and its trailing three-year
/// percentile rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PePercentilePoint {
    pub trade_date: NaiveDate,
    pub pe: f64,
    pub pe_percentile_3y: f64,
}

/// Current-valuation row read from the `stocks` table.
///
/// The percentile column is nullable in the backend; a listed stock whose
/// percentile has not been computed yet comes back as `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeSnapshotRow {
    pub pe_percentile_3y: Option<f64>,
}

fn is_six_digits(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn market_prefix(market: &str) -> Option<&'static str> {
    if market.eq_ignore_ascii_case("sh") {
        Some("sh")
    } else if market.eq_ignore_ascii_case("sz") {
        Some("sz")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_tushare_spelling() {
        let code = StockCode::parse("600519.SH").expect("tushare spelling should parse");
        assert_eq!(code.as_str(), "sh600519");
    }

    #[test]
    fn parse_accepts_exchange_prefixed_spelling() {
        let code = StockCode::parse("sz000603").expect("prefixed spelling should parse");
        assert_eq!(code.as_str(), "sz000603");
    }

    #[test]
    fn parse_ignores_case_in_the_exchange_part() {
        for input in ["600519.sh", "600519.Sh", "SH600519", "Sz000603"] {
            let code = StockCode::parse(input).expect("exchange case should not matter");
            assert!(code.as_str().starts_with("sh") || code.as_str().starts_with("sz"));
        }
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let code = StockCode::parse("  600519.SH \n").expect("padded input should parse");
        assert_eq!(code.as_str(), "sh600519");
    }

    #[test]
    fn both_spellings_normalize_to_the_same_key() {
        let tushare = StockCode::parse("000603.SZ").expect("tushare spelling should parse");
        let prefixed = StockCode::parse("sz000603").expect("prefixed spelling should parse");
        assert_eq!(tushare, prefixed);
    }

    #[test]
    fn parse_rejects_bare_digits() {
        assert!(StockCode::parse("600519").is_err());
    }

    #[test]
    fn parse_rejects_unknown_exchanges() {
        assert!(StockCode::parse("430047.BJ").is_err());
        assert!(StockCode::parse("bj430047").is_err());
    }

    #[test]
    fn parse_rejects_wrong_digit_counts() {
        for input in ["60051.SH", "6005190.SH", "sh60051", "sh6005190"] {
            assert!(StockCode::parse(input).is_err(), "accepted {input}");
        }
    }

    #[test]
    fn parse_rejects_non_digit_payloads() {
        assert!(StockCode::parse("60051a.SH").is_err());
        assert!(StockCode::parse("shabcdef").is_err());
    }

    #[test]
    fn parse_rejects_multibyte_lookalikes() {
        assert!(StockCode::parse("６００５１９.SH").is_err());
        assert!(StockCode::parse("sh６００５１９").is_err());
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(StockCode::parse("").is_err());
        assert!(StockCode::parse("   ").is_err());
    }

    #[test]
    fn rejection_echoes_the_offending_input() {
        let err = StockCode::parse(" bogus ").expect_err("input should be rejected");
        assert_eq!(err.input(), " bogus ");
        let message = err.to_string();
        assert!(message.contains("000603.SZ"));
        assert!(message.contains("sz000603"));
    }

    #[test]
    fn display_matches_the_canonical_form() {
        let code: StockCode = "301011.SZ".parse().expect("tushare spelling should parse");
        assert_eq!(code.to_string(), "sz301011");
    }
}
