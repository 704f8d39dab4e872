use chrono::{Months, NaiveDate};

pub const TABLE_STOCKS: &str = "stocks";
pub const TABLE_PE_HISTORY: &str = "pe_percentile_history";

pub const COL_STOCK_CODE: &str = "stock_code";
pub const COL_TRADE_DATE: &str = "trade_date";
pub const COL_PE: &str = "pe";
pub const COL_PE_PERCENTILE_3Y: &str = "pe_percentile_3y";

pub const HISTORY_SELECT: &str = "trade_date,pe,pe_percentile_3y";

pub const HISTORY_WINDOW_MONTHS: u32 = 36;

/// First day of the trailing three-year window ending at `today`.
///
/// Day-of-month overflow clamps to the last day of the target month, and
/// dates that would fall before the calendar floor clamp to it.
#[must_use]
pub fn history_window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(HISTORY_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn window_start_is_three_years_back() {
        assert_eq!(history_window_start(date(2026, 8, 25)), date(2023, 8, 25));
    }

    #[test]
    fn window_start_clamps_to_month_end() {
        assert_eq!(history_window_start(date(2024, 2, 29)), date(2021, 2, 28));
    }

    #[test]
    fn window_start_never_underflows() {
        assert_eq!(history_window_start(NaiveDate::MIN), NaiveDate::MIN);
    }
}
