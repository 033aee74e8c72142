//! Bar source port trait.
//!
//! The core never retrieves market data itself; it only consumes finite,
//! date-sorted series handed over through this interface.

use crate::domain::bar::Bar;
use crate::domain::error::BarsimError;
use chrono::NaiveDate;

pub trait BarSource {
    /// Bars for one instrument within the inclusive date range, sorted
    /// ascending by date.
    fn fetch_bars(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BarsimError>;

    fn list_instruments(&self) -> Result<Vec<String>, BarsimError>;

    /// (first date, last date, bar count) for an instrument, if any data
    /// exists.
    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BarsimError>;
}
