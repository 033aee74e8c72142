//! OHLCV bar representation.

use chrono::NaiveDate;

/// One instrument's open/high/low/close/volume for one time step.
/// Produced once by the data source and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub instrument: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// Synthetic bar carrying `prev`'s close forward onto `date`.
    ///
    /// Used by the feed to fill calendar gaps so all instruments advance in
    /// lockstep; volume is zero since nothing actually traded.
    pub fn carried(prev: &Bar, date: NaiveDate) -> Bar {
        Bar {
            instrument: prev.instrument.clone(),
            date,
            open: prev.close,
            high: prev.close,
            low: prev.close,
            close: prev.close,
            volume: 0,
        }
    }
}
