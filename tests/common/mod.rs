#![allow(dead_code)]

use barsim::domain::backtest::BacktestConfig;
pub use barsim::domain::bar::Bar;
use barsim::domain::error::BarsimError;
use barsim::ports::data_port::BarSource;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockBarSource {
    pub data: HashMap<String, Vec<Bar>>,
}

impl MockBarSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, instrument: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(instrument.to_string(), bars);
        self
    }
}

impl BarSource for MockBarSource {
    fn fetch_bars(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BarsimError> {
        Ok(self
            .data
            .get(instrument)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_instruments(&self) -> Result<Vec<String>, BarsimError> {
        let mut instruments: Vec<String> = self.data.keys().cloned().collect();
        instruments.sort();
        Ok(instruments)
    }

    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BarsimError> {
        match self.data.get(instrument) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().ok_or(BarsimError::Data {
                    reason: "empty series".into(),
                })?;
                let max = bars.iter().map(|b| b.date).max().ok_or(BarsimError::Data {
                    reason: "empty series".into(),
                })?;
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_bar(instrument: &str, date_str: &str, close: f64) -> Bar {
    Bar {
        instrument: instrument.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1_000,
    }
}

/// Daily bars starting at `start`, drifting up by one per day.
pub fn generate_bars(instrument: &str, start: NaiveDate, count: usize, base_close: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| Bar {
            instrument: instrument.to_string(),
            date: start + chrono::Days::new(i as u64),
            open: base_close + i as f64 - 0.5,
            high: base_close + i as f64 + 1.0,
            low: base_close + i as f64 - 1.0,
            close: base_close + i as f64,
            volume: 10_000,
        })
        .collect()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        initial_cash: 1_000_000.0,
        order_quantity: 10,
        commission_rate: 0.005,
        commission_minimum: 1.0,
        commission_max_pct: 0.01,
    }
}
