//! Configuration validation.
//!
//! A backtest setup that cannot produce meaningful results is rejected
//! before any data is loaded, never silently patched up.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::domain::error::BarsimError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    validate_initial_cash(config)?;
    validate_order_quantity(config)?;
    validate_commission(config)?;
    validate_dates(config)?;
    validate_instruments(config)?;
    validate_csv_dir(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    let value = config.get_double("backtest", "initial_cash", 0.0);
    if value <= 0.0 {
        return Err(BarsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_order_quantity(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    let value = config.get_int("backtest", "order_quantity", 0);
    if value <= 0 {
        return Err(BarsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "order_quantity".to_string(),
            reason: "order_quantity must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    for key in ["rate", "minimum", "max_pct"] {
        let value = config.get_double("commission", key, 0.0);
        if value < 0.0 {
            return Err(BarsimError::ConfigInvalid {
                section: "commission".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be non-negative"),
            });
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    let start = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?;
    let end = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")?;
    if start >= end {
        return Err(BarsimError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, BarsimError> {
    match value {
        None => Err(BarsimError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| BarsimError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {field} format, expected YYYY-MM-DD"),
            })
        }
    }
}

fn validate_instruments(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    match config.get_string("data", "instruments") {
        Some(s) if !s.trim().is_empty() => {
            parse_instruments(&s)?;
            Ok(())
        }
        _ => Err(BarsimError::ConfigMissing {
            section: "data".to_string(),
            key: "instruments".to_string(),
        }),
    }
}

fn validate_csv_dir(config: &dyn ConfigPort) -> Result<(), BarsimError> {
    match config.get_string("data", "csv_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BarsimError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        }),
    }
}

/// Parse a comma-separated instrument list: trimmed, uppercased, duplicates
/// and empty tokens rejected.
pub fn parse_instruments(input: &str) -> Result<Vec<String>, BarsimError> {
    let mut instruments = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(BarsimError::ConfigInvalid {
                section: "data".to_string(),
                key: "instruments".to_string(),
                reason: "empty token in instrument list".to_string(),
            });
        }
        let instrument = trimmed.to_uppercase();
        if !seen.insert(instrument.clone()) {
            return Err(BarsimError::ConfigInvalid {
                section: "data".to_string(),
                key: "instruments".to_string(),
                reason: format!("duplicate instrument: {instrument}"),
            });
        }
        instruments.push(instrument);
    }

    Ok(instruments)
}
