//! Report output port trait.
//!
//! Performance analysis (returns, drawdown, Sharpe) happens outside the
//! core; this port only hands the recorded history to whatever wants it.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BarsimError;
use std::path::Path;

pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), BarsimError>;
}
