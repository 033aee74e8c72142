//! CSV history report adapter.
//!
//! Dumps the holdings history (the equity curve) to a CSV file so external
//! tooling can compute returns, drawdown, or whatever else it wants.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BarsimError;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), BarsimError> {
        let mut writer = csv::Writer::from_path(output_path).map_err(|e| BarsimError::Data {
            reason: format!("failed to open {}: {}", output_path.display(), e),
        })?;

        writer
            .write_record(["date", "cash", "commissions", "total_equity"])
            .map_err(|e| BarsimError::Data {
                reason: format!("CSV write error: {e}"),
            })?;

        for holdings in result.portfolio.holdings_history() {
            writer
                .write_record([
                    holdings.date.format("%Y-%m-%d").to_string(),
                    format!("{:.2}", holdings.cash),
                    format!("{:.2}", holdings.commissions),
                    format!("{:.2}", holdings.total_equity),
                ])
                .map_err(|e| BarsimError::Data {
                    reason: format!("CSV write error: {e}"),
                })?;
        }

        writer.flush()?;
        Ok(())
    }
}
