//! CSV file bar source.
//!
//! Each instrument lives in `<INSTRUMENT>.csv` under a base directory with a
//! `date,open,high,low,close,volume` header row.

use crate::domain::bar::Bar;
use crate::domain::error::BarsimError;
use crate::ports::data_port::BarSource;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvBarSource {
    base_path: PathBuf,
}

impl CsvBarSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{instrument}.csv"))
    }

    fn read_all(&self, instrument: &str) -> Result<Vec<Bar>, BarsimError> {
        let path = self.csv_path(instrument);
        let content = fs::read_to_string(&path).map_err(|e| BarsimError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BarsimError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str: String = parse_field(&record, 0, "date")?;
            let date =
                NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| BarsimError::Data {
                    reason: format!("invalid date format: {e}"),
                })?;

            bars.push(Bar {
                instrument: instrument.to_string(),
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_field<T: FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, BarsimError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| BarsimError::Data {
        reason: format!("missing {name} column"),
    })?;
    raw.parse().map_err(|e| BarsimError::Data {
        reason: format!("invalid {name} value: {e}"),
    })
}

impl BarSource for CsvBarSource {
    fn fetch_bars(
        &self,
        instrument: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BarsimError> {
        let bars = self.read_all(instrument)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_instruments(&self) -> Result<Vec<String>, BarsimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| BarsimError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut instruments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BarsimError::Data {
                reason: format!("directory entry error: {e}"),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                instruments.push(stem.to_string());
            }
        }

        instruments.sort();
        Ok(instruments)
    }

    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BarsimError> {
        let bars = self.read_all(instrument)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("AAA.csv"), csv_content).unwrap();
        fs::write(path.join("BBB.csv"), "date,open,high,low,close,volume\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_returns_parsed_rows() {
        let (_dir, path) = setup_test_data();
        let source = CsvBarSource::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let bars = source.fetch_bars("AAA", start, end).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].instrument, "AAA");
        assert_eq!(bars[0].date, start);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50_000);
    }

    #[test]
    fn fetch_bars_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let source = CsvBarSource::new(path);

        let day = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let bars = source.fetch_bars("AAA", day, day).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, day);
    }

    #[test]
    fn fetch_bars_missing_file_errors() {
        let (_dir, path) = setup_test_data();
        let source = CsvBarSource::new(path);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let result = source.fetch_bars("ZZZ", start, end);

        assert!(matches!(result, Err(BarsimError::Data { .. })));
    }

    #[test]
    fn fetch_bars_bad_row_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("AAA.csv"),
            "date,open,high,low,close,volume\n2024-01-15,abc,1,1,1,1\n",
        )
        .unwrap();

        let source = CsvBarSource::new(path);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let err = source.fetch_bars("AAA", start, end).unwrap_err();
        assert!(err.to_string().contains("invalid open value"));
    }

    #[test]
    fn list_instruments_finds_csv_stems() {
        let (_dir, path) = setup_test_data();
        let source = CsvBarSource::new(path);
        assert_eq!(source.list_instruments().unwrap(), vec!["AAA", "BBB"]);
    }

    #[test]
    fn data_range_reports_span() {
        let (_dir, path) = setup_test_data();
        let source = CsvBarSource::new(path);

        let range = source.data_range("AAA").unwrap().unwrap();
        assert_eq!(range.0, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(range.1, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(range.2, 3);

        assert!(source.data_range("BBB").unwrap().is_none());
    }
}
