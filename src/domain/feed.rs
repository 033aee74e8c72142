//! Bar feed with look-ahead prevention.
//!
//! The feed exclusively owns the raw per-instrument series and reveals one
//! bar per instrument per [`DataFeed::advance`]. Consumers only ever see the
//! revealed window through [`DataFeed::latest_bars`], so a strategy cannot
//! read a bar the simulated clock has not reached yet.
//!
//! Construction aligns every series onto a shared timeline (the sorted union
//! of all dates). Calendar gaps after an instrument's first bar are
//! forward-filled with synthetic bars carrying the previous close; a series
//! that starts after the timeline itself cannot be filled and is rejected as
//! a configuration error.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use super::bar::Bar;
use super::error::BarsimError;

#[derive(Debug)]
pub struct DataFeed {
    /// Sorted for deterministic iteration order across runs.
    instruments: Vec<String>,
    /// Timeline-aligned series, one bar per timeline date per instrument.
    series: HashMap<String, Vec<Bar>>,
    timeline: Vec<NaiveDate>,
    /// Bars already made visible to consumers, oldest first.
    revealed: HashMap<String, Vec<Bar>>,
    cursor: usize,
    exhausted: bool,
}

impl DataFeed {
    /// Build a feed from per-instrument series, each already sorted
    /// ascending by date.
    pub fn new(raw: HashMap<String, Vec<Bar>>) -> Result<Self, BarsimError> {
        for (instrument, bars) in &raw {
            if bars.is_empty() {
                return Err(BarsimError::EmptySeries {
                    instrument: instrument.clone(),
                });
            }
        }

        let timeline: Vec<NaiveDate> = raw
            .values()
            .flat_map(|bars| bars.iter().map(|b| b.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut instruments: Vec<String> = raw.keys().cloned().collect();
        instruments.sort();

        let mut series = HashMap::with_capacity(raw.len());
        for (instrument, bars) in raw {
            let aligned = align_series(&instrument, bars, &timeline)?;
            series.insert(instrument, aligned);
        }

        let revealed = instruments
            .iter()
            .map(|i| (i.clone(), Vec::new()))
            .collect();

        Ok(DataFeed {
            instruments,
            series,
            timeline,
            revealed,
            cursor: 0,
            exhausted: false,
        })
    }

    /// Reveal the next bar for every instrument. Returns false once the
    /// timeline is used up; exhaustion is terminal and no instrument
    /// produces further bars afterwards.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if self.cursor >= self.timeline.len() {
            self.exhausted = true;
            return false;
        }
        for (instrument, window) in self.revealed.iter_mut() {
            if let Some(bar) = self.series.get(instrument).and_then(|s| s.get(self.cursor)) {
                window.push(bar.clone());
            }
        }
        self.cursor += 1;
        true
    }

    /// Last `n` revealed bars for `instrument`, oldest first. Returns fewer
    /// than `n` (down to zero) while the revealed window is still short;
    /// callers must handle the short case.
    pub fn latest_bars(&self, instrument: &str, n: usize) -> Result<&[Bar], BarsimError> {
        let window =
            self.revealed
                .get(instrument)
                .ok_or_else(|| BarsimError::UnknownInstrument {
                    instrument: instrument.to_string(),
                })?;
        let start = window.len().saturating_sub(n);
        Ok(&window[start..])
    }

    /// Close of the most recently revealed bar for `instrument`.
    pub fn latest_close(&self, instrument: &str) -> Result<f64, BarsimError> {
        self.latest_bars(instrument, 1)?
            .last()
            .map(|bar| bar.close)
            .ok_or_else(|| BarsimError::Data {
                reason: format!("no bars revealed yet for {instrument}"),
            })
    }

    /// Date of the most recent `advance`, if any.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.cursor.checked_sub(1).map(|i| self.timeline[i])
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn timeline_len(&self) -> usize {
        self.timeline.len()
    }
}

/// Align one series to the shared timeline, forward-filling gaps.
fn align_series(
    instrument: &str,
    bars: Vec<Bar>,
    timeline: &[NaiveDate],
) -> Result<Vec<Bar>, BarsimError> {
    let first = bars[0].date;
    let mut pending = bars.into_iter().peekable();
    let mut prev: Option<Bar> = None;
    let mut aligned = Vec::with_capacity(timeline.len());

    for &date in timeline {
        if pending.peek().is_some_and(|b| b.date == date) {
            let bar = pending
                .next()
                .ok_or_else(|| BarsimError::Data {
                    reason: format!("series iterator for {instrument} ended unexpectedly"),
                })?;
            aligned.push(bar.clone());
            prev = Some(bar);
        } else {
            let last = prev.as_ref().ok_or(BarsimError::MisalignedSeries {
                instrument: instrument.to_string(),
                first,
                timeline_start: date,
            })?;
            aligned.push(Bar::carried(last, date));
        }
    }

    Ok(aligned)
}
