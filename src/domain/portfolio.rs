//! Portfolio state machine: positions, holdings, and append-only history.
//!
//! The portfolio exclusively owns its positions, cash, and history; no other
//! component writes them. Signals become orders through a pluggable sizing
//! policy, fills mutate positions and cash, and each Market event appends
//! one position snapshot and one holdings snapshot. Snapshots are taken when
//! the Market event is dispatched, before any same-tick fills resolve, so a
//! tick's valuation reflects the portfolio as of the start of that bar.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::error::BarsimError;
use super::event::{
    Direction, FillEvent, MarketEvent, OrderEvent, OrderType, SignalDirection, SignalEvent,
};
use super::feed::DataFeed;

/// Position quantities per instrument at one point in time.
/// Positive is long, negative is short.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub date: NaiveDate,
    pub quantities: HashMap<String, i64>,
}

/// Cash, per-instrument mark-to-market values, cumulative commissions, and
/// total equity at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsSnapshot {
    pub date: NaiveDate,
    pub cash: f64,
    pub market_values: HashMap<String, f64>,
    pub commissions: f64,
    pub total_equity: f64,
}

/// Position sizing policy: one signal in, at most one order quantity out.
pub trait SizingPolicy: std::fmt::Debug {
    fn order_quantity(&self, signal: &SignalEvent, current_position: i64) -> i64;
}

/// Fixed share count per entry; exits flatten whatever is held.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedQuantity(pub i64);

impl SizingPolicy for FixedQuantity {
    fn order_quantity(&self, signal: &SignalEvent, current_position: i64) -> i64 {
        match signal.direction {
            SignalDirection::Long | SignalDirection::Short => self.0,
            SignalDirection::Exit => current_position.abs(),
        }
    }
}

#[derive(Debug)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_cash: f64,
    pub commissions_paid: f64,
    positions: HashMap<String, i64>,
    /// Last known price per instrument, updated by fills and Market events.
    marks: HashMap<String, f64>,
    position_history: Vec<PositionSnapshot>,
    holdings_history: Vec<HoldingsSnapshot>,
    sizing: Box<dyn SizingPolicy>,
}

impl Portfolio {
    /// Positions start flat for every tracked instrument; fills for
    /// instruments outside this set are configuration errors.
    pub fn new(initial_cash: f64, instruments: &[String], sizing: Box<dyn SizingPolicy>) -> Self {
        let positions = instruments.iter().map(|i| (i.clone(), 0)).collect();
        Portfolio {
            cash: initial_cash,
            initial_cash,
            commissions_paid: 0.0,
            positions,
            marks: HashMap::new(),
            position_history: Vec::new(),
            holdings_history: Vec::new(),
            sizing,
        }
    }

    pub fn position(&self, instrument: &str) -> i64 {
        self.positions.get(instrument).copied().unwrap_or(0)
    }

    /// Convert a signal into at most one market order.
    ///
    /// Returns `None` for instruments this portfolio does not track, for
    /// exits with nothing to flatten, and for degenerate (non-positive)
    /// sized quantities; the run continues in every such case.
    pub fn on_signal(&self, signal: &SignalEvent) -> Option<OrderEvent> {
        let current = *self.positions.get(&signal.instrument)?;
        let quantity = self.sizing.order_quantity(signal, current);
        if quantity <= 0 {
            return None;
        }
        let direction = match signal.direction {
            SignalDirection::Long => Direction::Long,
            SignalDirection::Short => Direction::Short,
            SignalDirection::Exit => {
                if current > 0 {
                    Direction::Short
                } else {
                    Direction::Long
                }
            }
        };
        Some(OrderEvent {
            instrument: signal.instrument.clone(),
            order_type: OrderType::Market,
            quantity,
            direction,
            date: signal.date,
        })
    }

    /// Apply a fill: position, then cash and commissions, then the traded
    /// instrument's mark. A fill for an untracked instrument means the
    /// order did not originate from this portfolio and is fatal.
    pub fn on_fill(&mut self, fill: &FillEvent) -> Result<(), BarsimError> {
        let signed = fill.signed_quantity();
        let position =
            self.positions
                .get_mut(&fill.order.instrument)
                .ok_or_else(|| BarsimError::UnknownInstrument {
                    instrument: fill.order.instrument.clone(),
                })?;
        *position += signed;

        self.cash -= signed as f64 * fill.fill_price + fill.commission;
        self.commissions_paid += fill.commission;
        self.marks
            .insert(fill.order.instrument.clone(), fill.fill_price);
        Ok(())
    }

    /// Refresh marks from the latest revealed closes and append one
    /// position snapshot plus one holdings snapshot tagged with the event
    /// date. History is append-only and never rewritten.
    pub fn on_market(&mut self, event: &MarketEvent, feed: &DataFeed) -> Result<(), BarsimError> {
        for instrument in feed.instruments() {
            if let Some(bar) = feed.latest_bars(instrument, 1)?.last() {
                self.marks.insert(instrument.clone(), bar.close);
            }
        }

        let market_values: HashMap<String, f64> = self
            .positions
            .iter()
            .map(|(instrument, &quantity)| {
                let mark = self.marks.get(instrument).copied().unwrap_or(0.0);
                (instrument.clone(), quantity as f64 * mark)
            })
            .collect();
        let total_equity = self.cash + market_values.values().sum::<f64>();

        self.position_history.push(PositionSnapshot {
            date: event.date,
            quantities: self.positions.clone(),
        });
        self.holdings_history.push(HoldingsSnapshot {
            date: event.date,
            cash: self.cash,
            market_values,
            commissions: self.commissions_paid,
            total_equity,
        });
        Ok(())
    }

    /// Current cash plus mark-to-market of all positions.
    pub fn total_equity(&self) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(instrument, &quantity)| {
                quantity as f64 * self.marks.get(instrument).copied().unwrap_or(0.0)
            })
            .sum();
        self.cash + position_value
    }

    pub fn position_history(&self) -> &[PositionSnapshot] {
        &self.position_history
    }

    pub fn holdings_history(&self) -> &[HoldingsSnapshot] {
        &self.holdings_history
    }
}
