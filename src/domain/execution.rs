//! Order execution simulation and commission schedules.
//!
//! The reference model fills every order in full at the instrument's latest
//! revealed close with zero latency and no slippage. Both the fill model and
//! the commission schedule are the simplest members of a pluggable seam, not
//! an attempt at realistic microstructure.

use super::error::BarsimError;
use super::event::{FillEvent, OrderEvent};
use super::feed::DataFeed;

/// Commission charged for one fill of `quantity` units at `fill_price`.
pub trait CommissionModel: std::fmt::Debug {
    fn commission(&self, quantity: i64, fill_price: f64) -> f64;
}

/// Interactive Brokers style fixed schedule: `rate` per unit with a floor of
/// `minimum`, capped at `max_pct` of notional.
#[derive(Debug, Clone, PartialEq)]
pub struct IbCommission {
    pub rate: f64,
    pub minimum: f64,
    pub max_pct: f64,
}

impl Default for IbCommission {
    fn default() -> Self {
        IbCommission {
            rate: 0.005,
            minimum: 1.0,
            max_pct: 0.01,
        }
    }
}

impl CommissionModel for IbCommission {
    fn commission(&self, quantity: i64, fill_price: f64) -> f64 {
        let per_unit = (self.rate * quantity as f64).max(self.minimum);
        per_unit.min(self.max_pct * quantity as f64 * fill_price)
    }
}

/// Free trading; useful for isolating strategy behavior in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroCommission;

impl CommissionModel for ZeroCommission {
    fn commission(&self, _quantity: i64, _fill_price: f64) -> f64 {
        0.0
    }
}

/// Simulated execution venue: immediate full fill at the latest close.
#[derive(Debug)]
pub struct SimulatedExecution {
    commission: Box<dyn CommissionModel>,
}

impl SimulatedExecution {
    pub fn new(commission: Box<dyn CommissionModel>) -> Self {
        SimulatedExecution { commission }
    }

    /// Convert an order into a fill priced off the revealed window only, so
    /// execution cannot leak future data either. Orders with non-positive
    /// quantity are rejected; the portfolio should have filtered them.
    pub fn execute(&self, order: &OrderEvent, feed: &DataFeed) -> Result<FillEvent, BarsimError> {
        if order.quantity <= 0 {
            return Err(BarsimError::InvalidOrder {
                instrument: order.instrument.clone(),
                reason: format!("non-positive quantity {}", order.quantity),
            });
        }
        let fill_price = feed.latest_close(&order.instrument)?;
        let commission = self.commission.commission(order.quantity, fill_price);
        Ok(FillEvent {
            order: order.clone(),
            date: order.date,
            fill_price,
            commission,
        })
    }
}
