//! Event model for the simulation loop.
//!
//! Everything that happens in simulated time is one of four closed variants:
//! a new bar (Market), a strategy intent (Signal), a concrete trade
//! instruction (Order), and an execution confirmation (Fill). Events are
//! immutable once created, and dispatch is an exhaustive match on [`Event`]
//! rather than a type-tag string, so an unrecognized event kind cannot exist
//! at runtime.

use chrono::NaiveDate;

/// Direction of an order: which way the trade moves the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, -1 for short.
    pub fn sign(self) -> i64 {
        match self {
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }
}

/// A strategy's trading intent. `Exit` asks the portfolio to flatten
/// whatever is currently held, long or short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDirection {
    Long,
    Short,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

/// A new bar became available for all tracked instruments at this date.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketEvent {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub instrument: String,
    pub direction: SignalDirection,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvent {
    pub instrument: String,
    pub order_type: OrderType,
    /// Unsigned share count; the direction carries the sign.
    pub quantity: i64,
    pub direction: Direction,
    pub date: NaiveDate,
}

/// Confirmation that an order executed in full at a single price.
#[derive(Debug, Clone, PartialEq)]
pub struct FillEvent {
    pub order: OrderEvent,
    pub date: NaiveDate,
    pub fill_price: f64,
    pub commission: f64,
}

impl FillEvent {
    /// Signed quantity of the underlying order (+long, -short).
    pub fn signed_quantity(&self) -> i64 {
        self.order.direction.sign() * self.order.quantity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}

impl Event {
    /// Simulated date the event carries. Timestamps are non-decreasing in
    /// processing order; events derived from a Market event carry a date
    /// at or after that Market event's.
    pub fn date(&self) -> NaiveDate {
        match self {
            Event::Market(e) => e.date,
            Event::Signal(e) => e.date,
            Event::Order(e) => e.date,
            Event::Fill(e) => e.date,
        }
    }
}
