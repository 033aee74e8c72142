//! barsim — event-driven historical backtesting engine.
//!
//! Replays time-ordered bars through a single-threaded simulation loop:
//! Market events fan out to a strategy and the portfolio, strategy signals
//! become orders, orders become simulated fills, and the portfolio keeps an
//! append-only history of positions and holdings for later analysis.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
