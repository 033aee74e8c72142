//! Backtest configuration and the event-driven simulation loop.
//!
//! The loop is strictly sequential: when the queue is empty the feed
//! advances and seeds one Market event; otherwise the head event is
//! dispatched by exhaustive match. A tick's whole Market, Signal, Order,
//! Fill chain drains before the next bar is revealed, which is what makes
//! every run a deterministic single pass.

use chrono::NaiveDate;

use super::error::BarsimError;
use super::event::{Event, MarketEvent};
use super::execution::{IbCommission, SimulatedExecution};
use super::feed::DataFeed;
use super::portfolio::{FixedQuantity, Portfolio};
use super::queue::EventQueue;
use super::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Date range the bar source is asked for; the loop itself replays
    /// whatever the feed contains.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    /// Shares per entry order for the fixed-quantity sizing policy.
    pub order_quantity: i64,
    pub commission_rate: f64,
    pub commission_minimum: f64,
    pub commission_max_pct: f64,
}

#[derive(Debug)]
pub struct BacktestResult {
    pub portfolio: Portfolio,
    /// Number of Market events processed (bars replayed).
    pub ticks: usize,
}

/// Replay the feed to exhaustion. Terminates exactly when the queue is
/// empty and the feed has no more bars.
pub fn run_backtest(
    mut feed: DataFeed,
    strategy: &mut dyn Strategy,
    config: &BacktestConfig,
) -> Result<BacktestResult, BarsimError> {
    let mut queue = EventQueue::new();
    let mut portfolio = Portfolio::new(
        config.initial_cash,
        feed.instruments(),
        Box::new(FixedQuantity(config.order_quantity)),
    );
    let execution = SimulatedExecution::new(Box::new(IbCommission {
        rate: config.commission_rate,
        minimum: config.commission_minimum,
        max_pct: config.commission_max_pct,
    }));
    let mut ticks = 0usize;

    loop {
        if queue.is_empty() {
            if !feed.advance() {
                break;
            }
            let date = feed.latest_date().ok_or_else(|| BarsimError::Data {
                reason: "feed advanced without revealing a date".into(),
            })?;
            queue.enqueue(Event::Market(MarketEvent { date }));
            ticks += 1;
        }

        match queue.dequeue()? {
            Event::Market(event) => {
                for signal in strategy.on_market(&event, &feed)? {
                    queue.enqueue(Event::Signal(signal));
                }
                portfolio.on_market(&event, &feed)?;
            }
            Event::Signal(signal) => {
                if let Some(order) = portfolio.on_signal(&signal) {
                    queue.enqueue(Event::Order(order));
                }
            }
            Event::Order(order) => {
                let fill = execution.execute(&order, &feed)?;
                queue.enqueue(Event::Fill(fill));
            }
            Event::Fill(fill) => portfolio.on_fill(&fill)?,
        }
    }

    Ok(BacktestResult { portfolio, ticks })
}
