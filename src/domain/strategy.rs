//! Strategy trait and the reference buy-and-hold implementation.

use std::collections::HashSet;

use super::error::BarsimError;
use super::event::{MarketEvent, SignalDirection, SignalEvent};
use super::feed::DataFeed;

/// A strategy reacts to each new bar with zero or more signals.
///
/// Implementations may only read market data through `feed.latest_bars`,
/// which is the feed's look-ahead guarantee; any per-instrument state lives
/// in the strategy itself and persists for the length of one run.
pub trait Strategy {
    fn name(&self) -> &str;

    fn on_market(
        &mut self,
        event: &MarketEvent,
        feed: &DataFeed,
    ) -> Result<Vec<SignalEvent>, BarsimError>;
}

/// Go long each instrument on its first revealed bar, then hold.
///
/// Exists to validate the event loop end to end; the signal chain it
/// produces (one LONG per instrument, nothing afterwards) makes expected
/// fills and cash flows easy to compute by hand.
#[derive(Debug, Default)]
pub struct BuyAndHold {
    entered: HashSet<String>,
}

impl BuyAndHold {
    pub fn new() -> Self {
        BuyAndHold {
            entered: HashSet::new(),
        }
    }
}

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "Buy and Hold"
    }

    fn on_market(
        &mut self,
        event: &MarketEvent,
        feed: &DataFeed,
    ) -> Result<Vec<SignalEvent>, BarsimError> {
        let mut signals = Vec::new();
        for instrument in feed.instruments() {
            if self.entered.contains(instrument) {
                continue;
            }
            if feed.latest_bars(instrument, 1)?.is_empty() {
                continue;
            }
            self.entered.insert(instrument.clone());
            signals.push(SignalEvent {
                instrument: instrument.clone(),
                direction: SignalDirection::Long,
                date: event.date,
            });
        }
        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn make_bar(instrument: &str, date: &str, close: f64) -> Bar {
        Bar {
            instrument: instrument.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn two_instrument_feed() -> DataFeed {
        let mut raw = HashMap::new();
        raw.insert(
            "AAA".to_string(),
            vec![
                make_bar("AAA", "2024-01-01", 100.0),
                make_bar("AAA", "2024-01-02", 105.0),
            ],
        );
        raw.insert(
            "BBB".to_string(),
            vec![
                make_bar("BBB", "2024-01-01", 50.0),
                make_bar("BBB", "2024-01-02", 51.0),
            ],
        );
        DataFeed::new(raw).unwrap()
    }

    #[test]
    fn signals_long_once_per_instrument() {
        let mut feed = two_instrument_feed();
        let mut strategy = BuyAndHold::new();

        feed.advance();
        let event = MarketEvent {
            date: feed.latest_date().unwrap(),
        };
        let mut signals = strategy.on_market(&event, &feed).unwrap();
        signals.sort_by(|a, b| a.instrument.cmp(&b.instrument));

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].instrument, "AAA");
        assert_eq!(signals[0].direction, SignalDirection::Long);
        assert_eq!(signals[1].instrument, "BBB");

        feed.advance();
        let event = MarketEvent {
            date: feed.latest_date().unwrap(),
        };
        assert!(strategy.on_market(&event, &feed).unwrap().is_empty());
    }

    #[test]
    fn no_signal_before_first_bar() {
        let feed = two_instrument_feed();
        let mut strategy = BuyAndHold::new();
        let event = MarketEvent {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        // Nothing revealed yet, so nothing to act on.
        assert!(strategy.on_market(&event, &feed).unwrap().is_empty());
    }

    #[test]
    fn signal_carries_market_event_date() {
        let mut feed = two_instrument_feed();
        let mut strategy = BuyAndHold::new();

        feed.advance();
        let event = MarketEvent {
            date: feed.latest_date().unwrap(),
        };
        let signals = strategy.on_market(&event, &feed).unwrap();
        for signal in signals {
            assert_eq!(signal.date, event.date);
        }
    }
}
