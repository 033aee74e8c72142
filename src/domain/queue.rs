//! FIFO work list of pending events.
//!
//! Within one simulated time step, events must be processed in the causal
//! order they were produced (Market, then Signal, then Order, then Fill), so
//! the queue never reorders entries. The queue is passed explicitly to the
//! loop rather than held as shared state, which keeps independent backtest
//! runs fully isolated.

use std::collections::VecDeque;

use super::error::BarsimError;
use super::event::Event;

#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue {
            events: VecDeque::new(),
        }
    }

    /// Append an event at the tail. Ownership transfers to the queue until
    /// the event is dequeued.
    pub fn enqueue(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Remove and return the head. Dequeueing an empty queue indicates a
    /// sequencing bug in the caller, not a recoverable runtime condition.
    pub fn dequeue(&mut self) -> Result<Event, BarsimError> {
        self.events.pop_front().ok_or(BarsimError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
