//! Core domain types and logic.

pub mod bar;
pub mod event;
pub mod queue;
pub mod feed;
pub mod strategy;
pub mod portfolio;
pub mod execution;
pub mod backtest;
pub mod config_validation;
pub mod error;
