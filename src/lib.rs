//! Quick-swap order entry for cryptocurrency exchange markets.
//!
//! Provides the pricing and validation core of a swap form — depth-weighted
//! market pricing, precision-bounded input handling, submit-eligibility
//! gating, and trading-pair resolution — together with a terminal UI and a
//! deterministic local market-data feed that drives it.

pub mod config;
pub mod error;
pub mod feed;
pub mod form;
pub mod models;
pub mod pairs;
pub mod tui;

pub use error::{InstantexError, Result};
