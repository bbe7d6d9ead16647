//! Tip calculation modules.
//!
//! This module provides the pure calculation logic behind the calculator
//! screen: rounding policies, currency formatting and the tip pipeline.

pub mod common;
pub mod tip;

pub use tip::{TipCalculation, TipInput, TipOverflow, TipResult};
