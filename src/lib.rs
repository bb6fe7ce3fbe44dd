//! Plan Pilot - Subscription billing service.
//!
//! Accounts subscribe to plans from a read-only catalog. Upgrades mid-cycle
//! are prorated against the remaining days of the fixed 30-day billing
//! cycle, and overpayment is banked as account credit toward future charges.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
