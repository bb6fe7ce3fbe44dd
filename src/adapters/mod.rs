//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `catalog` - Plan catalog sources (JSON file)
//! - `http` - Axum HTTP handlers and routes
//! - `memory` - In-memory repositories for tests and development
//! - `postgres` - PostgreSQL repositories
//! - `stripe` - Stripe payment provider (and its mock)

pub mod catalog;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
