//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresAccountRepository` - Billing account storage with optimistic locking

mod account_repository;

pub use account_repository::PostgresAccountRepository;
