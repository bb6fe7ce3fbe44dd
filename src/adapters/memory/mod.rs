//! In-memory adapters - Non-persistent implementations for testing and development.

mod account_repository;

pub use account_repository::InMemoryAccountRepository;
