//! In-Memory Account Repository Adapter
//!
//! Stores billing accounts in memory with the same uniqueness and
//! version-check semantics as the PostgreSQL adapter.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::BillingAccount;
use crate::domain::foundation::{DomainError, ErrorCode, ExternalUserId};
use crate::ports::AccountRepository;

/// In-memory storage for billing accounts
#[derive(Debug, Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<ExternalUserId, BillingAccount>>>,
}

impl InMemoryAccountRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all stored accounts (useful for tests)
    pub async fn clear(&self) {
        self.accounts.write().await.clear();
    }

    /// Get the number of stored accounts
    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<BillingAccount>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(external_id).cloned())
    }

    async fn insert(&self, account: &BillingAccount) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.external_id) {
            return Err(DomainError::new(
                ErrorCode::AccountExists,
                "User already has a billing account",
            ));
        }
        accounts.insert(account.external_id.clone(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &BillingAccount) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts.get_mut(&account.external_id).ok_or_else(|| {
            DomainError::new(ErrorCode::AccountNotFound, "Account not found")
        })?;

        if stored.version != account.version {
            return Err(DomainError::new(
                ErrorCode::VersionConflict,
                "Account was modified by another request",
            ));
        }

        // Same contract as the SQL adapter: the stored version advances
        // past the one the caller read.
        let mut updated = account.clone();
        updated.version += 1;
        *stored = updated;
        Ok(())
    }
}
