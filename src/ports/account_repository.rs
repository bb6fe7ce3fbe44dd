//! Billing account repository port.
//!
//! Defines the contract for persisting and retrieving BillingAccount
//! aggregates. Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **Document-shaped**: The account is read and written whole; every
//!   mutating request is one read, pure computation, one write
//! - **Unique constraint**: Only one account per external user id
//! - **Optimistic locking**: `update` is a conditional write on the
//!   aggregate's version
//!
//! # Example
//!
//! ```ignore
//! async fn ensure_account(
//!     repo: &dyn AccountRepository,
//!     external_id: &ExternalUserId,
//!     email: &str,
//! ) -> Result<BillingAccount, DomainError> {
//!     if let Some(account) = repo.find_by_external_id(external_id).await? {
//!         return Ok(account);
//!     }
//!
//!     let account = BillingAccount::create_unsubscribed(
//!         AccountId::new(),
//!         external_id.clone(),
//!         email,
//!     );
//!
//!     repo.insert(&account).await?;
//!     Ok(account)
//! }
//! ```

use crate::domain::billing::BillingAccount;
use crate::domain::foundation::{DomainError, ExternalUserId};
use async_trait::async_trait;

/// Repository port for BillingAccount aggregate persistence.
///
/// Implementations must ensure:
/// - Unique external_id constraint
/// - Conditional writes: `update` compares the aggregate's `version`
///   against the stored row and fails on mismatch
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by external user id.
    ///
    /// Returns `None` if the user has no account. This is the primary
    /// lookup since each external user has at most one account.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<BillingAccount>, DomainError>;

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// - `AccountExists` if the external id already has an account
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, account: &BillingAccount) -> Result<(), DomainError>;

    /// Update an existing account.
    ///
    /// The write succeeds only when the stored version equals
    /// `account.version`; the stored version is then bumped by one.
    ///
    /// # Errors
    ///
    /// - `VersionConflict` if a concurrent writer updated the row first
    /// - `AccountNotFound` if the account doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, account: &BillingAccount) -> Result<(), DomainError>;
}
