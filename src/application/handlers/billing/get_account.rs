//! GetAccountHandler - Query handler for retrieving a billing account.

use std::sync::Arc;

use crate::domain::billing::{BillingAccount, BillingError};
use crate::domain::foundation::ExternalUserId;
use crate::ports::AccountRepository;

/// Query to get an account by external id.
#[derive(Debug, Clone)]
pub struct GetAccountQuery {
    pub external_id: ExternalUserId,
}

/// Handler for retrieving a billing account.
///
/// Fails with `AccountNotFound` when the external id has never synced
/// or paid.
pub struct GetAccountHandler {
    repository: Arc<dyn AccountRepository>,
}

impl GetAccountHandler {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetAccountQuery) -> Result<BillingAccount, BillingError> {
        self.repository
            .find_by_external_id(&query.external_id)
            .await?
            .ok_or(BillingError::AccountNotFound(query.external_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
    use async_trait::async_trait;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    struct MockAccountRepository {
        account: Option<BillingAccount>,
        fail_find: bool,
    }

    impl MockAccountRepository {
        fn new() -> Self {
            Self {
                account: None,
                fail_find: false,
            }
        }

        fn with_account(account: BillingAccount) -> Self {
            Self {
                account: Some(account),
                fail_find: false,
            }
        }

        fn failing() -> Self {
            Self {
                account: None,
                fail_find: true,
            }
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn find_by_external_id(
            &self,
            external_id: &ExternalUserId,
        ) -> Result<Option<BillingAccount>, DomainError> {
            if self.fail_find {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated read failure",
                ));
            }
            Ok(self
                .account
                .clone()
                .filter(|a| &a.external_id == external_id))
        }

        async fn insert(&self, _account: &BillingAccount) -> Result<(), DomainError> {
            Ok(())
        }

        async fn update(&self, _account: &BillingAccount) -> Result<(), DomainError> {
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_external_id() -> ExternalUserId {
        ExternalUserId::new("user_get_123").unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn returns_account_when_exists() {
        let account = BillingAccount::create_unsubscribed(
            AccountId::new(),
            test_external_id(),
            "user@example.com",
        );
        let repo = Arc::new(MockAccountRepository::with_account(account.clone()));

        let handler = GetAccountHandler::new(repo);
        let query = GetAccountQuery {
            external_id: test_external_id(),
        };

        let result = handler.handle(query).await.unwrap();
        assert_eq!(result.id, account.id);
        assert_eq!(result.email, "user@example.com");
    }

    #[tokio::test]
    async fn fails_with_not_found_when_missing() {
        let repo = Arc::new(MockAccountRepository::new());

        let handler = GetAccountHandler::new(repo);
        let query = GetAccountQuery {
            external_id: test_external_id(),
        };

        let result = handler.handle(query).await;
        assert!(matches!(result, Err(BillingError::AccountNotFound(_))));
    }

    #[tokio::test]
    async fn fails_when_read_fails() {
        let repo = Arc::new(MockAccountRepository::failing());

        let handler = GetAccountHandler::new(repo);
        let query = GetAccountQuery {
            external_id: test_external_id(),
        };

        let result = handler.handle(query).await;
        assert!(matches!(result, Err(BillingError::Persistence(_))));
    }
}
