//! SyncAccountHandler - Command handler for identity-provider sync.

use std::sync::Arc;

use crate::domain::billing::{BillingAccount, BillingError};
use crate::domain::foundation::{AccountId, ExternalUserId};
use crate::ports::AccountRepository;

/// Command to sync an account with the identity provider.
#[derive(Debug, Clone)]
pub struct SyncAccountCommand {
    pub external_id: ExternalUserId,
    pub email: String,
}

/// Result of a successful sync.
#[derive(Debug, Clone)]
pub struct SyncAccountResult {
    pub account: BillingAccount,
    pub created: bool,
}

/// Handler for syncing an account on sign-in.
///
/// First sign-in creates an unsubscribed account (status expired, no
/// plan); later syncs refresh the email when the identity provider
/// reports a new one.
pub struct SyncAccountHandler {
    repository: Arc<dyn AccountRepository>,
}

impl SyncAccountHandler {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: SyncAccountCommand) -> Result<SyncAccountResult, BillingError> {
        // 1. Look up the account by external id
        if let Some(mut account) = self.repository.find_by_external_id(&cmd.external_id).await? {
            // 2. Refresh the email when it changed; skip the write otherwise
            if account.email != cmd.email {
                account.sync_email(cmd.email);
                self.repository.update(&account).await?;
            }
            return Ok(SyncAccountResult {
                account,
                created: false,
            });
        }

        // 3. First sign-in: create an unsubscribed account
        let account =
            BillingAccount::create_unsubscribed(AccountId::new(), cmd.external_id, cmd.email);

        // 4. Persist
        self.repository.insert(&account).await?;

        Ok(SyncAccountResult {
            account,
            created: true,
        })
    }
}
