//! CancelSubscriptionHandler - Command handler for subscription cancellation.

use std::sync::Arc;

use crate::domain::billing::{BillingAccount, BillingError};
use crate::domain::foundation::ExternalUserId;
use crate::ports::AccountRepository;

/// Command to cancel the caller's subscription at the end of the
/// current cycle.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub external_id: ExternalUserId,
}

#[derive(Debug, Clone)]
pub struct CancelSubscriptionResult {
    pub account: BillingAccount,
}

/// Handler for cancellation.
///
/// Cancellation only flips the status; the cycle end stays where it is,
/// so paid access runs until the period the subscriber already paid for
/// is over. The status machine rejects cancelling anything that is not
/// currently active.
pub struct CancelSubscriptionHandler {
    repository: Arc<dyn AccountRepository>,
}

impl CancelSubscriptionHandler {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, BillingError> {
        // 1. Load the account
        let mut account = self
            .repository
            .find_by_external_id(&cmd.external_id)
            .await?
            .ok_or(BillingError::AccountNotFound(cmd.external_id))?;

        // 2. Flip the status; invalid transitions surface here
        account.cancel()?;

        // 3. Persist with the conditional write
        self.repository.update(&account).await?;

        Ok(CancelSubscriptionResult { account })
    }
}
