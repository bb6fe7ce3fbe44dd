//! CreateAccountHandler - Command handler for direct account creation.

use std::sync::Arc;

use crate::domain::billing::{BillingAccount, BillingError};
use crate::domain::foundation::{AccountId, ExternalUserId, PlanId, Timestamp};
use crate::ports::{AccountRepository, PlanCatalog};

/// Command to create an account already subscribed to a plan.
#[derive(Debug, Clone)]
pub struct CreateAccountCommand {
    pub external_id: ExternalUserId,
    pub email: String,
    pub plan_id: PlanId,
}

/// Result of successful account creation.
#[derive(Debug, Clone)]
pub struct CreateAccountResult {
    pub account: BillingAccount,
}

/// Handler for creating a subscribed account directly.
///
/// Unlike the sync path, this sets the plan immediately with an active
/// 30-day cycle. The plan is priced from the catalog, never from the
/// request.
pub struct CreateAccountHandler {
    repository: Arc<dyn AccountRepository>,
    catalog: Arc<dyn PlanCatalog>,
}

impl CreateAccountHandler {
    pub fn new(repository: Arc<dyn AccountRepository>, catalog: Arc<dyn PlanCatalog>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateAccountCommand,
    ) -> Result<CreateAccountResult, BillingError> {
        // 1. Reject when the external id already has an account
        if let Some(_existing) = self.repository.find_by_external_id(&cmd.external_id).await? {
            return Err(BillingError::already_exists(cmd.external_id));
        }

        // 2. Resolve the plan from the catalog
        let plan = self
            .catalog
            .find(&cmd.plan_id)
            .ok_or(BillingError::PlanNotFound(cmd.plan_id))?;

        // 3. Build the subscribed account
        let account = BillingAccount::create_subscribed(
            AccountId::new(),
            cmd.external_id,
            cmd.email,
            &plan,
            Timestamp::now(),
        );

        // 4. Persist (the unique constraint backstops the check in step 1)
        self.repository.insert(&account).await?;

        Ok(CreateAccountResult { account })
    }
}
