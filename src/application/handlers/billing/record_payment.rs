//! RecordPaymentHandler - Command handler for the payment-success callback.

use std::sync::Arc;

use crate::domain::billing::{BillingAccount, BillingError, PaymentKind};
use crate::domain::foundation::{AccountId, ExternalUserId, PlanId, Timestamp};
use crate::ports::{AccountRepository, PlanCatalog};

/// Command to record a completed payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub external_id: ExternalUserId,
    pub plan_id: PlanId,
    pub payment_intent_id: String,
    /// Amount actually charged, minor units. Echoed into the history
    /// entry as reported by the payment flow.
    pub amount: f64,
}

/// Result of a recorded payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentResult {
    pub account: BillingAccount,
    pub kind: PaymentKind,
}

/// Handler for recording a completed payment.
///
/// The frontend calls this after the provider confirms the payment.
/// The subscription gets a fresh 30-day cycle on the paid plan; a
/// cancelled subscription is reactivated by the payment. An account
/// that has never synced is created on the spot with an empty email
/// (the next identity sync fills it in).
pub struct RecordPaymentHandler {
    repository: Arc<dyn AccountRepository>,
    catalog: Arc<dyn PlanCatalog>,
}

impl RecordPaymentHandler {
    pub fn new(repository: Arc<dyn AccountRepository>, catalog: Arc<dyn PlanCatalog>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordPaymentCommand,
    ) -> Result<RecordPaymentResult, BillingError> {
        // 1. Resolve the paid plan from the catalog
        let plan = self
            .catalog
            .find(&cmd.plan_id)
            .ok_or(BillingError::PlanNotFound(cmd.plan_id))?;

        // 2. Load the account, or start a fresh one for an unseen payer
        let existing = self.repository.find_by_external_id(&cmd.external_id).await?;
        let is_new = existing.is_none();
        let mut account = existing.unwrap_or_else(|| {
            BillingAccount::create_unsubscribed(AccountId::new(), cmd.external_id, "")
        });

        // 3. Record the payment: history entry plus a fresh cycle
        let kind = account.record_payment(
            &plan,
            cmd.payment_intent_id,
            cmd.amount,
            Timestamp::now(),
        )?;

        // 4. Persist
        if is_new {
            self.repository.insert(&account).await?;
        } else {
            self.repository.update(&account).await?;
        }

        Ok(RecordPaymentResult { account, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BillingInterval, Plan, SubscriptionStatus};
    use crate::domain::foundation::{DomainError, ErrorCode};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockAccountRepository {
        accounts: Mutex<Vec<BillingAccount>>,
        inserted: Mutex<Vec<BillingAccount>>,
        updated: Mutex<Vec<BillingAccount>>,
        fail_update_with: Option<ErrorCode>,
    }

    impl MockAccountRepository {
        fn new() -> Self {
            Self {
                accounts: Mutex::new(Vec::new()),
                inserted: Mutex::new(Vec::new()),
                updated: Mutex::new(Vec::new()),
                fail_update_with: None,
            }
        }

        fn with_account(account: BillingAccount) -> Self {
            Self {
                accounts: Mutex::new(vec![account]),
                ..Self::new()
            }
        }

        fn conflicting_update(account: BillingAccount) -> Self {
            Self {
                accounts: Mutex::new(vec![account]),
                fail_update_with: Some(ErrorCode::VersionConflict),
                ..Self::new()
            }
        }

        fn inserted(&self) -> Vec<BillingAccount> {
            self.inserted.lock().unwrap().clone()
        }

        fn updated(&self) -> Vec<BillingAccount> {
            self.updated.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn find_by_external_id(
            &self,
            external_id: &ExternalUserId,
        ) -> Result<Option<BillingAccount>, DomainError> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| &a.external_id == external_id)
                .cloned())
        }

        async fn insert(&self, account: &BillingAccount) -> Result<(), DomainError> {
            self.inserted.lock().unwrap().push(account.clone());
            Ok(())
        }

        async fn update(&self, account: &BillingAccount) -> Result<(), DomainError> {
            if let Some(code) = self.fail_update_with {
                return Err(DomainError::new(code, "Simulated write failure"));
            }
            self.updated.lock().unwrap().push(account.clone());
            Ok(())
        }
    }

    struct MockPlanCatalog {
        plans: Vec<Plan>,
    }

    impl PlanCatalog for MockPlanCatalog {
        fn find(&self, plan_id: &PlanId) -> Option<Plan> {
            self.plans.iter().find(|p| &p.id == plan_id).cloned()
        }

        fn all(&self) -> Vec<Plan> {
            self.plans.clone()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_external_id() -> ExternalUserId {
        ExternalUserId::new("user_pay_123").unwrap()
    }

    fn plan(id: &str, price: i64) -> Plan {
        Plan {
            id: PlanId::new(id).unwrap(),
            name: format!("{} Plan", id),
            description: String::new(),
            price,
            price_id: None,
            interval: BillingInterval::Month,
            features: vec![],
        }
    }

    fn test_catalog() -> Arc<MockPlanCatalog> {
        Arc::new(MockPlanCatalog {
            plans: vec![plan("basic", 999), plan("pro", 2999)],
        })
    }

    fn test_command() -> RecordPaymentCommand {
        RecordPaymentCommand {
            external_id: test_external_id(),
            plan_id: PlanId::new("basic").unwrap(),
            payment_intent_id: "pi_test_123".to_string(),
            amount: 999.0,
        }
    }

    fn synced_account() -> BillingAccount {
        BillingAccount::create_unsubscribed(
            AccountId::new(),
            test_external_id(),
            "user@example.com",
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_payment_is_initial_and_activates() {
        let repo = Arc::new(MockAccountRepository::with_account(synced_account()));
        let handler = RecordPaymentHandler::new(repo.clone(), test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        assert_eq!(result.kind, PaymentKind::Initial);
        assert_eq!(
            result.account.subscription.status,
            SubscriptionStatus::Active
        );
        assert_eq!(result.account.payment_history.len(), 1);
        assert_eq!(result.account.payment_history[0].amount, 999.0);
        assert_eq!(repo.updated().len(), 1);
    }

    #[tokio::test]
    async fn second_payment_is_renewal() {
        let mut account = synced_account();
        account
            .record_payment(&plan("basic", 999), "pi_first", 999.0, Timestamp::now())
            .unwrap();
        let repo = Arc::new(MockAccountRepository::with_account(account));
        let handler = RecordPaymentHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        assert_eq!(result.kind, PaymentKind::Renewal);
        assert_eq!(result.account.payment_history.len(), 2);
    }

    #[tokio::test]
    async fn payment_starts_a_fresh_cycle() {
        let repo = Arc::new(MockAccountRepository::with_account(synced_account()));
        let handler = RecordPaymentHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        let sub = &result.account.subscription;
        let start = sub.start_date.unwrap();
        let end = sub.end_date.unwrap();
        assert_eq!(end.duration_since(&start).num_days(), 30);
        assert_eq!(sub.price, Some(999));
    }

    #[tokio::test]
    async fn creates_account_for_unseen_payer() {
        let repo = Arc::new(MockAccountRepository::new());
        let handler = RecordPaymentHandler::new(repo.clone(), test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        assert_eq!(result.kind, PaymentKind::Initial);
        // Email stays empty until the next identity sync
        assert_eq!(result.account.email, "");
        assert_eq!(repo.inserted().len(), 1);
        assert!(repo.updated().is_empty());
    }

    #[tokio::test]
    async fn payment_reactivates_cancelled_subscription() {
        let mut account = synced_account();
        account
            .record_payment(&plan("basic", 999), "pi_first", 999.0, Timestamp::now())
            .unwrap();
        account.cancel().unwrap();
        let repo = Arc::new(MockAccountRepository::with_account(account));
        let handler = RecordPaymentHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        assert_eq!(
            result.account.subscription.status,
            SubscriptionStatus::Active
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fails_when_plan_unknown() {
        let repo = Arc::new(MockAccountRepository::with_account(synced_account()));
        let handler = RecordPaymentHandler::new(repo.clone(), test_catalog());

        let mut cmd = test_command();
        cmd.plan_id = PlanId::new("platinum").unwrap();

        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(BillingError::PlanNotFound(_))));
        assert!(repo.updated().is_empty());
    }

    #[tokio::test]
    async fn fails_on_version_conflict() {
        let repo = Arc::new(MockAccountRepository::conflicting_update(synced_account()));
        let handler = RecordPaymentHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await;
        assert!(matches!(result, Err(BillingError::VersionConflict)));
    }
}
