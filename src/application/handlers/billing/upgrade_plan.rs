//! UpgradePlanHandler - Command handler for mid-cycle plan upgrades.

use std::sync::Arc;

use crate::domain::billing::{BillingAccount, BillingError, UpgradeQuote};
use crate::domain::foundation::{ExternalUserId, PlanId, Timestamp};
use crate::ports::{AccountRepository, PlanCatalog};

/// Command to move a subscriber to a different plan mid-cycle.
#[derive(Debug, Clone)]
pub struct UpgradePlanCommand {
    pub external_id: ExternalUserId,
    pub plan_id: PlanId,
    pub payment_intent_id: String,
}

/// Result of a successful upgrade: the mutated account plus the
/// proration breakdown for display.
#[derive(Debug, Clone)]
pub struct UpgradePlanResult {
    pub account: BillingAccount,
    pub quote: UpgradeQuote,
}

/// Handler for prorated plan changes.
///
/// Prices the remaining days of the old and new plans against a 30-day
/// month, folds the unspent value into the credit balance, and replaces
/// the plan snapshot without moving the cycle end. One read, a pure
/// quote, one conditional write.
pub struct UpgradePlanHandler {
    repository: Arc<dyn AccountRepository>,
    catalog: Arc<dyn PlanCatalog>,
}

impl UpgradePlanHandler {
    pub fn new(repository: Arc<dyn AccountRepository>, catalog: Arc<dyn PlanCatalog>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub async fn handle(&self, cmd: UpgradePlanCommand) -> Result<UpgradePlanResult, BillingError> {
        // 1. Load the account
        let mut account = self
            .repository
            .find_by_external_id(&cmd.external_id)
            .await?
            .ok_or(BillingError::AccountNotFound(cmd.external_id))?;

        // 2. Resolve the new plan from the catalog
        let plan = self
            .catalog
            .find(&cmd.plan_id)
            .ok_or(BillingError::PlanNotFound(cmd.plan_id))?;

        // 3. Quote the remaining-period delta
        let now = Timestamp::now();
        let quote = UpgradeQuote::compute(&account.subscription, &plan, account.credits, now);

        // 4. Apply: new snapshot, settled credits, upgrade history entry
        account.apply_upgrade(&plan, &quote, cmd.payment_intent_id, now)?;

        // 5. Persist with the conditional write
        self.repository.update(&account).await?;

        Ok(UpgradePlanResult { account, quote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BillingInterval, PaymentKind, Plan, Subscription, SubscriptionStatus};
    use crate::domain::foundation::{AccountId, DomainError, ErrorCode};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockAccountRepository {
        accounts: Mutex<Vec<BillingAccount>>,
        updated: Mutex<Vec<BillingAccount>>,
        fail_update_with: Option<ErrorCode>,
    }

    impl MockAccountRepository {
        fn new() -> Self {
            Self {
                accounts: Mutex::new(Vec::new()),
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

        async fn insert(&self, _account: &BillingAccount) -> Result<(), DomainError> {
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
        ExternalUserId::new("user_upgrade_123").unwrap()
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
            plans: vec![plan("pro", 2999), plan("enterprise", 9999)],
        })
    }

    /// Account on the Pro plan with 15 days left in the cycle.
    fn mid_cycle_pro_account(credits: f64) -> BillingAccount {
        let now = Timestamp::now();
        let mut account = BillingAccount::create_unsubscribed(
            AccountId::new(),
            test_external_id(),
            "user@example.com",
        );
        account.subscription = Subscription {
            plan_id: Some(PlanId::new("pro").unwrap()),
            plan_name: Some("pro Plan".to_string()),
            price: Some(2999),
            start_date: Some(now.minus_days(15)),
            end_date: Some(now.add_days(15)),
            status: SubscriptionStatus::Active,
        };
        account.credits = credits;
        account
    }

    fn test_command() -> UpgradePlanCommand {
        UpgradePlanCommand {
            external_id: test_external_id(),
            plan_id: PlanId::new("enterprise").unwrap(),
            payment_intent_id: "pi_upgrade_123".to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn charges_prorated_difference_mid_cycle() {
        let repo = Arc::new(MockAccountRepository::with_account(mid_cycle_pro_account(0.0)));
        let handler = UpgradePlanHandler::new(repo.clone(), test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        // Pro 2999 -> Enterprise 9999 with 15 of 30 days left:
        // (9999/30)*15 - (2999/30)*15 = 4999.5 - 1499.5 = 3500
        assert_eq!(result.quote.days_remaining, 15);
        assert_eq!(result.quote.current_remaining_value, 1499.5);
        assert_eq!(result.quote.new_remaining_value, 4999.5);
        assert_eq!(result.quote.upgrade_amount, 3500.0);
        assert_eq!(result.quote.final_amount, 3500.0);
        assert_eq!(result.quote.credit_applied, 0.0);
        assert_eq!(result.quote.remaining_credits, 1499.5);
        assert_eq!(repo.updated().len(), 1);
    }

    #[tokio::test]
    async fn upgrade_preserves_cycle_end() {
        let account = mid_cycle_pro_account(0.0);
        let original_end = account.subscription.end_date;
        let repo = Arc::new(MockAccountRepository::with_account(account));
        let handler = UpgradePlanHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        assert_eq!(result.account.subscription.end_date, original_end);
        assert_eq!(
            result.account.subscription.plan_id.as_ref().unwrap().as_str(),
            "enterprise"
        );
        assert_eq!(result.account.subscription.price, Some(9999));
    }

    #[tokio::test]
    async fn upgrade_appends_entry_with_breakdown() {
        let repo = Arc::new(MockAccountRepository::with_account(mid_cycle_pro_account(0.0)));
        let handler = UpgradePlanHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        assert_eq!(result.account.payment_history.len(), 1);
        let entry = &result.account.payment_history[0];
        assert_eq!(entry.kind, PaymentKind::Upgrade);
        assert_eq!(entry.payment_intent_id, "pi_upgrade_123");
        assert_eq!(entry.amount, 3500.0);
        assert_eq!(entry.prorated_amount, Some(3500.0));
        assert_eq!(entry.credit_applied, Some(0.0));
    }

    #[tokio::test]
    async fn existing_credits_cover_the_charge() {
        let repo = Arc::new(MockAccountRepository::with_account(mid_cycle_pro_account(5000.0)));
        let handler = UpgradePlanHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        // Charge 3500 fully covered by the 5000 balance; the old plan's
        // unspent 1499.5 lands in the remaining pool.
        assert_eq!(result.quote.final_amount, 0.0);
        assert_eq!(result.quote.credit_applied, 3500.0);
        assert_eq!(result.quote.remaining_credits, 2999.5);
        assert_eq!(result.account.credits, 2999.5);
    }

    #[tokio::test]
    async fn upgrade_without_a_current_plan_is_free() {
        let account = BillingAccount::create_unsubscribed(
            AccountId::new(),
            test_external_id(),
            "user@example.com",
        );
        let repo = Arc::new(MockAccountRepository::with_account(account));
        let handler = UpgradePlanHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await.unwrap();

        // Absent end date means zero remaining days, so every amount is zero.
        assert_eq!(result.quote.days_remaining, 0);
        assert_eq!(result.quote.final_amount, 0.0);
        assert_eq!(
            result.account.subscription.status,
            SubscriptionStatus::Active
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fails_when_account_missing() {
        let repo = Arc::new(MockAccountRepository::new());
        let handler = UpgradePlanHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await;
        assert!(matches!(result, Err(BillingError::AccountNotFound(_))));
    }

    #[tokio::test]
    async fn fails_when_plan_unknown() {
        let repo = Arc::new(MockAccountRepository::with_account(mid_cycle_pro_account(0.0)));
        let handler = UpgradePlanHandler::new(repo.clone(), test_catalog());

        let mut cmd = test_command();
        cmd.plan_id = PlanId::new("platinum").unwrap();

        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(BillingError::PlanNotFound(_))));
        assert!(repo.updated().is_empty());
    }

    #[tokio::test]
    async fn fails_on_version_conflict() {
        let repo = Arc::new(MockAccountRepository::conflicting_update(
            mid_cycle_pro_account(0.0),
        ));
        let handler = UpgradePlanHandler::new(repo, test_catalog());

        let result = handler.handle(test_command()).await;
        assert!(matches!(result, Err(BillingError::VersionConflict)));
    }
}
