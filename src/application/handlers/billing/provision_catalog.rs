//! ProvisionCatalogHandler - Command handler for provider catalog setup.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::{DomainError, PlanId};
use crate::ports::{CreatePriceRequest, CreateProductRequest, PaymentProvider, PlanCatalog};

/// Command to mirror the local plan catalog into the payment provider.
#[derive(Debug, Clone)]
pub struct ProvisionCatalogCommand {
    pub currency: String,
}

/// Provider-side identifiers minted for one plan.
#[derive(Debug, Clone)]
pub struct ProvisionedPlan {
    pub plan_id: PlanId,
    pub product_id: String,
    pub price_id: String,
}

#[derive(Debug, Clone)]
pub struct ProvisionCatalogResult {
    pub provisioned: Vec<ProvisionedPlan>,
}

/// Handler for one-time provider setup.
///
/// Creates a product and a recurring price for every catalog plan, in
/// catalog order, and reports the minted identifiers. The call is not
/// idempotent on the provider side: rerunning it creates fresh objects,
/// so it is an operator action rather than part of any request flow.
pub struct ProvisionCatalogHandler {
    catalog: Arc<dyn PlanCatalog>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl ProvisionCatalogHandler {
    pub fn new(catalog: Arc<dyn PlanCatalog>, payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            catalog,
            payment_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProvisionCatalogCommand,
    ) -> Result<ProvisionCatalogResult, BillingError> {
        let mut provisioned = Vec::new();

        for plan in self.catalog.all() {
            // 1. Product carries the display name and description
            let product = self
                .payment_provider
                .create_product(CreateProductRequest {
                    name: plan.name.clone(),
                    description: (!plan.description.is_empty()).then(|| plan.description.clone()),
                })
                .await
                .map_err(DomainError::from)?;

            // 2. Recurring price at the catalog amount
            let price = self
                .payment_provider
                .create_price(CreatePriceRequest {
                    product_id: product.id.clone(),
                    unit_amount: plan.price,
                    currency: cmd.currency.clone(),
                    interval: plan.interval,
                })
                .await
                .map_err(DomainError::from)?;

            provisioned.push(ProvisionedPlan {
                plan_id: plan.id,
                product_id: product.id,
                price_id: price.id,
            });
        }

        Ok(ProvisionCatalogResult { provisioned })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BillingInterval, Plan};
    use crate::ports::{
        CreatePaymentIntentRequest, PaymentError, PaymentIntent, ProviderPrice, ProviderProduct,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockPaymentProvider {
        products: Mutex<Vec<CreateProductRequest>>,
        prices: Mutex<Vec<CreatePriceRequest>>,
        fail_products: bool,
    }

    impl MockPaymentProvider {
        fn new() -> Self {
            Self {
                products: Mutex::new(Vec::new()),
                prices: Mutex::new(Vec::new()),
                fail_products: false,
            }
        }

        fn failing_products() -> Self {
            Self {
                fail_products: true,
                ..Self::new()
            }
        }

        fn products(&self) -> Vec<CreateProductRequest> {
            self.products.lock().unwrap().clone()
        }

        fn prices(&self) -> Vec<CreatePriceRequest> {
            self.prices.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentProvider for MockPaymentProvider {
        async fn create_payment_intent(
            &self,
            request: CreatePaymentIntentRequest,
        ) -> Result<PaymentIntent, PaymentError> {
            Ok(PaymentIntent {
                id: "pi_unused".to_string(),
                client_secret: "secret".to_string(),
                amount: request.amount,
                currency: request.currency,
            })
        }

        async fn create_product(
            &self,
            request: CreateProductRequest,
        ) -> Result<ProviderProduct, PaymentError> {
            if self.fail_products {
                return Err(PaymentError::authentication("Invalid API key"));
            }
            let mut products = self.products.lock().unwrap();
            products.push(request.clone());
            Ok(ProviderProduct {
                id: format!("prod_{}", products.len()),
                name: request.name,
            })
        }

        async fn create_price(
            &self,
            request: CreatePriceRequest,
        ) -> Result<ProviderPrice, PaymentError> {
            let mut prices = self.prices.lock().unwrap();
            prices.push(request.clone());
            Ok(ProviderPrice {
                id: format!("price_{}", prices.len()),
                product_id: request.product_id.clone(),
                unit_amount: request.unit_amount,
            })
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

    fn plan(id: &str, name: &str, price: i64, description: &str) -> Plan {
        Plan {
            id: PlanId::new(id).unwrap(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            price_id: None,
            interval: BillingInterval::Month,
            features: vec![],
        }
    }

    fn two_plan_catalog() -> Arc<MockPlanCatalog> {
        Arc::new(MockPlanCatalog {
            plans: vec![
                plan("basic", "Basic", 999, "For individuals"),
                plan("pro", "Pro", 2999, "For teams"),
            ],
        })
    }

    fn test_command() -> ProvisionCatalogCommand {
        ProvisionCatalogCommand {
            currency: "usd".to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn provisions_each_plan_in_catalog_order() {
        let provider = Arc::new(MockPaymentProvider::new());
        let handler = ProvisionCatalogHandler::new(two_plan_catalog(), provider.clone());

        let result = handler.handle(test_command()).await.unwrap();

        assert_eq!(result.provisioned.len(), 2);
        assert_eq!(result.provisioned[0].plan_id.as_str(), "basic");
        assert_eq!(result.provisioned[0].product_id, "prod_1");
        assert_eq!(result.provisioned[0].price_id, "price_1");
        assert_eq!(result.provisioned[1].plan_id.as_str(), "pro");
        assert_eq!(provider.products().len(), 2);
        assert_eq!(provider.prices().len(), 2);
    }

    #[tokio::test]
    async fn price_carries_catalog_amount_and_interval() {
        let provider = Arc::new(MockPaymentProvider::new());
        let handler = ProvisionCatalogHandler::new(two_plan_catalog(), provider.clone());

        handler.handle(test_command()).await.unwrap();

        let prices = provider.prices();
        assert_eq!(prices[0].unit_amount, 999);
        assert_eq!(prices[0].currency, "usd");
        assert_eq!(prices[0].interval, BillingInterval::Month);
        assert_eq!(prices[1].unit_amount, 2999);
        assert_eq!(prices[1].product_id, "prod_2");
    }

    #[tokio::test]
    async fn product_description_comes_from_the_plan() {
        let provider = Arc::new(MockPaymentProvider::new());
        let handler = ProvisionCatalogHandler::new(two_plan_catalog(), provider.clone());

        handler.handle(test_command()).await.unwrap();

        let products = provider.products();
        assert_eq!(products[0].name, "Basic");
        assert_eq!(products[0].description.as_deref(), Some("For individuals"));
    }

    #[tokio::test]
    async fn empty_catalog_provisions_nothing() {
        let provider = Arc::new(MockPaymentProvider::new());
        let catalog = Arc::new(MockPlanCatalog { plans: vec![] });
        let handler = ProvisionCatalogHandler::new(catalog, provider.clone());

        let result = handler.handle(test_command()).await.unwrap();

        assert!(result.provisioned.is_empty());
        assert!(provider.products().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn stops_at_the_first_provider_failure() {
        let provider = Arc::new(MockPaymentProvider::failing_products());
        let handler = ProvisionCatalogHandler::new(two_plan_catalog(), provider.clone());

        let result = handler.handle(test_command()).await;

        assert!(matches!(result, Err(BillingError::PaymentFailed { .. })));
        assert!(provider.prices().is_empty());
    }
}
