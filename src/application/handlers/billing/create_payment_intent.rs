//! CreatePaymentIntentHandler - Command handler for starting a checkout.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::{DomainError, PlanId};
use crate::ports::{CreatePaymentIntentRequest, PaymentProvider, PlanCatalog};

/// Command to open a payment intent with the provider.
///
/// Either `plan_id` or `amount` must be present. An explicit amount
/// overrides the plan's catalog price; the plan id is still folded into
/// the intent metadata so the payment can be traced back to it.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    pub plan_id: Option<PlanId>,
    pub amount: Option<i64>,
    pub quantity: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub idempotency_key: Option<String>,
}

/// What the client needs to confirm the payment on its side.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentResult {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

/// Handler for checkout initiation.
///
/// Prices come from the local catalog, never from the client alone:
/// a request naming only a plan is charged that plan's catalog price.
/// The explicit-amount path exists for one-off charges (top-ups,
/// adjustments) and is tagged `custom` in the metadata.
pub struct CreatePaymentIntentHandler {
    catalog: Arc<dyn PlanCatalog>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePaymentIntentHandler {
    pub fn new(catalog: Arc<dyn PlanCatalog>, payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            catalog,
            payment_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, BillingError> {
        // 1. Validate the multiplier before touching the provider
        if cmd.quantity < 1 {
            return Err(BillingError::validation(
                "quantity",
                "Quantity must be at least 1",
            ));
        }

        // 2. Resolve the unit amount: explicit amount wins over the plan price
        let unit_amount = match (cmd.amount, &cmd.plan_id) {
            (Some(amount), _) => amount,
            (None, Some(plan_id)) => self
                .catalog
                .find(plan_id)
                .ok_or_else(|| BillingError::PlanNotFound(plan_id.clone()))?
                .price,
            (None, None) => return Err(BillingError::missing_field("amount")),
        };
        if unit_amount <= 0 {
            return Err(BillingError::validation(
                "amount",
                "Amount must be a positive number of minor units",
            ));
        }
        let total = unit_amount * cmd.quantity;

        // 3. Fold tracing metadata into the intent
        let mut metadata = HashMap::new();
        metadata.insert(
            "plan_id".to_string(),
            cmd.plan_id
                .as_ref()
                .map(|id| id.as_str().to_string())
                .unwrap_or_else(|| "custom".to_string()),
        );
        metadata.insert("quantity".to_string(), cmd.quantity.to_string());

        // 4. Open the intent with the provider
        let intent = self
            .payment_provider
            .create_payment_intent(CreatePaymentIntentRequest {
                amount: total,
                currency: cmd.currency,
                customer_email: cmd.customer_email,
                metadata,
                idempotency_key: cmd.idempotency_key,
            })
            .await
            .map_err(DomainError::from)?;

        Ok(CreatePaymentIntentResult {
            payment_intent_id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: intent.currency,
        })
    }
}
