//! Billing-specific error types.
//!
//! Errors raised by account operations, plan resolution, and payment
//! recording.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MissingField | 400 |
//! | AccountNotFound | 404 |
//! | PlanNotFound | 404 |
//! | AlreadyExists | 409 |
//! | InvalidState | 409 |
//! | VersionConflict | 409 |
//! | PaymentFailed | 402 |
//! | ValidationFailed | 400 |
//! | Persistence | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ExternalUserId, PlanId};

/// Billing-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// A required request field was absent.
    MissingField(String),

    /// No account exists for this external id.
    AccountNotFound(ExternalUserId),

    /// The plan is not in the catalog.
    PlanNotFound(PlanId),

    /// An account already exists for this external id.
    AlreadyExists(ExternalUserId),

    /// The subscription status does not allow the requested operation.
    InvalidState { current: String, attempted: String },

    /// A concurrent writer updated the record first.
    VersionConflict,

    /// Payment provider call failed.
    PaymentFailed { reason: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Record store read or write failed.
    Persistence(String),
}

impl BillingError {
    // Constructor functions for cleaner error creation

    pub fn missing_field(field: impl Into<String>) -> Self {
        BillingError::MissingField(field.into())
    }

    pub fn account_not_found(external_id: ExternalUserId) -> Self {
        BillingError::AccountNotFound(external_id)
    }

    pub fn plan_not_found(plan_id: PlanId) -> Self {
        BillingError::PlanNotFound(plan_id)
    }

    pub fn already_exists(external_id: ExternalUserId) -> Self {
        BillingError::AlreadyExists(external_id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        BillingError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn version_conflict() -> Self {
        BillingError::VersionConflict
    }

    pub fn payment_failed(reason: impl Into<String>) -> Self {
        BillingError::PaymentFailed {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        BillingError::Persistence(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::MissingField(_) => ErrorCode::MissingField,
            BillingError::AccountNotFound(_) => ErrorCode::AccountNotFound,
            BillingError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            BillingError::AlreadyExists(_) => ErrorCode::AccountExists,
            BillingError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            BillingError::VersionConflict => ErrorCode::VersionConflict,
            BillingError::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            BillingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BillingError::Persistence(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            BillingError::MissingField(field) => {
                format!("Missing required field: {}", field)
            }
            BillingError::AccountNotFound(external_id) => {
                format!("No account found for user: {}", external_id)
            }
            BillingError::PlanNotFound(plan_id) => format!("Plan not found: {}", plan_id),
            BillingError::AlreadyExists(external_id) => {
                format!("User {} already has an account", external_id)
            }
            BillingError::InvalidState { current, attempted } => {
                format!("Cannot {} a subscription in {} state", attempted, current)
            }
            BillingError::VersionConflict => {
                "The account was modified by another request; retry with fresh data".to_string()
            }
            BillingError::PaymentFailed { reason } => format!("Payment failed: {}", reason),
            BillingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BillingError::Persistence(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BillingError::Persistence(_)
                | BillingError::PaymentFailed { .. }
                | BillingError::VersionConflict
        )
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BillingError {}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        let field = || {
            err.details
                .get("field")
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        };
        match err.code {
            ErrorCode::MissingField => BillingError::MissingField(field()),
            ErrorCode::VersionConflict => BillingError::VersionConflict,
            // The only external service a billing flow talks to is the
            // payment provider, so its failures surface as payment errors.
            ErrorCode::PaymentFailed | ErrorCode::ExternalServiceError => {
                BillingError::PaymentFailed {
                    reason: err.to_string(),
                }
            }
            ErrorCode::InvalidStateTransition => BillingError::InvalidState {
                current: "unknown".to_string(),
                attempted: err.to_string(),
            },
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => BillingError::ValidationFailed {
                field: field(),
                message: err.to_string(),
            },
            _ => BillingError::Persistence(err.to_string()),
        }
    }
}

impl From<BillingError> for DomainError {
    fn from(err: BillingError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
