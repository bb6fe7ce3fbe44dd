//! PostgreSQL implementation of AccountRepository.
//!
//! Provides persistent storage for BillingAccount aggregates using PostgreSQL.
//! The subscription snapshot and payment history are stored as JSONB columns
//! since the aggregate is read and written whole.

use crate::domain::billing::{BillingAccount, PaymentRecord, Subscription};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, ExternalUserId, Timestamp};
use crate::ports::AccountRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the AccountRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Creates a new PostgresAccountRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a billing account.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    external_id: String,
    email: String,
    subscription: serde_json::Value,
    credits: f64,
    payment_history: serde_json::Value,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for BillingAccount {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let external_id = ExternalUserId::new(row.external_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid external_id: {}", e))
        })?;

        let subscription: Subscription = serde_json::from_value(row.subscription).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid subscription snapshot: {}", e),
            )
        })?;

        let payment_history: Vec<PaymentRecord> = serde_json::from_value(row.payment_history)
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid payment history: {}", e),
                )
            })?;

        Ok(BillingAccount {
            id: AccountId::from_uuid(row.id),
            external_id,
            email: row.email,
            subscription,
            credits: row.credits,
            payment_history,
            version: row.version,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn to_json<T: Serialize>(value: &T, what: &str) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to encode {}: {}", what, e),
        )
    })
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<BillingAccount>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, external_id, email, subscription, credits, payment_history,
                   version, created_at, updated_at
            FROM billing_accounts
            WHERE external_id = $1
            "#,
        )
        .bind(external_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find account: {}", e))
        })?;

        row.map(BillingAccount::try_from).transpose()
    }

    async fn insert(&self, account: &BillingAccount) -> Result<(), DomainError> {
        let subscription = to_json(&account.subscription, "subscription snapshot")?;
        let payment_history = to_json(&account.payment_history, "payment history")?;

        sqlx::query(
            r#"
            INSERT INTO billing_accounts (
                id, external_id, email, subscription, credits, payment_history,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.external_id.as_str())
        .bind(&account.email)
        .bind(subscription)
        .bind(account.credits)
        .bind(payment_history)
        .bind(account.version)
        .bind(account.created_at.as_datetime())
        .bind(account.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("billing_accounts_external_id_key") {
                    return DomainError::new(
                        ErrorCode::AccountExists,
                        "User already has a billing account",
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save account: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, account: &BillingAccount) -> Result<(), DomainError> {
        let subscription = to_json(&account.subscription, "subscription snapshot")?;
        let payment_history = to_json(&account.payment_history, "payment history")?;

        // Conditional write: only applies when the stored version still
        // matches the one observed at read time.
        let result = sqlx::query(
            r#"
            UPDATE billing_accounts SET
                email = $3,
                subscription = $4,
                credits = $5,
                payment_history = $6,
                updated_at = $7,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.version)
        .bind(&account.email)
        .bind(subscription)
        .bind(account.credits)
        .bind(payment_history)
        .bind(account.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update account: {}", e))
        })?;

        if result.rows_affected() == 0 {
            // Zero rows means either a stale version or a missing row;
            // look again to tell them apart.
            let exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM billing_accounts WHERE id = $1")
                    .bind(account.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to check account: {}", e),
                        )
                    })?;

            return Err(if exists.is_some() {
                DomainError::new(
                    ErrorCode::VersionConflict,
                    "Account was modified by another request",
                )
            } else {
                DomainError::new(ErrorCode::AccountNotFound, "Account not found")
            });
        }

        Ok(())
    }
}
