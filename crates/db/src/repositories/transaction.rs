//! Transaction repository.
//!
//! Amounts are stored as envelopes of their decimal string. Status, account
//! and date filters run in SQL; amount filters run after decryption.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use transposit_core::crypto::{CipherError, FieldCipher};
use transposit_core::filter::{AmountFilter, DateWindow};
use transposit_core::validation::{ValidationError, validate_transaction_amount};
use transposit_shared::AppError;
use uuid::Uuid;

use crate::entities::{accounts, sea_orm_active_enums::TransactionStatus, transactions};
use super::window_predicates;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Account not found, or owned by someone else.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Rejected input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A field could not be encrypted or decrypted.
    #[error("Field cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => Self::NotFound("Transaction not found".to_string()),
            TransactionError::AccountNotFound(_) => Self::NotFound("Account not found".to_string()),
            TransactionError::Validation(e) => Self::Validation(e.to_string()),
            TransactionError::Cipher(e) => Self::Encryption(e.to_string()),
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A transaction with its amount in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Account the transaction belongs to.
    pub account_id: Uuid,
    /// Signed amount.
    pub amount: Decimal,
    /// Lifecycle state.
    pub status: TransactionStatus,
    /// When the transaction happened.
    pub transaction_date: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    fn open(model: transactions::Model, cipher: &dyn FieldCipher) -> Result<Self, CipherError> {
        let amount = cipher.decode_decimal(&model.amount).inspect_err(|_| {
            tracing::warn!(transaction_id = %model.id, "amount failed to decrypt");
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            account_id: model.account_id,
            amount,
            status: model.status,
            transaction_date: model.transaction_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Account, which must belong to `user_id`.
    pub account_id: Uuid,
    /// Signed, non-zero amount.
    pub amount: Decimal,
    /// Initial status, `pending` when absent.
    pub status: Option<TransactionStatus>,
    /// When the transaction happened, now when absent.
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Filter for listing a user's transactions.
#[derive(Debug, Clone, Copy)]
pub struct TransactionFilter {
    /// Owning user. Always applied.
    pub user_id: Uuid,
    /// Restrict to one account.
    pub account_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<TransactionStatus>,
    /// Restrict `transaction_date` to a window.
    pub window: Option<DateWindow>,
    /// Compare the decrypted amount.
    pub amount: Option<AmountFilter>,
}

impl TransactionFilter {
    /// A filter matching every transaction of `user_id`.
    #[must_use]
    pub const fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            account_id: None,
            status: None,
            window: None,
            amount: None,
        }
    }
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
    cipher: Arc<dyn FieldCipher>,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, cipher: Arc<dyn FieldCipher>) -> Self {
        Self { db, cipher }
    }

    /// Records a transaction against one of the user's accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero, the account is not the
    /// user's, encryption fails, or the insert fails.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<TransactionRecord, TransactionError> {
        validate_transaction_amount(input.amount)?;

        let owned = accounts::Entity::find_by_id(input.account_id)
            .filter(accounts::Column::UserId.eq(input.user_id))
            .one(&self.db)
            .await?;
        if owned.is_none() {
            return Err(TransactionError::AccountNotFound(input.account_id));
        }

        let now = Utc::now();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            account_id: Set(input.account_id),
            amount: Set(self.cipher.encode_decimal(input.amount)?),
            status: Set(input.status.unwrap_or_default()),
            transaction_date: Set(input.transaction_date.unwrap_or(now).into()),
            created_at: Set(now.into()),
        };

        let model = transaction.insert(&self.db).await?;
        Ok(TransactionRecord::open(model, self.cipher.as_ref())?)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TransactionRecord>, TransactionError> {
        let model = transactions::Entity::find_by_id(id).one(&self.db).await?;
        model
            .map(|m| TransactionRecord::open(m, self.cipher.as_ref()))
            .transpose()
            .map_err(Into::into)
    }

    /// Lists a user's transactions matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, TransactionError> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(filter.user_id));

        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(window) = filter.window {
            for predicate in window_predicates(transactions::Column::TransactionDate, window) {
                query = query.filter(predicate);
            }
        }

        let models = query
            .order_by_desc(transactions::Column::TransactionDate)
            .all(&self.db)
            .await?;

        let mut records = Vec::with_capacity(models.len());
        for model in models {
            let record = TransactionRecord::open(model, self.cipher.as_ref())?;
            if filter.amount.is_none_or(|f| f.matches(record.amount)) {
                records.push(record);
            }
        }
        Ok(records)
    }
}
