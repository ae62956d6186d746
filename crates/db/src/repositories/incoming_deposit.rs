//! Incoming deposit repository.
//!
//! Both the amount and the source are stored as envelopes, so amount and
//! source searches decrypt the user's deposits before comparing.

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
use transposit_core::validation::{
    ValidationError, validate_deposit_amount, validate_deposit_source,
};
use transposit_shared::AppError;
use uuid::Uuid;

use crate::entities::incoming_deposits;
use super::window_predicates;

/// Error types for incoming deposit operations.
#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    /// Deposit not found.
    #[error("Incoming deposit not found: {0}")]
    NotFound(Uuid),

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

impl From<DepositError> for AppError {
    fn from(err: DepositError) -> Self {
        match err {
            DepositError::NotFound(_) => Self::NotFound("Incoming deposit not found".to_string()),
            DepositError::Validation(e) => Self::Validation(e.to_string()),
            DepositError::Cipher(e) => Self::Encryption(e.to_string()),
            DepositError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// An incoming deposit with amount and source in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositRecord {
    /// Deposit ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Positive amount.
    pub amount: Decimal,
    /// Where the money came from.
    pub source: String,
    /// When the money arrived.
    pub received_date: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl DepositRecord {
    fn open(model: incoming_deposits::Model, cipher: &dyn FieldCipher) -> Result<Self, CipherError> {
        let amount = cipher.decode_decimal(&model.amount).inspect_err(|_| {
            tracing::warn!(deposit_id = %model.id, "amount failed to decrypt");
        })?;
        let source = cipher.decode(&model.source).inspect_err(|_| {
            tracing::warn!(deposit_id = %model.id, "source failed to decrypt");
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            amount,
            source,
            received_date: model.received_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

/// Input for recording a deposit.
#[derive(Debug, Clone)]
pub struct CreateDepositInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Positive amount.
    pub amount: Decimal,
    /// Where the money came from.
    pub source: String,
    /// When the money arrived, now when absent.
    pub received_date: Option<DateTime<Utc>>,
}

/// Input for updating a deposit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateDepositInput {
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Where the money came from.
    pub source: Option<String>,
    /// When the money arrived.
    pub received_date: Option<DateTime<Utc>>,
}

impl UpdateDepositInput {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_none() && self.source.is_none() && self.received_date.is_none()
    }
}

/// Filter for listing a user's deposits.
#[derive(Debug, Clone)]
pub struct DepositFilter {
    /// Owning user. Always applied.
    pub user_id: Uuid,
    /// Restrict `received_date` to a window.
    pub window: Option<DateWindow>,
    /// Compare the decrypted amount.
    pub amount: Option<AmountFilter>,
    /// Exact match on the decrypted source.
    pub source: Option<String>,
}

impl DepositFilter {
    /// A filter matching every deposit of `user_id`.
    #[must_use]
    pub const fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            window: None,
            amount: None,
            source: None,
        }
    }
}

/// Incoming deposit repository.
#[derive(Debug, Clone)]
pub struct IncomingDepositRepository {
    db: DatabaseConnection,
    cipher: Arc<dyn FieldCipher>,
}

impl IncomingDepositRepository {
    /// Creates a new incoming deposit repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, cipher: Arc<dyn FieldCipher>) -> Self {
        Self { db, cipher }
    }

    /// Records a deposit.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount or source is invalid, encryption
    /// fails, or the insert fails.
    pub async fn create_deposit(
        &self,
        input: CreateDepositInput,
    ) -> Result<DepositRecord, DepositError> {
        validate_deposit_amount(input.amount)?;
        validate_deposit_source(&input.source)?;

        let now = Utc::now();
        let deposit = incoming_deposits::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            amount: Set(self.cipher.encode_decimal(input.amount)?),
            source: Set(self.cipher.encode(input.source.trim())?),
            received_date: Set(input.received_date.unwrap_or(now).into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = deposit.insert(&self.db).await?;
        Ok(DepositRecord::open(model, self.cipher.as_ref())?)
    }

    /// Finds a deposit by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DepositRecord>, DepositError> {
        let model = incoming_deposits::Entity::find_by_id(id)
            .one(&self.db)
            .await?;
        model
            .map(|m| DepositRecord::open(m, self.cipher.as_ref()))
            .transpose()
            .map_err(Into::into)
    }

    /// Lists a user's deposits matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn list(&self, filter: DepositFilter) -> Result<Vec<DepositRecord>, DepositError> {
        let mut query = incoming_deposits::Entity::find()
            .filter(incoming_deposits::Column::UserId.eq(filter.user_id));

        if let Some(window) = filter.window {
            for predicate in window_predicates(incoming_deposits::Column::ReceivedDate, window) {
                query = query.filter(predicate);
            }
        }

        let models = query
            .order_by_desc(incoming_deposits::Column::ReceivedDate)
            .all(&self.db)
            .await?;

        let source = filter.source.as_deref().map(str::trim);
        let mut records = Vec::with_capacity(models.len());
        for model in models {
            let record = DepositRecord::open(model, self.cipher.as_ref())?;
            let amount_ok = filter.amount.is_none_or(|f| f.matches(record.amount));
            let source_ok = source.is_none_or(|s| record.source == s);
            if amount_ok && source_ok {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Updates a deposit. Changed fields are re-encrypted under a fresh IV.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing would change, a field is invalid, the
    /// deposit does not exist, or the update fails.
    pub async fn update_deposit(
        &self,
        id: Uuid,
        input: UpdateDepositInput,
    ) -> Result<DepositRecord, DepositError> {
        if input.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(amount) = input.amount {
            validate_deposit_amount(amount)?;
        }
        if let Some(source) = &input.source {
            validate_deposit_source(source)?;
        }

        let deposit = incoming_deposits::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DepositError::NotFound(id))?;

        let mut active: incoming_deposits::ActiveModel = deposit.into();
        if let Some(amount) = input.amount {
            active.amount = Set(self.cipher.encode_decimal(amount)?);
        }
        if let Some(source) = input.source {
            active.source = Set(self.cipher.encode(source.trim())?);
        }
        if let Some(received_date) = input.received_date {
            active.received_date = Set(received_date.into());
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await?;
        Ok(DepositRecord::open(model, self.cipher.as_ref())?)
    }

    /// Deletes a deposit and returns it as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the deposit does not exist, decryption fails, or
    /// the delete fails.
    pub async fn delete_deposit(&self, id: Uuid) -> Result<DepositRecord, DepositError> {
        let deposit = self.find_by_id(id).await?.ok_or(DepositError::NotFound(id))?;
        incoming_deposits::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(deposit)
    }
}
