//! Bank account repository.
//!
//! Account and routing numbers are encrypted before every write. Lookups by
//! either number load the caller's accounts and compare after decryption,
//! because envelopes of equal plaintexts differ.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use transposit_core::crypto::{CipherError, FieldCipher};
use transposit_core::validation::{
    ValidationError, validate_account_name, validate_account_number, validate_routing_number,
};
use transposit_shared::AppError;
use uuid::Uuid;

use crate::entities::{accounts, sea_orm_active_enums::AccountType};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
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

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::NotFound("Account not found".to_string()),
            AccountError::Validation(e) => Self::Validation(e.to_string()),
            AccountError::Cipher(e) => Self::Encryption(e.to_string()),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A bank account with its numbers in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRecord {
    /// Account ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Kind of account.
    pub account_type: AccountType,
    /// Display name.
    pub account_name: String,
    /// Account number.
    pub account_number: String,
    /// Routing number.
    pub routing_number: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl AccountRecord {
    fn open(model: accounts::Model, cipher: &dyn FieldCipher) -> Result<Self, CipherError> {
        let account_number = cipher.decode(&model.account_number).inspect_err(|_| {
            tracing::warn!(account_id = %model.id, "account number failed to decrypt");
        })?;
        let routing_number = cipher.decode(&model.routing_number).inspect_err(|_| {
            tracing::warn!(account_id = %model.id, "routing number failed to decrypt");
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            account_type: model.account_type,
            account_name: model.account_name,
            account_number,
            routing_number,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Kind of account.
    pub account_type: AccountType,
    /// Display name.
    pub account_name: String,
    /// Account number, 8 to 12 characters.
    pub account_number: String,
    /// Routing number, 9 digits.
    pub routing_number: String,
}

/// Input for updating an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Kind of account.
    pub account_type: Option<AccountType>,
    /// Display name.
    pub account_name: Option<String>,
    /// Account number.
    pub account_number: Option<String>,
    /// Routing number.
    pub routing_number: Option<String>,
}

impl UpdateAccountInput {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.account_type.is_none()
            && self.account_name.is_none()
            && self.account_number.is_none()
            && self.routing_number.is_none()
    }
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    cipher: Arc<dyn FieldCipher>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, cipher: Arc<dyn FieldCipher>) -> Self {
        Self { db, cipher }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is invalid, encryption fails, or the insert fails.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<AccountRecord, AccountError> {
        validate_account_name(&input.account_name)?;
        validate_account_number(&input.account_number)?;
        validate_routing_number(&input.routing_number)?;

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            account_type: Set(input.account_type),
            account_name: Set(input.account_name.trim().to_string()),
            account_number: Set(self.cipher.encode(input.account_number.trim())?),
            routing_number: Set(self.cipher.encode(&input.routing_number)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = account.insert(&self.db).await?;
        Ok(AccountRecord::open(model, self.cipher.as_ref())?)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn find_account_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AccountError> {
        let model = accounts::Entity::find_by_id(id).one(&self.db).await?;
        model
            .map(|m| AccountRecord::open(m, self.cipher.as_ref()))
            .transpose()
            .map_err(Into::into)
    }

    /// Lists a user's accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AccountRecord>, AccountError> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|m| AccountRecord::open(m, self.cipher.as_ref()).map_err(Into::into))
            .collect()
    }

    /// Finds one of a user's accounts by its plaintext account number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn find_by_account_number(
        &self,
        user_id: Uuid,
        account_number: &str,
    ) -> Result<Option<AccountRecord>, AccountError> {
        let wanted = account_number.trim();
        let accounts = self.list_by_user(user_id).await?;
        Ok(accounts.into_iter().find(|a| a.account_number == wanted))
    }

    /// Lists a user's accounts sharing a plaintext routing number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or decryption fails.
    pub async fn list_by_routing_number(
        &self,
        user_id: Uuid,
        routing_number: &str,
    ) -> Result<Vec<AccountRecord>, AccountError> {
        let wanted = routing_number.trim();
        let mut accounts = self.list_by_user(user_id).await?;
        accounts.retain(|a| a.routing_number == wanted);
        Ok(accounts)
    }

    /// Updates an account. Changed numbers are re-encrypted under a fresh IV.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing would change, a field is invalid, the
    /// account does not exist, or the update fails.
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<AccountRecord, AccountError> {
        if input.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(name) = &input.account_name {
            validate_account_name(name)?;
        }
        if let Some(number) = &input.account_number {
            validate_account_number(number)?;
        }
        if let Some(number) = &input.routing_number {
            validate_routing_number(number)?;
        }

        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let mut active: accounts::ActiveModel = account.into();
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        if let Some(name) = input.account_name {
            active.account_name = Set(name.trim().to_string());
        }
        if let Some(number) = input.account_number {
            active.account_number = Set(self.cipher.encode(number.trim())?);
        }
        if let Some(number) = input.routing_number {
            active.routing_number = Set(self.cipher.encode(&number)?);
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await?;
        Ok(AccountRecord::open(model, self.cipher.as_ref())?)
    }

    /// Deletes an account, cascading to its transactions and rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the delete fails.
    pub async fn delete_account(&self, id: Uuid) -> Result<Uuid, AccountError> {
        let result = accounts::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(id));
        }
        Ok(id)
    }
}
