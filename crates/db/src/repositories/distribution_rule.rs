//! Distribution rule repository.
//!
//! A rule sends a percentage of each incoming deposit to one account. The
//! percentages of a user's rules may add up to at most 100.
//!
//! Writes that check that total run in one database transaction holding the
//! owner's `users` row `FOR UPDATE`, so concurrent writes for the same user
//! see each other's rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use transposit_core::validation::{
    ValidationError, validate_percentage, validate_percentage_total,
};
use transposit_shared::AppError;
use uuid::Uuid;

use crate::entities::{accounts, distribution_rules, users};

/// Error types for distribution rule operations.
#[derive(Debug, thiserror::Error)]
pub enum DistributionRuleError {
    /// Rule not found.
    #[error("Distribution rule not found: {0}")]
    NotFound(Uuid),

    /// Owning user no longer exists.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Target account not found, or owned by someone else.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Rejected input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DistributionRuleError> for AppError {
    fn from(err: DistributionRuleError) -> Self {
        match err {
            DistributionRuleError::NotFound(_) => {
                Self::NotFound("Distribution rule not found".to_string())
            }
            DistributionRuleError::UserNotFound(_) => Self::NotFound("User not found".to_string()),
            DistributionRuleError::AccountNotFound(_) => {
                Self::NotFound("Account not found".to_string())
            }
            DistributionRuleError::Validation(e) => Self::Validation(e.to_string()),
            DistributionRuleError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A distribution rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRecord {
    /// Rule ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Account receiving the share.
    pub account_id: Uuid,
    /// Share of each deposit, 0 to 100.
    pub percentage: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl From<distribution_rules::Model> for RuleRecord {
    fn from(model: distribution_rules::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            account_id: model.account_id,
            percentage: model.percentage,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Input for creating a rule.
#[derive(Debug, Clone)]
pub struct CreateDistributionRuleInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Target account, which must belong to `user_id`.
    pub account_id: Uuid,
    /// Share of each deposit, 0 to 100.
    pub percentage: Decimal,
}

/// Input for updating a rule. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateDistributionRuleInput {
    /// Target account.
    pub account_id: Option<Uuid>,
    /// Share of each deposit.
    pub percentage: Option<Decimal>,
}

impl UpdateDistributionRuleInput {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.account_id.is_none() && self.percentage.is_none()
    }
}

/// Distribution rule repository.
#[derive(Debug, Clone)]
pub struct DistributionRuleRepository {
    db: DatabaseConnection,
}

impl DistributionRuleRepository {
    /// Creates a new distribution rule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage is out of range or would push the
    /// user's total above 100, the account is not the user's, or the insert
    /// fails.
    pub async fn create_rule(
        &self,
        input: CreateDistributionRuleInput,
    ) -> Result<RuleRecord, DistributionRuleError> {
        validate_percentage(input.percentage)?;

        let txn = self.db.begin().await?;

        lock_owner(&txn, input.user_id).await?;
        ensure_account_owned(&txn, input.user_id, input.account_id).await?;

        let existing = rules_of(&txn, input.user_id).await?;
        validate_percentage_total(existing.iter().map(|r| r.percentage), input.percentage)?;

        let now = Utc::now().into();
        let rule = distribution_rules::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            account_id: Set(input.account_id),
            percentage: Set(input.percentage),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(rule.into())
    }

    /// Finds a rule by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RuleRecord>, DistributionRuleError> {
        Ok(distribution_rules::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(RuleRecord::from))
    }

    /// Lists a user's rules, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RuleRecord>, DistributionRuleError> {
        let rules = rules_of(&self.db, user_id).await?;
        Ok(rules.into_iter().map(RuleRecord::from).collect())
    }

    /// Updates a rule's account or percentage.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing would change, the percentage is invalid or
    /// would push the total above 100, the account is not the user's, the
    /// rule does not exist, or the update fails.
    pub async fn update_rule(
        &self,
        id: Uuid,
        input: UpdateDistributionRuleInput,
    ) -> Result<RuleRecord, DistributionRuleError> {
        if input.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(percentage) = input.percentage {
            validate_percentage(percentage)?;
        }

        let txn = self.db.begin().await?;

        let rule = distribution_rules::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DistributionRuleError::NotFound(id))?;

        lock_owner(&txn, rule.user_id).await?;

        if let Some(account_id) = input.account_id
            && account_id != rule.account_id
        {
            ensure_account_owned(&txn, rule.user_id, account_id).await?;
        }

        if let Some(percentage) = input.percentage {
            let others = rules_of(&txn, rule.user_id).await?;
            validate_percentage_total(
                others.iter().filter(|r| r.id != id).map(|r| r.percentage),
                percentage,
            )?;
        }

        let mut active: distribution_rules::ActiveModel = rule.into();
        if let Some(account_id) = input.account_id {
            active.account_id = Set(account_id);
        }
        if let Some(percentage) = input.percentage {
            active.percentage = Set(percentage);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    /// Deletes a rule and returns it as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule does not exist or the delete fails.
    pub async fn delete_rule(&self, id: Uuid) -> Result<RuleRecord, DistributionRuleError> {
        let rule = self
            .find_by_id(id)
            .await?
            .ok_or(DistributionRuleError::NotFound(id))?;
        distribution_rules::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(rule)
    }
}

/// Takes the owner's row lock for the rest of `txn`.
async fn lock_owner(txn: &DatabaseTransaction, user_id: Uuid) -> Result<(), DistributionRuleError> {
    users::Entity::find_by_id(user_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .map(|_| ())
        .ok_or(DistributionRuleError::UserNotFound(user_id))
}

async fn ensure_account_owned(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    account_id: Uuid,
) -> Result<(), DistributionRuleError> {
    accounts::Entity::find_by_id(account_id)
        .filter(accounts::Column::UserId.eq(user_id))
        .one(txn)
        .await?
        .map(|_| ())
        .ok_or(DistributionRuleError::AccountNotFound(account_id))
}

async fn rules_of<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Vec<distribution_rules::Model>, DbErr> {
    distribution_rules::Entity::find()
        .filter(distribution_rules::Column::UserId.eq(user_id))
        .order_by_asc(distribution_rules::Column::CreatedAt)
        .all(db)
        .await
}
