//! Repository abstractions for data access.
//!
//! Repositories hide the `SeaORM` details from the rest of the application
//! and are the only place envelopes are produced or opened. They take and
//! return plaintext record types; entity models never leave this crate's
//! repositories with an envelope in them.

pub mod account;
pub mod distribution_rule;
pub mod incoming_deposit;
pub mod transaction;
pub mod user;

pub use account::{
    AccountError, AccountRecord, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
pub use distribution_rule::{
    CreateDistributionRuleInput, DistributionRuleError, DistributionRuleRepository, RuleRecord,
    UpdateDistributionRuleInput,
};
pub use incoming_deposit::{
    CreateDepositInput, DepositError, DepositFilter, DepositRecord, IncomingDepositRepository,
    UpdateDepositInput,
};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRecord,
    TransactionRepository,
};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository};

use std::ops::Bound;

use sea_orm::{ColumnTrait, sea_query::SimpleExpr};
use transposit_core::filter::DateWindow;

/// SQL predicates keeping `column` inside `window`.
pub(crate) fn window_predicates<C: ColumnTrait>(column: C, window: DateWindow) -> Vec<SimpleExpr> {
    let lower = match window.lower_bound() {
        Bound::Included(at) => Some(column.gte(at)),
        Bound::Excluded(at) => Some(column.gt(at)),
        Bound::Unbounded => None,
    };
    let upper = match window.upper_bound() {
        Bound::Included(at) => Some(column.lte(at)),
        Bound::Excluded(at) => Some(column.lt(at)),
        Bound::Unbounded => None,
    };
    lower.into_iter().chain(upper).collect()
}
