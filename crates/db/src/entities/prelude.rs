//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::distribution_rules::Entity as DistributionRules;
pub use super::incoming_deposits::Entity as IncomingDeposits;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
