//! Database seeder for Transposit development and testing.
//!
//! Seeds a demo user with two accounts, a few incoming deposits, a split of
//! distribution rules and a month of transactions. Everything goes through
//! the repositories, so the sensitive columns are encrypted with the
//! configured key exactly as the server would write them.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use transposit_core::auth::hash_password;
use transposit_core::crypto::{AesCbcCipher, EncryptionKey, FieldCipher};
use transposit_db::entities::sea_orm_active_enums::{AccountType, TransactionStatus};
use transposit_db::repositories::{
    AccountRepository, CreateAccountInput, CreateDepositInput, CreateDistributionRuleInput,
    CreateTransactionInput, CreateUserInput, DistributionRuleRepository,
    IncomingDepositRepository, TransactionRepository, UserRepository,
};
use transposit_shared::AppConfig;

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let key = EncryptionKey::from_hex(&config.encryption.key)
        .context("TRANSPOSIT__ENCRYPTION__KEY must be 64 hex characters")?;
    let cipher: Arc<dyn FieldCipher> = Arc::new(AesCbcCipher::new(key));

    println!("Connecting to database...");
    let db = transposit_db::connect(&config.database.url, 2, 1)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding demo user...");
    let Some(user_id) = seed_demo_user(&db).await? else {
        println!("  Demo user already exists, skipping...");
        return Ok(());
    };

    println!("Seeding accounts...");
    let (checking, savings) = seed_accounts(&db, &cipher, user_id).await?;

    println!("Seeding distribution rules...");
    seed_rules(&db, user_id, checking, savings).await?;

    println!("Seeding incoming deposits...");
    seed_deposits(&db, &cipher, user_id).await?;

    println!("Seeding transactions...");
    seed_transactions(&db, &cipher, user_id, checking).await?;

    println!("Seeding complete! Log in as {DEMO_USERNAME} / {DEMO_PASSWORD}");
    Ok(())
}

/// Creates the demo user unless it is already there.
async fn seed_demo_user(db: &DatabaseConnection) -> anyhow::Result<Option<Uuid>> {
    let users = UserRepository::new(db.clone());
    if users.username_exists(DEMO_USERNAME).await? {
        return Ok(None);
    }

    let user = users
        .create(CreateUserInput {
            username: DEMO_USERNAME.to_string(),
            email: "demo@transposit.dev".to_string(),
            password_hash: hash_password(DEMO_PASSWORD)?,
            first_name: Some("Demo".to_string()),
            last_name: Some("User".to_string()),
            phone_number: None,
            date_of_birth: None,
        })
        .await?;

    println!("  Created demo user: {}", user.username);
    Ok(Some(user.id))
}

async fn seed_accounts(
    db: &DatabaseConnection,
    cipher: &Arc<dyn FieldCipher>,
    user_id: Uuid,
) -> anyhow::Result<(Uuid, Uuid)> {
    let accounts = AccountRepository::new(db.clone(), Arc::clone(cipher));

    let checking = accounts
        .create_account(CreateAccountInput {
            user_id,
            account_type: AccountType::Checking,
            account_name: "Everyday".to_string(),
            account_number: "123456789012".to_string(),
            routing_number: "021000021".to_string(),
        })
        .await?;
    let savings = accounts
        .create_account(CreateAccountInput {
            user_id,
            account_type: AccountType::Savings,
            account_name: "Rainy day".to_string(),
            account_number: "98765432".to_string(),
            routing_number: "021000021".to_string(),
        })
        .await?;

    println!("  Created 2 accounts");
    Ok((checking.id, savings.id))
}

async fn seed_rules(
    db: &DatabaseConnection,
    user_id: Uuid,
    checking: Uuid,
    savings: Uuid,
) -> anyhow::Result<()> {
    let rules = DistributionRuleRepository::new(db.clone());
    for (account_id, percentage) in [(checking, dec!(70)), (savings, dec!(30))] {
        rules
            .create_rule(CreateDistributionRuleInput {
                user_id,
                account_id,
                percentage,
            })
            .await?;
    }

    println!("  Created 2 distribution rules (70/30)");
    Ok(())
}

async fn seed_deposits(
    db: &DatabaseConnection,
    cipher: &Arc<dyn FieldCipher>,
    user_id: Uuid,
) -> anyhow::Result<()> {
    let deposits = IncomingDepositRepository::new(db.clone(), Arc::clone(cipher));
    let now = Utc::now();
    let seeds = [
        (dec!(2500.00), "Payroll", 28),
        (dec!(2500.00), "Payroll", 14),
        (dec!(180.25), "Tax refund", 9),
        (dec!(1500.00), "Freelance", 2),
    ];

    for (amount, source, days_ago) in seeds {
        deposits
            .create_deposit(CreateDepositInput {
                user_id,
                amount,
                source: source.to_string(),
                received_date: Some(now - Duration::days(days_ago)),
            })
            .await?;
    }

    println!("  Created {} incoming deposits", seeds.len());
    Ok(())
}

async fn seed_transactions(
    db: &DatabaseConnection,
    cipher: &Arc<dyn FieldCipher>,
    user_id: Uuid,
    account_id: Uuid,
) -> anyhow::Result<()> {
    let transactions = TransactionRepository::new(db.clone(), Arc::clone(cipher));
    let now = Utc::now();
    let mut inserted = 0;

    for days_ago in (1..=30).step_by(3) {
        // Alternate spending and refunds so amount filters have both signs.
        let amount = if days_ago % 2 == 0 {
            Decimal::from(days_ago) * dec!(-4.75)
        } else {
            Decimal::from(days_ago) * dec!(12.50)
        };
        let status = if days_ago > 3 {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Pending
        };

        transactions
            .create_transaction(CreateTransactionInput {
                user_id,
                account_id,
                amount,
                status: Some(status),
                transaction_date: Some(now - Duration::days(days_ago)),
            })
            .await?;
        inserted += 1;
    }

    println!("  Created {inserted} transactions");
    Ok(())
}
