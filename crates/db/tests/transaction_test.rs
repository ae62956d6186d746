//! Tests for the transaction repository against a mock database.

mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use transposit_core::filter::{AmountFilter, DateWindow};
use transposit_core::validation::ValidationError;
use transposit_db::TransactionRepository;
use transposit_db::entities::{accounts, sea_orm_active_enums::TransactionStatus};
use transposit_db::repositories::{CreateTransactionInput, TransactionError, TransactionFilter};
use uuid::Uuid;

use common::{account_model, cipher, transaction_model};

#[tokio::test]
async fn test_create_transaction_defaults_to_pending() {
    let cipher = cipher();
    let user_id = Uuid::new_v4();
    let account = account_model(cipher.as_ref(), user_id, "11112222", "021000021");
    let stored = transaction_model(cipher.as_ref(), user_id, account.id, "1500.00", 4);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[account.clone()]])
        .append_query_results([[stored.clone()]])
        .into_connection();
    let repo = TransactionRepository::new(db.clone(), cipher);

    let record = repo
        .create_transaction(CreateTransactionInput {
            user_id,
            account_id: account.id,
            amount: dec!(1500.00),
            status: None,
            transaction_date: None,
        })
        .await
        .unwrap();

    assert_eq!(record.id, stored.id);
    assert_eq!(record.amount, dec!(1500.00));
    assert_eq!(record.status, TransactionStatus::Pending);

    drop(repo);
    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("1500.00"));
    assert!(log.contains("pending"));
}

#[tokio::test]
async fn test_create_transaction_on_foreign_account() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<accounts::Model>::new()])
        .into_connection();
    let repo = TransactionRepository::new(db, cipher());

    let account_id = Uuid::new_v4();
    let err = repo
        .create_transaction(CreateTransactionInput {
            user_id: Uuid::new_v4(),
            account_id,
            amount: dec!(10),
            status: None,
            transaction_date: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TransactionError::AccountNotFound(id) if id == account_id));
}

#[tokio::test]
async fn test_create_transaction_rejects_zero() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = TransactionRepository::new(db, cipher());

    let err = repo
        .create_transaction(CreateTransactionInput {
            user_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            amount: dec!(0.00),
            status: Some(TransactionStatus::Completed),
            transaction_date: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TransactionError::Validation(ValidationError::ZeroAmount)));
}

#[tokio::test]
async fn test_list_by_amount_compares_decimals() {
    let cipher = cipher();
    let user_id = Uuid::new_v4();
    let account_id = Uuid::new_v4();
    let exact = transaction_model(cipher.as_ref(), user_id, account_id, "1500.00", 3);
    let other = transaction_model(cipher.as_ref(), user_id, account_id, "20.00", 2);
    let unscaled = transaction_model(cipher.as_ref(), user_id, account_id, "1500", 1);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[exact.clone(), other, unscaled.clone()]])
        .into_connection();
    let repo = TransactionRepository::new(db, cipher);

    let filter = TransactionFilter {
        amount: Some(AmountFilter::Equal(dec!(1500))),
        ..TransactionFilter::for_user(user_id)
    };
    let records = repo.list(filter).await.unwrap();
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

    assert_eq!(ids, vec![exact.id, unscaled.id]);
}

#[tokio::test]
async fn test_list_pushes_date_and_status_into_sql() {
    let cipher = cipher();
    let user_id = Uuid::new_v4();
    let account_id = Uuid::new_v4();
    let stored = transaction_model(cipher.as_ref(), user_id, account_id, "-42.10", 15);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored.clone()]])
        .into_connection();
    let repo = TransactionRepository::new(db.clone(), cipher);

    let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let filter = TransactionFilter {
        status: Some(TransactionStatus::Pending),
        window: Some(DateWindow::On(day)),
        ..TransactionFilter::for_user(user_id)
    };
    let records = repo.list(filter).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, dec!(-42.10));

    drop(repo);
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("transaction_date"));
    assert!(log.contains("status"));
    assert!(log.contains("user_id"));
}

#[tokio::test]
async fn test_find_by_id_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<transposit_db::entities::transactions::Model>::new()])
        .into_connection();
    let repo = TransactionRepository::new(db, cipher());

    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}
