//! Tests for the user repository against a mock database.

mod common;

use sea_orm::{DatabaseBackend, MockDatabase};
use transposit_core::validation::ValidationError;
use transposit_db::UserRepository;
use transposit_db::entities::users;
use transposit_db::repositories::{CreateUserInput, UpdateUserInput, UserError};
use uuid::Uuid;

use common::{count_row, deleted, user_model};

fn create_input(username: &str) -> CreateUserInput {
    CreateUserInput {
        username: username.to_string(),
        email: "jane@example.com".to_string(),
        password_hash: "$argon2id$hash".to_string(),
        first_name: Some("Jane".to_string()),
        last_name: None,
        phone_number: None,
        date_of_birth: None,
    }
}

#[tokio::test]
async fn test_create_user() {
    let stored = user_model("jane");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(0)]])
        .append_query_results([[stored.clone()]])
        .into_connection();

    let repo = UserRepository::new(db);
    let user = repo.create(create_input("  jane  ")).await.unwrap();

    assert_eq!(user, stored);
}

#[tokio::test]
async fn test_create_user_username_taken() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)]])
        .into_connection();

    let repo = UserRepository::new(db);
    let err = repo.create(create_input("jane")).await.unwrap_err();

    assert!(matches!(err, UserError::UsernameTaken(name) if name == "jane"));
}

#[tokio::test]
async fn test_create_user_rejects_short_username() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let repo = UserRepository::new(db);
    let err = repo.create(create_input("jo")).await.unwrap_err();

    assert!(matches!(err, UserError::Validation(ValidationError::Username)));
}

#[tokio::test]
async fn test_create_user_rejects_bad_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let mut input = create_input("jane");
    input.email = "not-an-email".to_string();
    let err = UserRepository::new(db).create(input).await.unwrap_err();

    assert!(matches!(err, UserError::Validation(ValidationError::Email)));
}

#[tokio::test]
async fn test_find_by_username() {
    let stored = user_model("jane");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored.clone()]])
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();

    let repo = UserRepository::new(db);

    assert_eq!(repo.find_by_username("jane").await.unwrap(), Some(stored));
    assert_eq!(repo.find_by_username("nobody").await.unwrap(), None);
}

#[tokio::test]
async fn test_update_without_fields_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let err = UserRepository::new(db)
        .update(Uuid::new_v4(), UpdateUserInput::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::Validation(ValidationError::EmptyUpdate)));
}

#[tokio::test]
async fn test_update_missing_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();

    let id = Uuid::new_v4();
    let input = UpdateUserInput {
        first_name: Some("Janet".to_string()),
        ..Default::default()
    };
    let err = UserRepository::new(db).update(id, input).await.unwrap_err();

    assert!(matches!(err, UserError::NotFound(missing) if missing == id));
}

#[tokio::test]
async fn test_update_user() {
    let stored = user_model("jane");
    let mut updated = stored.clone();
    updated.first_name = Some("Janet".to_string());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored.clone()]])
        .append_query_results([[updated.clone()]])
        .into_connection();

    let input = UpdateUserInput {
        first_name: Some("Janet".to_string()),
        ..Default::default()
    };
    let user = UserRepository::new(db).update(stored.id, input).await.unwrap();

    assert_eq!(user.first_name.as_deref(), Some("Janet"));
}

#[tokio::test]
async fn test_delete_returns_deleted_user() {
    let stored = user_model("jane");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored.clone()]])
        .append_exec_results([deleted(1)])
        .into_connection();

    let user = UserRepository::new(db).delete(stored.id).await.unwrap();
    assert_eq!(user.id, stored.id);
}

#[tokio::test]
async fn test_password_hash_not_serialized() {
    let json = serde_json::to_value(user_model("jane")).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["username"], "jane");
}
