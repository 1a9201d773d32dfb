//! Integration tests for the Users domain against real PostgreSQL.

use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn register_input(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: "integration-password".to_string(),
    }
}

#[tokio::test]
async fn test_register_persists_hash_not_password() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("persists_hash");
    let repo = PgUserRepository::new(db.connection());
    let service = UserService::new(repo.clone());

    let registered = service
        .register(register_input(&data.username("alice")))
        .await
        .unwrap();

    let stored = repo
        .find_by_username(&registered.username)
        .await
        .unwrap();
    let stored = assert_some(stored, "registered user should be stored");
    assert_uuid_eq(stored.id, registered.id, "user id");
    assert!(stored.password_hash.starts_with("$argon2"));
    assert_ne!(stored.password_hash, "integration-password");
}

#[tokio::test]
async fn test_duplicate_insert_hits_unique_constraint() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("unique_username");
    let repo = PgUserRepository::new(db.connection());
    let username = data.username("bob");

    repo.create(User::new(username.clone(), "hash-one".to_string()))
        .await
        .unwrap();
    let err = repo
        .create(User::new(username.clone(), "hash-two".to_string()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), format!("User {username} already registered."));
}

#[tokio::test]
async fn test_authenticate_against_postgres() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("authenticate");
    let service = UserService::new(PgUserRepository::new(db.connection()));
    let username = data.username("carol");

    let registered = service.register(register_input(&username)).await.unwrap();

    let authed = service
        .authenticate(LoginRequest {
            username: username.clone(),
            password: "integration-password".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(authed, registered);

    let rejected = service
        .authenticate(LoginRequest {
            username,
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(rejected, UserError::InvalidCredentials));

    assert_eq!(service.get_user(registered.id).await.unwrap(), registered);
}
