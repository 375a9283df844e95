//! Integration tests for the Users domain against a real MongoDB
//!
//! Run with `cargo test -p domain_users -- --ignored` (requires Docker).

use domain_geo::{Coordinates, ErrorKind};
use domain_users::*;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

fn user(builder: &TestDataBuilder, local: &str) -> User {
    User::new(
        builder.name("user", local),
        builder.email(local),
        "hash".to_string(),
        "Curitiba, Brazil".to_string(),
        Coordinates::new(-49.2733, -25.4284),
    )
}

async fn repository(mongo: &TestMongo, builder: &TestDataBuilder) -> MongoUserRepository {
    let repo = MongoUserRepository::new(&mongo.database(&builder.database_name()));
    repo.ensure_indexes().await.unwrap();
    repo
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_lookup_user() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("create_and_lookup_user");
    let repo = repository(&mongo, &builder).await;

    let created = repo.create(user(&builder, "owner")).await.unwrap();

    let by_id = assert_some(repo.get_by_id(created.id).await.unwrap(), "user by id");
    assert_uuid_eq(by_id.id, created.id, "user id");
    assert_eq!(by_id.coordinates, created.coordinates);

    let by_email = assert_some(
        repo.get_by_email(&created.email).await.unwrap(),
        "user by email",
    );
    assert_uuid_eq(by_email.id, created.id, "user found by email");

    assert!(repo.exists(created.id).await.unwrap());
    assert!(repo.email_exists(&created.email).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_email_index() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("unique_email_index");
    let repo = repository(&mongo, &builder).await;

    repo.create(user(&builder, "owner")).await.unwrap();
    let err = repo.create(user(&builder, "owner")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(err.message().contains("already exists"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete_user() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("update_and_delete_user");
    let repo = repository(&mongo, &builder).await;

    let mut created = repo.create(user(&builder, "owner")).await.unwrap();
    created.name = "Renamed".to_string();
    let updated = repo.update(created.clone()).await.unwrap();
    assert_eq!(updated.name, "Renamed");

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.exists(created.id).await.unwrap());

    let err = repo.update(created).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
