use async_trait::async_trait;
use domain_geo::{ClassifiedError, ClassifiedResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::User;

pub(crate) fn duplicate_email(email: &str) -> ClassifiedError {
    ClassifiedError::bad_request(format!("User with email '{}' already exists", email))
}

pub(crate) fn user_not_found(id: Uuid) -> ClassifiedError {
    ClassifiedError::not_found(format!("User with id '{}' not found", id))
}

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails `BadRequest` when the email is taken.
    async fn create(&self, user: User) -> ClassifiedResult<User>;

    /// All users, oldest first
    async fn list(&self) -> ClassifiedResult<Vec<User>>;

    async fn get_by_id(&self, id: Uuid) -> ClassifiedResult<Option<User>>;

    /// Lookup by normalized email
    async fn get_by_email(&self, email: &str) -> ClassifiedResult<Option<User>>;

    /// Replace a stored user. Fails `NotFound` if it no longer exists.
    async fn update(&self, user: User) -> ClassifiedResult<User>;

    /// `false` when nothing matched
    async fn delete(&self, id: Uuid) -> ClassifiedResult<bool>;

    async fn exists(&self, id: Uuid) -> ClassifiedResult<bool>;

    async fn email_exists(&self, email: &str) -> ClassifiedResult<bool>;
}

/// Records owned by a user in other domains, removed before the user is deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDependents: Send + Sync {
    /// Returns how many dependent records were removed
    async fn remove_user_dependents(&self, user_id: Uuid) -> ClassifiedResult<u64>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> ClassifiedResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(duplicate_email(&user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    async fn list(&self) -> ClassifiedResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> ClassifiedResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> ClassifiedResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: User) -> ClassifiedResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(user_not_found(user.id));
        }
        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(duplicate_email(&user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> ClassifiedResult<bool> {
        let removed = self.users.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(removed)
    }

    async fn exists(&self, id: Uuid) -> ClassifiedResult<bool> {
        Ok(self.users.read().await.contains_key(&id))
    }

    async fn email_exists(&self, email: &str) -> ClassifiedResult<bool> {
        Ok(self.users.read().await.values().any(|u| u.email == email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_geo::{Coordinates, ErrorKind};

    fn user(email: &str) -> User {
        User::new(
            "Ada".to_string(),
            email.to_string(),
            "hash".to_string(),
            "Curitiba".to_string(),
            Coordinates::new(-49.27, -25.43),
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("ada@example.com")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));
        assert!(repo.exists(created.id).await.unwrap());
        assert!(repo.email_exists("ada@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_bad_request() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("ada@example.com")).await.unwrap();

        let err = repo.create(user("ada@example.com")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "User with email 'ada@example.com' already exists");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let err = repo.update(user("ghost@example.com")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_into_taken_email_fails() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("ada@example.com")).await.unwrap();
        let mut grace = repo.create(user("grace@example.com")).await.unwrap();

        grace.email = "ada@example.com".to_string();
        let err = repo.update(grace).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("ada@example.com")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
