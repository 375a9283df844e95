use domain_geo::{ClassifiedError, ClassifiedResult, Coordinates, DeleteConfirmation, Geocoder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{CreateUser, UpdateUser, User, UserResponse, normalize_email};
use crate::password::hash_password;
use crate::repository::{UserDependents, UserRepository, duplicate_email, user_not_found};
use crate::validation::{Location, validate_user_create, validate_user_update};

/// Parse a caller-supplied id. Malformed ids cannot match a record.
pub fn parse_user_id(id: &str) -> ClassifiedResult<Uuid> {
    Uuid::parse_str(id.trim())
        .map_err(|_| ClassifiedError::not_found(format!("User with id '{}' not found", id)))
}

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    geocoder: Arc<dyn Geocoder>,
    dependents: Option<Arc<dyn UserDependents>>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            geocoder: Arc::clone(&self.geocoder),
            dependents: self.dependents.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, geocoder: Arc<dyn Geocoder>) -> Self {
        Self::from_shared(Arc::new(repository), geocoder)
    }

    /// Share a repository already owned elsewhere (e.g. by the session service)
    pub fn from_shared(repository: Arc<R>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            repository,
            geocoder,
            dependents: None,
        }
    }

    /// Cascade user deletion to records owned in other domains
    pub fn with_dependents(mut self, dependents: Arc<dyn UserDependents>) -> Self {
        self.dependents = Some(dependents);
        self
    }

    /// Derive the missing half of a location through the geocoder.
    /// Exactly one outbound call.
    async fn resolve(&self, location: Location) -> ClassifiedResult<(String, Coordinates)> {
        match location {
            Location::Address(address) => {
                let coordinates = self.geocoder.coordinates_from_address(&address).await?;
                Ok((address, coordinates))
            }
            Location::Coordinates(coordinates) => {
                let address = self.geocoder.address_from_coordinates(coordinates).await?;
                Ok((address, coordinates))
            }
        }
    }

    /// Create a new user, deriving whichever location field was not supplied
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> ClassifiedResult<UserResponse> {
        let location = validate_user_create(&input)?;
        let email = normalize_email(&input.email);

        if self.repository.email_exists(&email).await? {
            return Err(duplicate_email(&email));
        }

        let (address, coordinates) = self.resolve(location).await?;
        let password_hash = hash_password(&input.password)?;

        let user = User::new(
            input.name.trim().to_string(),
            email,
            password_hash,
            address,
            coordinates,
        );
        let created = self.repository.create(user).await?;

        tracing::info!(user_id = %created.id, "User registered");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> ClassifiedResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: &str) -> ClassifiedResult<UserResponse> {
        let user_id = parse_user_id(id)?;
        self.repository
            .get_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| user_not_found(user_id))
    }

    /// Apply a partial update, re-deriving location when the patch carries one half of it
    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: &str, patch: UpdateUser) -> ClassifiedResult<UserResponse> {
        let location = validate_user_update(&patch)?;
        let user_id = parse_user_id(id)?;

        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        if let Some(email) = patch.email.as_deref().map(normalize_email) {
            if email != user.email && self.repository.email_exists(&email).await? {
                return Err(duplicate_email(&email));
            }
        }

        let resolved = match location {
            Some(location) => Some(self.resolve(location).await?),
            None => None,
        };
        let password_hash = patch.password.as_deref().map(hash_password).transpose()?;

        let mut patch = patch;
        patch.name = patch.name.map(|name| name.trim().to_string());
        user.apply_update(patch, resolved, password_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete a user and, when configured, everything the user owns
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> ClassifiedResult<DeleteConfirmation> {
        if id.trim().is_empty() {
            return Err(ClassifiedError::bad_request("User id is required"));
        }
        let user_id = parse_user_id(id)?;

        if !self.repository.exists(user_id).await? {
            return Err(user_not_found(user_id));
        }

        // Dependents go first so no region outlives its owner
        let removed = match &self.dependents {
            Some(dependents) => {
                let removed = dependents.remove_user_dependents(user_id).await?;
                tracing::info!(user_id = %user_id, removed, "Removed records owned by user");
                removed
            }
            None => 0,
        };

        match self.repository.delete(user_id).await {
            Ok(true) => Ok(DeleteConfirmation::deleted()),
            Ok(false) => {
                tracing::warn!(
                    user_id = %user_id,
                    removed,
                    "User disappeared after its records were removed"
                );
                Err(user_not_found(user_id))
            }
            Err(err) => {
                tracing::error!(
                    user_id = %user_id,
                    removed,
                    error = %err,
                    "User delete failed after its records were removed"
                );
                Err(err)
            }
        }
    }
}
