use chrono::{DateTime, Utc};
use domain_geo::Coordinates;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User entity as stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Lower-cased, unique
    pub email: String,
    /// Argon2 PHC string, never exposed in API responses
    pub password_hash: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new record. `address` and `coordinates` must already be reconciled.
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        address: String,
        coordinates: Coordinates,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            address,
            coordinates,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a validated patch. Location and password arrive resolved and hashed.
    pub fn apply_update(
        &mut self,
        update: UpdateUser,
        location: Option<(String, Coordinates)>,
        password_hash: Option<String>,
    ) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = normalize_email(&email);
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        if let Some((address, coordinates)) = location {
            self.address = address;
            self.coordinates = coordinates;
        }
        self.updated_at = Utc::now();
    }
}

/// Canonical form used for storage, uniqueness and login lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Curitiba, Região Geográfica Imediata de Curitiba, Paraná, Brasil")]
    pub address: String,
    /// `[longitude, latitude]`
    #[schema(value_type = Vec<f64>, example = json!([-49.2733, -25.4284]))]
    pub coordinates: Coordinates,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            coordinates: user.coordinates,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user.
///
/// Exactly one of `address` and `coordinates` must be given; the other is
/// derived through the geocoder.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    #[validate(length(max = 100))]
    #[schema(example = "Ada")]
    pub name: String,
    #[serde(default)]
    #[validate(email, length(max = 255))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: String,
    #[validate(length(max = 500))]
    #[schema(example = "Curitiba, Brazil")]
    pub address: Option<String>,
    /// `[longitude, latitude]` or `{"lat": .., "lon": ..}`
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<Coordinates>,
}

/// DTO for updating an existing user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 128))]
    pub password: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<Coordinates>,
}

/// DTO for session creation
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: String,
}

/// Signed bearer token returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionToken {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "Curitiba".to_string(),
            Coordinates::new(-49.27, -25.43),
        )
    }

    #[test]
    fn test_response_omits_password_hash() {
        let body = serde_json::to_value(UserResponse::from(user())).unwrap();
        assert!(body.get("password_hash").is_none());
        assert_eq!(body["coordinates"], serde_json::json!([-49.27, -25.43]));
    }

    #[test]
    fn test_stored_id_field_is_underscore_id() {
        let body = serde_json::to_value(user()).unwrap();
        assert!(body.get("_id").is_some());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_apply_update_merges_present_fields() {
        let mut user = user();
        let before = user.updated_at;
        let patch = UpdateUser {
            email: Some("  ADA@Example.org ".to_string()),
            ..Default::default()
        };

        user.apply_update(
            patch,
            Some(("Lisbon".to_string(), Coordinates::new(-9.14, 38.72))),
            None,
        );

        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.org");
        assert_eq!(user.address, "Lisbon");
        assert_eq!(user.password_hash, "hash");
        assert!(user.updated_at >= before);
    }

    #[test]
    fn test_create_user_accepts_object_coordinates() {
        let input: CreateUser = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret",
            "coordinates": { "lat": -25.43, "lon": -49.27 }
        }))
        .unwrap();

        assert_eq!(input.coordinates, Some(Coordinates::new(-49.27, -25.43)));
        assert!(input.address.is_none());
    }
}
