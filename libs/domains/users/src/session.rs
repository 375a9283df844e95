use axum_helpers::JwtAuth;
use domain_geo::{ClassifiedError, ClassifiedResult};
use std::sync::Arc;
use tracing::instrument;

use crate::models::{LoginRequest, SessionToken, normalize_email};
use crate::password::verify_password;
use crate::repository::UserRepository;
use crate::validation::validate_login;

pub const USER_NOT_FOUND: &str = "User not found!";
pub const INVALID_CREDENTIALS: &str = "Email/Password incorrect";

/// Exchanges credentials for a signed bearer token
pub struct SessionService<R: UserRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
}

impl<R: UserRepository> Clone for SessionService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            auth: self.auth.clone(),
        }
    }
}

impl<R: UserRepository> SessionService<R> {
    pub fn new(repository: R, auth: JwtAuth) -> Self {
        Self::from_shared(Arc::new(repository), auth)
    }

    pub fn from_shared(repository: Arc<R>, auth: JwtAuth) -> Self {
        Self { repository, auth }
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> ClassifiedResult<SessionToken> {
        validate_login(&input)?;

        let user = self
            .repository
            .get_by_email(&normalize_email(&input.email))
            .await?
            .ok_or_else(|| ClassifiedError::not_found(USER_NOT_FOUND))?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Rejected login with wrong password");
            return Err(ClassifiedError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self
            .auth
            .issue_token(&user.id.to_string())
            .map_err(ClassifiedError::internal)?;

        tracing::info!(user_id = %user.id, "Session created");
        Ok(SessionToken { token })
    }
}
