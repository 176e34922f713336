//! Authentication service: login, identity re-hydration and password reset

use common::{Resident, ResidentStore, Role};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::AuthError,
    jwt::JwtService,
    password::{self, StoredCredential},
    settings::AuthSettings,
    validation,
};

/// Identity returned next to the access token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Successful login result
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserSummary,
}

/// Authentication service
///
/// Generic over the resident store so that tests can run without a
/// database.
#[derive(Clone)]
pub struct AuthService<R> {
    residents: R,
    jwt_service: JwtService,
    settings: AuthSettings,
}

impl<R: ResidentStore> AuthService<R> {
    pub fn new(residents: R, jwt_service: JwtService, settings: AuthSettings) -> Self {
        Self {
            residents,
            jwt_service,
            settings,
        }
    }

    /// Check the credentials and issue an access token
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutput, AuthError> {
        let Some(resident) = self.residents.find_by_email(email).await? else {
            info!("Login rejected, unknown email: {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        let kind = StoredCredential::classify(&resident.password);
        if kind == StoredCredential::Plaintext && self.settings.allow_plaintext_passwords {
            warn!("Resident {} still has a plaintext password", resident.id);
        }

        if !self.check_password(password, &resident.password).await? {
            info!("Login rejected, wrong password for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self
            .jwt_service
            .generate_access_token(&resident)
            .map_err(|e| {
                error!("Failed to generate access token: {}", e);
                AuthError::InternalServerError
            })?;

        info!("Login successful for resident {}", resident.id);

        Ok(LoginOutput {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expiry(),
            user: UserSummary {
                id: resident.id,
                email: resident.email,
                full_name: resident.full_name,
                role: resident.role,
            },
        })
    }

    /// Look up the resident behind a token subject
    pub async fn validate_user(&self, id: Uuid) -> Result<Option<Resident>, AuthError> {
        Ok(self.residents.find_by_id(id).await?)
    }

    /// Replace the password of the resident registered under `email`
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AuthError> {
        if !self.settings.allow_password_reset {
            return Err(AuthError::Forbidden("Password reset is disabled".to_string()));
        }

        validation::validate_email(email).map_err(AuthError::BadRequest)?;
        validation::validate_password(new_password).map_err(AuthError::BadRequest)?;

        let resident = self
            .residents
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound("No resident registered with this email".to_string()))?;

        let candidate = new_password.to_string();
        let hash = tokio::task::spawn_blocking(move || password::hash_password(&candidate))
            .await
            .map_err(|e| {
                error!("Password hashing task failed: {}", e);
                AuthError::InternalServerError
            })??;

        if !self.residents.update_password(resident.id, &hash).await? {
            return Err(AuthError::NotFound(
                "No resident registered with this email".to_string(),
            ));
        }

        info!("Password reset for resident {}", resident.id);
        Ok(())
    }

    /// Hash verification is CPU bound, keep it off the async workers
    async fn check_password(&self, candidate: &str, stored: &str) -> Result<bool, AuthError> {
        let candidate = candidate.to_string();
        let stored = stored.to_string();
        let allow_plaintext = self.settings.allow_plaintext_passwords;

        tokio::task::spawn_blocking(move || {
            password::verify_password(&candidate, &stored, allow_plaintext)
        })
        .await
        .map_err(|e| {
            error!("Password verification task failed: {}", e);
            AuthError::InternalServerError
        })?
    }
}
