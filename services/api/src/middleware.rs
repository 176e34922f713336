//! Authentication middleware for JWT token validation
//!
//! The API service only verifies tokens; they are issued by the auth
//! service, which holds the private key.

use anyhow::Result;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::{AuthUser, Claims, settings::read_pem};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::warn;

use crate::error::ApiError;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Public key for verifying tokens
    pub public_key: String,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PUBLIC_KEY`: Public key (PEM format) or path to public key file
    pub fn from_env() -> Result<Self> {
        let public_key = read_pem("JWT_PUBLIC_KEY", env!("CARGO_MANIFEST_DIR"))?;
        Ok(JwtConfig { public_key })
    }
}

/// Checks RS256 access tokens against the auth service's public key
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(public_key: &str) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        Ok(decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(verifier): State<TokenVerifier>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = verifier.verify(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized
    })?;

    // Insert the user into the request extensions
    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}
