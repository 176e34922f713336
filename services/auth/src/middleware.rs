//! Middleware for JWT token validation and authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::AuthUser;
use tracing::warn;

use crate::{error::AuthError, jwt::JwtService};

/// Validate the bearer token and attach the caller to the request
pub async fn auth_middleware(
    State(jwt_service): State<JwtService>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::Unauthorized)?;

    let claims = jwt_service.validate_token(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        AuthError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}
