//! Authentication service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use common::{AuthUser, ResidentStore};
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::AuthError, middleware::auth_middleware};

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request for a password reset by email
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub new_password: String,
}

/// Create the router for the authentication service
pub fn create_router<R>(state: AppState<R>) -> Router
where
    R: ResidentStore + Clone + 'static,
{
    let protected_routes = Router::new()
        .route("/auth/profile", get(profile::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login::<R>))
        .route("/auth/forgot-password", post(forgot_password::<R>))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User login endpoint
pub async fn login<R>(
    State(state): State<AppState<R>>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError>
where
    R: ResidentStore + Clone + 'static,
{
    info!("Login attempt for {}", payload.email);

    let output = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(output)))
}

/// Current resident behind the bearer token
pub async fn profile<R>(
    State(state): State<AppState<R>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AuthError>
where
    R: ResidentStore + Clone + 'static,
{
    let resident = state
        .auth_service
        .validate_user(user.id)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    Ok(Json(resident))
}

/// Reset a password by email
pub async fn forgot_password<R>(
    State(state): State<AppState<R>>,
    WithRejection(Json(payload), _): WithRejection<Json<ForgotPasswordRequest>, AuthError>,
) -> Result<impl IntoResponse, AuthError>
where
    R: ResidentStore + Clone + 'static,
{
    state
        .auth_service
        .reset_password(&payload.email, &payload.new_password)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Password has been reset"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::AuthService,
        settings::AuthSettings,
        test_support::{MemoryResidents, resident, test_jwt_service},
    };
    use common::{Resident, Role};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    async fn spawn_app(residents: Vec<Resident>, settings: AuthSettings) -> String {
        let jwt_service = test_jwt_service();
        let state = AppState {
            auth_service: AuthService::new(
                MemoryResidents::with(residents),
                jwt_service.clone(),
                settings,
            ),
            jwt_service,
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let base = spawn_app(vec![], AuthSettings::default()).await;

        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn login_then_profile() {
        let hash = bcrypt::hash("123", 4).unwrap();
        let police = resident("Nguyen Van An", "an@bluemoon.vn", &hash, Role::Police);
        let base = spawn_app(vec![police.clone()], AuthSettings::default()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/auth/login"))
            .json(&json!({ "email": "an@bluemoon.vn", "password": "123" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["user"]["fullName"], "Nguyen Van An");
        assert_eq!(body["user"]["role"], "police");
        assert_eq!(body["token_type"], "Bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let profile: Value = client
            .get(format!("{base}/auth/profile"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(profile["id"], police.id.to_string());
        assert_eq!(profile["email"], "an@bluemoon.vn");
        assert!(profile.get("password").is_none());
    }

    #[tokio::test]
    async fn bad_credentials_and_missing_token_are_401() {
        let police = resident("Nguyen Van An", "an@bluemoon.vn", "123", Role::Police);
        let base = spawn_app(vec![police], AuthSettings::default()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{base}/auth/login"))
            .json(&json!({ "email": "an@bluemoon.vn", "password": "456" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid credentials");

        let response = client
            .get(format!("{base}/auth/profile"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

        let response = client
            .get(format!("{base}/auth/profile"))
            .bearer_auth("garbage")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_login_body_is_a_json_bad_request() {
        let base = spawn_app(vec![], AuthSettings::default()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/auth/login"))
            .json(&json!({ "email": "an@bluemoon.vn" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn forgot_password_respects_setting() {
        let someone = resident("Tran Thi Mai", "mai@bluemoon.vn", "123", Role::Resident);
        let client = reqwest::Client::new();

        let disabled = spawn_app(vec![someone.clone()], AuthSettings::default()).await;
        let response = client
            .post(format!("{disabled}/auth/forgot-password"))
            .json(&json!({ "email": "mai@bluemoon.vn", "newPassword": "mat-khau-moi" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);

        let enabled = spawn_app(
            vec![someone],
            AuthSettings {
                allow_password_reset: true,
                ..AuthSettings::default()
            },
        )
        .await;
        let response = client
            .post(format!("{enabled}/auth/forgot-password"))
            .json(&json!({ "email": "mai@bluemoon.vn", "newPassword": "mat-khau-moi" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let response = client
            .post(format!("{enabled}/auth/login"))
            .json(&json!({ "email": "mai@bluemoon.vn", "password": "mat-khau-moi" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }
}
