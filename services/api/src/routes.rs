//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use common::AuthUser;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    middleware::auth_middleware,
    models::{
        ComplaintQuery, ComplaintUpdate, CreateComplaintRequest, CreateShiftRequest, ShiftQuery,
        UpdateShiftRequest,
    },
    repositories::Store,
};

/// Create the router for the API service
pub fn create_router<S: Store>(state: AppState<S>) -> Router {
    let protected_routes = Router::new()
        .route("/shift", get(list_shifts::<S>).post(create_shift::<S>))
        .route("/shift/police-list", get(police_list::<S>))
        .route(
            "/shift/:id",
            get(get_shift::<S>)
                .patch(update_shift::<S>)
                .delete(delete_shift::<S>),
        )
        .route(
            "/complain",
            get(list_complaints::<S>).post(create_complaint::<S>),
        )
        .route("/complain/resident/:id", get(resident_complaints::<S>))
        .route(
            "/complain/:id",
            get(get_complaint::<S>)
                .patch(update_complaint::<S>)
                .delete(delete_complaint::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.token_verifier.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

fn forbidden() -> ApiError {
    ApiError::Forbidden("You are not allowed to perform this action".to_string())
}

fn require_scheduler(user: &AuthUser) -> Result<(), ApiError> {
    if user.role.can_schedule_shifts() {
        Ok(())
    } else {
        Err(forbidden())
    }
}

fn require_shift_viewer(user: &AuthUser) -> Result<(), ApiError> {
    if user.role.can_view_shifts() {
        Ok(())
    } else {
        Err(forbidden())
    }
}

/// Staff see everything; residents only their own complaints
fn require_staff_or_self(user: &AuthUser, resident_id: Uuid) -> Result<(), ApiError> {
    if user.role.handles_complaints() || user.id == resident_id {
        Ok(())
    } else {
        Err(forbidden())
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Book a shift slot
pub async fn create_shift<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateShiftRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    require_scheduler(&user)?;

    let shift = state
        .scheduler
        .create(payload.police_id, &payload.date, payload.shift_type)
        .await?;

    Ok((StatusCode::CREATED, Json(shift)))
}

/// List shifts, optionally between two days
pub async fn list_shifts<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<ShiftQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    require_shift_viewer(&user)?;

    let shifts = state
        .scheduler
        .find_all(query.start_date.as_deref(), query.end_date.as_deref())
        .await?;

    Ok(Json(shifts))
}

/// Residents who can be put on duty
pub async fn police_list<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_scheduler(&user)?;

    Ok(Json(state.scheduler.police_list().await?))
}

pub async fn get_shift<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    require_shift_viewer(&user)?;

    Ok(Json(state.scheduler.find_one(id).await?))
}

/// Reassign a shift
pub async fn update_shift<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateShiftRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    require_scheduler(&user)?;

    Ok(Json(state.scheduler.update(id, payload.police_id).await?))
}

pub async fn delete_shift<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    require_scheduler(&user)?;

    state.scheduler.remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// File a complaint, for the caller unless staff name another resident
pub async fn create_complaint<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateComplaintRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let resident_id = payload.resident_id.unwrap_or(user.id);
    require_staff_or_self(&user, resident_id)?;

    let complaint = state.complaints.create(resident_id, payload).await?;

    Ok((StatusCode::CREATED, Json(complaint)))
}

/// List complaints; residents are limited to their own
pub async fn list_complaints<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<ComplaintQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let resident_id = if user.role.handles_complaints() {
        query.resident_id
    } else {
        let own = query.resident_id.unwrap_or(user.id);
        require_staff_or_self(&user, own)?;
        Some(own)
    };

    Ok(Json(state.complaints.find_all(resident_id).await?))
}

pub async fn resident_complaints<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(resident_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff_or_self(&user, resident_id)?;

    Ok(Json(state.complaints.find_by_resident(resident_id).await?))
}

pub async fn get_complaint<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = state.complaints.find_one(id).await?;
    require_staff_or_self(&user, complaint.resident_id)?;

    Ok(Json(complaint))
}

/// Staff response to a complaint
pub async fn update_complaint<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<ComplaintUpdate>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    if !user.role.handles_complaints() {
        return Err(forbidden());
    }

    Ok(Json(state.complaints.update(id, payload).await?))
}

/// Admins delete any complaint, authors their own
pub async fn delete_complaint<S: Store>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let complaint = state.complaints.find_one(id).await?;
    if !user.role.can_delete_any_complaint() && complaint.resident_id != user.id {
        return Err(forbidden());
    }

    state.complaints.remove(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
