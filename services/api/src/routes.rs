//! Pharmacy API routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::{CurrentUser, auth_middleware},
    models::{MedicineInput, MedicinePatch, NewUser, User, UserInfo},
    state::AppState,
};

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register and login
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Create the router for the pharmacy API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/user", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/medicines", get(list_medicines).post(create_medicine))
        .route(
            "/api/medicines/:id",
            get(get_medicine)
                .put(update_medicine)
                .patch(patch_medicine)
                .delete(delete_medicine),
        )
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    Json(json!({
        "status": if database_up { "ok" } else { "degraded" },
        "service": "pharmacy-api"
    }))
}

/// List all medicines
pub async fn list_medicines(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let medicines = state.medicine_repository.list().await.map_err(|e| {
        error!("Failed to list medicines: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(medicines))
}

/// Create a new medicine
pub async fn create_medicine(
    State(state): State<AppState>,
    Json(payload): Json<MedicineInput>,
) -> ApiResult<impl IntoResponse> {
    let medicine = state
        .medicine_repository
        .create(&payload)
        .await
        .map_err(|e| {
            error!("Failed to create medicine: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(medicine)))
}

/// Get a medicine by ID
pub async fn get_medicine(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let medicine = state
        .medicine_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get medicine: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Medicine not found".to_string()))?;

    Ok(Json(medicine))
}

/// Replace a medicine's fields
pub async fn update_medicine(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<MedicineInput>,
) -> ApiResult<impl IntoResponse> {
    let medicine = state
        .medicine_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update medicine: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Medicine not found".to_string()))?;

    Ok(Json(medicine))
}

/// Update a subset of a medicine's fields
pub async fn patch_medicine(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<MedicinePatch>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .medicine_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get medicine: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Medicine not found".to_string()))?;

    let input = payload.apply(&existing);

    let medicine = state
        .medicine_repository
        .update(id, &input)
        .await
        .map_err(|e| {
            error!("Failed to update medicine: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Medicine not found".to_string()))?;

    Ok(Json(medicine))
}

/// Delete a medicine
pub async fn delete_medicine(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.medicine_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete medicine: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Medicine not found".to_string()))
    }
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Registration attempt for: {}", payload.email);

    let existing = state
        .user_repository
        .find_by_username(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let new_user = NewUser {
        username: payload.email.clone(),
        email: payload.email,
        name: payload.name,
        password: payload.password,
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        ApiError::InternalServerError
    })?;

    auth_response(&state, user).await
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for: {}", payload.email);

    let user = state
        .user_repository
        .find_by_username(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    let valid = state
        .user_repository
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !valid {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    auth_response(&state, user).await
}

/// Current user endpoint; identity comes from the bearer token middleware
pub async fn get_user(user: Option<Extension<CurrentUser>>) -> ApiResult<impl IntoResponse> {
    let Some(Extension(user)) = user else {
        return Err(ApiError::NotAuthenticated);
    };

    Ok(Json(UserInfo {
        id: user.id,
        email: user.email,
        name: user.name,
    }))
}

/// Issue or reuse the user's token and build the auth response
async fn auth_response(
    state: &AppState,
    user: User,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let token = state
        .token_repository
        .get_or_create(user.id)
        .await
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            token: token.key,
            user: UserInfo::from(user),
        }),
    ))
}
