//! Account routes.
//!
//! JSON endpoints over [`IdentityService`](crate::services::IdentityService).
//! Caller-scoped handlers take a [`Caller`] and never look at the token
//! themselves.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use user_directory_core::UserId;

use crate::claims::ClaimsResolver;
use crate::error::Result;
use crate::middleware::{ApiJson, ApiPath, Caller};
use crate::models::{ProfileUpdate, UserView};
use crate::state::AppState;
use crate::store::UserStore;

/// Plain confirmation body.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneralResponse {
    pub message: String,
}

impl GeneralResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// Request to create an account.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub user_name: String,
    pub password: String,
}

/// Create an account.
pub async fn create_user<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<GeneralResponse>)> {
    let message = state
        .identity()
        .create_account(&request.email, &request.user_name, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(GeneralResponse::new(message))))
}

/// Request to check an email and password.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Check credentials and return the account's identity fields.
pub async fn login<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<UserView>> {
    let user = state
        .identity()
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(UserView::credentials(&user)))
}

/// Get an account by id.
pub async fn get_user<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<UserView>> {
    let user = state.identity().get_by_id(id).await?;
    Ok(Json(UserView::full(&user)))
}

// ============================================================================
// Batch lookup
// ============================================================================

/// Request to look up many accounts.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub ids: Vec<UserId>,
}

/// Accounts found by a batch lookup, in no particular order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub users: Vec<UserView>,
}

/// Look up many accounts; unknown ids are left out.
pub async fn get_many<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
    ApiJson(request): ApiJson<BatchRequest>,
) -> Json<BatchResponse> {
    let users = state.identity().get_many(&request.ids).await;

    Json(BatchResponse {
        users: users.iter().map(UserView::listing).collect(),
    })
}

// ============================================================================
// Caller-scoped
// ============================================================================

/// Get the calling account.
pub async fn get_self<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
    Caller(caller): Caller,
) -> Result<Json<UserView>> {
    let user = state.identity().get_self(&caller).await?;
    Ok(Json(UserView::full(&user)))
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            user_name: request.user_name,
            phone: request.phone,
            address: request.address,
            note: request.note,
        }
    }
}

/// Update the calling account's profile.
pub async fn update_profile<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
    Caller(caller): Caller,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<GeneralResponse>> {
    let message = state
        .identity()
        .update_profile(&caller, &request.into())
        .await?;

    Ok(Json(GeneralResponse::new(message)))
}

/// Elevate the calling account to supplier.
pub async fn register_supplier<S: UserStore, C: ClaimsResolver>(
    State(state): State<AppState<S, C>>,
    Caller(caller): Caller,
) -> Result<Json<GeneralResponse>> {
    let message = state.identity().register_supplier(&caller).await?;
    Ok(Json(GeneralResponse::new(message)))
}

/// Liveness check for callers of the directory API.
pub async fn ping() -> Json<GeneralResponse> {
    Json(GeneralResponse::new("pong"))
}
