use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::error::UserError;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::users::dto::{CreateUserRequest, DeletedUser, UpdateUserRequest, UserResponse};

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, UserError> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::list(users)))
}

// The id stays a raw string here; the service owns the "numeric and
// positive" check so a bad id gets the API's 400 envelope.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, UserError> {
    let user = state.users.get_by_id(&id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), UserError> {
    let user = state.users.create(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User created successfully", user)),
    ))
}

// A missing body counts as an empty patch.
#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<UpdateUserRequest>>,
) -> Result<Json<ApiResponse<UserResponse>>, UserError> {
    let patch = body.map(|Json(b)| b).unwrap_or_default();
    let user = state.users.update(&id, patch).await?;
    Ok(Json(ApiResponse::with_message(
        "User updated successfully",
        user,
    )))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedUser>>, UserError> {
    let snapshot = state.users.delete(&id).await?;
    Ok(Json(ApiResponse::with_message(
        "User deleted successfully",
        snapshot,
    )))
}
