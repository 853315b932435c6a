use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use userhub_shared::EntityId;

use crate::dto::{CreateUserRequest, ListQuery, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(req) = payload?;
    let created = state
        .directory
        .create_user(&req.username, &req.email, req.full_name.as_deref())
        .await?;
    Ok(Json(created.into()))
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let Query(query) = query?;
    let users = state.directory.list_users(query.pagination()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Path(user_id) = path?;
    let user = state.directory.get_user(user_id).await?;
    Ok(Json(user.into()))
}

pub async fn add_user_to_group(
    State(state): State<AppState>,
    path: Result<Path<(EntityId, EntityId)>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path((user_id, group_id)) = path?;
    state.directory.add_user_to_group(user_id, group_id).await?;
    Ok(Json(MessageResponse::new("User added to group successfully")))
}
