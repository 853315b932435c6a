use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use userhub_shared::EntityId;

use crate::dto::{CreateGroupRequest, GroupResponse, ListQuery};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_group(
    State(state): State<AppState>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<Json<GroupResponse>, ApiError> {
    let Json(req) = payload?;
    let created = state
        .directory
        .create_group(&req.name, req.description.as_deref())
        .await?;
    Ok(Json(created.into()))
}

pub async fn list_groups(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<GroupResponse>>, ApiError> {
    let Query(query) = query?;
    let groups = state.directory.list_groups(query.pagination()).await?;
    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}

pub async fn get_group(
    State(state): State<AppState>,
    path: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<GroupResponse>, ApiError> {
    let Path(group_id) = path?;
    let group = state.directory.get_group(group_id).await?;
    Ok(Json(group.into()))
}
