//! `/groups` routes.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::{EntityId, Group, GroupRoster, GroupSummary, MaxStudentsQuery, NewGroup};
use tracing::info;

use super::{AppState, JsonBody, PathParam};
use crate::error::ApiError;
use crate::service;

/// `GET /groups`
pub async fn list_groups_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let mut session = state.db.session().await?;
    Ok(Json(service::list_groups(&mut session).await?))
}

/// `POST /groups` -- 201 with the new group, 400 on a duplicate name.
pub async fn create_group_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewGroup>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let mut session = state.db.write_session().await?;
    let group = service::create_group(&mut session, &body.name)
        .await
        .map_err(|e| ApiError::from_store(e, "Group with this name already exists"))?;
    session.commit().await?;

    info!(group_id = group.id, name = %group.name, "group created");
    Ok((StatusCode::CREATED, Json(group)))
}

/// `GET /groups/{group_id}/students`
pub async fn group_students_handler(
    State(state): State<AppState>,
    PathParam(group_id): PathParam<EntityId>,
) -> Result<Json<GroupRoster>, ApiError> {
    let mut session = state.db.session().await?;
    service::group_roster(&mut session, group_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Group not found"))
}

/// `GET /groups/with_max_students?max_count=N`
pub async fn groups_with_max_students_handler(
    State(state): State<AppState>,
    query: Result<Query<MaxStudentsQuery>, QueryRejection>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let Ok(Query(MaxStudentsQuery { max_count })) = query else {
        return Err(ApiError::Validation(
            "max_count is required and must be an integer".to_string(),
        ));
    };
    if max_count < 0 {
        return Err(ApiError::Validation(
            "max_count must be a non-negative integer".to_string(),
        ));
    }

    let mut session = state.db.session().await?;
    let groups = service::get_groups_with_student_count(&mut session, max_count).await?;
    Ok(Json(groups.iter().map(GroupSummary::from).collect()))
}
