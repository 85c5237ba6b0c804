//! `/courses` routes and the by-name course roster.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use roster_core::{Course, CoursePatch, EntityId, Message, NewCourse, Student};
use tracing::info;

use super::{AppState, JsonBody, PatchBody, PathParam};
use crate::error::ApiError;
use crate::service;

/// `GET /courses`
pub async fn list_courses_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let mut session = state.db.session().await?;
    Ok(Json(service::list_courses(&mut session).await?))
}

/// `POST /courses` -- 201 with the new course, 400 on a duplicate name.
pub async fn create_course_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewCourse>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let mut session = state.db.write_session().await?;
    let course = service::create_course(&mut session, &body.name, body.description.as_deref())
        .await
        .map_err(|e| ApiError::from_store(e, "Course with this name already exists"))?;
    session.commit().await?;

    info!(course_id = course.id, name = %course.name, "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

/// `GET /courses/{course_id}`
pub async fn get_course_handler(
    State(state): State<AppState>,
    PathParam(course_id): PathParam<EntityId>,
) -> Result<Json<Course>, ApiError> {
    let mut session = state.db.session().await?;
    service::get_course(&mut session, course_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Course not found"))
}

/// `PUT /courses/{course_id}`
pub async fn update_course_handler(
    State(state): State<AppState>,
    PathParam(course_id): PathParam<EntityId>,
    PatchBody(patch): PatchBody<CoursePatch>,
) -> Result<Json<Message>, ApiError> {
    let mut session = state.db.write_session().await?;
    let updated = service::update_course(&mut session, course_id, &patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Error updating course"))?;
    if !updated {
        return Err(ApiError::not_found("Course not found"));
    }
    session.commit().await?;

    info!(course_id, "course updated");
    Ok(Json(Message::new("Course updated successfully")))
}

/// `DELETE /courses/{course_id}`
pub async fn delete_course_handler(
    State(state): State<AppState>,
    PathParam(course_id): PathParam<EntityId>,
) -> Result<Json<Message>, ApiError> {
    let mut session = state.db.write_session().await?;
    if !service::delete_course(&mut session, course_id).await? {
        return Err(ApiError::not_found("Course not found"));
    }
    session.commit().await?;

    info!(course_id, "course deleted");
    Ok(Json(Message::new("Course deleted successfully")))
}

/// `GET /students_by_course/{course_name}` -- 404 if no course has that name.
pub async fn students_by_course_handler(
    State(state): State<AppState>,
    PathParam(course_name): PathParam<String>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let mut session = state.db.session().await?;
    service::course_roster(&mut session, &course_name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Course not found"))
}
