//! `/students` routes, including course enrollment.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use roster_core::{EntityId, Message, NewStudent, Student, StudentFilter, StudentPatch};
use tracing::info;

use super::{AppState, JsonBody, PatchBody, PathParam, QueryParams};
use crate::error::ApiError;
use crate::service::{self, StudentUpdate};

/// `GET /students[?course=name][&max_group_size=N]`
pub async fn list_students_handler(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<StudentFilter>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let mut session = state.db.session().await?;
    Ok(Json(service::list_students(&mut session, &filter).await?))
}

/// `POST /students` -- 201 with the new student, 404 if `group_id` does
/// not resolve.
pub async fn create_student_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewStudent>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let mut session = state.db.write_session().await?;
    let student = service::add_student(&mut session, &body.first_name, &body.last_name, body.group_id)
        .await
        .map_err(|e| ApiError::from_store(e, "Error creating student"))?
        .ok_or_else(|| ApiError::not_found("Group not found"))?;
    session.commit().await?;

    info!(student_id = student.id, group_id = ?student.group_id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

/// `GET /students/{student_id}`
pub async fn get_student_handler(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<EntityId>,
) -> Result<Json<Student>, ApiError> {
    let mut session = state.db.session().await?;
    service::get_student(&mut session, student_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Student not found"))
}

/// `PUT /students/{student_id}` -- partial update.
pub async fn update_student_handler(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<EntityId>,
    PatchBody(patch): PatchBody<StudentPatch>,
) -> Result<Json<Message>, ApiError> {
    let mut session = state.db.write_session().await?;
    let outcome = service::update_student(&mut session, student_id, &patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Error updating student"))?;

    match outcome {
        StudentUpdate::Updated => {
            session.commit().await?;
            info!(student_id, "student updated");
            Ok(Json(Message::new("Student updated successfully")))
        }
        StudentUpdate::StudentMissing => Err(ApiError::not_found("Student not found")),
        StudentUpdate::GroupMissing => Err(ApiError::not_found("Group not found")),
    }
}

/// `DELETE /students/{student_id}`
pub async fn delete_student_handler(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<EntityId>,
) -> Result<Json<Message>, ApiError> {
    let mut session = state.db.write_session().await?;
    if !service::delete_student_by_id(&mut session, student_id).await? {
        return Err(ApiError::not_found("Student not found"));
    }
    session.commit().await?;

    info!(student_id, "student deleted");
    Ok(Json(Message::new("Student deleted successfully")))
}

/// `POST /students/{student_id}/courses/{course_id}`
pub async fn enroll_handler(
    State(state): State<AppState>,
    PathParam((student_id, course_id)): PathParam<(EntityId, EntityId)>,
) -> Result<Json<Message>, ApiError> {
    let mut session = state.db.write_session().await?;
    if !service::add_student_to_course(&mut session, student_id, course_id).await? {
        return Err(ApiError::not_found("Student or Course not found"));
    }
    session.commit().await?;

    info!(student_id, course_id, "student enrolled");
    Ok(Json(Message::new("Course added to student")))
}

/// `DELETE /students/{student_id}/courses/{course_id}`
pub async fn unenroll_handler(
    State(state): State<AppState>,
    PathParam((student_id, course_id)): PathParam<(EntityId, EntityId)>,
) -> Result<Json<Message>, ApiError> {
    let mut session = state.db.write_session().await?;
    if !service::remove_student_from_course(&mut session, student_id, course_id).await? {
        return Err(ApiError::not_found(
            "Student or Course not found or not associated",
        ));
    }
    session.commit().await?;

    info!(student_id, course_id, "student unenrolled");
    Ok(Json(Message::new("Course removed from student")))
}
