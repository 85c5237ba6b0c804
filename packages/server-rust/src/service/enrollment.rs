//! Enrolling students in courses.

use roster_core::EntityId;
use tracing::debug;

use crate::storage::{Session, StoreError};

/// Enrolls the student in the course.
///
/// Returns `false` without writing if either id does not resolve or the
/// student is already enrolled.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn add_student_to_course(
    session: &mut Session,
    student_id: EntityId,
    course_id: EntityId,
) -> Result<bool, StoreError> {
    if !session.student_exists(student_id).await? || !session.course_exists(course_id).await? {
        return Ok(false);
    }
    if session.is_enrolled(student_id, course_id).await? {
        debug!(student_id, course_id, "already enrolled");
        return Ok(false);
    }
    session.enroll(student_id, course_id).await?;
    Ok(true)
}

/// Removes the student from the course.
///
/// Returns `false` if either id does not resolve or the student is not
/// enrolled.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn remove_student_from_course(
    session: &mut Session,
    student_id: EntityId,
    course_id: EntityId,
) -> Result<bool, StoreError> {
    if !session.student_exists(student_id).await? || !session.course_exists(course_id).await? {
        return Ok(false);
    }
    session.unenroll(student_id, course_id).await
}
