//! Student operations.
//!
//! Group references are checked here, not in the HTTP layer: a missing
//! group is reported through the return value before any write happens.

use roster_core::roster::{students_of, within_max_students};
use roster_core::{EntityId, Student, StudentFilter, StudentPatch};
use tracing::debug;

use crate::storage::{Session, StoreError};

/// Outcome of [`update_student`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentUpdate {
    Updated,
    StudentMissing,
    GroupMissing,
}

/// Students matching `filter`.
///
/// - `course`: students enrolled in that course (empty if no such course)
/// - `max_group_size`: students of every group with at most that many students
/// - neither: every student
///
/// # Errors
///
/// Returns an error if any query fails.
pub async fn list_students(
    session: &mut Session,
    filter: &StudentFilter,
) -> Result<Vec<Student>, StoreError> {
    if let Some(course) = filter.course() {
        return crate::service::get_students_by_course_name(session, course).await;
    }
    if let Some(max) = filter.max_group_size {
        let groups = session.groups_with_students().await?;
        return Ok(students_of(within_max_students(groups, max)));
    }
    session.all_students().await
}

/// Creates a student. Returns `None` without writing if `group_id` is given
/// and does not resolve.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn add_student(
    session: &mut Session,
    first_name: &str,
    last_name: &str,
    group_id: Option<EntityId>,
) -> Result<Option<Student>, StoreError> {
    if let Some(group_id) = group_id {
        if !session.group_exists(group_id).await? {
            debug!(group_id, "add_student: group not found");
            return Ok(None);
        }
    }
    Ok(Some(
        session.insert_student(first_name, last_name, group_id).await?,
    ))
}

/// # Errors
///
/// Returns an error if any query fails.
pub async fn get_student(session: &mut Session, id: EntityId) -> Result<Option<Student>, StoreError> {
    session.student_by_id(id).await
}

/// Applies `patch` to the student. Empty names are ignored; see [`StudentPatch`].
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn update_student(
    session: &mut Session,
    id: EntityId,
    patch: &StudentPatch,
) -> Result<StudentUpdate, StoreError> {
    if !session.student_exists(id).await? {
        return Ok(StudentUpdate::StudentMissing);
    }
    if let Some(Some(group_id)) = patch.group_id {
        if !session.group_exists(group_id).await? {
            return Ok(StudentUpdate::GroupMissing);
        }
    }
    session
        .update_student(id, patch.first_name(), patch.last_name(), patch.group_id)
        .await?;
    Ok(StudentUpdate::Updated)
}

/// Deletes the student and its enrollments. Returns `false` if not found.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub async fn delete_student_by_id(session: &mut Session, id: EntityId) -> Result<bool, StoreError> {
    session.delete_student(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{add_student_to_course, create_course, create_group};
    use crate::storage::Database;

    #[tokio::test]
    async fn add_student_rejects_unknown_group_without_writing() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();

        assert!(add_student(&mut session, "A", "B", Some(5)).await.unwrap().is_none());
        assert!(session.all_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_student_without_group_is_unassigned() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();

        let student = add_student(&mut session, "A", "B", None).await.unwrap().unwrap();
        assert_eq!(student.group_id, None);
        assert!(student.courses.is_empty());
    }

    #[tokio::test]
    async fn update_reports_which_reference_is_missing() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let student = add_student(&mut session, "A", "B", None).await.unwrap().unwrap();

        let to_group = |id| StudentPatch {
            group_id: Some(Some(id)),
            ..StudentPatch::default()
        };

        assert_eq!(
            update_student(&mut session, student.id + 1, &StudentPatch::default())
                .await
                .unwrap(),
            StudentUpdate::StudentMissing
        );
        assert_eq!(
            update_student(&mut session, student.id, &to_group(40)).await.unwrap(),
            StudentUpdate::GroupMissing
        );

        let group = create_group(&mut session, "G1").await.unwrap();
        assert_eq!(
            update_student(&mut session, student.id, &to_group(group.id))
                .await
                .unwrap(),
            StudentUpdate::Updated
        );
        let loaded = get_student(&mut session, student.id).await.unwrap().unwrap();
        assert_eq!(loaded.group_id, Some(group.id));
    }

    #[tokio::test]
    async fn list_students_prefers_course_filter() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let group = create_group(&mut session, "G1").await.unwrap();
        let a = add_student(&mut session, "A", "A", Some(group.id)).await.unwrap().unwrap();
        let b = add_student(&mut session, "B", "B", None).await.unwrap().unwrap();
        let course = create_course(&mut session, "C1", None).await.unwrap();
        add_student_to_course(&mut session, b.id, course.id).await.unwrap();

        let ids = |students: Vec<Student>| -> Vec<EntityId> {
            students.into_iter().map(|s| s.id).collect()
        };

        let all = list_students(&mut session, &StudentFilter::default()).await.unwrap();
        assert_eq!(ids(all), vec![a.id, b.id]);

        let by_course = StudentFilter {
            course: Some("C1".to_string()),
            max_group_size: Some(10),
        };
        assert_eq!(ids(list_students(&mut session, &by_course).await.unwrap()), vec![b.id]);

        let unknown_course = StudentFilter {
            course: Some("nope".to_string()),
            max_group_size: None,
        };
        assert!(list_students(&mut session, &unknown_course).await.unwrap().is_empty());

        let small_groups = StudentFilter {
            course: None,
            max_group_size: Some(1),
        };
        assert_eq!(ids(list_students(&mut session, &small_groups).await.unwrap()), vec![a.id]);

        let no_groups = StudentFilter {
            course: None,
            max_group_size: Some(0),
        };
        assert!(list_students(&mut session, &no_groups).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_student_reports_presence() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let student = add_student(&mut session, "A", "B", None).await.unwrap().unwrap();

        assert!(delete_student_by_id(&mut session, student.id).await.unwrap());
        assert!(!delete_student_by_id(&mut session, student.id).await.unwrap());
        assert!(get_student(&mut session, student.id).await.unwrap().is_none());
    }
}
