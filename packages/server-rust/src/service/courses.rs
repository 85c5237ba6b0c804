//! Course operations.

use roster_core::{Course, CoursePatch, EntityId, Student};

use crate::storage::{Session, StoreError};

/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_courses(session: &mut Session) -> Result<Vec<Course>, StoreError> {
    session.all_courses().await
}

/// # Errors
///
/// Returns [`StoreError::Constraint`] if the name is already taken.
pub async fn create_course(
    session: &mut Session,
    name: &str,
    description: Option<&str>,
) -> Result<Course, StoreError> {
    session.insert_course(name, description).await
}

/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_course(session: &mut Session, id: EntityId) -> Result<Option<Course>, StoreError> {
    session.course_by_id(id).await
}

/// Applies `patch`; empty strings are ignored. Returns `false` if not found.
///
/// # Errors
///
/// Returns [`StoreError::Constraint`] if the new name is already taken.
pub async fn update_course(
    session: &mut Session,
    id: EntityId,
    patch: &CoursePatch,
) -> Result<bool, StoreError> {
    session
        .update_course(id, patch.name(), patch.description())
        .await
}

/// Deletes the course and its enrollments. Returns `false` if not found.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub async fn delete_course(session: &mut Session, id: EntityId) -> Result<bool, StoreError> {
    session.delete_course(id).await
}

/// Students of the course named `name`, or `None` if no course has that name.
///
/// # Errors
///
/// Returns an error if any query fails.
pub async fn course_roster(
    session: &mut Session,
    name: &str,
) -> Result<Option<Vec<Student>>, StoreError> {
    let Some(course) = session.course_by_name(name).await? else {
        return Ok(None);
    };
    Ok(Some(session.students_in_course(course.id).await?))
}

/// Students of the course named `name`; empty if no course matches.
///
/// # Errors
///
/// Returns an error if any query fails.
pub async fn get_students_by_course_name(
    session: &mut Session,
    name: &str,
) -> Result<Vec<Student>, StoreError> {
    Ok(course_roster(session, name).await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{add_student, add_student_to_course, delete_student_by_id};
    use crate::storage::Database;

    #[tokio::test]
    async fn duplicate_course_name_is_rejected() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        create_course(&mut session, "C1", None).await.unwrap();

        let err = create_course(&mut session, "C1", Some("again")).await.unwrap_err();
        assert!(err.is_constraint());
        assert_eq!(list_courses(&mut session).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_course_name_yields_empty_students() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();

        assert!(course_roster(&mut session, "Nope").await.unwrap().is_none());
        assert!(get_students_by_course_name(&mut session, "Nope")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn deleted_student_leaves_course_roster() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let course = create_course(&mut session, "C1", None).await.unwrap();
        let a = add_student(&mut session, "A", "A", None).await.unwrap().unwrap();
        let b = add_student(&mut session, "B", "B", None).await.unwrap().unwrap();
        add_student_to_course(&mut session, a.id, course.id).await.unwrap();
        add_student_to_course(&mut session, b.id, course.id).await.unwrap();

        delete_student_by_id(&mut session, a.id).await.unwrap();

        let remaining: Vec<_> = get_students_by_course_name(&mut session, "C1")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(remaining, vec![b.id]);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_course() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let patch = CoursePatch {
            name: Some("X".to_string()),
            description: None,
        };

        assert!(!update_course(&mut session, 3, &patch).await.unwrap());
        assert!(!delete_course(&mut session, 3).await.unwrap());
        assert!(get_course(&mut session, 3).await.unwrap().is_none());
    }
}
