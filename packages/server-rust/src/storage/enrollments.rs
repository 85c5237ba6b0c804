//! The student/course association table.

use roster_core::{EntityId, Student};

use super::error::StoreError;
use super::session::Session;
use super::students::StudentRow;

impl Session {
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn is_enrolled(
        &mut self,
        student_id: EntityId,
        course_id: EntityId,
    ) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM student_courses WHERE student_id = ? AND course_id = ?",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(self.conn())
        .await?;
        Ok(count > 0)
    }

    /// Inserts the association row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if the pair already exists or
    /// either id does not resolve.
    pub async fn enroll(&mut self, student_id: EntityId, course_id: EntityId) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO student_courses (student_id, course_id) VALUES (?, ?)")
            .bind(student_id)
            .bind(course_id)
            .execute(self.conn())
            .await?;
        Ok(())
    }

    /// Removes the association row. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn unenroll(
        &mut self,
        student_id: EntityId,
        course_id: EntityId,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM student_courses WHERE student_id = ? AND course_id = ?")
                .bind(student_id)
                .bind(course_id)
                .execute(self.conn())
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Students enrolled in `course_id`, ordered by id, courses loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn students_in_course(&mut self, course_id: EntityId) -> Result<Vec<Student>, StoreError> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            "SELECT s.id, s.first_name, s.last_name, s.group_id FROM students s \
             JOIN student_courses sc ON sc.student_id = s.id \
             WHERE sc.course_id = ? ORDER BY s.id",
        )
        .bind(course_id)
        .fetch_all(self.conn())
        .await?;
        self.hydrate(rows).await
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{Database, StoreError};

    #[tokio::test]
    async fn pair_is_stored_once() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let student = session.insert_student("A", "B", None).await.unwrap();
        let course = session.insert_course("C1", None).await.unwrap();

        session.enroll(student.id, course.id).await.unwrap();
        assert!(session.is_enrolled(student.id, course.id).await.unwrap());

        let err = session.enroll(student.id, course.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "got {err:?}");
        assert_eq!(session.students_in_course(course.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unenroll_reports_whether_a_row_was_removed() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let student = session.insert_student("A", "B", None).await.unwrap();
        let course = session.insert_course("C1", None).await.unwrap();

        assert!(!session.unenroll(student.id, course.id).await.unwrap());
        session.enroll(student.id, course.id).await.unwrap();
        assert!(session.unenroll(student.id, course.id).await.unwrap());
        assert!(!session.is_enrolled(student.id, course.id).await.unwrap());
    }
}
