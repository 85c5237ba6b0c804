//! Student reads and writes, with eager loading of course names.

use std::collections::HashMap;

use roster_core::{EntityId, Student};
use sqlx::{QueryBuilder, Sqlite};

use super::error::StoreError;
use super::session::Session;

pub(crate) const STUDENT_COLUMNS: &str = "id, first_name, last_name, group_id";

pub(crate) type StudentRow = (EntityId, String, String, Option<EntityId>);

/// Bound parameters per batched course lookup, well under `SQLite`'s limit.
const COURSE_LOOKUP_CHUNK: usize = 500;

pub(crate) fn student_from_row(row: StudentRow) -> Student {
    let (id, first_name, last_name, group_id) = row;
    Student {
        id,
        first_name,
        last_name,
        group_id,
        courses: Vec::new(),
    }
}

impl Session {
    /// Returns every student ordered by id, courses loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn all_students(&mut self) -> Result<Vec<Student>, StoreError> {
        let rows: Vec<StudentRow> =
            sqlx::query_as(&format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"))
                .fetch_all(self.conn())
                .await?;
        self.hydrate(rows).await
    }

    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn student_by_id(&mut self, id: EntityId) -> Result<Option<Student>, StoreError> {
        let row: Option<StudentRow> =
            sqlx::query_as(&format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.conn())
                .await?;
        Ok(self.hydrate(row.into_iter().collect()).await?.pop())
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn student_exists(&mut self, id: EntityId) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE id = ?")
            .bind(id)
            .fetch_one(self.conn())
            .await?;
        Ok(count > 0)
    }

    /// Students assigned to `group_id`, ordered by id, courses loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn students_in_group(&mut self, group_id: EntityId) -> Result<Vec<Student>, StoreError> {
        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE group_id = ? ORDER BY id"
        ))
        .bind(group_id)
        .fetch_all(self.conn())
        .await?;
        self.hydrate(rows).await
    }

    /// Inserts a student with no courses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if `group_id` does not reference a group.
    pub async fn insert_student(
        &mut self,
        first_name: &str,
        last_name: &str,
        group_id: Option<EntityId>,
    ) -> Result<Student, StoreError> {
        let id = sqlx::query("INSERT INTO students (first_name, last_name, group_id) VALUES (?, ?, ?)")
            .bind(first_name)
            .bind(last_name)
            .bind(group_id)
            .execute(self.conn())
            .await?
            .last_insert_rowid();
        Ok(Student {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            group_id,
            courses: Vec::new(),
        })
    }

    /// Updates the given fields in place. `None` leaves a field unchanged;
    /// `group_id: Some(None)` unassigns the student.
    ///
    /// Returns `false` if no student has this id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if the new group does not exist.
    pub async fn update_student(
        &mut self,
        id: EntityId,
        first_name: Option<&str>,
        last_name: Option<&str>,
        group_id: Option<Option<EntityId>>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE students SET \
                first_name = COALESCE(?, first_name), \
                last_name = COALESCE(?, last_name), \
                group_id = CASE WHEN ? THEN ? ELSE group_id END \
             WHERE id = ?",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(group_id.is_some())
        .bind(group_id.flatten())
        .bind(id)
        .execute(self.conn())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a student and its association rows. Courses are untouched.
    ///
    /// Returns `false` if no student has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails.
    pub async fn delete_student(&mut self, id: EntityId) -> Result<bool, StoreError> {
        sqlx::query("DELETE FROM student_courses WHERE student_id = ?")
            .bind(id)
            .execute(self.conn())
            .await?;
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(self.conn())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn hydrate(&mut self, rows: Vec<StudentRow>) -> Result<Vec<Student>, StoreError> {
        let mut students: Vec<Student> = rows.into_iter().map(student_from_row).collect();
        self.attach_courses(&mut students).await?;
        Ok(students)
    }

    /// Fills `courses` on every student with one batched query per chunk.
    pub(crate) async fn attach_courses(&mut self, students: &mut [Student]) -> Result<(), StoreError> {
        let ids: Vec<EntityId> = students.iter().map(|s| s.id).collect();
        let mut by_student: HashMap<EntityId, Vec<String>> = HashMap::new();

        for chunk in ids.chunks(COURSE_LOOKUP_CHUNK) {
            let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT sc.student_id, c.name FROM student_courses sc \
                 JOIN courses c ON c.id = sc.course_id \
                 WHERE sc.student_id IN (",
            );
            {
                let mut separated = query.separated(", ");
                for id in chunk {
                    separated.push_bind(*id);
                }
            }
            query.push(") ORDER BY sc.student_id, c.id");

            let rows: Vec<(EntityId, String)> =
                query.build_query_as().fetch_all(self.conn()).await?;
            for (student_id, course) in rows {
                by_student.entry(student_id).or_default().push(course);
            }
        }

        for student in students {
            student.courses = by_student.remove(&student.id).unwrap_or_default();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{Database, StoreError};

    #[tokio::test]
    async fn insert_and_read_back_with_courses() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();

        let student = session.insert_student("Ada", "Lovelace", None).await.unwrap();
        let math = session.insert_course("Mathematics", None).await.unwrap();
        let art = session.insert_course("Art", None).await.unwrap();
        session.enroll(student.id, art.id).await.unwrap();
        session.enroll(student.id, math.id).await.unwrap();

        let loaded = session.student_by_id(student.id).await.unwrap().unwrap();
        assert_eq!(loaded.first_name, "Ada");
        assert_eq!(loaded.group_id, None);
        assert_eq!(loaded.courses, vec!["Mathematics", "Art"]);
    }

    #[tokio::test]
    async fn missing_student_is_none() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        assert!(session.student_by_id(9).await.unwrap().is_none());
        assert!(!session.student_exists(9).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_group_is_a_constraint_violation() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let err = session.insert_student("A", "B", Some(77)).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn update_touches_only_given_fields() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let group = session.insert_group("G1").await.unwrap();
        let student = session
            .insert_student("Ada", "Lovelace", Some(group.id))
            .await
            .unwrap();

        assert!(session
            .update_student(student.id, Some("Grace"), None, None)
            .await
            .unwrap());
        let loaded = session.student_by_id(student.id).await.unwrap().unwrap();
        assert_eq!(loaded.first_name, "Grace");
        assert_eq!(loaded.last_name, "Lovelace");
        assert_eq!(loaded.group_id, Some(group.id));

        assert!(session
            .update_student(student.id, None, None, Some(None))
            .await
            .unwrap());
        let loaded = session.student_by_id(student.id).await.unwrap().unwrap();
        assert_eq!(loaded.group_id, None);

        assert!(!session.update_student(999, Some("X"), None, None).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_associations_but_keeps_courses() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        let student = session.insert_student("A", "B", None).await.unwrap();
        let course = session.insert_course("C1", None).await.unwrap();
        session.enroll(student.id, course.id).await.unwrap();

        assert!(session.delete_student(student.id).await.unwrap());
        assert!(!session.delete_student(student.id).await.unwrap());
        assert!(session.students_in_course(course.id).await.unwrap().is_empty());
        assert!(session.course_by_id(course.id).await.unwrap().is_some());
    }
}
