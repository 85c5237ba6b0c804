//! Course reads and writes.

use roster_core::{Course, EntityId};

use super::error::StoreError;
use super::session::Session;

type CourseRow = (EntityId, String, Option<String>);

fn course_from_row((id, name, description): CourseRow) -> Course {
    Course {
        id,
        name,
        description,
    }
}

impl Session {
    /// Returns every course ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn all_courses(&mut self) -> Result<Vec<Course>, StoreError> {
        let rows: Vec<CourseRow> =
            sqlx::query_as("SELECT id, name, description FROM courses ORDER BY id")
                .fetch_all(self.conn())
                .await?;
        Ok(rows.into_iter().map(course_from_row).collect())
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn course_by_id(&mut self, id: EntityId) -> Result<Option<Course>, StoreError> {
        let row: Option<CourseRow> =
            sqlx::query_as("SELECT id, name, description FROM courses WHERE id = ?")
                .bind(id)
                .fetch_optional(self.conn())
                .await?;
        Ok(row.map(course_from_row))
    }

    /// Looks a course up by its exact (case-sensitive) name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn course_by_name(&mut self, name: &str) -> Result<Option<Course>, StoreError> {
        let row: Option<CourseRow> =
            sqlx::query_as("SELECT id, name, description FROM courses WHERE name = ?")
                .bind(name)
                .fetch_optional(self.conn())
                .await?;
        Ok(row.map(course_from_row))
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn course_exists(&mut self, id: EntityId) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE id = ?")
            .bind(id)
            .fetch_one(self.conn())
            .await?;
        Ok(count > 0)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if the name is already taken.
    pub async fn insert_course(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Course, StoreError> {
        let id = sqlx::query("INSERT INTO courses (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(self.conn())
            .await?
            .last_insert_rowid();
        Ok(Course {
            id,
            name: name.to_string(),
            description: description.map(ToString::to_string),
        })
    }

    /// Updates the given fields in place; `None` leaves a field unchanged.
    ///
    /// Returns `false` if no course has this id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if the new name is already taken.
    pub async fn update_course(
        &mut self,
        id: EntityId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE courses SET \
                name = COALESCE(?, name), \
                description = COALESCE(?, description) \
             WHERE id = ?",
        )
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(self.conn())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a course and its association rows. Students are untouched.
    ///
    /// Returns `false` if no course has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails.
    pub async fn delete_course(&mut self, id: EntityId) -> Result<bool, StoreError> {
        sqlx::query("DELETE FROM student_courses WHERE course_id = ?")
            .bind(id)
            .execute(self.conn())
            .await?;
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.conn())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
