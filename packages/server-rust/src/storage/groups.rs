//! Group reads and writes.

use std::collections::HashMap;

use roster_core::{EntityId, Group, GroupWithStudents, Student};

use super::error::StoreError;
use super::session::Session;
use super::students::{student_from_row, StudentRow, STUDENT_COLUMNS};

impl Session {
    /// Returns every group ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn all_groups(&mut self) -> Result<Vec<Group>, StoreError> {
        let rows: Vec<(EntityId, String)> =
            sqlx::query_as(r#"SELECT id, name FROM "groups" ORDER BY id"#)
                .fetch_all(self.conn())
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Group { id, name })
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn group_by_id(&mut self, id: EntityId) -> Result<Option<Group>, StoreError> {
        let row: Option<(EntityId, String)> =
            sqlx::query_as(r#"SELECT id, name FROM "groups" WHERE id = ?"#)
                .bind(id)
                .fetch_optional(self.conn())
                .await?;
        Ok(row.map(|(id, name)| Group { id, name }))
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn group_exists(&mut self, id: EntityId) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "groups" WHERE id = ?"#)
            .bind(id)
            .fetch_one(self.conn())
            .await?;
        Ok(count > 0)
    }

    /// Inserts a group and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] if the name is already taken.
    pub async fn insert_group(&mut self, name: &str) -> Result<Group, StoreError> {
        let id = sqlx::query(r#"INSERT INTO "groups" (name) VALUES (?)"#)
            .bind(name)
            .execute(self.conn())
            .await?
            .last_insert_rowid();
        Ok(Group {
            id,
            name: name.to_string(),
        })
    }

    /// Loads every group together with its students (and their courses).
    ///
    /// Two student queries in total regardless of group count: one for
    /// assigned students, one batched course lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn groups_with_students(&mut self) -> Result<Vec<GroupWithStudents>, StoreError> {
        let groups = self.all_groups().await?;

        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE group_id IS NOT NULL ORDER BY id"
        ))
        .fetch_all(self.conn())
        .await?;
        let mut students: Vec<Student> = rows.into_iter().map(student_from_row).collect();
        self.attach_courses(&mut students).await?;

        let mut by_group: HashMap<EntityId, Vec<Student>> = HashMap::new();
        for student in students {
            if let Some(group_id) = student.group_id {
                by_group.entry(group_id).or_default().push(student);
            }
        }

        Ok(groups
            .into_iter()
            .map(|group| {
                let students = by_group.remove(&group.id).unwrap_or_default();
                GroupWithStudents { group, students }
            })
            .collect())
    }

    /// Loads one group with its students, or `None` if the id does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn group_with_students(
        &mut self,
        id: EntityId,
    ) -> Result<Option<GroupWithStudents>, StoreError> {
        let Some(group) = self.group_by_id(id).await? else {
            return Ok(None);
        };
        let students = self.students_in_group(id).await?;
        Ok(Some(GroupWithStudents { group, students }))
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{Database, StoreError};

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();

        let a = session.insert_group("AB-12").await.unwrap();
        let b = session.insert_group("CD-34").await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(session.group_by_id(a.id).await.unwrap(), Some(a));
        assert!(session.group_exists(b.id).await.unwrap());
        assert!(!session.group_exists(b.id + 100).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_name_is_a_constraint_violation() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();

        session.insert_group("AB-12").await.unwrap();
        let err = session.insert_group("AB-12").await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "got {err:?}");
        assert_eq!(session.all_groups().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn groups_with_students_buckets_by_group() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();

        let g1 = session.insert_group("G1").await.unwrap();
        let g2 = session.insert_group("G2").await.unwrap();
        session.insert_student("A", "One", Some(g1.id)).await.unwrap();
        session.insert_student("B", "Two", Some(g1.id)).await.unwrap();
        session.insert_student("C", "Three", None).await.unwrap();

        let loaded = session.groups_with_students().await.unwrap();
        let counts: Vec<_> = loaded
            .iter()
            .map(|g| (g.group.id, g.student_count()))
            .collect();
        assert_eq!(counts, vec![(g1.id, 2), (g2.id, 0)]);
    }

    #[tokio::test]
    async fn group_with_students_missing_id_is_none() {
        let db = Database::in_memory().await.unwrap();
        let mut session = db.session().await.unwrap();
        assert!(session.group_with_students(42).await.unwrap().is_none());
    }
}
