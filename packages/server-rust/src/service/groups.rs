//! Group operations.

use roster_core::roster::within_max_students;
use roster_core::{EntityId, Group, GroupRoster, GroupWithStudents};

use crate::storage::{Session, StoreError};

/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_groups(session: &mut Session) -> Result<Vec<Group>, StoreError> {
    session.all_groups().await
}

/// # Errors
///
/// Returns [`StoreError::Constraint`] if the name is already taken.
pub async fn create_group(session: &mut Session, name: &str) -> Result<Group, StoreError> {
    session.insert_group(name).await
}

/// The group and its students, or `None` if the id does not resolve.
///
/// # Errors
///
/// Returns an error if any query fails.
pub async fn group_roster(
    session: &mut Session,
    id: EntityId,
) -> Result<Option<GroupRoster>, StoreError> {
    Ok(session.group_with_students(id).await?.map(GroupRoster::from))
}

/// Groups having at most `max_count` students.
///
/// Loads every group with its students and filters in memory; see
/// [`within_max_students`].
///
/// # Errors
///
/// Returns an error if any query fails.
pub async fn get_groups_with_student_count(
    session: &mut Session,
    max_count: i64,
) -> Result<Vec<GroupWithStudents>, StoreError> {
    let loaded = session.groups_with_students().await?;
    Ok(within_max_students(loaded, max_count))
}
