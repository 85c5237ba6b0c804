//! In-memory roster rules applied after a full eager load.
//!
//! Filtering here is deliberately not pushed into SQL: callers load every
//! group with its students and then narrow the set. This is correct but
//! scales with the total number of students; a database-side
//! `GROUP BY ... HAVING COUNT(*) <= ?` is the natural replacement.

use tracing::debug;

use crate::types::{GroupWithStudents, Student};

/// Keeps the groups whose student count is at most `max_count`.
///
/// A negative `max_count` matches nothing. Input order is preserved.
#[must_use]
pub fn within_max_students(
    groups: Vec<GroupWithStudents>,
    max_count: i64,
) -> Vec<GroupWithStudents> {
    let Ok(max) = usize::try_from(max_count) else {
        return Vec::new();
    };
    let total = groups.len();
    let kept: Vec<_> = groups
        .into_iter()
        .filter(|g| g.student_count() <= max)
        .collect();
    debug!(total, kept = kept.len(), max, "filtered groups by student count");
    kept
}

/// Concatenates the student collections of `groups`, group by group.
#[must_use]
pub fn students_of(groups: Vec<GroupWithStudents>) -> Vec<Student> {
    groups.into_iter().flat_map(|g| g.students).collect()
}
