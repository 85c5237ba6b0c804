use serde::{Deserialize, Serialize};

/// Row identifier shared by all entities (`SQLite` `INTEGER PRIMARY KEY`).
pub type EntityId = i64;

/// A named group of students. Group names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: EntityId,
    pub name: String,
}

/// A course students can enroll in. Course names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub name: String,
    /// Free-text description; serialized as `null` when absent.
    pub description: Option<String>,
}

/// A student together with the names of the courses they are enrolled in.
///
/// This is both the stored entity and the wire shape: every read path loads
/// `courses` eagerly so serialization never observes a partial student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    /// Owning group, `None` when the student is unassigned.
    pub group_id: Option<EntityId>,
    /// Enrolled course names, ordered by course id.
    #[serde(default)]
    pub courses: Vec<String>,
}

/// A group with its student collection loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupWithStudents {
    pub group: Group,
    pub students: Vec<Student>,
}

impl GroupWithStudents {
    #[must_use]
    pub fn student_count(&self) -> usize {
        self.students.len()
    }
}
