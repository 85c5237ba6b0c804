//! Response bodies that are not plain entities.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, GroupWithStudents, Student};

/// `{"message": "..."}` body used for confirmations and failures alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Element of `GET /groups/with_max_students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: EntityId,
    pub name: String,
    pub student_count: usize,
}

impl From<&GroupWithStudents> for GroupSummary {
    fn from(loaded: &GroupWithStudents) -> Self {
        Self {
            id: loaded.group.id,
            name: loaded.group.name.clone(),
            student_count: loaded.student_count(),
        }
    }
}

/// Body of `GET /groups/{id}/students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoster {
    pub group_id: EntityId,
    pub group_name: String,
    pub students: Vec<Student>,
}

impl From<GroupWithStudents> for GroupRoster {
    fn from(loaded: GroupWithStudents) -> Self {
        Self {
            group_id: loaded.group.id,
            group_name: loaded.group.name,
            students: loaded.students,
        }
    }
}
