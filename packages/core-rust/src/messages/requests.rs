//! Request payloads.
//!
//! Partial updates follow one rule: an absent or empty string leaves the
//! field unchanged. `StudentPatch::group_id` additionally distinguishes an
//! absent key (keep) from an explicit `null` (unassign).

use serde::{Deserialize, Deserializer};

use crate::schema::{Presence, ValidationResult};
use crate::traits::Validate;
use crate::types::EntityId;

/// Body of `POST /groups`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
    pub name: String,
}

impl Validate for NewGroup {
    fn validate(&self) -> ValidationResult {
        Presence::new()
            .require(&self.name, "Group name is required")
            .finish()
    }
}

/// Body of `POST /students`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub group_id: Option<EntityId>,
}

impl Validate for NewStudent {
    fn validate(&self) -> ValidationResult {
        Presence::new()
            .require(&self.first_name, "First name is required")
            .require(&self.last_name, "Last name is required")
            .finish()
    }
}

/// Body of `PUT /students/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// `None`: keep. `Some(None)`: unassign. `Some(Some(id))`: reassign.
    #[serde(default, deserialize_with = "present")]
    pub group_id: Option<Option<EntityId>>,
}

/// Every field of a patch is optional.
impl Validate for StudentPatch {
    fn validate(&self) -> ValidationResult {
        ValidationResult::Valid
    }
}

impl StudentPatch {
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        non_empty(self.first_name.as_deref())
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        non_empty(self.last_name.as_deref())
    }
}

/// Body of `POST /courses`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for NewCourse {
    fn validate(&self) -> ValidationResult {
        Presence::new()
            .require(&self.name, "Course name is required")
            .finish()
    }
}

/// Body of `PUT /courses/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for CoursePatch {
    fn validate(&self) -> ValidationResult {
        ValidationResult::Valid
    }
}

impl CoursePatch {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }
}

/// Query string of `GET /students`. `course` takes precedence over
/// `max_group_size` when both are given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub max_group_size: Option<i64>,
}

impl StudentFilter {
    #[must_use]
    pub fn course(&self) -> Option<&str> {
        non_empty(self.course.as_deref())
    }
}

/// Query string of `GET /groups/with_max_students`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MaxStudentsQuery {
    pub max_count: i64,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Wraps any present value (including `null`) in `Some`, so a missing key
/// stays `None` through `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_student_group_id_is_optional() {
        let body: NewStudent =
            serde_json::from_str(r#"{"first_name":"A","last_name":"B"}"#).unwrap();
        assert_eq!(body.group_id, None);
        assert!(body.validate().is_valid());
    }

    #[test]
    fn new_group_requires_name_field() {
        assert!(serde_json::from_str::<NewGroup>("{}").is_err());
    }

    #[test]
    fn blank_group_name_fails_validation() {
        let body: NewGroup = serde_json::from_str(r#"{"name":"  "}"#).unwrap();
        assert_eq!(
            body.validate().message().as_deref(),
            Some("Group name is required")
        );
    }

    #[test]
    fn student_patch_distinguishes_absent_and_null_group() {
        let absent: StudentPatch = serde_json::from_str(r#"{"first_name":"C"}"#).unwrap();
        assert_eq!(absent.group_id, None);

        let null: StudentPatch = serde_json::from_str(r#"{"group_id":null}"#).unwrap();
        assert_eq!(null.group_id, Some(None));

        let set: StudentPatch = serde_json::from_str(r#"{"group_id":4}"#).unwrap();
        assert_eq!(set.group_id, Some(Some(4)));
    }

    #[test]
    fn empty_strings_in_patches_are_ignored() {
        let patch: StudentPatch =
            serde_json::from_str(r#"{"first_name":"","last_name":"Hopper"}"#).unwrap();
        assert_eq!(patch.first_name(), None);
        assert_eq!(patch.last_name(), Some("Hopper"));

        let patch: CoursePatch = serde_json::from_str(r#"{"description":""}"#).unwrap();
        assert_eq!(patch.name(), None);
        assert_eq!(patch.description(), None);
    }

    #[test]
    fn student_filter_ignores_empty_course() {
        let filter = StudentFilter {
            course: Some(String::new()),
            max_group_size: Some(3),
        };
        assert_eq!(filter.course(), None);
    }
}
