//! Domain operations over a [`Session`](crate::storage::Session).
//!
//! Every operation is a free function taking the caller's session. "Not
//! found" and "already done" outcomes come back as `false`, `None`, an empty
//! collection, or a [`StudentUpdate`] variant; only storage failures are
//! errors. Callers decide how outcomes map to responses and when to commit.

pub mod config;
pub mod courses;
pub mod enrollment;
pub mod groups;
pub mod seed;
pub mod students;

pub use config::ServerConfig;
pub use courses::{
    course_roster, create_course, delete_course, get_course, get_students_by_course_name,
    list_courses, update_course,
};
pub use enrollment::{add_student_to_course, remove_student_from_course};
pub use groups::{create_group, get_groups_with_student_count, group_roster, list_groups};
pub use seed::{seed_demo_data, SeedReport};
pub use students::{
    add_student, delete_student_by_id, get_student, list_students, update_student, StudentUpdate,
};
