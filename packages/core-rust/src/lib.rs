//! Roster Core — group, student and course types, request payloads, and
//! roster rules shared by the server.

pub mod messages;
pub mod roster;
pub mod schema;
pub mod traits;
pub mod types;

pub use messages::{
    CoursePatch, GroupRoster, GroupSummary, MaxStudentsQuery, Message, NewCourse, NewGroup,
    NewStudent, StudentFilter, StudentPatch,
};
pub use schema::{Presence, ValidationResult};
pub use traits::Validate;
pub use types::{Course, EntityId, Group, GroupWithStudents, Student};
