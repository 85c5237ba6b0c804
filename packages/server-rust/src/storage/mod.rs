//! Relational persistence for groups, students, and courses.
//!
//! - [`Database`]: connection pool, schema bootstrap, and session factory
//! - [`Session`]: one transaction per request; entity reads and writes are
//!   methods on the session, split by table across the submodules
//! - [`StoreError`]: storage failures, with constraint violations
//!   classified into their own variant

pub mod config;
pub mod courses;
pub mod database;
pub mod enrollments;
pub mod error;
pub mod groups;
pub mod session;
pub mod students;

pub use config::*;
pub use database::*;
pub use error::*;
pub use session::*;
