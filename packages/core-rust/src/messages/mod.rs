//! Wire shapes for the HTTP surface.
//!
//! - [`requests`]: JSON bodies and query strings accepted by the server
//! - [`responses`]: JSON bodies returned alongside the entity types

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
