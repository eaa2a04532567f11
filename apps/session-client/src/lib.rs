//! Client-side session handling for the career assistant front end.
//!
//! Persists the session credential issued by the API, attaches it to
//! protected calls, and decides which views may render.

pub mod api;
pub mod errors;
pub mod store;
pub mod views;

pub use api::{AuthApi, LoginUser, Profile};
pub use errors::ClientError;
pub use store::{
    ClientSession, FileSessionRepository, MemorySessionRepository, SessionRepository, SESSION_KEY,
};
pub use views::{resolve_view, View};
