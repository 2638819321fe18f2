//! Admin authentication: argon2 password hashing, the in-memory session
//! store, and the axum extractor that gates admin routes.

pub mod guard;
pub mod password;
pub mod session;

pub use guard::AdminSession;
pub use session::{Session, SessionStore};
