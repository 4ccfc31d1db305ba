//! Session persistence and the current-user store.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{Role, Session, SessionStore, UnknownRole};
