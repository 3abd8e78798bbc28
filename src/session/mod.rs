pub mod store;
pub mod types;

pub use store::{SessionError, SessionStore};
pub use types::{HistoryEntry, SessionHistory, SessionId};
