// Process-wide client state: the poll collection and the session.

pub mod polls;
pub mod session;

pub use polls::{PollStore, Upsert};
pub use session::SessionStore;
