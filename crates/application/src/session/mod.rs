//! Session lifecycle: the in-memory store and the manager that refreshes or
//! tears down the session on behalf of the client.

mod manager;
mod memory_store;

pub use manager::{Recovery, SessionManager};
pub use memory_store::InMemorySessionStore;
