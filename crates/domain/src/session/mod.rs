//! Session domain types

mod types;

pub use types::{Session, SessionContext, TokenGrant, keys};
