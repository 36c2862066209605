//! Port adapters: the reqwest transport and the system clock.

mod reqwest_client;
mod system_clock;

pub use reqwest_client::{DEFAULT_REQUEST_TIMEOUT, ReqwestHttpClient};
pub use system_clock::SystemClock;
