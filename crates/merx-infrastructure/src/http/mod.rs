//! HTTP adapters: JSON client, console backend and login exchanges.

mod authenticator;
mod backend;
mod client;

pub use authenticator::HttpAuthenticator;
pub use backend::HttpConsoleBackend;
pub use client::ApiClient;
