//! Infrastructure adapters for the MERX console.
//!
//! - [`ConfigService`]: `config.toml` loading and caching
//! - [`FileSessionStore`]: file-backed `SessionStore`
//! - [`http`]: reqwest-based backend and authenticator

pub mod config_service;
pub mod file_session_store;
pub mod http;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use file_session_store::FileSessionStore;
pub use paths::ConsolePaths;
