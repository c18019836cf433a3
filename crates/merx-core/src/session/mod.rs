//! Session liveness domain module.
//!
//! # Module Structure
//!
//! - `model`: Session state, activity signals and the cached profile
//! - `store`: `SessionStore` persistence trait and an in-memory store
//! - `monitor`: `SessionLivenessMonitor`, the only writer of session fields
//! - `scheduler`: `LivenessScheduler`, the periodic check loop
//! - `policy`: `DomainPolicy` for post-login email domain checks

mod model;
mod monitor;
mod policy;
mod scheduler;
mod store;

pub use model::{
    ActivitySignal, LivenessStatus, SessionSnapshot, SessionState, UserProfile,
};
pub use monitor::SessionLivenessMonitor;
pub use policy::DomainPolicy;
pub use scheduler::LivenessScheduler;
pub use store::{MemorySessionStore, SessionStore};
