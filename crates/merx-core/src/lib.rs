//! Core domain of the MERX operator console.
//!
//! - [`session`]: idle-timeout session liveness
//! - [`partition`]: fan-out fetching across independent clusters
//! - [`resource`]: Model → KnowledgeBase → Document resolution with bulk fallback
//!
//! Transport, persistence and configuration loading live in
//! `merx-infrastructure`; this crate only defines the traits they implement.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod merchant;
pub mod partition;
pub mod payload;
pub mod resource;
pub mod session;

pub use error::{ConsoleError, Result};
