//! # Solstore Shared Library
//!
//! This crate contains the types and business logic shared between the
//! Solstore API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, inverters, homepage sliders)
//! - `auth`: Password hashing
//! - `session`: Signed-cookie session state and flash messages
//! - `storage`: Image storage abstraction with a local-disk backend
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;
pub mod session;
pub mod storage;

/// Current version of the Solstore shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
