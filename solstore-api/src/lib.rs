//! # Solstore API Server Library
//!
//! Core functionality for the Solstore storefront server: the public
//! landing page and the authenticated admin area for managing inverter
//! products, homepage sliders, and admin accounts.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `forms`: Multipart form parsing and CRUD action dispatch
//! - `middleware`: Auth guard, host filtering, security headers
//! - `routes`: HTTP route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod routes;
