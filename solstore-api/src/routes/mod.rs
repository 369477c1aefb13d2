/// HTTP route handlers
///
/// # Modules
///
/// - `home`: public landing page payload
/// - `auth`: login and logout
/// - `dashboard`: admin overview
/// - `products`: inverter listing and CRUD
/// - `slider`: homepage slider listing and CRUD
/// - `users`: admin account registration and removal
/// - `health`: liveness check

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod products;
pub mod slider;
pub mod users;
