/// HTTP middleware for the storefront API
///
/// - `auth_guard`: sends unauthenticated callers of admin pages to login
/// - `host_filter`: rejects requests whose Host header is not allowlisted
/// - `security`: response hardening headers

pub mod auth_guard;
pub mod host_filter;
pub mod security;

pub use auth_guard::require_login;
pub use host_filter::reject_unknown_hosts;
pub use security::SecurityHeadersLayer;
