/// Authentication utilities for Solstore
///
/// # Modules
///
/// - `password`: Argon2id password hashing and verification

pub mod password;
