/// Database models for Solstore
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Admin accounts and authentication
/// - `inverter`: Solar inverter products shown on the storefront
/// - `slider`: Homepage hero slider entries
///
/// # Example
///
/// ```no_run
/// use solstore_shared::models::user::{CreateUser, User};
/// use solstore_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "admin".to_string(),
///     email: "admin@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod inverter;
pub mod slider;
pub mod user;
