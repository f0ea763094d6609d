//! Account model for storage and API.

/// User account stored in the `users` table.
///
/// The password hash never leaves the server; response types are built
/// from individual fields instead of serializing this struct.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// When the account was created (RFC 3339)
    pub created_at: String,
}
