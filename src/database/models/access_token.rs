use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One bearer credential. Only the SHA-256 digest of the secret half is
/// stored; the plaintext `"{id}|{secret}"` form is shown exactly once at
/// issuance.
#[derive(Debug, Clone, FromRow)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}
