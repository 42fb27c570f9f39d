//! Opaque bearer credentials.
//!
//! A token's plaintext form is `"{id}|{secret}"`. The secret half is random
//! and only its SHA-256 digest is stored, so a leaked table never yields
//! usable credentials. Several tokens may be live for one user at a time;
//! logout revokes only the token presented on that request.

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::AccessToken;
use crate::database::repository::Repository;

/// Proof of a resolved bearer credential: which user, via which token
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCredential {
    pub user_id: i64,
    pub token_id: i64,
}

/// Issue a fresh credential for a user; returns the plaintext token, which is
/// never reconstructable afterwards.
pub async fn issue(pool: &PgPool, user_id: i64) -> Result<String, StoreError> {
    let secret = generate_secret();
    let (token_id,): (i64,) = sqlx::query_as(
        "INSERT INTO access_tokens (user_id, token_hash) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(hash_secret(&secret))
    .fetch_one(pool)
    .await?;

    Ok(format!("{}|{}", token_id, secret))
}

/// Resolve a bearer token to a credential. `Ok(None)` covers every
/// unauthenticated case: malformed token, unknown id, or digest mismatch.
pub async fn authenticate(
    pool: &PgPool,
    bearer: &str,
) -> Result<Option<AuthenticatedCredential>, StoreError> {
    let Some((token_id, secret)) = split_token(bearer) else {
        return Ok(None);
    };

    let repo: Repository<AccessToken> = Repository::new("access_tokens", pool.clone());
    let Some(stored) = repo.find_by_id(token_id).await? else {
        return Ok(None);
    };
    if hash_secret(secret) != stored.token_hash {
        return Ok(None);
    }

    sqlx::query("UPDATE access_tokens SET last_used_at = now() WHERE id = $1")
        .bind(stored.id)
        .execute(pool)
        .await?;

    Ok(Some(AuthenticatedCredential { user_id: stored.user_id, token_id: stored.id }))
}

/// Revoke exactly one credential. Other tokens held by the same user keep
/// working.
pub async fn revoke(pool: &PgPool, token_id: i64) -> Result<(), StoreError> {
    let repo: Repository<AccessToken> = Repository::new("access_tokens", pool.clone());
    repo.delete_by_id(token_id).await?;
    Ok(())
}

fn generate_secret() -> String {
    // Two v4 UUIDs give 256 bits of randomness in a copy-paste friendly form
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn hash_secret(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

fn split_token(bearer: &str) -> Option<(i64, &str)> {
    let (id, secret) = bearer.split_once('|')?;
    if secret.is_empty() {
        return None;
    }
    let id = id.parse::<i64>().ok()?;
    Some((id, secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_token_accepts_id_pipe_secret() {
        assert_eq!(split_token("42|abcdef"), Some((42, "abcdef")));
    }

    #[test]
    fn split_token_rejects_malformed_input() {
        assert_eq!(split_token("no-separator"), None);
        assert_eq!(split_token("42|"), None);
        assert_eq!(split_token("not-a-number|secret"), None);
    }

    #[test]
    fn secret_digest_is_stable_and_hex() {
        let a = hash_secret("some-secret");
        let b = hash_secret("some-secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_secret("other-secret"));
    }

    #[test]
    fn generated_secrets_are_unique() {
        assert_ne!(generate_secret(), generate_secret());
    }
}
