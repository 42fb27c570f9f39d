use sqlx::PgPool;

use crate::logging;

/// Appends one audit row per business action.
///
/// Best-effort by contract: a failed insert is reported to the log sinks and
/// swallowed. The audit trail must never change the caller-visible outcome of
/// the operation it records.
pub struct AuditRecorder {
    pool: PgPool,
}

impl AuditRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an action for an actor (None when the request was
    /// unauthenticated) under an HTTP-verb tag.
    pub async fn record(&self, actor: Option<i64>, action: &str, method: &str) {
        let result = sqlx::query(
            "INSERT INTO audit_logs (user_id, action, method) VALUES ($1, $2, $3)",
        )
        .bind(actor)
        .bind(action)
        .bind(method)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            logging::error("Failed to record audit entry: ", &e.to_string());
        }
    }
}
