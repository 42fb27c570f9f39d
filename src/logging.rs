//! Dual log sinks for business outcomes.
//!
//! Every business action mirrors its outcome to two independent sinks, named
//! `stack` and `slack` after the channels they feed. Both are plain `tracing`
//! targets; where they end up (stderr, a webhook forwarder) is configured by
//! the subscriber, not here.

pub fn info(message: &str) {
    tracing::info!(target: "stack", "{message}");
    tracing::info!(target: "slack", "{message}");
}

pub fn warn(message: &str) {
    tracing::warn!(target: "stack", "{message}");
    tracing::warn!(target: "slack", "{message}");
}

pub fn error(message: &str, detail: &str) {
    tracing::error!(target: "stack", "{message}{detail}");
    tracing::error!(target: "slack", "{message}{detail}");
}
