//! Structured observability hooks for diagnosis submissions.
//!
//! This module provides:
//! - A submission-scoped tracing span via [`submission_span`]
//! - Emission functions for the submission lifecycle: submitted, resolved,
//!   failed, rejected, plus input coercion
//!
//! Events are emitted at `info!` level unless noted (filter with `RUST_LOG`).

use tracing::{info, warn};

/// Span tagging everything logged while a submission resolves.
///
/// Attach it to the resolver future with `tracing::Instrument`:
///
/// ```ignore
/// resolver.resolve(&request).instrument(submission_span(&id, "mock")).await
/// ```
pub fn submission_span(submission_id: &str, strategy: &str) -> tracing::Span {
    tracing::info_span!(
        "automedic.submission",
        submission_id = %submission_id,
        strategy = %strategy
    )
}

/// Emit event: a submission entered the pending state.
pub fn emit_submitted(submission_id: &str, strategy: &str, symptoms_len: usize) {
    info!(
        event = "diagnosis.submitted",
        submission_id = %submission_id,
        strategy = %strategy,
        symptoms_len = symptoms_len,
    );
}

/// Emit event: a submission resolved to a diagnosis.
pub fn emit_resolved(submission_id: &str, issue_title: &str, severity: i64, duration_ms: u64) {
    info!(
        event = "diagnosis.resolved",
        submission_id = %submission_id,
        issue_title = %issue_title,
        severity = severity,
        duration_ms = duration_ms,
    );
}

/// Emit event: a submission failed (error level; the cause is only visible here).
pub fn emit_failed(submission_id: &str, error: &dyn std::fmt::Display, duration_ms: u64) {
    tracing::error!(
        event = "diagnosis.failed",
        submission_id = %submission_id,
        error = %error,
        duration_ms = duration_ms,
    );
}

/// Emit event: a submission was refused or its result dropped by the overlap guard.
pub fn emit_rejected(reason: &str) {
    warn!(event = "diagnosis.rejected", reason = %reason);
}

/// Emit event: a form field could not be parsed and was coerced (warning level).
pub fn emit_input_coerced(field: &str, raw: &str, coerced_to: &str) {
    warn!(event = "input.coerced", field = %field, raw = %raw, coerced_to = %coerced_to);
}
