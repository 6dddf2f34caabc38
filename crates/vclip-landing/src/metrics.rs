//! Uploader metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use metrics::counter;

/// Metric names as constants for consistency.
pub mod names {
    pub const UPLOADS_TOTAL: &str = "vclip_landing_uploads_total";
    pub const LEADS_TOTAL: &str = "vclip_landing_leads_total";
    pub const STATUS_POLLS_TOTAL: &str = "vclip_landing_status_polls_total";
    pub const POLL_SESSIONS_TOTAL: &str = "vclip_landing_poll_sessions_total";
}

/// Record the outcome of a file selection (`uploaded`, `processing`, or an error kind).
pub fn record_upload(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::UPLOADS_TOTAL, &labels).increment(1);
}

/// Record the outcome of a lead submission.
pub fn record_lead(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::LEADS_TOTAL, &labels).increment(1);
}

/// Record one status check and what it returned.
pub fn record_status_poll(status: &str) {
    let labels = [("status", status.to_string())];
    counter!(names::STATUS_POLLS_TOTAL, &labels).increment(1);
}

/// Record how a polling session ended.
pub fn record_poll_session(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::POLL_SESSIONS_TOTAL, &labels).increment(1);
}
