//! Asynchronous task envelope and state

use serde::{Deserialize, Serialize};

/// Immediate response to an asynchronous submit, and the body returned
/// while polling. Carries the location to re-check and, once the work is
/// done, the URI of the produced resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEnvelope {
    /// Location to poll for progress; absolute or relative
    pub poll_uri: String,

    /// URI of the created/affected resource, present on terminal envelopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_uri: Option<String>,

    /// Current task state, when the API reports one in the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TaskState>,
}

impl TaskEnvelope {
    /// Failure message when the envelope reports a terminally failed task
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        self.state
            .as_ref()
            .filter(|s| s.is_failed())
            .map(TaskState::failure_message)
    }
}

/// Task processing state as reported in poll bodies. Deserialization only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    /// Status code string, e.g. `PROVISIONING` or `COMPLETED`
    pub status: String,

    /// Machine-oriented detail, e.g. an error identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Known task status codes. The wire value is a free-form string so that
/// new server-side codes don't break deserialization; comparisons are
/// case-insensitive against these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatusCode {
    Enqueued,
    Preparing,
    Provisioning,
    Completed,
    Error,
    UserError,
}

impl TaskStatusCode {
    fn as_str(self) -> &'static str {
        match self {
            TaskStatusCode::Enqueued => "ENQUEUED",
            TaskStatusCode::Preparing => "PREPARING",
            TaskStatusCode::Provisioning => "PROVISIONING",
            TaskStatusCode::Completed => "COMPLETED",
            TaskStatusCode::Error => "ERROR",
            TaskStatusCode::UserError => "USER_ERROR",
        }
    }
}

impl TaskState {
    fn has_code(&self, code: TaskStatusCode) -> bool {
        self.status.eq_ignore_ascii_case(code.as_str())
    }

    /// True when the task has already finished, successfully or not.
    /// An unresolvable status code (e.g. an API addition) reads as not
    /// finished rather than as an error.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.has_code(TaskStatusCode::Completed) || self.is_failed()
    }

    /// True when the task reached a terminal failure. Unresolvable codes
    /// read as not failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.has_code(TaskStatusCode::Error) || self.has_code(TaskStatusCode::UserError)
    }

    /// Best failure message available: description, then detail, then the
    /// raw status code.
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.detail.clone())
            .unwrap_or_else(|| format!("task ended with status {}", self.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(status: &str) -> TaskState {
        TaskState {
            status: status.to_string(),
            detail: None,
            description: None,
        }
    }

    #[test]
    fn test_completed_is_finished_not_failed() {
        let s = state("COMPLETED");
        assert!(s.is_finished());
        assert!(!s.is_failed());
    }

    #[test]
    fn test_failure_codes_are_finished_and_failed() {
        for code in ["ERROR", "USER_ERROR"] {
            let s = state(code);
            assert!(s.is_finished(), "{code} should be finished");
            assert!(s.is_failed(), "{code} should be failed");
        }
    }

    #[test]
    fn test_in_progress_codes() {
        for code in ["ENQUEUED", "PREPARING", "PROVISIONING"] {
            let s = state(code);
            assert!(!s.is_finished(), "{code} should not be finished");
            assert!(!s.is_failed(), "{code} should not be failed");
        }
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        assert!(state("completed").is_finished());
        assert!(state("user_error").is_failed());
    }

    #[test]
    fn test_unknown_code_is_neither_finished_nor_failed() {
        let s = state("SOME_FUTURE_STATE");
        assert!(!s.is_finished());
        assert!(!s.is_failed());
    }

    #[test]
    fn test_failure_message_prefers_description() {
        let mut s = state("ERROR");
        s.detail = Some("quota.exceeded".to_string());
        s.description = Some("Warehouse quota exceeded".to_string());
        assert_eq!(s.failure_message(), "Warehouse quota exceeded");

        s.description = None;
        assert_eq!(s.failure_message(), "quota.exceeded");

        s.detail = None;
        assert_eq!(s.failure_message(), "task ended with status ERROR");
    }

    #[test]
    fn test_envelope_deserializes_minimal_body() {
        let envelope: TaskEnvelope =
            serde_json::from_str(r#"{"pollUri": "/tasks/42"}"#).unwrap();
        assert_eq!(envelope.poll_uri, "/tasks/42");
        assert!(envelope.resource_uri.is_none());
        assert!(envelope.state.is_none());
    }

    #[test]
    fn test_envelope_deserializes_terminal_body() {
        let body = r#"{
            "pollUri": "/tasks/42",
            "resourceUri": "/warehouses/7",
            "state": {"status": "COMPLETED"}
        }"#;
        let envelope: TaskEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.resource_uri.as_deref(), Some("/warehouses/7"));
        assert!(envelope.state.unwrap().is_finished());
    }
}
