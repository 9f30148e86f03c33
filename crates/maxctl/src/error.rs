use maxctl_common::MaxctlError;
use serde::Serialize;
use thiserror::Error;

/// A failed command: what was being attempted, and why it failed.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
    /// Command arguments, reported in debug JSON output.
    pub trace: Vec<String>,
    #[source]
    pub cause: MaxctlError,
}

impl CommandError {
    pub fn new(message: impl Into<String>, cause: MaxctlError) -> Self {
        Self {
            message: message.into(),
            trace: Vec::new(),
            cause,
        }
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }

    /// `<message>: <cause>.`, or `<message>. <Cause>.` when the cause reads
    /// as its own sentence.
    pub fn fatal_text(&self) -> String {
        let message = self.message.trim_end_matches('.');
        let mut cause = self.cause.to_string();
        if cause.is_empty() {
            return format!("{message}.");
        }
        let separator = if cause.starts_with(char::is_uppercase) {
            '.'
        } else {
            ':'
        };
        if !cause.ends_with('.') {
            cause.push('.');
        }
        format!("{message}{separator} {cause}")
    }

    pub fn fatal_json(&self, debug: bool) -> serde_json::Result<String> {
        let cause = self.cause.to_string();
        let report = FatalReport {
            status: "error",
            error: FatalBody {
                message: &self.message,
                kind: "fatal",
                cause: FatalCause {
                    message: &cause,
                    error: self.cause.error_code(),
                },
                trace: debug.then_some(self.trace.as_slice()),
            },
        };
        serde_json::to_string_pretty(&report)
    }
}

#[derive(Serialize)]
struct FatalReport<'a> {
    status: &'static str,
    error: FatalBody<'a>,
}

#[derive(Serialize)]
struct FatalBody<'a> {
    message: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    cause: FatalCause<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [String]>,
}

#[derive(Serialize)]
struct FatalCause<'a> {
    message: &'a str,
    error: &'static str,
}

pub trait Context<T> {
    /// Wraps a failure with the action that was being attempted.
    fn context<F>(self, message: F) -> Result<T, CommandError>
    where
        F: FnOnce() -> String;
}

impl<T> Context<T> for maxctl_common::Result<T> {
    fn context<F>(self, message: F) -> Result<T, CommandError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|cause| CommandError::new(message(), cause))
    }
}
