//! Error type shared by every step of the publish flow.
//!
//! Every failure is fatal to the run. Library code returns these up the call
//! chain and only `main` turns them into a process exit.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a status >= 400.
    #[error("request to {url} failed with {status}: {body}")]
    Api {
        status: StatusCode,
        url: String,
        body: Value,
    },

    /// A 2xx response did not carry a field the flow depends on.
    #[error("{context}: response has no `{field}`: {body}")]
    MissingField {
        context: &'static str,
        field: &'static str,
        body: Value,
    },

    #[error(
        "page {page_id} has no connected Instagram account. Open the Page > Settings > Instagram and connect one"
    )]
    NotConnected { page_id: String },

    #[error("{0} is not set")]
    MissingConfig(&'static str),

    #[error("ffmpeg exited with {status}: {stderr}")]
    Encoder { status: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PublishError>;

/// Pull a required string field out of an API response.
pub(crate) fn require_str(body: &Value, field: &'static str, context: &'static str) -> Result<String> {
    match body.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(PublishError::MissingField {
            context,
            field,
            body: body.clone(),
        }),
    }
}
