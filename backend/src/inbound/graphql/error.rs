//! GraphQL mapping for domain errors.
//!
//! Purpose: keep the domain error type transport agnostic while giving
//! GraphQL clients a stable `extensions.code` to branch on instead of message
//! text. Internal failures are logged in full and redacted before they leave
//! the process.

use async_graphql::{ErrorExtensions, Value};
use tracing::error;

use crate::domain::{Error, ErrorCode};

const REDACTED: &str = "Internal server error";

fn redact_if_internal(err: &Error) -> Error {
    if matches!(err.code(), ErrorCode::InternalError) {
        error!(
            message = err.message(),
            trace_id = err.trace_id().unwrap_or_default(),
            "internal error returned to GraphQL client"
        );
        let mut redacted = Error::internal(REDACTED);
        if let Some(id) = err.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        err.clone()
    }
}

impl ErrorExtensions for Error {
    fn extend(&self) -> async_graphql::Error {
        let visible = redact_if_internal(self);
        async_graphql::Error::new(visible.message()).extend_with(|_, ext| {
            ext.set("code", visible.code().as_str());
            if let Some(id) = visible.trace_id() {
                ext.set("traceId", id);
            }
            if let Some(details) = visible
                .details()
                .and_then(|raw| Value::from_json(raw.clone()).ok())
            {
                ext.set("details", details);
            }
        })
    }
}
