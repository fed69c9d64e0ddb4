//! Remote import through the AnkiConnect add-on.
//!
//! Every call is a JSON `POST` of `{action, version, params}` answered by
//! `{result, error}`. The [`Invoke`] trait is the seam between the importer
//! and the transport so that batching can be exercised without a running
//! Anki instance.

use std::time::Duration;

mod client;
pub use client::Client;

mod import;
pub use import::{ImportError, ImportSummary, Importer, Note};

/// The AnkiConnect API version spoken by this client.
pub const API_VERSION: u32 = 6;

/// Issues a single remote action.
pub trait Invoke {
    /// Calls `action` with `params`, returning the `result` payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the call times out, fails in transit, or the
    /// remote side reports an error.
    fn invoke(&self, action: &str, params: serde_json::Value) -> Result<serde_json::Value, Error>;
}

/// Failures of a remote call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response arrived within the configured bound.
    #[error("'{action}' timed out after {elapsed:?}")]
    Timeout {
        /// The action that timed out.
        action: String,
        /// The timeout that elapsed.
        elapsed: Duration,
    },

    /// The request could not be delivered or the response could not be read.
    #[error("'{action}' failed: {source}")]
    Transport {
        /// The action being invoked.
        action: String,
        /// The underlying HTTP error.
        #[source]
        source: Box<reqwest::Error>,
    },

    /// The remote side answered with an error message.
    #[error("'{action}' was rejected: {message}")]
    Api {
        /// The action being invoked.
        action: String,
        /// The error reported by the remote side.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("'{action}' returned an unexpected response: {detail}")]
    Malformed {
        /// The action being invoked.
        action: String,
        /// What was wrong with the response.
        detail: String,
    },
}

impl Error {
    /// Whether the error is a timeout, as opposed to any other failure.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
