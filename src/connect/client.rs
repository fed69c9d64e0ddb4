use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use super::{API_VERSION, Error, Invoke};
use crate::domain::Config;

/// A blocking HTTP client for the AnkiConnect endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl Client {
    /// Creates a client for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport {
                action: "connect".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Creates a client from the endpoint and timeout in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config.endpoint.clone(), config.timeout())
    }

    /// The endpoint address.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Asks the remote side for its API version.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the result is not a number.
    pub fn version(&self) -> Result<u64, Error> {
        let result = self.invoke("version", Value::Null)?;
        result.as_u64().ok_or_else(|| Error::Malformed {
            action: "version".to_string(),
            detail: format!("expected a number, got {result}"),
        })
    }

    fn transport_error(&self, action: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                action: action.to_string(),
                elapsed: self.timeout,
            }
        } else {
            Error::Transport {
                action: action.to_string(),
                source: Box::new(e),
            }
        }
    }
}

impl Invoke for Client {
    fn invoke(&self, action: &str, params: Value) -> Result<Value, Error> {
        let mut body = json!({ "action": action, "version": API_VERSION });
        if !params.is_null() {
            body["params"] = params;
        }

        tracing::debug!(action, endpoint = %self.endpoint, "invoking remote action");

        let response: ApiResponse = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| self.transport_error(action, e))?
            .json()
            .map_err(|e| {
                if e.is_decode() {
                    Error::Malformed {
                        action: action.to_string(),
                        detail: e.to_string(),
                    }
                } else {
                    self.transport_error(action, e)
                }
            })?;

        if let Some(message) = response.error {
            return Err(Error::Api {
                action: action.to_string(),
                message,
            });
        }

        Ok(response.result)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn client(server: &MockServer, timeout: Duration) -> Client {
        Client::new(server.url("/"), timeout).unwrap()
    }

    #[test]
    fn returns_result_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .json_body(json!({ "result": 6, "error": null }));
        });

        let version = client(&server, Duration::from_secs(5)).version().unwrap();

        assert_eq!(version, 6);
        mock.assert();
    }

    #[test]
    fn remote_error_is_an_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .json_body(json!({ "result": null, "error": "model was not found" }));
        });

        let error = client(&server, Duration::from_secs(5))
            .invoke("addNotes", json!({ "notes": [] }))
            .unwrap_err();

        assert!(matches!(error, Error::Api { ref message, .. } if message == "model was not found"));
    }

    #[test]
    fn slow_response_is_a_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "result": 6, "error": null }));
        });

        let timeout = Duration::from_millis(100);
        let error = client(&server, timeout).version().unwrap_err();

        assert!(error.is_timeout());
        assert!(matches!(error, Error::Timeout { elapsed, .. } if elapsed == timeout));
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        // Nothing listens on port 9 (discard) on the loopback interface.
        let client = Client::new("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap();
        let error = client.version().unwrap_err();

        assert!(matches!(error, Error::Transport { .. }));
        assert!(!error.is_timeout());
    }

    #[test]
    fn http_error_status_is_a_transport_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(500);
        });

        let error = client(&server, Duration::from_secs(5)).version().unwrap_err();
        assert!(matches!(error, Error::Transport { .. }));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200).body("not json");
        });

        let error = client(&server, Duration::from_secs(5)).version().unwrap_err();
        assert!(matches!(error, Error::Malformed { .. }));
    }
}
