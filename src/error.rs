// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A composite error type for errors that can occur while parsing responses from Twitter.
//!
//! There are a handful of ways a response can fail to become a set of entities, and the `Error`
//! enum in this module collects them. Most of them fall into three groups:
//!
//! - The document itself didn't have the shape the handler expected: a named array that wasn't
//!   an array, a date in a format nobody recognizes, a body that wasn't JSON at all. These are
//!   `MalformedInput` and `InvalidJson`, and they stop the parse where it happened.
//! - The caller handed in something unusable before any parsing started, like an empty tweet or
//!   a list index past the end of the results. These are `InvalidArgument`.
//! - Twitter answered with a non-success status. `common::check_status` turns these into
//!   `InvalidQuery`, `LimitExceeded`, `Security` or `BadStatus`, using the message Twitter put
//!   in the body when there was one.
//!
//! Note that a field missing from a payload is not an error anywhere in this crate; it's simply
//! a key that isn't present in the resulting `AttributeBag`.

use std::fmt;

use serde::Deserialize;

/// Convenient alias to a Result containing a local Error type
pub type Result<T> = std::result::Result<T, Error>;

///Represents a collection of errors returned from a Twitter API call.
///
///`ErrorResponse::from_errors` keeps the first of these.
#[derive(Debug, Clone, PartialEq, Deserialize, thiserror::Error)]
pub struct TwitterErrors {
    ///A collection of errors returned by Twitter.
    #[serde(default)]
    pub errors: Vec<TwitterErrorCode>,
}

impl fmt::Display for TwitterErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if first {
                first = false;
            } else {
                writeln!(f, ",")?;
            }

            write!(f, "{}", e)?;
        }

        Ok(())
    }
}

///Represents a specific error returned from a Twitter API call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwitterErrorCode {
    ///The error message returned by Twitter.
    #[serde(default)]
    pub message: Option<String>,
    ///The numeric error code returned by Twitter. A list of possible error codes can be found in
    ///the [API documentation][codes].
    ///
    ///[codes]: https://developer.twitter.com/en/docs/basics/response-codes
    #[serde(default = "missing_code")]
    pub code: i32,
}

fn missing_code() -> i32 {
    -1
}

impl fmt::Display for TwitterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}: {}", self.code, self.message.as_deref().unwrap_or(""))
    }
}

/// The structured error carried by an unsuccessful response body.
///
/// Twitter reports failures as `{"errors": [{"code": 89, "message": "Invalid token"}, ...]}`.
/// Only the first entry is kept; the others have never been observed to carry anything the
/// first doesn't. When there's no usable entry, `code` stays at `-1` and `message` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The numeric error code, or `-1` if the payload had none.
    pub code: i32,
    /// The error message, if the payload had one.
    pub message: Option<String>,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        ErrorResponse {
            code: -1,
            message: None,
        }
    }
}

impl ErrorResponse {
    /// Maps the first element of an `errors` array into an `ErrorResponse`.
    pub fn from_errors(errors: &TwitterErrors) -> ErrorResponse {
        match errors.errors.first() {
            Some(first) => ErrorResponse {
                code: first.code,
                message: first.message.clone(),
            },
            None => ErrorResponse::default(),
        }
    }
}

/// Represents an error that can occur while turning a response into entities.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document didn't match the shape the handler needed. The enclosed string describes
    /// what was wrong. Items accumulated before this point are kept by the handler.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// A mandatory parameter was missing or empty. Raised before any parsing or I/O happens.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The response body could not be read as JSON.
    #[error("Error parsing JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The response couldn't be read off the connection.
    #[error("Network error: {0}")]
    NetError(#[from] hyper::Error),
    /// The server rejected the query itself (HTTP 404 or 406).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// The request was rate-limited or refused (HTTP 400, 403, 420 or 429). The enclosed
    /// timestamp, when present, is the UTC Unix time at which the rate-limit window resets.
    #[error("Limit exceeded: {message}")]
    LimitExceeded {
        /// The message reported by the server.
        message: String,
        /// The value of the `X-Rate-Limit-Reset` header, if it was sent.
        reset: Option<i32>,
    },
    /// The credentials were not accepted (HTTP 401).
    #[error("Not authorized: {0}")]
    Security(String),
    /// Any other non-success status, with the server's message.
    #[error("Error status received: {0} ({1})")]
    BadStatus(hyper::StatusCode, String),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Error {
        Error::MalformedInput(msg.into())
    }

    pub(crate) fn invalid_arg(msg: impl Into<String>) -> Error {
        Error::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(body: &str) -> ErrorResponse {
        let errors: TwitterErrors = serde_json::from_str(body).unwrap();
        ErrorResponse::from_errors(&errors)
    }

    #[test]
    fn first_error_only() {
        let err = mapped(
            r#"{"errors":[{"code":89,"message":"Invalid token"},{"code":32,"message":"nope"}]}"#,
        );

        assert_eq!(err.code, 89);
        assert_eq!(err.message.as_deref(), Some("Invalid token"));
    }

    #[test]
    fn empty_errors() {
        let err = mapped(r#"{"errors":[]}"#);

        assert_eq!(err.code, -1);
        assert_eq!(err.message, None);

        assert_eq!(mapped(r#"{"request":"/1.1/x.json"}"#), ErrorResponse::default());
    }

    #[test]
    fn partial_error_entry() {
        let err = mapped(r#"{"errors":[{"message":"Sorry"}]}"#);
        assert_eq!(err.code, -1);
        assert_eq!(err.message.as_deref(), Some("Sorry"));
    }
}
