// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Infrastructure types related to packaging rate-limit information alongside responses from
//! Twitter, and to telling a failed response apart from one worth parsing.

use hyper::{Body, StatusCode};
use tracing::debug;

use super::Headers;
use crate::error::{Error, Result};
use crate::handler::ErrorHandler;

const X_RATE_LIMIT_LIMIT: &str = "x-rate-limit-limit";
const X_RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
const X_RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

///A helper struct to wrap response data with accompanying rate limit information.
///
///Each of the rate-limit fields is `-1` when the server didn't send the matching header.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    ///The rate limit ceiling for the given request.
    pub rate_limit: i32,
    ///The number of requests left for the 15-minute window.
    pub rate_limit_remaining: i32,
    ///The UTC Unix timestamp at which the rate window resets.
    pub rate_limit_reset: i32,
    ///The decoded response from the request.
    pub response: T,
}

impl<T> Response<T> {
    ///Convert a `Response<T>` to a `Response<U>` by running its contained response through the
    ///given function. This preserves its rate-limit information.
    pub fn map<F, U>(src: Response<T>, fun: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            rate_limit: src.rate_limit,
            rate_limit_remaining: src.rate_limit_remaining,
            rate_limit_reset: src.rate_limit_reset,
            response: fun(src.response),
        }
    }
}

fn header_i32(headers: &Headers, name: &str) -> Option<i32> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Reads the rate-limit headers into an otherwise empty `Response`.
pub fn rate_headers(headers: &Headers) -> Response<()> {
    Response {
        rate_limit: header_i32(headers, X_RATE_LIMIT_LIMIT).unwrap_or(-1),
        rate_limit_remaining: header_i32(headers, X_RATE_LIMIT_REMAINING).unwrap_or(-1),
        rate_limit_reset: header_i32(headers, X_RATE_LIMIT_RESET).unwrap_or(-1),
        response: (),
    }
}

/// Turns an unsuccessful status into the matching error.
///
/// 200 and 304 pass. Everything else fails, with the message `ErrorHandler` finds in `body`, or
/// `HTTP ERROR CODE: <n>` when it finds none:
///
/// - 404 and 406 are `InvalidQuery`;
/// - 400, 403, 420 and 429 are `LimitExceeded`, carrying the `X-Rate-Limit-Reset` header;
/// - 401 is `Security`;
/// - anything else is `BadStatus`.
pub fn check_status(status: StatusCode, headers: &Headers, body: &[u8]) -> Result<()> {
    let code = status.as_u16();
    if code == 200 || code == 304 {
        return Ok(());
    }

    let message = ErrorHandler::from_body(body)
        .message
        .unwrap_or_else(|| format!("HTTP ERROR CODE: {}", code));

    debug!(code, %message, "unsuccessful response");

    Err(match code {
        404 | 406 => Error::InvalidQuery(message),
        400 | 403 | 420 | 429 => Error::LimitExceeded {
            message,
            reset: header_i32(headers, X_RATE_LIMIT_RESET),
        },
        401 => Error::Security(message),
        _ => Error::BadStatus(status, message),
    })
}

/// Reads a whole response, failing with the error `check_status` picks for it. On success, returns
/// the body along with the rate-limit headers.
pub async fn read_response(resp: hyper::Response<Body>) -> Result<Response<Vec<u8>>> {
    let (parts, body) = resp.into_parts();
    let body = hyper::body::to_bytes(body).await?;

    check_status(parts.status, &parts.headers, &body)?;

    Ok(Response::map(rate_headers(&parts.headers), |_| body.to_vec()))
}
