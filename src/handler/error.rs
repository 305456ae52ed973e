// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ErrorResponse, Result, TwitterErrors};
use crate::parser::{self, parse_json, parse_xml, JsonHandler, XmlHandler};

use super::last_segment;

/// Reads the error document sent along with an unsuccessful response.
///
/// The current API sends `{"errors": [{"code": .., "message": ..}]}`, and only the first entry is
/// kept. Older responses carried a bare `error` message instead, in JSON and in XML alike; those
/// leave the code at `-1`.
#[derive(Debug, Default)]
pub struct ErrorHandler {
    response: ErrorResponse,
}

impl ErrorHandler {
    pub fn new() -> ErrorHandler {
        ErrorHandler::default()
    }

    /// The error code, or `-1` if the document had none.
    pub fn code(&self) -> i32 {
        self.response.code
    }

    /// The error message, if the document had one.
    pub fn message(&self) -> Option<&str> {
        self.response.message.as_deref()
    }

    pub fn response(&self) -> &ErrorResponse {
        &self.response
    }

    pub fn into_response(self) -> ErrorResponse {
        self.response
    }

    /// Reads the error document in a response body, as JSON if it parses as JSON and as XML
    /// otherwise. A body that is neither gives the empty `ErrorResponse`.
    pub fn from_body(body: &[u8]) -> ErrorResponse {
        let mut handler = ErrorHandler::new();
        if parse_json(body, &mut handler).is_ok() {
            return handler.into_response();
        }

        let mut handler = ErrorHandler::new();
        if let Err(e) = parse_xml(body, &mut handler) {
            debug!(error = %e, "error body is neither JSON nor XML");
        }
        handler.into_response()
    }
}

impl JsonHandler for ErrorHandler {
    fn handle_json(&mut self, root: &Value, start_key: &str) -> Result<()> {
        let payload = &root[start_key];
        let errors = TwitterErrors::deserialize(payload)?;
        self.response = ErrorResponse::from_errors(&errors);

        if self.response.message.is_none() {
            self.response.message = payload.get("error").and_then(parser::scalar_string);
        }

        debug!(code = self.response.code, "error document");
        Ok(())
    }
}

impl XmlHandler for ErrorHandler {
    fn text(&mut self, path: &str, text: &str) -> Result<()> {
        if last_segment(path) == "error" && self.response.message.is_none() {
            self.response.message = Some(text.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::{parse_json, parse_xml};

    #[test]
    fn first_entry() {
        let mut handler = ErrorHandler::new();
        parse_json(
            br#"{"errors": [{"message": "Rate limit exceeded", "code": 88}, {"code": 1}]}"#,
            &mut handler,
        )
        .unwrap();

        assert_eq!(handler.code(), 88);
        assert_eq!(handler.message(), Some("Rate limit exceeded"));
    }

    #[test]
    fn missing_fields() {
        let mut handler = ErrorHandler::new();
        parse_json(br#"{"errors": []}"#, &mut handler).unwrap();
        assert_eq!(handler.code(), -1);
        assert_eq!(handler.message(), None);

        let mut handler = ErrorHandler::new();
        parse_json(br#"{"request": "/1/x.json", "error": "Not found"}"#, &mut handler).unwrap();
        assert_eq!(handler.code(), -1);
        assert_eq!(handler.message(), Some("Not found"));

        let mut handler = ErrorHandler::new();
        assert!(matches!(
            parse_json(br#"["nope"]"#, &mut handler),
            Err(Error::InvalidJson(_))
        ));
    }

    #[test]
    fn any_body() {
        let json = ErrorHandler::from_body(br#"{"errors":[{"code":34,"message":"Sorry"}]}"#);
        assert_eq!((json.code, json.message.as_deref()), (34, Some("Sorry")));

        let legacy = ErrorHandler::from_body(br#"{"request":"/1/users/show.json","error":"Not found"}"#);
        assert_eq!((legacy.code, legacy.message.as_deref()), (-1, Some("Not found")));

        let xml = ErrorHandler::from_body(b"<hash><error>Not authorized</error></hash>");
        assert_eq!(xml.message.as_deref(), Some("Not authorized"));

        assert_eq!(ErrorHandler::from_body(b""), ErrorResponse::default());
        assert_eq!(ErrorHandler::from_body(b"<html><body>oops"), ErrorResponse::default());
    }

    #[test]
    fn xml_error() {
        let mut handler = ErrorHandler::new();
        parse_xml(
            b"<hash><request>/1/statuses/show.xml</request><error>No status found</error></hash>",
            &mut handler,
        )
        .unwrap();

        assert_eq!(handler.code(), -1);
        assert_eq!(handler.message(), Some("No status found"));
    }
}
