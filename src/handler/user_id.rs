// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::{self, JsonHandler, Payload, XmlHandler};
use crate::search::SearchListener;

use super::{xml_cursor, Accumulator, Cursor, ResponseHandler};

/// Parses pages of account IDs, keeping each ID as text.
///
/// JSON payloads may be a bare array of IDs or an object with an `ids` array and cursors. In XML,
/// every `id` element directly inside an `ids` element is one ID.
///
/// A handler can be capped at a maximum number of IDs, after which the rest of the document is
/// read but its IDs are dropped.
#[derive(Debug, Default)]
pub struct UserIdHandler {
    ids: Accumulator<String>,
    max_count: Option<usize>,
    next_cursor: i64,
    previous_cursor: i64,
}

impl UserIdHandler {
    /// Creates a handler that keeps every ID it finds.
    pub fn new() -> UserIdHandler {
        UserIdHandler::default()
    }

    /// Creates a handler that keeps at most `max_count` IDs.
    pub fn with_max_count(max_count: usize) -> UserIdHandler {
        UserIdHandler {
            max_count: Some(max_count),
            ..UserIdHandler::default()
        }
    }

    /// Forgets every ID parsed so far, so the handler can be fed another page.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.next_cursor = 0;
        self.previous_cursor = 0;
    }

    fn is_full(&self) -> bool {
        self.max_count.map_or(false, |max| self.ids.len() >= max)
    }

    fn add(&mut self, id: String) {
        if !self.is_full() {
            self.ids.push(id);
        }
    }

    fn add_all(&mut self, items: &[Value]) -> Result<()> {
        for item in items {
            match item {
                Value::Number(_) | Value::String(_) => {
                    if let Some(id) = parser::scalar_string(item) {
                        self.add(id);
                    }
                }
                other => {
                    return Err(Error::malformed(format!("not an account ID: {}", other)));
                }
            }
        }
        Ok(())
    }
}

impl JsonHandler for UserIdHandler {
    fn handle_json(&mut self, root: &Value, start_key: &str) -> Result<()> {
        match Payload::classify(root, start_key, &["ids"])? {
            Payload::Array(items) => {
                debug!(count = items.len(), "id array");
                self.add_all(items)
            }
            Payload::Named {
                items, container, ..
            } => {
                debug!(count = items.len(), "paged id array");
                self.next_cursor = parser::cursor(container, "next_cursor")?;
                self.previous_cursor = parser::cursor(container, "previous_cursor")?;
                self.add_all(items)
            }
            Payload::Single(_) => Err(Error::malformed("no \"ids\" array in the response")),
        }
    }
}

impl XmlHandler for UserIdHandler {
    fn text(&mut self, path: &str, text: &str) -> Result<()> {
        if path.ends_with("/ids/id") {
            self.add(text.trim().to_string());
            Ok(())
        } else {
            xml_cursor(path, text, &mut self.next_cursor, &mut self.previous_cursor)
        }
    }
}

impl ResponseHandler for UserIdHandler {
    type Item = String;

    fn results(&self) -> &[String] {
        self.ids.items()
    }

    fn set_listener(&mut self, listener: Arc<dyn SearchListener<String>>) {
        self.ids.set_listener(listener);
    }
}

impl Cursor for UserIdHandler {
    type Item = String;

    fn previous_cursor_id(&self) -> i64 {
        self.previous_cursor
    }

    fn next_cursor_id(&self) -> i64 {
        self.next_cursor
    }

    fn into_inner(self) -> Vec<String> {
        self.ids.into_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::load_file;
    use crate::parser::{parse_json, parse_xml};

    #[test]
    fn paged_ids() {
        let mut handler = UserIdHandler::new();
        parse_json(load_file("sample_payloads/ids.json").as_bytes(), &mut handler).unwrap();

        assert_eq!(handler.results(), &["657693", "183709371", "7588892"]);
        assert_eq!(handler.next_cursor_id(), 1305102810874389703);
        assert_eq!(handler.previous_cursor_id(), 0);
    }

    #[test]
    fn bare_array_and_cap() {
        let mut handler = UserIdHandler::with_max_count(2);
        parse_json(br#"[1, 2, 3, 4]"#, &mut handler).unwrap();
        assert_eq!(handler.results(), &["1", "2"]);

        handler.clear();
        assert!(handler.results().is_empty());
        parse_json(br#"{"ids": ["10"]}"#, &mut handler).unwrap();
        assert_eq!(handler.into_inner(), vec!["10".to_string()]);
    }

    #[test]
    fn ids_required() {
        let mut handler = UserIdHandler::new();
        assert!(matches!(
            parse_json(br#"{"next_cursor": 0}"#, &mut handler),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            parse_json(br#"{"ids": [1, {"id": 2}]}"#, &mut handler),
            Err(Error::MalformedInput(_))
        ));
        assert_eq!(handler.results(), &["1"]);
    }

    #[test]
    fn xml_matches_json() {
        let mut json = UserIdHandler::new();
        parse_json(load_file("sample_payloads/ids.json").as_bytes(), &mut json).unwrap();

        let mut xml = UserIdHandler::new();
        parse_xml(load_file("sample_payloads/ids.xml").as_bytes(), &mut xml).unwrap();

        assert_eq!(xml.results(), json.results());
        assert_eq!(xml.next_cursor_id(), json.next_cursor_id());
    }
}
