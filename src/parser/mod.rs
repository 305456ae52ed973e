// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two ways a response body gets fed to a handler.
//!
//! Twitter has served the same records as JSON and as XML, and the handlers in this crate accept
//! either one. The two formats are consumed very differently, though:
//!
//! * JSON is parsed into a whole `serde_json::Value` up front, and the handler gets one call with
//!   the finished tree. The document is wrapped in an object under a *start key* so the handler
//!   always begins from the same place, no matter whether the server sent an array or an object.
//!   See `JsonHandler` and `parse_json`.
//! * XML is streamed. The handler sees one event per element boundary and one per leaf text node,
//!   each carrying the slash-delimited path of ancestor tags leading to it. Handlers match on the
//!   *end* of that path so they don't care how the server wrapped the records. See `XmlHandler`
//!   and `parse_xml`.
//!
//! The field mappers share one `PathTable` per entity between both formats, where the JSON key
//! `k` and the XML path suffix `/k` name the same field. That's what keeps the two formats
//! producing the same attribute bags.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

mod path;
mod xml;

pub use self::path::{FieldRule, PathTable, Transform};
pub use self::xml::parse_xml;

/// The key `parse_json` stores the parsed document under.
pub const ROOT_KEY: &str = "root";

/// The formats a response body can arrive in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Returns the file extension Twitter uses to select this format on a request URL.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

/// A handler that consumes a fully parsed JSON document.
pub trait JsonHandler {
    /// Receives the document root. The real payload is stored under `start_key`.
    fn handle_json(&mut self, root: &Value, start_key: &str) -> Result<()>;
}

/// A handler that consumes a stream of XML path events.
///
/// Paths are absolute and start with a slash, like `/statuses/status/user/screen_name`.
/// Namespaced tags keep their prefix, so a point shows up as `.../geo/georss:point`.
pub trait XmlHandler {
    /// Called when an element opens.
    fn start_element(&mut self, _path: &str) -> Result<()> {
        Ok(())
    }

    /// Called when an element closes, after any `text` call for it.
    fn end_element(&mut self, _path: &str) -> Result<()> {
        Ok(())
    }

    /// Called once for every leaf element when it closes, unless it was self-closing. The text may
    /// be empty, for `<x></x>`. Entities in it have already been decoded.
    fn text(&mut self, path: &str, text: &str) -> Result<()>;
}

/// Parses the given body as JSON and hands it to the handler under `ROOT_KEY`.
pub fn parse_json<H: JsonHandler + ?Sized>(input: &[u8], handler: &mut H) -> Result<()> {
    let doc: Value = serde_json::from_slice(input)?;

    let mut root = Map::new();
    root.insert(ROOT_KEY.to_string(), doc);

    handler.handle_json(&Value::Object(root), ROOT_KEY)
}

/// Parses the given body in the given format, driving whichever side of the handler applies.
pub fn parse<H>(format: Format, input: &[u8], handler: &mut H) -> Result<()>
where
    H: JsonHandler + XmlHandler + ?Sized,
{
    match format {
        Format::Json => parse_json(input, handler),
        Format::Xml => parse_xml(input, handler),
    }
}

/// The shapes a JSON payload can take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// The payload was a bare array of records.
    Array(&'a [Value]),
    /// The payload was an object carrying its records in a named array, possibly alongside cursor
    /// fields.
    Named {
        name: &'a str,
        items: &'a [Value],
        container: &'a Map<String, Value>,
    },
    /// The payload was a single record.
    Single(&'a Map<String, Value>),
}

impl<'a> Payload<'a> {
    /// Classifies the payload stored under `start_key` in the given root.
    ///
    /// The names are checked in order and the first one present on an object payload wins. A name
    /// that is present but doesn't hold an array is an error, rather than a hint that the object
    /// is a single record.
    pub fn classify(root: &'a Value, start_key: &str, names: &[&'a str]) -> Result<Payload<'a>> {
        let payload = root
            .get(start_key)
            .ok_or_else(|| Error::malformed(format!("no payload under {:?}", start_key)))?;

        match payload {
            Value::Array(items) => Ok(Payload::Array(items)),
            Value::Object(obj) => {
                for &name in names {
                    if let Some(val) = obj.get(name) {
                        return match val {
                            Value::Array(items) => Ok(Payload::Named {
                                name,
                                items,
                                container: obj,
                            }),
                            _ => Err(Error::malformed(format!("{:?} is not an array", name))),
                        };
                    }
                }
                Ok(Payload::Single(obj))
            }
            other => Err(Error::malformed(format!(
                "expected an object or an array, found {}",
                kind_of(other)
            ))),
        }
    }
}

/// Renders a JSON value the way it gets stored in an `AttributeBag`.
///
/// Strings come through as-is and numbers and booleans as their JSON text. `null` gives `None`,
/// which handlers treat the same as a missing key.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Returns the object nested under `key`, treating a `null` value as absent.
pub fn sub_object<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a Map<String, Value>>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(other) => Err(Error::malformed(format!(
            "{:?} should be an object, found {}",
            key,
            kind_of(other)
        ))),
    }
}

/// Returns the array nested under `key`, treating a `null` value as absent.
pub fn sub_array<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a [Value]>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(Error::malformed(format!(
            "{:?} should be an array, found {}",
            key,
            kind_of(other)
        ))),
    }
}

/// Reads a record out of an array element.
pub fn as_record(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::malformed(format!("expected a record, found {}", kind_of(value))))
}

/// Reads the cursor under `key`. Cursors arrive as numbers or as numeric strings; a missing or
/// `null` cursor reads as zero.
pub fn cursor(obj: &Map<String, Value>, key: &str) -> Result<i64> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| Error::malformed(format!("{} out of range: {}", key, n))),
        Some(Value::String(s)) => parse_cursor(key, s),
        Some(other) => Err(Error::malformed(format!(
            "{} should be a number, found {}",
            key,
            kind_of(other)
        ))),
    }
}

/// Reads a cursor out of XML text.
pub fn parse_cursor(key: &str, text: &str) -> Result<i64> {
    text.trim()
        .parse()
        .map_err(|_| Error::malformed(format!("{} is not numeric: {:?}", key, text)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(doc: Value) -> Value {
        json!({ "root": doc })
    }

    #[test]
    fn classify_shapes() {
        let arr = wrap(json!([{"id": 1}, {"id": 2}]));
        match Payload::classify(&arr, ROOT_KEY, &["statuses"]).unwrap() {
            Payload::Array(items) => assert_eq!(items.len(), 2),
            other => panic!("expected an array, got {:?}", other),
        }

        let named = wrap(json!({"statuses": [{"id": 1}], "search_metadata": {}}));
        match Payload::classify(&named, ROOT_KEY, &["statuses"]).unwrap() {
            Payload::Named { name, items, .. } => {
                assert_eq!(name, "statuses");
                assert_eq!(items.len(), 1);
            }
            other => panic!("expected a named array, got {:?}", other),
        }

        let single = wrap(json!({"id": 1, "text": "hi"}));
        match Payload::classify(&single, ROOT_KEY, &["statuses"]).unwrap() {
            Payload::Single(obj) => assert_eq!(obj.len(), 2),
            other => panic!("expected a single record, got {:?}", other),
        }
    }

    #[test]
    fn classify_priority() {
        let both = wrap(json!({"users": [], "ids": [1, 2]}));
        match Payload::classify(&both, ROOT_KEY, &["ids", "users"]).unwrap() {
            Payload::Named { name, .. } => assert_eq!(name, "ids"),
            other => panic!("expected a named array, got {:?}", other),
        }
    }

    #[test]
    fn classify_rejects_bad_shapes() {
        let not_array = wrap(json!({"statuses": {"id": 1}}));
        assert!(matches!(
            Payload::classify(&not_array, ROOT_KEY, &["statuses"]),
            Err(Error::MalformedInput(_))
        ));

        let scalar = wrap(json!("nope"));
        assert!(matches!(
            Payload::classify(&scalar, ROOT_KEY, &[]),
            Err(Error::MalformedInput(_))
        ));

        assert!(matches!(
            Payload::classify(&json!({}), ROOT_KEY, &[]),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn scalars() {
        assert_eq!(scalar_string(&json!("a")), Some("a".to_string()));
        assert_eq!(scalar_string(&json!("")), Some(String::new()));
        assert_eq!(scalar_string(&json!(12345678901u64)), Some("12345678901".to_string()));
        assert_eq!(scalar_string(&json!(-3.5)), Some("-3.5".to_string()));
        assert_eq!(scalar_string(&json!(false)), Some("false".to_string()));
        assert_eq!(scalar_string(&Value::Null), None);
    }

    #[test]
    fn cursors() {
        let obj = json!({"next_cursor": 1374004777531007833i64, "previous_cursor": "-12", "bad": "x"});
        let obj = obj.as_object().unwrap();

        assert_eq!(cursor(obj, "next_cursor").unwrap(), 1374004777531007833);
        assert_eq!(cursor(obj, "previous_cursor").unwrap(), -12);
        assert_eq!(cursor(obj, "missing").unwrap(), 0);
        assert!(matches!(cursor(obj, "bad"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn nested_lookups() {
        let obj = json!({"user": {"id": 1}, "geo": null, "text": "x", "tags": []});
        let obj = obj.as_object().unwrap();

        assert!(sub_object(obj, "user").unwrap().is_some());
        assert!(sub_object(obj, "geo").unwrap().is_none());
        assert!(sub_object(obj, "place").unwrap().is_none());
        assert!(sub_object(obj, "text").is_err());
        assert_eq!(sub_array(obj, "tags").unwrap().map(|a| a.len()), Some(0));
        assert!(sub_array(obj, "user").is_err());
    }

    struct Collect(Vec<String>);

    impl JsonHandler for Collect {
        fn handle_json(&mut self, root: &Value, start_key: &str) -> Result<()> {
            self.0.push(root[start_key].to_string());
            Ok(())
        }
    }

    #[test]
    fn json_is_wrapped() {
        let mut h = Collect(Vec::new());
        parse_json(br#"[1,2]"#, &mut h).unwrap();
        assert_eq!(h.0, vec!["[1,2]"]);

        assert!(matches!(parse_json(b"{not json", &mut h), Err(Error::InvalidJson(_))));
    }
}
