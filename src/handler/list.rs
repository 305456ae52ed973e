// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::list::{self, List};
use crate::metadata;
use crate::parser::{self, JsonHandler, Payload, XmlHandler};
use crate::search::SearchListener;
use crate::text::DateParser;
use crate::user::{self, UserAccount};

use super::{split_first, xml_cursor, Accumulator, Cursor, ResponseHandler, XmlRecords};

/// Parses lists, each with its owner attached.
///
/// JSON payloads may be a bare array of lists, an object with a `lists` array and cursors, or one
/// list on its own.
#[derive(Debug)]
pub struct ListHandler {
    dates: DateParser,
    lists: Accumulator<List>,
    records: XmlRecords<ListRecord>,
    next_cursor: i64,
    previous_cursor: i64,
}

impl Default for ListHandler {
    fn default() -> Self {
        ListHandler::new(DateParser::default())
    }
}

impl ListHandler {
    /// Creates a handler that reads timestamps with the given parser.
    pub fn new(dates: DateParser) -> ListHandler {
        ListHandler {
            dates,
            lists: Accumulator::default(),
            records: XmlRecords::new(&["list"]),
            next_cursor: 0,
            previous_cursor: 0,
        }
    }

    fn handle_list(&mut self, obj: &Map<String, Value>) -> Result<()> {
        let mut bag = AttributeBag::new();
        list::handler::populate_json(&mut bag, obj, &self.dates)?;

        if let Some(owner) = parser::sub_object(obj, "user")? {
            let mut owner_bag = AttributeBag::new();
            user::handler::populate_json(&mut owner_bag, owner, &self.dates)?;
            if !owner_bag.is_empty() {
                bag.put(metadata::list::USER_ACCOUNT, UserAccount::from_data(owner_bag));
            }
        }

        self.lists.push(List::from_data(bag));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ListRecord {
    list: AttributeBag,
    owner: AttributeBag,
}

impl ListRecord {
    fn leaf(&mut self, rel: &str, text: &str, dates: &DateParser) -> Result<()> {
        match split_first(rel) {
            (_, None) => list::handler::populate_path(&mut self.list, rel, text, dates),
            ("user", Some(field)) if !field.contains('/') => {
                user::handler::populate_path(&mut self.owner, field, text, dates)
            }
            _ => Ok(()),
        }
    }

    fn into_list(self) -> List {
        let mut bag = self.list;
        if !self.owner.is_empty() {
            bag.put(metadata::list::USER_ACCOUNT, UserAccount::from_data(self.owner));
        }
        List::from_data(bag)
    }
}

impl JsonHandler for ListHandler {
    fn handle_json(&mut self, root: &Value, start_key: &str) -> Result<()> {
        match Payload::classify(root, start_key, &["lists"])? {
            Payload::Array(items) => {
                debug!(count = items.len(), "list array");
                for item in items {
                    self.handle_list(parser::as_record(item)?)?;
                }
            }
            Payload::Named {
                items, container, ..
            } => {
                debug!(count = items.len(), "paged list array");
                self.next_cursor = parser::cursor(container, "next_cursor")?;
                self.previous_cursor = parser::cursor(container, "previous_cursor")?;
                for item in items {
                    self.handle_list(parser::as_record(item)?)?;
                }
            }
            Payload::Single(obj) => self.handle_list(obj)?,
        }

        Ok(())
    }
}

impl XmlHandler for ListHandler {
    fn start_element(&mut self, path: &str) -> Result<()> {
        self.records.start(path);
        Ok(())
    }

    fn end_element(&mut self, path: &str) -> Result<()> {
        if let Some(record) = self.records.end(path) {
            self.lists.push(record.into_list());
        }
        Ok(())
    }

    fn text(&mut self, path: &str, text: &str) -> Result<()> {
        match self.records.route(path) {
            Some((rel, record)) => record.leaf(rel, text, &self.dates),
            None => xml_cursor(path, text, &mut self.next_cursor, &mut self.previous_cursor),
        }
    }
}

impl ResponseHandler for ListHandler {
    type Item = List;

    fn results(&self) -> &[List] {
        self.lists.items()
    }

    fn set_listener(&mut self, listener: Arc<dyn SearchListener<List>>) {
        self.lists.set_listener(listener);
    }
}

impl Cursor for ListHandler {
    type Item = List;

    fn previous_cursor_id(&self) -> i64 {
        self.previous_cursor
    }

    fn next_cursor_id(&self) -> i64 {
        self.next_cursor
    }

    fn into_inner(self) -> Vec<List> {
        self.lists.into_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::{assert_known_keys, Entity};
    use crate::common::tests::load_file;
    use crate::parser::{parse_json, parse_xml};

    #[test]
    fn lists_with_owner() {
        let mut handler = ListHandler::default();
        parse_json(load_file("sample_payloads/lists.json").as_bytes(), &mut handler).unwrap();

        assert_eq!(handler.next_cursor_id(), 0);
        assert_eq!(handler.previous_cursor_id(), 0);

        let lists = handler.results();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].name(), Some("rustaceans"));
        assert_eq!(lists[0].is_public(), Some(true));
        assert_eq!(lists[1].is_public(), Some(false));
        assert_eq!(
            lists[0].owner().and_then(|o| o.user_name()),
            Some("twiterapime")
        );
        assert_eq!(
            lists[0].get_str(metadata::list::SUBSCRIBER_COUNT),
            Some("3")
        );
        assert!(lists[1].owner().is_some());
        lists.iter().for_each(|l| assert_known_keys(l));
    }

    #[test]
    fn single_list() {
        let mut handler = ListHandler::default();
        parse_json(
            br#"{"id": 9, "name": "solo", "mode": "private", "user": null}"#,
            &mut handler,
        )
        .unwrap();

        let list = &handler.results()[0];
        assert_eq!(list.id(), Some("9"));
        assert!(list.owner().is_none());
    }

    #[test]
    fn xml_matches_json() {
        let mut json = ListHandler::default();
        parse_json(load_file("sample_payloads/lists.json").as_bytes(), &mut json).unwrap();

        let mut xml = ListHandler::default();
        parse_xml(load_file("sample_payloads/lists.xml").as_bytes(), &mut xml).unwrap();

        assert_eq!(xml.results(), json.results());
    }
}
