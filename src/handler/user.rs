// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::metadata;
use crate::parser::{self, JsonHandler, Payload, XmlHandler};
use crate::search::SearchListener;
use crate::text::DateParser;
use crate::tweet::{self, Tweet};
use crate::user::{self, UserAccount};

use super::{split_first, xml_cursor, Accumulator, Cursor, ResponseHandler, XmlRecords};

/// Parses user accounts.
///
/// JSON payloads may be a bare array of accounts, an object with a `users` array and cursors (as
/// the follower and friend lists return), or one account on its own. An account's embedded
/// `status` becomes its last tweet, with only the status's own fields.
#[derive(Debug)]
pub struct UserHandler {
    dates: DateParser,
    users: Accumulator<UserAccount>,
    records: XmlRecords<UserRecord>,
    next_cursor: i64,
    previous_cursor: i64,
}

impl Default for UserHandler {
    fn default() -> Self {
        UserHandler::new(DateParser::default())
    }
}

impl UserHandler {
    /// Creates a handler that reads timestamps with the given parser.
    pub fn new(dates: DateParser) -> UserHandler {
        UserHandler {
            dates,
            users: Accumulator::default(),
            records: XmlRecords::new(&["user"]),
            next_cursor: 0,
            previous_cursor: 0,
        }
    }

    fn handle_user(&mut self, obj: &Map<String, Value>) -> Result<()> {
        let mut bag = AttributeBag::new();
        user::handler::populate_json(&mut bag, obj, &self.dates)?;

        if let Some(status) = parser::sub_object(obj, "status")? {
            let mut last = AttributeBag::new();
            tweet::handler::populate_json(&mut last, status, &self.dates)?;
            if !last.is_empty() {
                bag.put(metadata::user::LAST_TWEET, Tweet::from_data(last));
            }
        }

        self.users.push(UserAccount::from_data(bag));
        Ok(())
    }
}

/// One account assembled from XML events.
#[derive(Debug, Default)]
struct UserRecord {
    user: AttributeBag,
    last_tweet: AttributeBag,
}

impl UserRecord {
    fn leaf(&mut self, rel: &str, text: &str, dates: &DateParser) -> Result<()> {
        match split_first(rel) {
            (_, None) => user::handler::populate_path(&mut self.user, rel, text, dates),
            ("status", Some(field)) if !field.contains('/') => {
                tweet::handler::populate_path(&mut self.last_tweet, field, text, dates)
            }
            _ => Ok(()),
        }
    }

    fn into_account(self) -> UserAccount {
        let mut bag = self.user;
        if !self.last_tweet.is_empty() {
            bag.put(metadata::user::LAST_TWEET, Tweet::from_data(self.last_tweet));
        }
        UserAccount::from_data(bag)
    }
}

impl JsonHandler for UserHandler {
    fn handle_json(&mut self, root: &Value, start_key: &str) -> Result<()> {
        match Payload::classify(root, start_key, &["users"])? {
            Payload::Array(items) => {
                debug!(count = items.len(), "user array");
                for item in items {
                    self.handle_user(parser::as_record(item)?)?;
                }
            }
            Payload::Named {
                items, container, ..
            } => {
                debug!(count = items.len(), "paged user array");
                self.next_cursor = parser::cursor(container, "next_cursor")?;
                self.previous_cursor = parser::cursor(container, "previous_cursor")?;
                for item in items {
                    self.handle_user(parser::as_record(item)?)?;
                }
            }
            Payload::Single(obj) => {
                debug!("single user");
                self.handle_user(obj)?;
            }
        }

        Ok(())
    }
}

impl XmlHandler for UserHandler {
    fn start_element(&mut self, path: &str) -> Result<()> {
        self.records.start(path);
        Ok(())
    }

    fn end_element(&mut self, path: &str) -> Result<()> {
        if let Some(record) = self.records.end(path) {
            self.users.push(record.into_account());
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

impl ResponseHandler for UserHandler {
    type Item = UserAccount;

    fn results(&self) -> &[UserAccount] {
        self.users.items()
    }

    fn set_listener(&mut self, listener: Arc<dyn SearchListener<UserAccount>>) {
        self.users.set_listener(listener);
    }
}

impl Cursor for UserHandler {
    type Item = UserAccount;

    fn previous_cursor_id(&self) -> i64 {
        self.previous_cursor
    }

    fn next_cursor_id(&self) -> i64 {
        self.next_cursor
    }

    fn into_inner(self) -> Vec<UserAccount> {
        self.users.into_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::{assert_known_keys, Entity};
    use crate::common::tests::load_file;
    use crate::parser::{parse_json, parse_xml};

    fn parse(path: &str) -> UserHandler {
        let mut handler = UserHandler::default();
        parse_json(load_file(path).as_bytes(), &mut handler).unwrap();
        handler
    }

    #[test]
    fn single_user_with_last_tweet() {
        let handler = parse("sample_payloads/user.json");
        assert_eq!(handler.results().len(), 1);

        let user = &handler.results()[0];
        assert_eq!(user.id(), Some("83876527"));
        assert_eq!(user.user_name(), Some("twiterapime"));
        assert_eq!(user.get_str(metadata::user::FOLLOWERS_COUNT), Some("42"));
        assert_eq!(
            user.get_str(metadata::user::CREATE_DATE),
            Some("1249939920000")
        );
        assert!(!user.data().has(metadata::user::URL));

        let last = user.last_tweet().unwrap();
        assert_eq!(last.id(), Some("6112617443"));
        assert_eq!(last.get_str(metadata::tweet::SOURCE), Some("web"));
        assert!(last.user_account().is_none());
        assert!(last.entity().is_none());

        assert_eq!(handler.next_cursor_id(), 0);
        assert_eq!(handler.previous_cursor_id(), 0);
        assert_known_keys(user);
    }

    #[test]
    fn paged_users() {
        let handler = parse("sample_payloads/followers.json");

        assert_eq!(handler.next_cursor_id(), 1374004777531007833);
        assert_eq!(handler.previous_cursor_id(), 0);
        handler.results().iter().for_each(|u| assert_known_keys(u));

        let users = handler.into_inner();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_name(), Some("rustlang"));
        assert_eq!(users[1].user_name(), Some("twiterapime"));
    }

    #[test]
    fn empty_page() {
        let mut handler = UserHandler::default();
        parse_json(
            br#"{"users": [], "next_cursor": 0, "previous_cursor": -1}"#,
            &mut handler,
        )
        .unwrap();

        assert!(handler.results().is_empty());
        assert_eq!(handler.previous_cursor_id(), -1);

        let mut handler = UserHandler::default();
        parse_json(b"[]", &mut handler).unwrap();
        assert!(handler.results().is_empty());
        assert_eq!(handler.next_cursor_id(), 0);
        assert_eq!(handler.previous_cursor_id(), 0);
    }

    #[test]
    fn xml_matches_json() {
        let json = parse("sample_payloads/user.json");
        let mut xml = UserHandler::default();
        parse_xml(load_file("sample_payloads/user.xml").as_bytes(), &mut xml).unwrap();
        assert_eq!(xml.results(), json.results());

        let json = parse("sample_payloads/followers.json");
        let mut xml = UserHandler::default();
        parse_xml(load_file("sample_payloads/followers.xml").as_bytes(), &mut xml).unwrap();
        assert_eq!(xml.results(), json.results());

        // `<location></location>` is an empty value, `<url/>` is no value
        let rustlang = &xml.results()[0];
        assert_eq!(rustlang.get_str(metadata::user::LOCATION), Some(""));
        assert!(!xml.results()[1].data().has(metadata::user::URL));
        assert_eq!(xml.next_cursor_id(), json.next_cursor_id());
        assert_eq!(xml.previous_cursor_id(), json.previous_cursor_id());
    }
}
