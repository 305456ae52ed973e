// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::bag::AttributeBag;
use crate::entities::handler::EntityCollector;
use crate::entities::{self, TweetEntity};
use crate::error::Result;
use crate::metadata::tweet as keys;
use crate::parser::{self, JsonHandler, Payload, XmlHandler};
use crate::place::{self, GeoLocation};
use crate::search::SearchListener;
use crate::text::DateParser;
use crate::tweet::{self, Tweet};
use crate::user::{self, UserAccount};

use super::{split_first, Accumulator, ResponseHandler, XmlRecords};

/// Parses statuses and direct messages.
///
/// JSON payloads may be a bare array of statuses, an object with a `statuses` array (as search
/// returns), or one status on its own. In XML, every `status` or `direct_message` element that
/// isn't inside another record is one item.
///
/// Each status gets its author, entities and location attached. Direct messages get the sender in
/// place of the author, plus the recipient. A retweet gets the original status attached with its
/// own author, entities and location; a retweet inside that is not followed any further.
#[derive(Debug)]
pub struct StatusHandler {
    dates: DateParser,
    statuses: Accumulator<Tweet>,
    records: XmlRecords<StatusRecord>,
}

impl Default for StatusHandler {
    fn default() -> Self {
        StatusHandler::new(DateParser::default())
    }
}

impl StatusHandler {
    /// Creates a handler that reads timestamps with the given parser.
    pub fn new(dates: DateParser) -> StatusHandler {
        StatusHandler {
            dates,
            statuses: Accumulator::default(),
            records: XmlRecords::new(&["status", "direct_message"]),
        }
    }

    fn handle_status(&mut self, obj: &Map<String, Value>) -> Result<()> {
        let bag = status_bag(obj, &self.dates)?;
        self.statuses.push(Tweet::from_data(bag));
        Ok(())
    }
}

/// Builds the bag for one status, with everything but the sender, recipient and retweet.
fn tweet_bag(obj: &Map<String, Value>, dates: &DateParser) -> Result<AttributeBag> {
    let mut bag = AttributeBag::new();
    tweet::handler::populate_json(&mut bag, obj, dates)?;

    if let Some(user_obj) = parser::sub_object(obj, "user")? {
        put_user(&mut bag, keys::USER_ACCOUNT, user_obj, dates)?;
    }

    if let Some(ent_obj) = parser::sub_object(obj, "entities")? {
        let mut ent = AttributeBag::new();
        entities::handler::populate_json(&mut ent, ent_obj, dates)?;
        if !ent.is_empty() {
            bag.put(keys::ENTITY, TweetEntity::from_data(ent));
        }
    }

    let mut geo = AttributeBag::new();
    for key in &["geo", "place"] {
        if let Some(geo_obj) = parser::sub_object(obj, key)? {
            place::handler::populate_json(&mut geo, geo_obj, dates)?;
        }
    }
    if !geo.is_empty() {
        bag.put(keys::LOCATION, GeoLocation::from_data(geo));
    }

    Ok(bag)
}

fn put_user(
    bag: &mut AttributeBag,
    key: &'static str,
    obj: &Map<String, Value>,
    dates: &DateParser,
) -> Result<()> {
    let mut user_bag = AttributeBag::new();
    user::handler::populate_json(&mut user_bag, obj, dates)?;
    if !user_bag.is_empty() {
        bag.put(key, UserAccount::from_data(user_bag));
    }
    Ok(())
}

/// Builds the full bag for one status or direct message.
pub(crate) fn status_bag(obj: &Map<String, Value>, dates: &DateParser) -> Result<AttributeBag> {
    let mut bag = tweet_bag(obj, dates)?;

    if let Some(sender) = parser::sub_object(obj, "sender")? {
        put_user(&mut bag, keys::USER_ACCOUNT, sender, dates)?;
    }
    if let Some(recipient) = parser::sub_object(obj, "recipient")? {
        put_user(&mut bag, keys::RECIPIENT_ACCOUNT, recipient, dates)?;
    }

    if let Some(original) = parser::sub_object(obj, "retweeted_status")? {
        let mut scalars = AttributeBag::new();
        tweet::handler::populate_json(&mut scalars, original, dates)?;
        if !scalars.is_empty() {
            bag.put(keys::REPOSTED_TWEET, Tweet::from_data(tweet_bag(original, dates)?));
        }
    }

    Ok(bag)
}

/// The parts of one status assembled from XML events.
#[derive(Debug, Default)]
struct TweetParts {
    tweet: AttributeBag,
    user: AttributeBag,
    entities: EntityCollector,
    location: AttributeBag,
}

impl TweetParts {
    fn leaf(&mut self, rel: &str, text: &str, dates: &DateParser) -> Result<()> {
        match split_first(rel) {
            (_, None) => tweet::handler::populate_path(&mut self.tweet, rel, text, dates),
            ("user", Some(field)) if !field.contains('/') => {
                user::handler::populate_path(&mut self.user, field, text, dates)
            }
            ("entities", Some(inner)) => self.entities.text(inner, text, dates),
            ("geo", Some(_)) | ("place", Some(_)) => {
                place::handler::populate_path(&mut self.location, rel, text, dates)
            }
            _ => Ok(()),
        }
    }

    fn end(&mut self, rel: &str) {
        match split_first(rel) {
            ("entities", None) => self.entities.flush(),
            ("entities", Some(inner)) => self.entities.end(inner),
            _ => (),
        }
    }

    fn into_bag(self) -> AttributeBag {
        let mut bag = self.tweet;

        if !self.user.is_empty() {
            bag.put(keys::USER_ACCOUNT, UserAccount::from_data(self.user));
        }

        let ent = self.entities.finish();
        if !ent.is_empty() {
            bag.put(keys::ENTITY, TweetEntity::from_data(ent));
        }

        if !self.location.is_empty() {
            bag.put(keys::LOCATION, GeoLocation::from_data(self.location));
        }

        bag
    }
}

/// One status or direct message assembled from XML events.
#[derive(Debug, Default)]
struct StatusRecord {
    main: TweetParts,
    sender: AttributeBag,
    recipient: AttributeBag,
    retweet: TweetParts,
}

impl StatusRecord {
    fn leaf(&mut self, rel: &str, text: &str, dates: &DateParser) -> Result<()> {
        match split_first(rel) {
            ("sender", Some(field)) if !field.contains('/') => {
                user::handler::populate_path(&mut self.sender, field, text, dates)
            }
            ("recipient", Some(field)) if !field.contains('/') => {
                user::handler::populate_path(&mut self.recipient, field, text, dates)
            }
            ("retweeted_status", Some(inner)) => match split_first(inner) {
                ("retweeted_status", _) => Ok(()),
                _ => self.retweet.leaf(inner, text, dates),
            },
            _ => self.main.leaf(rel, text, dates),
        }
    }

    fn end(&mut self, rel: &str) {
        match split_first(rel) {
            ("retweeted_status", Some(inner)) => self.retweet.end(inner),
            _ => self.main.end(rel),
        }
    }

    fn into_bag(self) -> AttributeBag {
        let mut bag = self.main.into_bag();

        if !self.sender.is_empty() {
            bag.put(keys::USER_ACCOUNT, UserAccount::from_data(self.sender));
        }
        if !self.recipient.is_empty() {
            bag.put(keys::RECIPIENT_ACCOUNT, UserAccount::from_data(self.recipient));
        }
        if !self.retweet.tweet.is_empty() {
            bag.put(keys::REPOSTED_TWEET, Tweet::from_data(self.retweet.into_bag()));
        }

        bag
    }
}

impl JsonHandler for StatusHandler {
    fn handle_json(&mut self, root: &Value, start_key: &str) -> Result<()> {
        match Payload::classify(root, start_key, &["statuses"])? {
            Payload::Array(items) | Payload::Named { items, .. } => {
                debug!(count = items.len(), "status array");
                for item in items {
                    self.handle_status(parser::as_record(item)?)?;
                }
            }
            Payload::Single(obj) => {
                debug!("single status");
                self.handle_status(obj)?;
            }
        }

        Ok(())
    }
}

impl XmlHandler for StatusHandler {
    fn start_element(&mut self, path: &str) -> Result<()> {
        self.records.start(path);
        Ok(())
    }

    fn end_element(&mut self, path: &str) -> Result<()> {
        if let Some(record) = self.records.end(path) {
            self.statuses.push(Tweet::from_data(record.into_bag()));
        } else if let Some((rel, record)) = self.records.route(path) {
            record.end(rel);
        }
        Ok(())
    }

    fn text(&mut self, path: &str, text: &str) -> Result<()> {
        if let Some((rel, record)) = self.records.route(path) {
            record.leaf(rel, text, &self.dates)?;
        }
        Ok(())
    }
}

impl ResponseHandler for StatusHandler {
    type Item = Tweet;

    fn results(&self) -> &[Tweet] {
        self.statuses.items()
    }

    fn set_listener(&mut self, listener: Arc<dyn SearchListener<Tweet>>) {
        self.statuses.set_listener(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::{assert_known_keys, Entity};
    use crate::common::tests::load_file;
    use crate::error::Error;
    use crate::metadata;
    use crate::parser::{parse_json, parse_xml};

    fn parse(path: &str) -> StatusHandler {
        let mut handler = StatusHandler::default();
        parse_json(load_file(path).as_bytes(), &mut handler).unwrap();
        handler
    }

    #[test]
    fn bare_array() {
        let handler = parse("sample_payloads/statuses.json");
        let tweets = handler.results();

        assert_eq!(tweets.len(), 3);
        assert_eq!(tweets[0].id(), Some("6112617443"));
        assert_eq!(tweets[1].id(), Some("6112581564"));
        assert_eq!(tweets[2].id(), Some("6112488153"));

        let first = &tweets[0];
        assert_eq!(first.content(), Some("Ownership and borrowing, now with fewer tears. @rustlang #rust"));
        assert_eq!(first.get_str(metadata::tweet::SOURCE), Some("Tweetie"));
        assert_eq!(first.get_str(metadata::tweet::PUBLISH_DATE), Some("1259414712000"));
        assert!(!first.data().has(metadata::tweet::IN_REPLY_TO_TWEET_ID));

        let author = first.user_account().unwrap();
        assert_eq!(author.user_name(), Some("twiterapime"));
        assert!(author.data().has(metadata::user::PICTURE_URI_BIGGER));

        let ent = first.entity().unwrap();
        assert_eq!(ent.mentions().len(), 1);
        assert_eq!(ent.hashtags().len(), 1);
        assert!(ent.urls().is_empty());

        // no geo, no place, no entities
        let last = &tweets[2];
        assert!(last.location().is_none());
        assert!(last.entity().is_none());
        assert!(last.reposted_tweet().is_none());
    }

    #[test]
    fn three_shapes() {
        let named = parse("sample_payloads/search.json");
        assert_eq!(named.results().len(), 2);

        let single = parse("sample_payloads/status.json");
        assert_eq!(single.results().len(), 1);
        let tweet = &single.results()[0];
        assert_eq!(tweet.id(), Some("5920356571"));

        let loc = tweet.location().unwrap();
        assert_eq!(loc.coordinates(), Some((-22.9, -43.2)));
        assert_eq!(loc.place_name(), Some("Rio de Janeiro"));
        assert_eq!(loc.polygon().map(|p| p.len()), Some(6));

        let one = parse("sample_payloads/statuses_one.json");
        assert_eq!(one.results().len(), 1);
        assert_eq!(one.results()[0].id(), Some("5920356571"));
    }

    #[test]
    fn retweet() {
        let handler = parse("sample_payloads/retweet.json");
        let tweet = &handler.results()[0];

        let original = tweet.reposted_tweet().unwrap();
        assert!(!original.data().is_empty());
        assert_eq!(original.id(), Some("5909997434"));
        assert_eq!(original.user_account().and_then(|u| u.user_name()), Some("rustlang"));
        assert_eq!(tweet.user_account().and_then(|u| u.user_name()), Some("twiterapime"));

        // only one level is followed
        assert!(original.reposted_tweet().is_none());
    }

    #[test]
    fn direct_messages() {
        let handler = parse("sample_payloads/direct_messages.json");
        let dm = &handler.results()[0];

        assert_eq!(dm.content(), Some("see you at the meetup"));
        assert_eq!(dm.user_account().and_then(|u| u.user_name()), Some("rustlang"));
        assert_eq!(dm.recipient_account().and_then(|u| u.user_name()), Some("twiterapime"));
        assert!(dm.validate_recipient().is_ok());
    }

    #[test]
    fn bad_document_keeps_prior_items() {
        let mut handler = StatusHandler::default();
        let body = br#"[
            {"id": 1, "text": "ok", "created_at": "Sat Nov 07 21:30:03 +0000 2009"},
            {"id": 2, "text": "bad", "created_at": "not a date"},
            {"id": 3, "text": "never reached"}
        ]"#;

        match parse_json(body, &mut handler) {
            Err(Error::MalformedInput(_)) => (),
            other => panic!("expected MalformedInput, got {:?}", other),
        }
        assert_eq!(handler.results().len(), 1);
        assert_eq!(handler.results()[0].id(), Some("1"));

        let mut handler = StatusHandler::default();
        assert!(parse_json(br#"{"statuses": {"id": 1}}"#, &mut handler).is_err());
        assert!(handler.results().is_empty());
    }

    #[test]
    fn load_into_existing() {
        let handler = parse("sample_payloads/statuses.json");

        let mut tweet = Tweet::with_content("draft").unwrap();
        handler.load_into(&mut tweet, 1).unwrap();
        assert_eq!(&tweet, &handler.results()[1]);

        match handler.load_into(&mut tweet, 3) {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn xml_matches_json() {
        let json = parse("sample_payloads/status.json");

        let mut xml = StatusHandler::default();
        parse_xml(load_file("sample_payloads/status.xml").as_bytes(), &mut xml).unwrap();

        assert_eq!(xml.results().len(), 1);
        assert_eq!(xml.results(), json.results());
    }

    #[test]
    fn entity_items_with_disjoint_fields() {
        let mut json = StatusHandler::default();
        parse_json(
            br#"{"id": 7, "text": "two links", "entities": {"urls": [
                {"url": "http://t.co/a", "expanded_url": null},
                {"url": null, "expanded_url": "http://example.com/b"}
            ]}}"#,
            &mut json,
        )
        .unwrap();

        let mut xml = StatusHandler::default();
        parse_xml(
            b"<status><id>7</id><text>two links</text><entities><urls>\
              <url><url>http://t.co/a</url><expanded_url/></url>\
              <url><url/><expanded_url>http://example.com/b</expanded_url></url>\
              </urls></entities></status>",
            &mut xml,
        )
        .unwrap();

        let urls = json.results()[0].entity().unwrap().urls();
        assert_eq!(urls.len(), 2);
        assert_eq!(xml.results(), json.results());
    }

    #[test]
    fn only_dictionary_keys() {
        for name in &["statuses", "search", "status", "retweet", "direct_messages"] {
            for tweet in parse(&format!("sample_payloads/{}.json", name)).results() {
                assert_known_keys(tweet);
            }
        }

        for name in &["status", "retweet", "direct_messages"] {
            let mut xml = StatusHandler::default();
            let body = load_file(&format!("sample_payloads/{}.xml", name));
            parse_xml(body.as_bytes(), &mut xml).unwrap();
            xml.results().iter().for_each(|t| assert_known_keys(t));
        }
    }

    #[test]
    fn xml_retweet_and_dm() {
        let mut xml = StatusHandler::default();
        parse_xml(load_file("sample_payloads/retweet.xml").as_bytes(), &mut xml).unwrap();
        let json = parse("sample_payloads/retweet.json");
        assert_eq!(xml.results(), json.results());

        let mut xml = StatusHandler::default();
        parse_xml(load_file("sample_payloads/direct_messages.xml").as_bytes(), &mut xml).unwrap();
        let json = parse("sample_payloads/direct_messages.json");
        assert_eq!(xml.results(), json.results());
    }
}
