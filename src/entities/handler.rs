// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Field mapper for the `entities` object of a status.
//!
//! In JSON every collection is an array of objects, so each item maps on its own. In XML the
//! fields of every item arrive as separate leaf events, like
//!
//! ```text
//! entities/user_mentions/user_mention/id
//! entities/user_mentions/user_mention/screen_name
//! entities/user_mentions/user_mention/id
//! ...
//! ```
//!
//! `EntityCollector` rebuilds the items from that stream. The close of an item element
//! (`user_mention`, `url`, `hashtag`, `creative`) ends the item being built. Failing that, a field
//! of another collection, or a field the item being built already has, starts a new item.

use std::mem;

use serde_json::{Map, Value};
use tracing::trace;

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::metadata::entity;
use crate::parser::{self, FieldRule, PathTable};
use crate::text::DateParser;

use super::TweetEntity;

/// The four collections an entity container can hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collection {
    Mentions,
    Urls,
    Hashtags,
    Medias,
}

const MENTION_FIELDS: PathTable = PathTable::new(&[
    FieldRule::plain("id", entity::USERACCOUNT_ID),
    FieldRule::plain("screen_name", entity::USERACCOUNT_USER_NAME),
    FieldRule::plain("name", entity::USERACCOUNT_NAME),
]);

const URL_FIELDS: PathTable = PathTable::new(&[
    FieldRule::plain("url", entity::URL),
    FieldRule::plain("display_url", entity::DISPLAY_URL),
    FieldRule::plain("expanded_url", entity::EXPANDED_URL),
]);

const HASHTAG_FIELDS: PathTable = PathTable::new(&[FieldRule::plain("text", entity::HASHTAG)]);

const MEDIA_FIELDS: PathTable = PathTable::new(&[
    FieldRule::plain("media_url", entity::MEDIA),
    FieldRule::plain("display_url", entity::DISPLAY_URL),
    FieldRule::plain("url", entity::URL),
]);

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Mentions,
        Collection::Urls,
        Collection::Hashtags,
        Collection::Medias,
    ];

    /// The key of this collection's array in a JSON `entities` object.
    pub fn json_key(self) -> &'static str {
        match self {
            Collection::Mentions => "user_mentions",
            Collection::Urls => "urls",
            Collection::Hashtags => "hashtags",
            Collection::Medias => "media",
        }
    }

    /// The element wrapping one item of this collection in XML.
    pub fn xml_item(self) -> &'static str {
        match self {
            Collection::Mentions => "user_mention",
            Collection::Urls => "url",
            Collection::Hashtags => "hashtag",
            Collection::Medias => "creative",
        }
    }

    /// The key this collection is stored under on the container.
    pub fn target(self) -> &'static str {
        match self {
            Collection::Mentions => entity::MENTIONS,
            Collection::Urls => entity::URLS,
            Collection::Hashtags => entity::HASHTAGS,
            Collection::Medias => entity::MEDIAS,
        }
    }

    pub fn fields(self) -> PathTable {
        match self {
            Collection::Mentions => MENTION_FIELDS,
            Collection::Urls => URL_FIELDS,
            Collection::Hashtags => HASHTAG_FIELDS,
            Collection::Medias => MEDIA_FIELDS,
        }
    }

    fn find(collection: &str, item: &str) -> Option<Collection> {
        Collection::ALL
            .iter()
            .copied()
            .find(|c| c.json_key() == collection && c.xml_item() == item)
    }

    /// Finds the collection and item field an XML leaf path belongs to, by its last three
    /// segments: `<collection>/<item>/<field>`.
    pub fn from_path(path: &str) -> Option<(Collection, &str)> {
        let mut segments = path.rsplit('/');
        let field = segments.next()?;
        let item = segments.next()?;
        let collection = segments.next()?;

        Collection::find(collection, item).map(|c| (c, field))
    }

    /// Finds the collection whose item element the given path names: `<collection>/<item>`.
    pub fn from_item_path(path: &str) -> Option<Collection> {
        let mut segments = path.rsplit('/');
        let item = segments.next()?;
        let collection = segments.next()?;

        Collection::find(collection, item)
    }
}

fn put_collection(bag: &mut AttributeBag, collection: Collection, items: Vec<TweetEntity>) {
    if !items.is_empty() {
        bag.put(collection.target(), items);
    }
}

/// Copies every collection of an `entities` object into the container bag.
pub fn populate_json(
    bag: &mut AttributeBag,
    obj: &Map<String, Value>,
    dates: &DateParser,
) -> Result<()> {
    for &collection in &Collection::ALL {
        let items = match parser::sub_array(obj, collection.json_key())? {
            Some(items) => items,
            None => continue,
        };

        let mut found = Vec::with_capacity(items.len());
        for item in items {
            let mut item_bag = AttributeBag::new();
            collection
                .fields()
                .populate_json(&mut item_bag, parser::as_record(item)?, dates)?;

            if !item_bag.is_empty() {
                found.push(TweetEntity::from_data(item_bag));
            }
        }

        put_collection(bag, collection, found);
    }

    Ok(())
}

/// The item currently being assembled from XML events.
#[derive(Debug)]
enum SubRecord {
    Idle,
    Building(Collection, AttributeBag),
}

/// Reassembles entity items from a stream of XML leaf events. See the module documentation.
#[derive(Debug)]
pub struct EntityCollector {
    active: SubRecord,
    mentions: Vec<TweetEntity>,
    urls: Vec<TweetEntity>,
    hashtags: Vec<TweetEntity>,
    medias: Vec<TweetEntity>,
}

impl Default for EntityCollector {
    fn default() -> Self {
        EntityCollector {
            active: SubRecord::Idle,
            mentions: Vec::new(),
            urls: Vec::new(),
            hashtags: Vec::new(),
            medias: Vec::new(),
        }
    }
}

impl EntityCollector {
    pub fn new() -> EntityCollector {
        EntityCollector::default()
    }

    fn slot(&mut self, collection: Collection) -> &mut Vec<TweetEntity> {
        match collection {
            Collection::Mentions => &mut self.mentions,
            Collection::Urls => &mut self.urls,
            Collection::Hashtags => &mut self.hashtags,
            Collection::Medias => &mut self.medias,
        }
    }

    /// Feeds one leaf below the `entities` element into the collector.
    pub fn text(&mut self, path: &str, text: &str, dates: &DateParser) -> Result<()> {
        let (collection, field) = match Collection::from_path(path) {
            Some(found) => found,
            None => return Ok(()),
        };
        let rule = match collection.fields().lookup(field) {
            Some(rule) => rule,
            None => return Ok(()),
        };

        let starts_new = match &self.active {
            SubRecord::Idle => true,
            SubRecord::Building(current, bag) => *current != collection || bag.has(rule.target),
        };

        if starts_new {
            self.flush();
            self.active = SubRecord::Building(collection, AttributeBag::new());
        }

        if let SubRecord::Building(_, bag) = &mut self.active {
            rule.apply(bag, text, dates)?;
        }

        Ok(())
    }

    /// Feeds the close of an element below `entities` into the collector. Closing an item
    /// element finishes the item.
    pub fn end(&mut self, path: &str) {
        if Collection::from_item_path(path).is_some() {
            self.flush();
        }
    }

    /// Closes the item being built, if any, and files it into its collection.
    pub fn flush(&mut self) {
        if let SubRecord::Building(collection, bag) = mem::replace(&mut self.active, SubRecord::Idle) {
            if !bag.is_empty() {
                trace!(?collection, "entity item");
                self.slot(collection).push(TweetEntity::from_data(bag));
            }
        }
    }

    /// Returns whether nothing has been collected so far.
    pub fn is_empty(&self) -> bool {
        matches!(self.active, SubRecord::Idle)
            && self.mentions.is_empty()
            && self.urls.is_empty()
            && self.hashtags.is_empty()
            && self.medias.is_empty()
    }

    /// Flushes the last item and returns the container bag.
    pub fn finish(mut self) -> AttributeBag {
        self.flush();

        let mut bag = AttributeBag::new();
        put_collection(&mut bag, Collection::Mentions, self.mentions);
        put_collection(&mut bag, Collection::Urls, self.urls);
        put_collection(&mut bag, Collection::Hashtags, self.hashtags);
        put_collection(&mut bag, Collection::Medias, self.medias);
        bag
    }
}
