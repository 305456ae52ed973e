// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mentions, links, hashtags and media extracted from a status.
//!
//! The `TweetEntity` attached to a tweet under `TWEET_ENTITY` is a container: it holds up to four
//! collections (`TWEETENTITY_MENTIONS`, `_URLS`, `_HASHTAGS` and `_MEDIAS`), each an ordered list
//! of further `TweetEntity` values. Every item in those lists describes exactly one thing, and
//! which keys it carries depends on the collection it's in:
//!
//! - mentions: `TWEETENTITY_USERACCOUNT_ID`, `_USERACCOUNT_USER_NAME`, `_USERACCOUNT_NAME`;
//! - links: `TWEETENTITY_URL`, `_DISPLAY_URL`, `_EXPANDED_URL`;
//! - hashtags: `TWEETENTITY_HASHTAG`;
//! - media: `TWEETENTITY_MEDIA`, `_DISPLAY_URL`, `_URL`.
//!
//! ### Shortened, Display, and Expanded URLs
//!
//! Links and media each carry up to three URLs:
//!
//! - `url`: This is the `t.co` shortened URL as returned directly from twitter. This is what
//!   contributes to character count in tweets and user bios.
//! - `expanded_url`: This is the original URL the user entered in their tweet.
//! - `display_url`: This is a truncated version of `expanded_url`, meant to be displayed inline
//!   with the parent text.
//!
//! A collection with no items in it is left out of the container entirely, and so is an item with
//! no fields.

use crate::bag::{AttributeBag, Entity};
use crate::metadata::{self, EntityKind};

pub mod handler;

///Represents an entity container, or one item within it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetEntity {
    data: AttributeBag,
}

impl TweetEntity {
    /// Creates an empty entity.
    pub fn new() -> TweetEntity {
        TweetEntity::default()
    }

    /// Creates an entity backed by the given bag.
    pub fn from_data(data: AttributeBag) -> TweetEntity {
        TweetEntity { data }
    }

    /// The accounts mentioned in the text.
    pub fn mentions(&self) -> &[TweetEntity] {
        self.data
            .get_entities(metadata::entity::MENTIONS)
            .unwrap_or_default()
    }

    /// The links in the text.
    pub fn urls(&self) -> &[TweetEntity] {
        self.data.get_entities(metadata::entity::URLS).unwrap_or_default()
    }

    /// The hashtags in the text.
    pub fn hashtags(&self) -> &[TweetEntity] {
        self.data
            .get_entities(metadata::entity::HASHTAGS)
            .unwrap_or_default()
    }

    /// The media attached to the status.
    pub fn medias(&self) -> &[TweetEntity] {
        self.data
            .get_entities(metadata::entity::MEDIAS)
            .unwrap_or_default()
    }
}

impl Entity for TweetEntity {
    const KIND: EntityKind = EntityKind::TweetEntity;

    fn data(&self) -> &AttributeBag {
        &self.data
    }

    fn set_data(&mut self, data: AttributeBag) {
        self.data = data;
    }
}

impl From<AttributeBag> for TweetEntity {
    fn from(data: AttributeBag) -> TweetEntity {
        TweetEntity::from_data(data)
    }
}
