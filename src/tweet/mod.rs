// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Statuses and direct messages.
//!
//! A `Tweet` is both what the status and direct-message handlers hand back and what a caller
//! builds to post something new. Parsed tweets can carry nested entities:
//!
//! - the author (or the sender, for a direct message), under `TWEET_USER_ACCOUNT`;
//! - the recipient of a direct message, under `TWEET_RECIPIENT_ACCOUNT`;
//! - the original status of a retweet, under `TWEET_REPOSTED_TWEET`;
//! - the mentions, links, hashtags and media in the text, under `TWEET_ENTITY`;
//! - the coordinates and place it was posted from, under `TWEET_LOCATION`.
//!
//! Each of those is only present if the server sent it and it had at least one field in it.
//!
//! For composing tweets, see `with_content`, `direct_message` and `with_location`.

use crate::bag::{AttributeBag, Entity};
use crate::entities::TweetEntity;
use crate::error::{Error, Result};
use crate::metadata::{self, EntityKind};
use crate::place::GeoLocation;
use crate::user::UserAccount;

pub mod handler;

/// The most characters a tweet's content may hold.
pub const MAX_CONTENT_LENGTH: usize = 140;

///Represents a single status update or direct message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tweet {
    data: AttributeBag,
}

impl Tweet {
    /// Creates an empty tweet.
    pub fn new() -> Tweet {
        Tweet::default()
    }

    /// Creates a tweet backed by the given bag.
    pub fn from_data(data: AttributeBag) -> Tweet {
        Tweet { data }
    }

    /// Creates a tweet to post with the given text.
    ///
    /// The text must be non-empty and at most 140 characters long.
    pub fn with_content(text: &str) -> Result<Tweet> {
        validate_text(text)?;

        let mut data = AttributeBag::new();
        data.put(metadata::tweet::CONTENT, text);
        Ok(Tweet { data })
    }

    /// Creates a direct message with the given text, addressed to the given screen name.
    ///
    /// The recipient is stored as a `UserAccount` holding only its user name.
    pub fn direct_message(username: &str, text: &str) -> Result<Tweet> {
        if username.trim().is_empty() {
            return Err(Error::invalid_arg("recipient user name must not be empty"));
        }

        let mut tweet = Tweet::with_content(text)?;
        tweet.data.put(
            metadata::tweet::RECIPIENT_ACCOUNT,
            UserAccount::with_user_name(username)?,
        );
        Ok(tweet)
    }

    /// Creates a tweet to post with the given text, optionally tagged with a location.
    pub fn with_location(text: &str, location: Option<GeoLocation>) -> Result<Tweet> {
        let mut tweet = Tweet::with_content(text)?;
        if let Some(location) = location {
            tweet.data.put(metadata::tweet::LOCATION, location);
        }
        Ok(tweet)
    }

    /// Checks that this tweet's content is fit to post.
    pub fn validate_content(&self) -> Result<()> {
        match self.content() {
            Some(text) => validate_text(text),
            None => Err(Error::invalid_arg("tweet content must not be empty")),
        }
    }

    /// Checks that this tweet is addressed to someone, by ID or by user name.
    pub fn validate_recipient(&self) -> Result<()> {
        let recipient = self
            .recipient_account()
            .ok_or_else(|| Error::invalid_arg("direct message has no recipient"))?;

        recipient
            .check_present(metadata::user::ID)
            .or_else(|_| recipient.check_present(metadata::user::USER_NAME))
            .map(|_| ())
            .map_err(|_| Error::invalid_arg("recipient needs an id or a user name"))
    }

    /// The numeric ID of this tweet, as text.
    pub fn id(&self) -> Option<&str> {
        self.data.get_str(metadata::tweet::ID)
    }

    /// The text of this tweet.
    pub fn content(&self) -> Option<&str> {
        self.data.get_str(metadata::tweet::CONTENT)
    }

    /// The author of this tweet, or the sender of a direct message.
    pub fn user_account(&self) -> Option<&UserAccount> {
        self.data.get_user(metadata::tweet::USER_ACCOUNT)
    }

    /// The recipient of a direct message.
    pub fn recipient_account(&self) -> Option<&UserAccount> {
        self.data.get_user(metadata::tweet::RECIPIENT_ACCOUNT)
    }

    /// The original tweet, if this one is a retweet.
    pub fn reposted_tweet(&self) -> Option<&Tweet> {
        self.data.get_tweet(metadata::tweet::REPOSTED_TWEET)
    }

    /// The mentions, links, hashtags and media extracted from the text.
    pub fn entity(&self) -> Option<&TweetEntity> {
        self.data.get_entity(metadata::tweet::ENTITY)
    }

    /// The location this tweet was posted from.
    pub fn location(&self) -> Option<&GeoLocation> {
        self.data.get_location(metadata::tweet::LOCATION)
    }
}

impl Entity for Tweet {
    const KIND: EntityKind = EntityKind::Tweet;

    fn data(&self) -> &AttributeBag {
        &self.data
    }

    fn set_data(&mut self, data: AttributeBag) {
        self.data = data;
    }
}

impl From<AttributeBag> for Tweet {
    fn from(data: AttributeBag) -> Tweet {
        Tweet::from_data(data)
    }
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::invalid_arg("tweet content must not be empty"));
    }

    let len = text.chars().count();
    if len > MAX_CONTENT_LENGTH {
        return Err(Error::invalid_arg(format!(
            "tweet content is {} characters long, the limit is {}",
            len, MAX_CONTENT_LENGTH
        )));
    }

    Ok(())
}
