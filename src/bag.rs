// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The key/value container that backs every entity.
//!
//! An `AttributeBag` maps keys from the `metadata` dictionary to `Value`s. The contract the rest
//! of the crate leans on is that a key is present if and only if the source document carried a
//! non-null value for it: there are no defaults and no null placeholders, so `get` returning
//! `None` always means "the server didn't say", and an empty string always means "the server
//! said, and it was empty".

use std::collections::HashMap;
use std::iter::FromIterator;

use crate::entities::TweetEntity;
use crate::error::{Error, Result};
use crate::metadata::EntityKind;
use crate::place::GeoLocation;
use crate::tweet::Tweet;
use crate::user::UserAccount;

/// A single value stored in an `AttributeBag`.
///
/// Which variant a key holds is fixed per key by the field dictionary: most keys hold `Text`,
/// the nesting keys hold the matching entity, and the entity collections hold `Entities`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A scalar, kept as the text it arrived as.
    Text(String),
    /// A sequence of scalars, such as the points of a place polygon.
    TextList(Vec<String>),
    /// A nested tweet (a retweeted status, or an account's last tweet).
    Tweet(Box<Tweet>),
    /// A nested account (author, recipient, list owner).
    User(Box<UserAccount>),
    /// A nested location.
    Location(Box<GeoLocation>),
    /// A nested entity container.
    Entity(Box<TweetEntity>),
    /// An ordered collection of entity items.
    Entities(Vec<TweetEntity>),
}

impl Value {
    /// Returns the enclosed text, if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Text(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Value {
        Value::TextList(v)
    }
}

impl From<Tweet> for Value {
    fn from(t: Tweet) -> Value {
        Value::Tweet(Box::new(t))
    }
}

impl From<UserAccount> for Value {
    fn from(u: UserAccount) -> Value {
        Value::User(Box::new(u))
    }
}

impl From<GeoLocation> for Value {
    fn from(g: GeoLocation) -> Value {
        Value::Location(Box::new(g))
    }
}

impl From<TweetEntity> for Value {
    fn from(e: TweetEntity) -> Value {
        Value::Entity(Box::new(e))
    }
}

impl From<Vec<TweetEntity>> for Value {
    fn from(v: Vec<TweetEntity>) -> Value {
        Value::Entities(v)
    }
}

/// A mapping from attribute keys to values. Two bags are equal when they hold the same keys with
/// the same values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag(HashMap<String, Value>);

impl AttributeBag {
    /// Creates a new, empty bag.
    pub fn new() -> AttributeBag {
        AttributeBag(HashMap::new())
    }

    /// Returns the value stored under the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Stores a value under the given key, returning the value it replaced.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns whether the given key is present.
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of keys in the bag.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the bag holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the keys in the bag, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Returns the text stored under the given key, if it's a `Text` value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the list of strings stored under the given key.
    pub fn get_strs(&self, key: &str) -> Option<&[String]> {
        match self.get(key) {
            Some(Value::TextList(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns the tweet nested under the given key.
    pub fn get_tweet(&self, key: &str) -> Option<&Tweet> {
        match self.get(key) {
            Some(Value::Tweet(t)) => Some(t),
            _ => None,
        }
    }

    /// Returns the account nested under the given key.
    pub fn get_user(&self, key: &str) -> Option<&UserAccount> {
        match self.get(key) {
            Some(Value::User(u)) => Some(u),
            _ => None,
        }
    }

    /// Returns the location nested under the given key.
    pub fn get_location(&self, key: &str) -> Option<&GeoLocation> {
        match self.get(key) {
            Some(Value::Location(g)) => Some(g),
            _ => None,
        }
    }

    /// Returns the entity container nested under the given key.
    pub fn get_entity(&self, key: &str) -> Option<&TweetEntity> {
        match self.get(key) {
            Some(Value::Entity(e)) => Some(e),
            _ => None,
        }
    }

    /// Returns the entity collection stored under the given key.
    pub fn get_entities(&self, key: &str) -> Option<&[TweetEntity]> {
        match self.get(key) {
            Some(Value::Entities(v)) => Some(v),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttributeBag {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        AttributeBag(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Common behavior of the domain entities, each of which wraps exactly one `AttributeBag`.
pub trait Entity: From<AttributeBag> {
    /// Which field dictionary this entity's bag draws its keys from.
    const KIND: EntityKind;

    /// Returns the bag backing this entity.
    fn data(&self) -> &AttributeBag;

    /// Replaces everything this entity holds with the given bag. This is how an entity the caller
    /// already holds gets refreshed with the server's copy of it.
    fn set_data(&mut self, data: AttributeBag);

    /// Returns the value stored under the given key.
    fn get(&self, key: &str) -> Option<&Value> {
        self.data().get(key)
    }

    /// Returns the text stored under the given key.
    fn get_str(&self, key: &str) -> Option<&str> {
        self.data().get_str(key)
    }

    /// Returns the text stored under the given key, or an `InvalidArgument` error if it's absent
    /// or empty.
    fn check_present(&self, key: &str) -> Result<&str> {
        match self.get_str(key) {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(Error::invalid_arg(format!("{} must not be empty", key))),
        }
    }
}

/// Panics if the entity, or anything nested in it, holds a key outside its kind's dictionary.
#[cfg(test)]
pub(crate) fn assert_known_keys<E: Entity>(entity: &E) {
    for key in entity.data().keys() {
        assert!(E::KIND.recognizes(key), "{} is not a {:?} key", key, E::KIND);

        match entity.get(key) {
            Some(Value::Tweet(t)) => assert_known_keys(&**t),
            Some(Value::User(u)) => assert_known_keys(&**u),
            Some(Value::Location(g)) => assert_known_keys(&**g),
            Some(Value::Entity(e)) => assert_known_keys(&**e),
            Some(Value::Entities(items)) => {
                for item in items {
                    assert_known_keys(item);
                }
            }
            _ => (),
        }
    }
}
