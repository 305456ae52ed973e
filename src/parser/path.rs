// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::{Map, Value};

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::text::{self, DateParser};

use super::scalar_string;

/// What to do to a source value before storing it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Store the text unchanged.
    Plain,
    /// Parse the text as a timestamp and store its epoch milliseconds.
    Date,
    /// Remove any markup tags from the text.
    StripTags,
}

/// Maps one source field onto one attribute key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// The JSON key, which is also the XML path suffix.
    pub source: &'static str,
    /// The attribute key to write.
    pub target: &'static str,
    pub transform: Transform,
}

impl FieldRule {
    pub const fn plain(source: &'static str, target: &'static str) -> FieldRule {
        FieldRule {
            source,
            target,
            transform: Transform::Plain,
        }
    }

    pub const fn date(source: &'static str, target: &'static str) -> FieldRule {
        FieldRule {
            source,
            target,
            transform: Transform::Date,
        }
    }

    pub const fn strip_tags(source: &'static str, target: &'static str) -> FieldRule {
        FieldRule {
            source,
            target,
            transform: Transform::StripTags,
        }
    }

    /// Transforms the given text and writes it into the bag.
    pub fn apply(&self, bag: &mut AttributeBag, text: &str, dates: &DateParser) -> Result<()> {
        let value = match self.transform {
            Transform::Plain => text.to_string(),
            Transform::Date => dates.parse(text)?.to_string(),
            Transform::StripTags => text::strip_tags(text),
        };

        bag.put(self.target, value);
        Ok(())
    }

    /// Returns whether the given path ends with this rule's source, on a segment boundary.
    fn matches(&self, path: &str) -> bool {
        if !path.ends_with(self.source) {
            return false;
        }

        let rest = path.len() - self.source.len();
        rest == 0 || path.as_bytes()[rest - 1] == b'/'
    }
}

/// A set of field rules for one entity, shared by the JSON and XML sides of its mapper.
#[derive(Debug, Copy, Clone)]
pub struct PathTable(&'static [FieldRule]);

impl PathTable {
    pub const fn new(rules: &'static [FieldRule]) -> PathTable {
        PathTable(rules)
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.0
    }

    /// Finds the rule whose source is the longest suffix of the given path.
    pub fn lookup(&self, path: &str) -> Option<&'static FieldRule> {
        self.0
            .iter()
            .filter(|rule| rule.matches(path))
            .max_by_key(|rule| rule.source.len())
    }

    /// Applies every rule whose source key is present and non-null on the given object.
    pub fn populate_json(
        &self,
        bag: &mut AttributeBag,
        obj: &Map<String, Value>,
        dates: &DateParser,
    ) -> Result<()> {
        for rule in self.0 {
            if let Some(text) = obj.get(rule.source).and_then(scalar_string) {
                rule.apply(bag, &text, dates)?;
            }
        }

        Ok(())
    }

    /// Applies the rule matching the given path, if any. Returns the rule that was applied.
    pub fn populate_path(
        &self,
        bag: &mut AttributeBag,
        path: &str,
        text: &str,
        dates: &DateParser,
    ) -> Result<Option<&'static FieldRule>> {
        match self.lookup(path) {
            Some(rule) => {
                rule.apply(bag, text, dates)?;
                Ok(Some(rule))
            }
            None => Ok(None),
        }
    }
}
