// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Field mapper for the scalar fields of a status.

use serde_json::{Map, Value};

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::metadata::tweet;
use crate::parser::{FieldRule, PathTable};
use crate::text::DateParser;

pub const FIELDS: PathTable = PathTable::new(&[
    FieldRule::plain("id", tweet::ID),
    FieldRule::plain("text", tweet::CONTENT),
    FieldRule::date("created_at", tweet::PUBLISH_DATE),
    FieldRule::strip_tags("source", tweet::SOURCE),
    FieldRule::plain("favorited", tweet::FAVOURITE),
    FieldRule::plain("in_reply_to_status_id", tweet::IN_REPLY_TO_TWEET_ID),
]);

/// Copies the scalar fields of a status object into the bag.
pub fn populate_json(
    bag: &mut AttributeBag,
    obj: &Map<String, Value>,
    dates: &DateParser,
) -> Result<()> {
    FIELDS.populate_json(bag, obj, dates)
}

/// Maps one leaf of a status record into the bag. The path is relative to the record.
pub fn populate_path(
    bag: &mut AttributeBag,
    path: &str,
    text: &str,
    dates: &DateParser,
) -> Result<()> {
    FIELDS.populate_path(bag, path, text, dates).map(|_| ())
}
