// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Field mapper for the scalar fields of a list.

use serde_json::{Map, Value};

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::metadata::list;
use crate::parser::{FieldRule, PathTable};
use crate::text::DateParser;

pub const FIELDS: PathTable = PathTable::new(&[
    FieldRule::plain("id", list::ID),
    FieldRule::plain("name", list::NAME),
    FieldRule::plain("full_name", list::FULL_NAME),
    FieldRule::plain("slug", list::SLUG),
    FieldRule::plain("description", list::DESCRIPTION),
    FieldRule::plain("subscriber_count", list::SUBSCRIBER_COUNT),
    FieldRule::plain("member_count", list::MEMBER_COUNT),
    FieldRule::plain("uri", list::URI),
    FieldRule::plain("following", list::FOLLOWING),
    FieldRule::plain("mode", list::MODE),
    FieldRule::date("created_at", list::CREATE_DATE),
]);

/// Copies the scalar fields of a list object into the bag.
pub fn populate_json(
    bag: &mut AttributeBag,
    obj: &Map<String, Value>,
    dates: &DateParser,
) -> Result<()> {
    FIELDS.populate_json(bag, obj, dates)
}

/// Maps one leaf of a list record into the bag. The path is relative to the record.
pub fn populate_path(
    bag: &mut AttributeBag,
    path: &str,
    text: &str,
    dates: &DateParser,
) -> Result<()> {
    FIELDS.populate_path(bag, path, text, dates).map(|_| ())
}
