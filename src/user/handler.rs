// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Field mapper for user accounts.

use serde_json::{Map, Value};

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::metadata::user;
use crate::parser::{FieldRule, PathTable};
use crate::text::DateParser;

pub const FIELDS: PathTable = PathTable::new(&[
    FieldRule::plain("id", user::ID),
    FieldRule::plain("name", user::NAME),
    FieldRule::plain("screen_name", user::USER_NAME),
    FieldRule::plain("location", user::LOCATION),
    FieldRule::plain("description", user::DESCRIPTION),
    FieldRule::plain("profile_image_url", user::PICTURE_URI),
    FieldRule::plain("url", user::URL),
    FieldRule::plain("protected", user::PROTECTED),
    FieldRule::plain("followers_count", user::FOLLOWERS_COUNT),
    FieldRule::plain("friends_count", user::FRIENDS_COUNT),
    FieldRule::plain("profile_background_color", user::PROFILE_BACKGROUND_COLOR),
    FieldRule::plain("profile_text_color", user::PROFILE_TEXT_COLOR),
    FieldRule::plain("profile_link_color", user::PROFILE_LINK_COLOR),
    FieldRule::plain("profile_background_image_url", user::PROFILE_BACKGROUND_IMAGE_URI),
    FieldRule::date("created_at", user::CREATE_DATE),
    FieldRule::plain("favourites_count", user::FAVOURITES_COUNT),
    FieldRule::plain("utc_offset", user::UTC_OFFSET),
    FieldRule::plain("time_zone", user::TIME_ZONE),
    FieldRule::plain("statuses_count", user::TWEETS_COUNT),
    FieldRule::plain("notifications", user::NOTIFICATIONS),
    FieldRule::plain("verified", user::VERIFIED),
    FieldRule::plain("geo_enabled", user::GEO_ENABLED),
]);

/// Builds the link to an account's profile picture at the given size.
pub fn picture_uri(screen_name: &str, size: &str) -> String {
    format!(
        "http://api.twitter.com/1/users/profile_image/{}.json?size={}",
        screen_name, size
    )
}

fn add_picture_uris(bag: &mut AttributeBag) {
    let name = match bag.get_str(user::USER_NAME) {
        Some(name) => name.to_string(),
        None => return,
    };

    bag.put(user::PICTURE_URI_MINI, picture_uri(&name, "mini"));
    bag.put(user::PICTURE_URI_NORMAL, picture_uri(&name, "normal"));
    bag.put(user::PICTURE_URI_BIGGER, picture_uri(&name, "bigger"));
}

/// Copies the fields of a user object into the bag.
pub fn populate_json(
    bag: &mut AttributeBag,
    obj: &Map<String, Value>,
    dates: &DateParser,
) -> Result<()> {
    FIELDS.populate_json(bag, obj, dates)?;
    add_picture_uris(bag);
    Ok(())
}

/// Maps one leaf of a user record into the bag. The path is relative to the record.
pub fn populate_path(
    bag: &mut AttributeBag,
    path: &str,
    text: &str,
    dates: &DateParser,
) -> Result<()> {
    if let Some(rule) = FIELDS.populate_path(bag, path, text, dates)? {
        if rule.target == user::USER_NAME {
            add_picture_uris(bag);
        }
    }
    Ok(())
}
