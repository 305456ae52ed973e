// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Field mapper for the `geo` and `place` objects of a status.
//!
//! Both objects are fed into the same bag. Besides the plain place fields, the coordinate comes
//! from `coordinates` (JSON, `[lat, long]`) or `georss:point` (XML, `"lat long"`), and the outline
//! of the place from `polylines` (JSON, `["lat long", ...]`) or `georss:polygon` (XML,
//! `"lat long lat long ..."`). Either way the outline is stored as one string per number.

use serde_json::{Map, Value};

use crate::bag::AttributeBag;
use crate::error::Result;
use crate::metadata::geo;
use crate::parser::{self, FieldRule, PathTable};
use crate::text::{self, DateParser};

pub const FIELDS: PathTable = PathTable::new(&[
    FieldRule::plain("id", geo::PLACE_ID),
    FieldRule::plain("name", geo::PLACE_NAME),
    FieldRule::plain("full_name", geo::PLACE_FULL_NAME),
    FieldRule::plain("place_type", geo::PLACE_TYPE),
    FieldRule::plain("url", geo::PLACE_URL),
    FieldRule::plain("country", geo::COUNTRY),
]);

const POINT: &str = "georss:point";
const POLYGON: &str = "georss:polygon";

fn put_point<S: Into<String>>(bag: &mut AttributeBag, mut coords: impl Iterator<Item = S>) {
    if let (Some(lat), Some(long)) = (coords.next(), coords.next()) {
        bag.put(geo::LATITUDE, lat.into());
        bag.put(geo::LONGITUDE, long.into());
    }
}

/// Copies the fields of a `geo` or `place` object into the bag.
pub fn populate_json(
    bag: &mut AttributeBag,
    obj: &Map<String, Value>,
    dates: &DateParser,
) -> Result<()> {
    FIELDS.populate_json(bag, obj, dates)?;

    if let Some(coords) = parser::sub_array(obj, "coordinates")? {
        put_point(bag, coords.iter().filter_map(parser::scalar_string));
    }

    if let Some(lines) = parser::sub_array(obj, "polylines")? {
        let polygon: Vec<String> = lines
            .iter()
            .filter_map(parser::scalar_string)
            .flat_map(|line| text::split(&line, ' '))
            .collect();
        bag.put(geo::POLYGON, polygon);
    }

    Ok(())
}

/// Maps one leaf below a `geo` or `place` element into the bag.
pub fn populate_path(
    bag: &mut AttributeBag,
    path: &str,
    text: &str,
    dates: &DateParser,
) -> Result<()> {
    let leaf = path.rsplit('/').next().unwrap_or(path);

    match leaf {
        POINT => put_point(bag, text.split(' ').filter(|s| !s.is_empty())),
        POLYGON => {
            bag.put(geo::POLYGON, text::split(text, ' '));
        }
        _ => {
            FIELDS.populate_path(bag, path, text, dates)?;
        }
    }

    Ok(())
}
