// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Locations attached to statuses.
//!
//! A status can carry a bare coordinate (its `geo` object), a named place, or both. Either way
//! they end up in one `GeoLocation`: the coordinate in the latitude/longitude keys, the place in
//! the `GEOLOCATION_PLACE_*` keys and the outline of the place in `GEOLOCATION_POLYGON`.

use std::str::FromStr;

use crate::bag::{AttributeBag, Entity};
use crate::error::{Error, Result};
use crate::metadata::{self, EntityKind};

pub mod handler;

///Represents the type of region represented by a given place.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaceType {
    ///A coordinate with no area.
    Point,
    ///A region within a city.
    Neighborhood,
    ///An entire city.
    City,
    ///An administrative area, e.g. state or province.
    Admin,
    ///An entire country.
    Country,
}

impl FromStr for PlaceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<PlaceType> {
        match s {
            "poi" => Ok(PlaceType::Point),
            "neighborhood" => Ok(PlaceType::Neighborhood),
            "city" => Ok(PlaceType::City),
            "admin" => Ok(PlaceType::Admin),
            "country" => Ok(PlaceType::Country),
            other => Err(Error::malformed(format!("unknown place type {:?}", other))),
        }
    }
}

///Represents a coordinate, a named place, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoLocation {
    data: AttributeBag,
}

impl GeoLocation {
    /// Creates an empty location.
    pub fn new() -> GeoLocation {
        GeoLocation::default()
    }

    /// Creates a location backed by the given bag.
    pub fn from_data(data: AttributeBag) -> GeoLocation {
        GeoLocation { data }
    }

    /// Creates a location for the given coordinate, to attach to a new tweet.
    pub fn with_coordinates(latitude: f64, longitude: f64) -> Result<GeoLocation> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::invalid_arg(format!("latitude out of range: {}", latitude)));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::invalid_arg(format!("longitude out of range: {}", longitude)));
        }

        let mut data = AttributeBag::new();
        data.put(metadata::geo::LATITUDE, latitude.to_string());
        data.put(metadata::geo::LONGITUDE, longitude.to_string());
        Ok(GeoLocation { data })
    }

    /// Returns the coordinate of this location, if it has one and both halves are numeric.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.data.get_str(metadata::geo::LATITUDE)?.trim().parse().ok()?;
        let long = self.data.get_str(metadata::geo::LONGITUDE)?.trim().parse().ok()?;
        Some((lat, long))
    }

    /// The name of the place, if this location has one.
    pub fn place_name(&self) -> Option<&str> {
        self.data.get_str(metadata::geo::PLACE_NAME)
    }

    /// The kind of region the place covers. Types Twitter hasn't documented read as `None`.
    pub fn place_type(&self) -> Option<PlaceType> {
        self.data
            .get_str(metadata::geo::PLACE_TYPE)
            .and_then(|s| s.parse().ok())
    }

    /// The outline of the place: latitude and longitude of each vertex in turn, one number per
    /// entry.
    pub fn polygon(&self) -> Option<&[String]> {
        self.data.get_strs(metadata::geo::POLYGON)
    }
}

impl Entity for GeoLocation {
    const KIND: EntityKind = EntityKind::GeoLocation;

    fn data(&self) -> &AttributeBag {
        &self.data
    }

    fn set_data(&mut self, data: AttributeBag) {
        self.data = data;
    }
}

impl From<AttributeBag> for GeoLocation {
    fn from(data: AttributeBag) -> GeoLocation {
        GeoLocation::from_data(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates() {
        let loc = GeoLocation::with_coordinates(-22.9, -43.2).unwrap();
        assert_eq!(loc.get_str(metadata::geo::LATITUDE), Some("-22.9"));
        assert_eq!(loc.get_str(metadata::geo::LONGITUDE), Some("-43.2"));
        assert_eq!(loc.coordinates(), Some((-22.9, -43.2)));

        assert!(GeoLocation::with_coordinates(91.0, 0.0).is_err());
        assert!(GeoLocation::with_coordinates(0.0, -180.5).is_err());
        assert!(GeoLocation::with_coordinates(std::f64::NAN, 0.0).is_err());

        assert_eq!(GeoLocation::new().coordinates(), None);
    }

    #[test]
    fn place_types() {
        let mut data = AttributeBag::new();
        data.put(metadata::geo::PLACE_TYPE, "city");
        assert_eq!(GeoLocation::from_data(data).place_type(), Some(PlaceType::City));

        let mut data = AttributeBag::new();
        data.put(metadata::geo::PLACE_TYPE, "planet");
        assert_eq!(GeoLocation::from_data(data).place_type(), None);
    }
}
