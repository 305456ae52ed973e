// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where requests go, and how the responses' timestamps are read.
//!
//! A `ServiceConfig` is created once and handed to whatever issues requests. It knows the URL of
//! every `Endpoint` the handlers in this crate can parse, and any of them can be pointed somewhere
//! else, either one at a time with `set_url` or all at once with a different `api_url`. It's a
//! plain value, so two clients can talk to two different servers side by side.
//!
//! The config also carries the reference zone that date fields are read in. See
//! `text::DateParser` for what that means.
//!
//! The config can be loaded with `serde`; every field has a default, so an empty document gives
//! the stock configuration:
//!
//! ```
//! use nestling::service::{Endpoint, ServiceConfig};
//!
//! let config: ServiceConfig = serde_json::from_str(r#"{
//!     "urls": { "search": "http://localhost:8080/search/tweets" }
//! }"#).unwrap();
//!
//! assert_eq!(config.url(Endpoint::Search), "http://localhost:8080/search/tweets");
//! assert_eq!(
//!     config.url(Endpoint::HomeTimeline),
//!     "https://api.twitter.com/1.1/statuses/home_timeline"
//! );
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::common::ParamList;
use crate::error::{Error, Result};
use crate::parser::Format;
use crate::text::DateParser;

/// The REST endpoints whose responses this crate knows how to parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    HomeTimeline,
    UserTimeline,
    MentionsTimeline,
    ShowStatus,
    Search,
    DirectMessages,
    SentDirectMessages,
    ShowUser,
    LookupUsers,
    SearchUsers,
    FollowersList,
    FriendsList,
    FollowersIds,
    FriendsIds,
    ListsOwnerships,
    ShowList,
    ListStatuses,
}

impl Endpoint {
    /// The path of this endpoint below the API root, without a format extension.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::HomeTimeline => "statuses/home_timeline",
            Endpoint::UserTimeline => "statuses/user_timeline",
            Endpoint::MentionsTimeline => "statuses/mentions_timeline",
            Endpoint::ShowStatus => "statuses/show",
            Endpoint::Search => "search/tweets",
            Endpoint::DirectMessages => "direct_messages",
            Endpoint::SentDirectMessages => "direct_messages/sent",
            Endpoint::ShowUser => "users/show",
            Endpoint::LookupUsers => "users/lookup",
            Endpoint::SearchUsers => "users/search",
            Endpoint::FollowersList => "followers/list",
            Endpoint::FriendsList => "friends/list",
            Endpoint::FollowersIds => "followers/ids",
            Endpoint::FriendsIds => "friends/ids",
            Endpoint::ListsOwnerships => "lists/ownerships",
            Endpoint::ShowList => "lists/show",
            Endpoint::ListStatuses => "lists/statuses",
        }
    }
}

/// Request URLs and date handling for one client.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Root of the REST API. Endpoints without an override live below it.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-endpoint overrides, each a complete URL without a format extension.
    #[serde(default)]
    urls: HashMap<Endpoint, String>,

    /// Offset from UTC of the zone date fields are read in, in minutes.
    #[serde(default = "default_date_offset")]
    pub date_offset_minutes: i32,
}

fn default_api_url() -> String {
    "https://api.twitter.com/1.1".into()
}

fn default_date_offset() -> i32 {
    -180
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            api_url: default_api_url(),
            urls: HashMap::new(),
            date_offset_minutes: default_date_offset(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> ServiceConfig {
        ServiceConfig::default()
    }

    /// Points one endpoint at a different URL.
    pub fn set_url(&mut self, endpoint: Endpoint, url: impl Into<String>) {
        self.urls.insert(endpoint, url.into());
    }

    /// Returns the URL of the given endpoint, without a format extension.
    pub fn url(&self, endpoint: Endpoint) -> String {
        match self.urls.get(&endpoint) {
            Some(url) => url.clone(),
            None => format!("{}/{}", self.api_url.trim_end_matches('/'), endpoint.path()),
        }
    }

    /// Builds the full request URL for the given endpoint, format and query parameters.
    pub fn request_url(
        &self,
        endpoint: Endpoint,
        format: Format,
        params: &ParamList,
    ) -> Result<url::Url> {
        let base = format!("{}.{}", self.url(endpoint), format.extension());
        let mut url = url::Url::parse(&base)
            .map_err(|e| Error::invalid_arg(format!("bad URL for {:?}: {}", endpoint, e)))?;

        if !params.is_empty() {
            url.set_query(Some(&params.to_urlencoded()));
        }

        Ok(url)
    }

    /// Creates the date parser every handler built for this config should use.
    pub fn date_parser(&self) -> Result<DateParser> {
        DateParser::new(self.date_offset_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_urls() {
        let config = ServiceConfig::new();
        let url = config
            .request_url(Endpoint::FollowersIds, Format::Json, &ParamList::new())
            .unwrap();

        assert_eq!(url.as_str(), "https://api.twitter.com/1.1/followers/ids.json");
        assert_eq!(config.date_parser().unwrap(), DateParser::default());
    }

    #[test]
    fn overrides() {
        let mut config = ServiceConfig::new();
        config.set_url(Endpoint::ShowUser, "http://localhost:8080/users/show");
        config.api_url = "http://twitter.example/1/".into();

        assert_eq!(config.url(Endpoint::ShowUser), "http://localhost:8080/users/show");
        assert_eq!(
            config.url(Endpoint::ShowList),
            "http://twitter.example/1/lists/show"
        );

        let other = ServiceConfig::new();
        assert_eq!(
            other.url(Endpoint::ShowUser),
            "https://api.twitter.com/1.1/users/show"
        );
    }

    #[test]
    fn query_is_encoded() {
        let config = ServiceConfig::new();
        let params = ParamList::new()
            .add_param("q", "#rust lang")
            .add_param("count", "20");

        let url = config.request_url(Endpoint::Search, Format::Xml, &params).unwrap();
        assert_eq!(url.path(), "/1.1/search/tweets.xml");

        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["q"], "#rust lang");
        assert_eq!(pairs["count"], "20");
        assert!(url.query().unwrap().contains("q=%23rust%20lang"));
    }

    #[test]
    fn from_config_document() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"date_offset_minutes": 60, "urls": {"friends_ids": "http://x/ids"}}"#)
                .unwrap();

        assert_eq!(config.date_offset_minutes, 60);
        assert_eq!(config.url(Endpoint::FriendsIds), "http://x/ids");
        assert_eq!(config.api_url, "https://api.twitter.com/1.1");

        assert!(serde_json::from_str::<ServiceConfig>(r#"{"urls": {"trends": "http://x"}}"#).is_err());
        assert!(serde_json::from_str::<ServiceConfig>(r#"{"endpoint_urls": {}}"#).is_err());
    }

    #[test]
    fn bad_config_values() {
        let config = ServiceConfig {
            date_offset_minutes: 24 * 60,
            ..ServiceConfig::new()
        };
        assert!(matches!(config.date_parser(), Err(Error::InvalidArgument(_))));

        let mut config = ServiceConfig::new();
        config.set_url(Endpoint::Search, "not a url");
        assert!(matches!(
            config.request_url(Endpoint::Search, Format::Json, &ParamList::new()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
