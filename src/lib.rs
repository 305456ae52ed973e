// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A library for turning Twitter REST API responses into entities.
//!
//! nestling takes the body of a response from one of Twitter's timeline, user, list or ID
//! endpoints, in JSON or in XML, and produces the statuses, accounts, lists or IDs it describes.
//! Every entity is a thin wrapper around an `AttributeBag`, a map from the fixed keys in the
//! `metadata` module to the values the server sent. A key is in the bag exactly when the server
//! sent a non-null value for it, so "absent" and "empty" never get mixed up.
//!
//! Nested records come out as nested entities: a `Tweet` carries its author, the recipient of a
//! direct message, the status it retweets, its location and its entities, each as an entity of
//! its own.
//!
//! ## Parsing a response
//!
//! Each endpoint has a matching handler in the `handler` module. Create one per response, feed it
//! the body, then ask it for what it found:
//!
//! ```rust
//! use nestling::handler::{ResponseHandler, StatusHandler};
//! use nestling::parser::{self, Format};
//!
//! let body = br#"[{"id": 5920356571, "text": "hello world",
//!                  "user": {"id": 83876527, "screen_name": "twiterapime"}}]"#;
//!
//! let mut handler = StatusHandler::default();
//! parser::parse(Format::Json, body, &mut handler).unwrap();
//!
//! let tweet = &handler.results()[0];
//! assert_eq!(tweet.content(), Some("hello world"));
//! assert_eq!(tweet.user_account().and_then(|u| u.user_name()), Some("twiterapime"));
//! ```
//!
//! The same handler accepts the XML rendition of the same response, and produces the same
//! entities from it.
//!
//! Paged endpoints also report their cursors through the `handler::Cursor` trait, and the
//! `search` module runs a parse on its own task, reporting each item to a listener as soon as it's
//! built.
//!
//! ## Making requests
//!
//! nestling doesn't sign or send requests, but it helps with both ends of one: `ServiceConfig`
//! knows the URL of every endpoint and builds request URLs from a `ParamList`, and
//! `common::read_response` turns a `hyper` response into either a body to parse or the error
//! Twitter reported.
//!
//! ## Dates
//!
//! Timestamps are stored as epoch milliseconds, as text. They're read in a fixed reference zone
//! (UTC-03:00 unless configured otherwise); see `text::DateParser`.

pub mod bag;
pub mod common;
pub mod entities;
pub mod error;
pub mod handler;
pub mod list;
pub mod metadata;
pub mod parser;
pub mod place;
pub mod search;
pub mod service;
pub mod text;
pub mod tweet;
pub mod user;

pub use crate::bag::{AttributeBag, Entity, Value};
pub use crate::common::{ParamList, Response};
pub use crate::entities::TweetEntity;
pub use crate::error::{Error, ErrorResponse, Result};
pub use crate::list::List;
pub use crate::place::GeoLocation;
pub use crate::service::{Endpoint, ServiceConfig};
pub use crate::tweet::Tweet;
pub use crate::user::UserAccount;
