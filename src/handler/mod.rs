// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-endpoint response handlers.
//!
//! A handler is created fresh for every request. It's fed the response body through one of the
//! `parser` entry points, accumulates the entities it finds in document order, and is then
//! queried for them:
//!
//! - `StatusHandler` for timelines, single statuses, search results and direct messages;
//! - `UserHandler` for account lookups and paged follower/friend lists;
//! - `ListHandler` for lists;
//! - `UserIdHandler` for paged lists of account IDs;
//! - `ErrorHandler` for the error documents Twitter sends with failed requests.
//!
//! All of them accept JSON and XML. When a handler fails partway through a document, whatever it
//! had finished before the failure stays available through `results`.
//!
//! ## Cursors
//!
//! The paged endpoints also report where the next and previous pages start, through the `Cursor`
//! trait. A response without cursors reads as zero for both.
//!
//! ## Live notification
//!
//! A handler can be given a `SearchListener` before parsing starts. The listener then sees every
//! item as soon as it's built, before the handler moves on to the next one. See the `search`
//! module for the runner that drives this.
//!
//! [`search`]: ../search/index.html

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::bag::Entity;
use crate::error::{Error, Result};
use crate::parser::{JsonHandler, XmlHandler};
use crate::search::SearchListener;

mod error;
mod list;
mod status;
mod user;
mod user_id;

pub use self::error::ErrorHandler;
pub use self::list::ListHandler;
pub use self::status::StatusHandler;
pub use self::user::UserHandler;
pub use self::user_id::UserIdHandler;

/// The query side shared by every response handler.
pub trait ResponseHandler: JsonHandler + XmlHandler {
    /// What the handler produces for each record in the response.
    type Item;

    /// Returns everything parsed so far, in document order.
    fn results(&self) -> &[Self::Item];

    /// Registers a listener to be told about each item as it's parsed.
    fn set_listener(&mut self, listener: Arc<dyn SearchListener<Self::Item>>);

    /// Replaces the data of an entity the caller already holds with the item parsed at `index`.
    fn load_into(&self, entity: &mut Self::Item, index: usize) -> Result<()>
    where
        Self::Item: Entity,
    {
        let found = self.results().get(index).ok_or_else(|| {
            Error::invalid_arg(format!(
                "index {} out of range for {} results",
                index,
                self.results().len()
            ))
        })?;

        entity.set_data(found.data().clone());
        Ok(())
    }
}

///Trait to generalize over paginated views of API results.
pub trait Cursor {
    ///What type is being returned by the API call?
    type Item;

    ///Returns a numeric reference to the previous page of results.
    fn previous_cursor_id(&self) -> i64;
    ///Returns a numeric reference to the next page of results.
    fn next_cursor_id(&self) -> i64;
    ///Consumes the cursor and returns the collection of results from inside.
    fn into_inner(self) -> Vec<Self::Item>;
}

/// The ordered result list of a handler, along with its listener.
pub(crate) struct Accumulator<T> {
    items: Vec<T>,
    listener: Option<Arc<dyn SearchListener<T>>>,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self {
        Accumulator {
            items: Vec::new(),
            listener: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Accumulator<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("items", &self.items)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl<T> Accumulator<T> {
    /// Appends an item, telling the listener about it first.
    pub(crate) fn push(&mut self, item: T) {
        trace!(index = self.items.len(), "item parsed");
        if let Some(listener) = &self.listener {
            listener.item_found(&item);
        }
        self.items.push(item);
    }

    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn set_listener(&mut self, listener: Arc<dyn SearchListener<T>>) {
        self.listener = Some(listener);
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Tracks the record being assembled from XML events.
///
/// A record opens at the first element whose name is one of `roots`, and closes with that same
/// element. Elements named like a root inside an open record are just part of it.
#[derive(Debug)]
pub(crate) struct XmlRecords<R> {
    roots: &'static [&'static str],
    current: Option<(String, R)>,
}

impl<R: Default> XmlRecords<R> {
    pub(crate) fn new(roots: &'static [&'static str]) -> XmlRecords<R> {
        XmlRecords {
            roots,
            current: None,
        }
    }

    /// Opens a record if the given element is a root and none is open already.
    pub(crate) fn start(&mut self, path: &str) {
        if self.current.is_none() && self.roots.contains(&last_segment(path)) {
            trace!(path, "record opened");
            self.current = Some((path.to_string(), R::default()));
        }
    }

    /// Returns the open record and the path relative to it, if the given path is inside it.
    pub(crate) fn route<'s, 'p>(&'s mut self, path: &'p str) -> Option<(&'p str, &'s mut R)> {
        match &mut self.current {
            Some((root, record)) => relative(root, path).map(move |rel| (rel, record)),
            None => None,
        }
    }

    /// Returns the finished record if the given element closes it.
    pub(crate) fn end(&mut self, path: &str) -> Option<R> {
        match &self.current {
            Some((root, _)) if root == path => self.current.take().map(|(_, record)| record),
            _ => None,
        }
    }
}

/// Returns the part of `path` below `root`, if `path` is strictly inside it.
pub(crate) fn relative<'p>(root: &str, path: &'p str) -> Option<&'p str> {
    if path.len() > root.len() + 1 && path.starts_with(root) && path.as_bytes()[root.len()] == b'/' {
        Some(&path[root.len() + 1..])
    } else {
        None
    }
}

pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Splits a relative path into its first segment and the rest.
pub(crate) fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.find('/') {
        Some(idx) => (&path[..idx], Some(&path[idx + 1..])),
        None => (path, None),
    }
}

/// Reads an XML cursor leaf that sits outside any record.
pub(crate) fn xml_cursor(path: &str, text: &str, next: &mut i64, previous: &mut i64) -> Result<()> {
    match last_segment(path) {
        "next_cursor" => *next = crate::parser::parse_cursor("next_cursor", text)?,
        "previous_cursor" => *previous = crate::parser::parse_cursor("previous_cursor", text)?,
        _ => (),
    }
    Ok(())
}
