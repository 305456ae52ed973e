// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Curated lists of accounts.
//!
//! A parsed `List` carries its owner under `LIST_USER_ACCOUNT` when the server included one.

use crate::bag::{AttributeBag, Entity};
use crate::error::{Error, Result};
use crate::metadata::{self, EntityKind};
use crate::user::UserAccount;

pub mod handler;

///Represents a list of accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    data: AttributeBag,
}

impl List {
    /// Creates an empty list.
    pub fn new() -> List {
        List::default()
    }

    /// Creates a list backed by the given bag.
    pub fn from_data(data: AttributeBag) -> List {
        List { data }
    }

    /// Creates a list that only knows its ID, for use as a request parameter.
    pub fn with_id(id: &str) -> Result<List> {
        if id.trim().is_empty() {
            return Err(Error::invalid_arg("list id must not be empty"));
        }

        let mut data = AttributeBag::new();
        data.put(metadata::list::ID, id);
        Ok(List { data })
    }

    /// The numeric ID of this list, as text.
    pub fn id(&self) -> Option<&str> {
        self.data.get_str(metadata::list::ID)
    }

    /// The name of this list.
    pub fn name(&self) -> Option<&str> {
        self.data.get_str(metadata::list::NAME)
    }

    /// Whether the list is public. Lists with no mode recorded read as `None`.
    pub fn is_public(&self) -> Option<bool> {
        self.data
            .get_str(metadata::list::MODE)
            .map(|mode| mode == "public")
    }

    /// The account that owns this list.
    pub fn owner(&self) -> Option<&UserAccount> {
        self.data.get_user(metadata::list::USER_ACCOUNT)
    }
}

impl Entity for List {
    const KIND: EntityKind = EntityKind::List;

    fn data(&self) -> &AttributeBag {
        &self.data
    }

    fn set_data(&mut self, data: AttributeBag) {
        self.data = data;
    }
}

impl From<AttributeBag> for List {
    fn from(data: AttributeBag) -> List {
        List::from_data(data)
    }
}
