// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! User accounts.
//!
//! Accounts show up everywhere: as the author of a status, as either end of a direct message, as
//! the owner of a list, and on their own from the user lookup and follower endpoints. When they
//! come from those last endpoints they can carry the account's most recent status under
//! `USERACCOUNT_LAST_TWEET`.
//!
//! Every parsed account with a screen name also carries three profile picture links, one per
//! size Twitter serves. Those are built from the screen name and don't need anything else from
//! the payload.

use crate::bag::{AttributeBag, Entity};
use crate::error::{Error, Result};
use crate::metadata::{self, EntityKind};
use crate::tweet::Tweet;

pub mod handler;

/// Represents a Twitter user account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserAccount {
    data: AttributeBag,
}

impl UserAccount {
    /// Creates an empty account.
    pub fn new() -> UserAccount {
        UserAccount::default()
    }

    /// Creates an account backed by the given bag.
    pub fn from_data(data: AttributeBag) -> UserAccount {
        UserAccount { data }
    }

    /// Creates an account that only knows its screen name, for use as a request parameter.
    pub fn with_user_name(name: &str) -> Result<UserAccount> {
        if name.trim().is_empty() {
            return Err(Error::invalid_arg("user name must not be empty"));
        }

        let mut data = AttributeBag::new();
        data.put(metadata::user::USER_NAME, name);
        Ok(UserAccount { data })
    }

    /// Returns the request parameter that identifies this account: `user_id` if the ID is known,
    /// otherwise `screen_name`.
    pub fn user_name_or_id_param(&self) -> Result<(&'static str, &str)> {
        if let Ok(id) = self.check_present(metadata::user::ID) {
            return Ok(("user_id", id));
        }

        match self.check_present(metadata::user::USER_NAME) {
            Ok(name) => Ok(("screen_name", name)),
            Err(_) => Err(Error::invalid_arg("account needs an id or a user name")),
        }
    }

    /// The numeric ID of this account, as text.
    pub fn id(&self) -> Option<&str> {
        self.data.get_str(metadata::user::ID)
    }

    /// The screen name of this account.
    pub fn user_name(&self) -> Option<&str> {
        self.data.get_str(metadata::user::USER_NAME)
    }

    /// The display name of this account.
    pub fn name(&self) -> Option<&str> {
        self.data.get_str(metadata::user::NAME)
    }

    /// The most recent status posted by this account.
    pub fn last_tweet(&self) -> Option<&Tweet> {
        self.data.get_tweet(metadata::user::LAST_TWEET)
    }
}

impl Entity for UserAccount {
    const KIND: EntityKind = EntityKind::UserAccount;

    fn data(&self) -> &AttributeBag {
        &self.data
    }

    fn set_data(&mut self, data: AttributeBag) {
        self.data = data;
    }
}

impl From<AttributeBag> for UserAccount {
    fn from(data: AttributeBag) -> UserAccount {
        UserAccount::from_data(data)
    }
}
