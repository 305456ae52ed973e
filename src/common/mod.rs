// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Set of structs and methods shared by the request side of the crate.
//!
//! # Module contents
//!
//! ## `ParamList`
//!
//! `ParamList` is a collection of parameters to a given web call. `ServiceConfig::request_url`
//! turns one into the query string of a request.
//!
//! `add_param` is a basic function that turns its arguments into `Cow<'static, str>`, then
//! inserts them as a parameter into the given `ParamList`.
//!
//! `add_user_param` provides some special handling for accounts, since Twitter always handles
//! user parameters the same way: either as a `"user_id"` parameter with the ID, or as a
//! `"screen_name"` parameter with the screen name. The ID wins when the account has both.
//!
//! `add_list_param` does the same for lists, which are always referenced by `list_id` here.
//!
//! ## `percent_encode`
//!
//! Twitter's flavor of RFC 3986 percent-encoding, used for every key and value in a query.
//!
//! ## `Response`
//!
//! In its own module, `Response` is a public structure that contains rate-limit information from
//! Twitter alongside some other desired output. The module also holds `check_status`, which turns
//! an unsuccessful HTTP status and its body into the matching `Error`, and `read_response`, which
//! does that for a whole `hyper` response and hands back the body.

use std::borrow::Cow;
use std::collections::HashMap;

use hyper::header::{HeaderMap, HeaderValue};
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};

use crate::bag::Entity;
use crate::error::Result;
use crate::list::List;
use crate::metadata;
use crate::user::UserAccount;

mod response;

pub use crate::common::response::*;

/// A set of headers returned with a response.
pub type Headers = HeaderMap<HeaderValue>;
pub type CowStr = Cow<'static, str>;

/// Represents a list of parameters to a Twitter API call.
///
/// This type is a wrapper around a `HashMap<Cow<'static, str>, Cow<'static, str>>` to collect a
/// set of parameter key/value pairs. The `Cow` type is used to avoid having to allocate a `String`
/// if a string literal is used for a parameter. All the functions that add parameters to this
/// `ParamList` accept `impl Into<Cow<'static, str>>`, meaning that either a string literal or an
/// owned `String` may be used.
///
/// Most of the functions to add parameters follow a builder pattern, so that you can assemble a
/// `ParamList` in a single statement:
///
/// ```
/// use nestling::common::ParamList;
/// use nestling::user::UserAccount;
///
/// // If you were looking up the user `@rustlang` with `GET users/show`, you might assemble a
/// // ParamList like this...
/// let user = UserAccount::with_user_name("rustlang").unwrap();
/// let params = ParamList::new()
///     .add_user_param(&user)
///     .unwrap()
///     .add_param("include_entities", "true");
/// ```
#[derive(Debug, Clone, Default, derive_more::Deref, derive_more::DerefMut, derive_more::From)]
pub struct ParamList(HashMap<Cow<'static, str>, Cow<'static, str>>);

impl ParamList {
    /// Creates a new, empty `ParamList`.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Adds the given key/value parameter to this `ParamList`.
    pub fn add_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Adds the given key/value parameter to this `ParamList` only if the given value is `Some`.
    pub fn add_opt_param(
        self,
        key: impl Into<Cow<'static, str>>,
        value: Option<impl Into<Cow<'static, str>>>,
    ) -> Self {
        match value {
            Some(val) => self.add_param(key.into(), val.into()),
            None => self,
        }
    }

    /// Adds the given key/value to this `ParamList` by mutating it in place, rather than consuming
    /// it as in `add_param`.
    pub fn add_param_ref(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds the given account as a parameter to this `ParamList` by adding either a `user_id` or
    /// `screen_name` parameter as appropriate. Fails if the account has neither.
    pub fn add_user_param(self, user: &UserAccount) -> Result<Self> {
        let (key, value) = user.user_name_or_id_param()?;
        Ok(self.add_param(key, value.to_string()))
    }

    /// Adds the given list as a `list_id` parameter. Fails if the list has no ID.
    pub fn add_list_param(self, list: &List) -> Result<Self> {
        let id = list.check_present(metadata::list::ID)?;
        Ok(self.add_param("list_id", id.to_string()))
    }

    /// Adds a `cursor` parameter, unless the cursor is zero (meaning there's no such page).
    pub fn add_cursor_param(self, cursor: i64) -> Self {
        if cursor == 0 {
            self
        } else {
            self.add_param("cursor", cursor.to_string())
        }
    }

    /// Renders this `ParamList` as an `application/x-www-form-urlencoded` string.
    ///
    /// The key/value pairs are printed as `key1=value1&key2=value2`, with all keys and values
    /// being percent-encoded according to Twitter's requirements.
    pub fn to_urlencoded(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encodes the given string based on the Twitter API specification.
///
/// Twitter bases its encoding scheme on RFC 3986, Section 2.1. They describe the process in full
/// [in their documentation][twitter-percent], but the process can be summarized by saying that
/// every *byte* that is not an ASCII number or letter, or the ASCII characters `-`, `.`, `_`, or
/// `~` must be replaced with a percent sign (`%`) and the byte value in hexadecimal.
///
/// [twitter-percent]: https://developer.twitter.com/en/docs/basics/authentication/oauth-1-0a/percent-encoding-parameters
pub fn percent_encode(src: &str) -> PercentEncode {
    lazy_static::lazy_static! {
        static ref ENCODER: AsciiSet = percent_encoding::NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
    }
    utf8_percent_encode(src, &*ENCODER)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Read;

    use crate::error::Error;

    pub(crate) fn load_file(path: &str) -> String {
        let mut file = File::open(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn user_params() {
        let by_name = UserAccount::with_user_name("rustlang").unwrap();
        let params = ParamList::new().add_user_param(&by_name).unwrap();
        assert_eq!(params["screen_name"], "rustlang");

        let both: UserAccount = vec![
            (metadata::user::ID, "165262228"),
            (metadata::user::USER_NAME, "rustlang"),
        ]
        .into_iter()
        .collect::<crate::bag::AttributeBag>()
        .into();
        let params = ParamList::new().add_user_param(&both).unwrap();
        assert_eq!(params["user_id"], "165262228");
        assert!(!params.contains_key("screen_name"));

        assert!(matches!(
            ParamList::new().add_user_param(&UserAccount::new()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn list_and_cursor_params() {
        let list = List::with_id("574").unwrap();
        let params = ParamList::new()
            .add_list_param(&list)
            .unwrap()
            .add_cursor_param(0)
            .add_opt_param("count", None::<&'static str>);

        assert_eq!(params.len(), 1);
        assert_eq!(params.to_urlencoded(), "list_id=574");

        let params = ParamList::new().add_cursor_param(-1);
        assert_eq!(params.to_urlencoded(), "cursor=-1");

        assert!(ParamList::new().add_list_param(&List::new()).is_err());
    }

    #[test]
    fn encoding() {
        assert_eq!(percent_encode("Ladies + Gentlemen").to_string(), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("An encoded string!").to_string(), "An%20encoded%20string%21");
        assert_eq!(percent_encode("Dogs, Cats & Mice").to_string(), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(percent_encode("☃").to_string(), "%E2%98%83");
        assert_eq!(percent_encode("a-b.c_d~e").to_string(), "a-b.c_d~e");
    }
}
