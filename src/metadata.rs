// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The catalogue of attribute keys recognized for each kind of entity.
//!
//! Every `AttributeBag` filled in by this crate only ever uses keys from this module, grouped by
//! the entity they belong to. The bag itself doesn't check this, so callers building entities by
//! hand are free to stash their own keys alongside these; the handlers never will.

/// Keys for `Tweet` bags.
pub mod tweet {
    ///Numeric ID of the status, as text.
    pub const ID: &str = "TWEET_ID";
    ///The text of the status.
    pub const CONTENT: &str = "TWEET_CONTENT";
    ///Posting time, in epoch milliseconds.
    pub const PUBLISH_DATE: &str = "TWEET_PUBLISH_DATE";
    ///Name of the client used to post the status, with its markup removed.
    pub const SOURCE: &str = "TWEET_SOURCE";
    ///Whether the authenticated user has favorited the status.
    pub const FAVOURITE: &str = "TWEET_FAVOURITE";
    ///ID of the status this one replies to.
    pub const IN_REPLY_TO_TWEET_ID: &str = "TWEET_IN_REPLY_TO_TWEET_ID";
    ///Screen name of the author, for tweets composed locally.
    pub const AUTHOR_USERNAME: &str = "TWEET_AUTHOR_USERNAME";
    ///The author (or sender, for direct messages).
    pub const USER_ACCOUNT: &str = "TWEET_USER_ACCOUNT";
    ///The recipient of a direct message.
    pub const RECIPIENT_ACCOUNT: &str = "TWEET_RECIPIENT_ACCOUNT";
    ///The original status of a retweet.
    pub const REPOSTED_TWEET: &str = "TWEET_REPOSTED_TWEET";
    ///Mentions, links, hashtags and media extracted from the text.
    pub const ENTITY: &str = "TWEET_ENTITY";
    ///The coordinates and/or place attached to the status.
    pub const LOCATION: &str = "TWEET_LOCATION";

    pub(crate) const ALL: &[&str] = &[
        ID,
        CONTENT,
        PUBLISH_DATE,
        SOURCE,
        FAVOURITE,
        IN_REPLY_TO_TWEET_ID,
        AUTHOR_USERNAME,
        USER_ACCOUNT,
        RECIPIENT_ACCOUNT,
        REPOSTED_TWEET,
        ENTITY,
        LOCATION,
    ];
}

/// Keys for `UserAccount` bags.
pub mod user {
    pub const ID: &str = "USERACCOUNT_ID";
    pub const NAME: &str = "USERACCOUNT_NAME";
    pub const USER_NAME: &str = "USERACCOUNT_USER_NAME";
    pub const LOCATION: &str = "USERACCOUNT_LOCATION";
    pub const DESCRIPTION: &str = "USERACCOUNT_DESCRIPTION";
    pub const PICTURE_URI: &str = "USERACCOUNT_PICTURE_URI";
    pub const PICTURE_URI_MINI: &str = "USERACCOUNT_PICTURE_URI_MINI";
    pub const PICTURE_URI_NORMAL: &str = "USERACCOUNT_PICTURE_URI_NORMAL";
    pub const PICTURE_URI_BIGGER: &str = "USERACCOUNT_PICTURE_URI_BIGGER";
    pub const URL: &str = "USERACCOUNT_URL";
    pub const PROTECTED: &str = "USERACCOUNT_PROTECTED";
    pub const FOLLOWERS_COUNT: &str = "USERACCOUNT_FOLLOWERS_COUNT";
    pub const FRIENDS_COUNT: &str = "USERACCOUNT_FRIENDS_COUNT";
    pub const PROFILE_BACKGROUND_COLOR: &str = "USERACCOUNT_PROFILE_BACKGROUND_COLOR";
    pub const PROFILE_TEXT_COLOR: &str = "USERACCOUNT_PROFILE_TEXT_COLOR";
    pub const PROFILE_LINK_COLOR: &str = "USERACCOUNT_PROFILE_LINK_COLOR";
    pub const PROFILE_BACKGROUND_IMAGE_URI: &str = "USERACCOUNT_PROFILE_BACKGROUND_IMAGE_URI";
    ///Account creation time, in epoch milliseconds.
    pub const CREATE_DATE: &str = "USERACCOUNT_CREATE_DATE";
    pub const FAVOURITES_COUNT: &str = "USERACCOUNT_FAVOURITES_COUNT";
    pub const UTC_OFFSET: &str = "USERACCOUNT_UTC_OFFSET";
    pub const TIME_ZONE: &str = "USERACCOUNT_TIME_ZONE";
    pub const TWEETS_COUNT: &str = "USERACCOUNT_TWEETS_COUNT";
    pub const NOTIFICATIONS: &str = "USERACCOUNT_NOTIFICATIONS";
    pub const VERIFIED: &str = "USERACCOUNT_VERIFIED";
    pub const GEO_ENABLED: &str = "USERACCOUNT_GEO_ENABLED";
    ///The most recent status posted by the account.
    pub const LAST_TWEET: &str = "USERACCOUNT_LAST_TWEET";

    pub(crate) const ALL: &[&str] = &[
        ID,
        NAME,
        USER_NAME,
        LOCATION,
        DESCRIPTION,
        PICTURE_URI,
        PICTURE_URI_MINI,
        PICTURE_URI_NORMAL,
        PICTURE_URI_BIGGER,
        URL,
        PROTECTED,
        FOLLOWERS_COUNT,
        FRIENDS_COUNT,
        PROFILE_BACKGROUND_COLOR,
        PROFILE_TEXT_COLOR,
        PROFILE_LINK_COLOR,
        PROFILE_BACKGROUND_IMAGE_URI,
        CREATE_DATE,
        FAVOURITES_COUNT,
        UTC_OFFSET,
        TIME_ZONE,
        TWEETS_COUNT,
        NOTIFICATIONS,
        VERIFIED,
        GEO_ENABLED,
        LAST_TWEET,
    ];
}

/// Keys for `GeoLocation` bags.
pub mod geo {
    pub const LATITUDE: &str = "GEOLOCATION_LATITUDE";
    pub const LONGITUDE: &str = "GEOLOCATION_LONGITUDE";
    pub const PLACE_ID: &str = "GEOLOCATION_PLACE_ID";
    pub const PLACE_NAME: &str = "GEOLOCATION_PLACE_NAME";
    pub const PLACE_FULL_NAME: &str = "GEOLOCATION_PLACE_FULL_NAME";
    pub const PLACE_TYPE: &str = "GEOLOCATION_PLACE_TYPE";
    pub const PLACE_URL: &str = "GEOLOCATION_PLACE_URL";
    ///The outline of the place, as a flat list of latitudes and longitudes.
    pub const POLYGON: &str = "GEOLOCATION_POLYGON";
    pub const COUNTRY: &str = "GEOLOCATION_COUNTRY";

    pub(crate) const ALL: &[&str] = &[
        LATITUDE,
        LONGITUDE,
        PLACE_ID,
        PLACE_NAME,
        PLACE_FULL_NAME,
        PLACE_TYPE,
        PLACE_URL,
        POLYGON,
        COUNTRY,
    ];
}

/// Keys for `List` bags.
pub mod list {
    pub const ID: &str = "LIST_ID";
    pub const NAME: &str = "LIST_NAME";
    pub const FULL_NAME: &str = "LIST_FULL_NAME";
    pub const SLUG: &str = "LIST_SLUG";
    pub const DESCRIPTION: &str = "LIST_DESCRIPTION";
    pub const SUBSCRIBER_COUNT: &str = "LIST_SUBSCRIBER_COUNT";
    pub const MEMBER_COUNT: &str = "LIST_MEMBER_COUNT";
    pub const URI: &str = "LIST_URI";
    pub const FOLLOWING: &str = "LIST_FOLLOWING";
    ///Either `public` or `private`.
    pub const MODE: &str = "LIST_MODE";
    pub const CREATE_DATE: &str = "LIST_CREATE_DATE";
    ///The account that owns the list.
    pub const USER_ACCOUNT: &str = "LIST_USER_ACCOUNT";

    pub(crate) const ALL: &[&str] = &[
        ID,
        NAME,
        FULL_NAME,
        SLUG,
        DESCRIPTION,
        SUBSCRIBER_COUNT,
        MEMBER_COUNT,
        URI,
        FOLLOWING,
        MODE,
        CREATE_DATE,
        USER_ACCOUNT,
    ];
}

/// Keys for `TweetEntity` bags.
///
/// The first four keys hold collections and only appear on the container entity attached to a
/// tweet. The rest are the fields of one item inside those collections.
pub mod entity {
    pub const MENTIONS: &str = "TWEETENTITY_MENTIONS";
    pub const URLS: &str = "TWEETENTITY_URLS";
    pub const HASHTAGS: &str = "TWEETENTITY_HASHTAGS";
    pub const MEDIAS: &str = "TWEETENTITY_MEDIAS";

    pub const USERACCOUNT_ID: &str = "TWEETENTITY_USERACCOUNT_ID";
    pub const USERACCOUNT_USER_NAME: &str = "TWEETENTITY_USERACCOUNT_USER_NAME";
    pub const USERACCOUNT_NAME: &str = "TWEETENTITY_USERACCOUNT_NAME";
    pub const URL: &str = "TWEETENTITY_URL";
    pub const DISPLAY_URL: &str = "TWEETENTITY_DISPLAY_URL";
    pub const EXPANDED_URL: &str = "TWEETENTITY_EXPANDED_URL";
    pub const MEDIA: &str = "TWEETENTITY_MEDIA";
    pub const HASHTAG: &str = "TWEETENTITY_HASHTAG";

    pub(crate) const ALL: &[&str] = &[
        MENTIONS,
        URLS,
        HASHTAGS,
        MEDIAS,
        USERACCOUNT_ID,
        USERACCOUNT_USER_NAME,
        USERACCOUNT_NAME,
        URL,
        DISPLAY_URL,
        EXPANDED_URL,
        MEDIA,
        HASHTAG,
    ];
}

/// The kinds of entity this crate knows how to build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tweet,
    UserAccount,
    GeoLocation,
    List,
    TweetEntity,
}

impl EntityKind {
    /// Returns every key a handler may write for this kind of entity.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            EntityKind::Tweet => tweet::ALL,
            EntityKind::UserAccount => user::ALL,
            EntityKind::GeoLocation => geo::ALL,
            EntityKind::List => list::ALL,
            EntityKind::TweetEntity => entity::ALL,
        }
    }

    /// Returns whether the given key belongs to this kind's dictionary.
    pub fn recognizes(self, key: &str) -> bool {
        self.keys().contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionaries_are_disjoint() {
        let kinds = [
            EntityKind::Tweet,
            EntityKind::UserAccount,
            EntityKind::GeoLocation,
            EntityKind::List,
            EntityKind::TweetEntity,
        ];

        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                for key in a.keys() {
                    assert!(!b.recognizes(key), "{} shared by {:?} and {:?}", key, a, b);
                }
            }
        }
    }

    #[test]
    fn recognizes_own_keys() {
        assert!(EntityKind::Tweet.recognizes(tweet::REPOSTED_TWEET));
        assert!(EntityKind::UserAccount.recognizes(user::LAST_TWEET));
        assert!(!EntityKind::UserAccount.recognizes(tweet::ID));
    }
}
