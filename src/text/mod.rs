// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpers for the text transforms applied while mapping fields.
//!
//! Twitter hands back a few values that need massaging before they go into an `AttributeBag`:
//! timestamps come in one of a couple of textual formats and get stored as epoch milliseconds,
//! the `source` of a tweet is wrapped in an HTML link, and XML payloads carry escaped entities.
//! The functions in this module handle each of those.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref TAG: Regex = Regex::new("<[^>]*>").unwrap();
    static ref ISO_DATE: Regex = Regex::new(
        r"^(\d{4}-\d{2}-\d{2}).(\d{2}:\d{2}:\d{2})(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?$"
    )
    .unwrap();
}

/// The `strftime` pattern of the timestamps in the REST API's JSON payloads.
const TWITTER_DATE: &str = "%a %b %d %H:%M:%S %z %Y";

/// Removes every markup tag from the given text, leaving only the text between them.
///
/// Nothing is inserted where a tag used to be, so `<a href="...">Twitter for iPhone</a>` becomes
/// `Twitter for iPhone` and a self-closing tag simply disappears. Running the result through this
/// function again gives the same string back.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Splits the given text on `sep`, dropping empty pieces.
pub fn split(text: &str, sep: char) -> Vec<String> {
    text.split(sep)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Replaces the predefined XML entities and numeric character references in the given text.
///
/// References that don't decode to anything are left in place, ampersand and all.
pub fn decode_xml_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let ch = match &rest[1..semi] {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                num if num.starts_with("#x") || num.starts_with("#X") => {
                    u32::from_str_radix(&num[2..], 16).ok().and_then(std::char::from_u32)
                }
                num if num.starts_with('#') => {
                    num[1..].parse::<u32>().ok().and_then(std::char::from_u32)
                }
                _ => None,
            };
            ch.map(|c| (c, semi))
        });

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Converts the textual timestamps Twitter sends into epoch milliseconds.
///
/// Two shapes of timestamp are recognized:
///
/// * the REST format, `Sat Nov 07 21:30:03 +0000 2009`;
/// * an ISO-like format, `2009-11-28 10:25:12`, where the character between the date and the time
///   can be anything and a trailing `Z` or `+hh:mm` zone is allowed.
///
/// In both cases the wall-clock fields are read in the parser's reference zone. A zone written
/// into the timestamp has to be well-formed, but it doesn't shift the result; the server has
/// always written local time in these fields regardless of what the suffix claims. The default
/// reference zone is UTC-03:00.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateParser {
    offset: FixedOffset,
}

impl Default for DateParser {
    fn default() -> Self {
        DateParser {
            offset: FixedOffset::west(3 * 3600),
        }
    }
}

impl DateParser {
    /// Creates a parser reading timestamps in the zone `offset_minutes` away from UTC. Negative
    /// values are west of Greenwich.
    pub fn new(offset_minutes: i32) -> Result<DateParser> {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::invalid_arg(format!("utc offset out of range: {} minutes", offset_minutes))
            })?;

        Ok(DateParser { offset })
    }

    /// Returns the reference zone of this parser.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parses the given timestamp into epoch milliseconds.
    pub fn parse(&self, text: &str) -> Result<i64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_arg("date must not be empty"));
        }

        let local = if let Some(caps) = ISO_DATE.captures(text) {
            NaiveDateTime::parse_from_str(&format!("{} {}", &caps[1], &caps[2]), "%Y-%m-%d %H:%M:%S")
                .ok()
        } else {
            DateTime::parse_from_str(text, TWITTER_DATE)
                .ok()
                .map(|dt| dt.naive_local())
        };

        local
            .and_then(|naive| self.offset.from_local_datetime(&naive).single())
            .map(|dt| dt.timestamp_millis())
            .ok_or_else(|| Error::malformed(format!("unrecognized date: {:?}", text)))
    }
}

/// Parses the given timestamp with the default reference zone. See `DateParser` for the
/// recognized formats.
pub fn parse_date(text: &str) -> Result<i64> {
    DateParser::default().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_formats() {
        assert_eq!(parse_date("2009-11-28 10:25:12").unwrap(), 1259414712000);
        assert_eq!(parse_date("Sat Nov 07 21:30:03 +0000 2009").unwrap(), 1257640203000);
        assert_eq!(parse_date("2009-12-01T01:25:00+00:00").unwrap(), 1259641500000);
        assert_eq!(parse_date("2009-06-23X05:30:00").unwrap(), 1245745800000);
        assert_eq!(parse_date("Tue May 26 19:00:00 +0000 2009").unwrap(), 1243375200000);
    }

    #[test]
    fn equivalent_formats_agree() {
        let a = parse_date("Sat Nov 28 10:25:12 +0000 2009").unwrap();
        let b = parse_date("2009-11-28T10:25:12Z").unwrap();
        let c = parse_date("2009-11-28 10:25:12").unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn reference_zone() {
        let utc = DateParser::new(0).unwrap();
        assert_eq!(utc.parse("2009-11-28 10:25:12").unwrap(), 1259414712000 - 3 * 3600 * 1000);
        assert_eq!(DateParser::default().offset(), FixedOffset::west(3 * 3600));
        assert!(DateParser::new(24 * 60).is_err());
    }

    #[test]
    fn reject_bad_dates() {
        match parse_date("") {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("expected InvalidArgument, got {:?}", other),
        }

        for bad in &["yesterday", "2009/11/28 10:25:12", "Sat Nov 07 21:30:03 2009", "2009-13-40 10:25:12"] {
            match parse_date(bad) {
                Err(Error::MalformedInput(_)) => (),
                other => panic!("expected MalformedInput for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn strip_markup() {
        assert_eq!(strip_tags("<a href=\"u\"/>"), "");
        assert_eq!(strip_tags("<a>X</a>"), "X");
        assert_eq!(
            strip_tags("<a href=\"http://twitter.com\" rel=\"nofollow\">Twitter <b>for</b> iPhone</a>"),
            "Twitter for iPhone"
        );
        assert_eq!(strip_tags("web"), "web");

        for s in &["<a>X</a>", "<<b>>", "a < b > c", "<p><i>nested</i> text</p>"] {
            let once = strip_tags(s);
            assert_eq!(strip_tags(&once), once);
        }
    }

    #[test]
    fn xml_entities() {
        assert_eq!(
            decode_xml_entities("&lt;a href=&quot;x&quot;&gt;web&lt;/a&gt;"),
            "<a href=\"x\">web</a>"
        );
        assert_eq!(decode_xml_entities("rock &amp; roll &#8220;hi&#x201D;"), "rock & roll \u{201c}hi\u{201d}");
        assert_eq!(decode_xml_entities("AT&T &bogus; &"), "AT&T &bogus; &");
    }

    #[test]
    fn split_polygon() {
        assert_eq!(split("1.0 2.0  3.0", ' '), vec!["1.0", "2.0", "3.0"]);
        assert!(split("", ' ').is_empty());
    }
}
