//! Tag utilities for speed-limit extraction.
//!
//! Provides helpers to:
//! - detect whether a way carries both the road-classification and the
//!   speed-limit tag; and
//! - parse the leading integer of a `maxspeed` value.
//!
//! Parsing is deliberately crude. Only the first whitespace-delimited token is
//! considered, so `"50 mph"` yields `50` with the unit silently dropped, and
//! prefixed forms such as `"DE:zone30"` are rejected outright.
use std::collections::HashMap;

use thiserror::Error;

/// Free-form OpenStreetMap key/value tags.
pub type Tags = HashMap<String, String>;

/// Key marking a way as a road.
pub const HIGHWAY_KEY: &str = "highway";

/// Key carrying the speed limit.
pub const MAXSPEED_KEY: &str = "maxspeed";

/// Reasons a `maxspeed` value could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeedParseError {
    /// The value was empty or contained only whitespace.
    #[error("maxspeed value is empty")]
    Empty,
    /// The leading token was not an integer literal.
    #[error("maxspeed token {token:?} is not an integer")]
    NotAnInteger {
        /// The rejected token.
        token: String,
    },
}

/// Returns true when the tags mark a way as a speed-limit candidate.
///
/// Both the `highway` and the `maxspeed` keys must be present; their values
/// are not inspected here.
///
/// # Examples
/// ```
/// use speedlimit_core::{Tags, is_candidate};
///
/// let tags = Tags::from([
///     ("highway".to_owned(), "residential".to_owned()),
///     ("maxspeed".to_owned(), "30".to_owned()),
/// ]);
/// assert!(is_candidate(&tags));
/// assert!(!is_candidate(&Tags::new()));
/// ```
#[must_use]
pub fn is_candidate(tags: &Tags) -> bool {
    has_candidate_keys(tags.keys().map(String::as_str))
}

/// Key-only variant of [`is_candidate`] for borrowed tag iterators.
///
/// Archive readers use this to filter ways before copying their tags.
#[must_use]
pub fn has_candidate_keys<'a, K>(keys: K) -> bool
where
    K: IntoIterator<Item = &'a str>,
{
    let mut highway = false;
    let mut maxspeed = false;
    for key in keys {
        match key {
            HIGHWAY_KEY => highway = true,
            MAXSPEED_KEY => maxspeed = true,
            _ => {}
        }
        if highway && maxspeed {
            return true;
        }
    }
    false
}

/// Parse the speed limit from a `maxspeed` value.
///
/// The first whitespace-delimited token must be an integer literal with an
/// optional sign. Only ASCII digits are accepted: digit-group underscores
/// (`5_0`) and non-ASCII numerals such as `٥٠` are rejected.
///
/// # Errors
/// Returns [`SpeedParseError`] when the value is empty or its first token is
/// not an integer.
///
/// # Examples
/// ```
/// use speedlimit_core::parse_speed_limit;
///
/// assert_eq!(parse_speed_limit("50"), Ok(50));
/// assert_eq!(parse_speed_limit("50 mph"), Ok(50));
/// assert!(parse_speed_limit("walk").is_err());
/// ```
pub fn parse_speed_limit(value: &str) -> Result<i64, SpeedParseError> {
    let token = value
        .split_whitespace()
        .next()
        .ok_or(SpeedParseError::Empty)?;
    token
        .parse::<i64>()
        .map_err(|_| SpeedParseError::NotAnInteger {
            token: token.to_owned(),
        })
}
