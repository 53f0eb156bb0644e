//! Book availability status and its resolver
//!
//! Invariant: a book without a stored file is `Unavailable`, whatever the
//! caller claims. The resolver runs before every create and update persist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    Unavailable,
    Incomplete,
    Completed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Unavailable => "Unavailable",
            BookStatus::Incomplete => "Incomplete",
            BookStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("status must be one of: Unavailable, Incomplete, Completed")]
pub struct ParseStatusError;

impl FromStr for BookStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unavailable" => Ok(BookStatus::Unavailable),
            "Incomplete" => Ok(BookStatus::Incomplete),
            "Completed" => Ok(BookStatus::Completed),
            _ => Err(ParseStatusError),
        }
    }
}

/// Status to persist on create.
///
/// Without a book file the status is forced to `Unavailable`. With one, the
/// caller's status is respected, defaulting to `Incomplete`.
pub fn resolve_create(has_file: bool, requested: Option<BookStatus>) -> BookStatus {
    if !has_file {
        BookStatus::Unavailable
    } else {
        requested.unwrap_or(BookStatus::Incomplete)
    }
}

/// Status to persist on update.
///
/// `has_file` reflects the merged record (stored file or one arriving in
/// the patch). Without a file the status is forced to `Unavailable`; with
/// one, the caller's status wins and an absent status keeps the stored one.
pub fn resolve_update(
    has_file: bool,
    requested: Option<BookStatus>,
    stored: BookStatus,
) -> BookStatus {
    if !has_file {
        BookStatus::Unavailable
    } else {
        requested.unwrap_or(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for status in [
            BookStatus::Unavailable,
            BookStatus::Incomplete,
            BookStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<BookStatus>(), Ok(status));
        }
        assert!("Published".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_create_without_file_is_unavailable() {
        assert_eq!(
            resolve_create(false, Some(BookStatus::Completed)),
            BookStatus::Unavailable
        );
        assert_eq!(resolve_create(false, None), BookStatus::Unavailable);
    }

    #[test]
    fn test_create_with_file_defaults_to_incomplete() {
        assert_eq!(resolve_create(true, None), BookStatus::Incomplete);
        assert_eq!(
            resolve_create(true, Some(BookStatus::Completed)),
            BookStatus::Completed
        );
    }

    #[test]
    fn test_update_without_file_is_unavailable() {
        assert_eq!(
            resolve_update(false, Some(BookStatus::Completed), BookStatus::Incomplete),
            BookStatus::Unavailable
        );
    }

    #[test]
    fn test_update_with_file_keeps_stored_when_absent() {
        assert_eq!(
            resolve_update(true, None, BookStatus::Completed),
            BookStatus::Completed
        );
        assert_eq!(
            resolve_update(true, Some(BookStatus::Incomplete), BookStatus::Completed),
            BookStatus::Incomplete
        );
    }
}
