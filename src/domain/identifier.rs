//! Sequential external identifiers for press releases (`RW10000`, `RW10001`, ...).
//!
//! Identifiers are the prefix `RW` followed by a base-10 integer. Ordering is
//! always numeric: `RW99999 < RW100000` even though the text comparison says
//! otherwise once the digit counts differ.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Fixed prefix of every external identifier.
pub const PREFIX: &str = "RW";

/// Number assigned to the very first press release.
pub const FLOOR: u64 = 10_000;

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^RW([0-9]+)$").expect("identifier regex is valid"));

/// Errors raised when a stored identifier cannot be interpreted.
///
/// Both variants are data-integrity problems: allocation must stop rather
/// than emit a corrupted successor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("malformed press release identifier: {value:?}")]
    Malformed { value: String },

    #[error("press release identifier space exhausted after {value}")]
    Overflow { value: String },
}

/// A parsed external identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrId(u64);

impl PrId {
    /// The first identifier ever handed out (`RW10000`).
    pub const FIRST: PrId = PrId(FLOOR);

    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn number(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Overflow`] if the numeric part cannot grow.
    pub fn successor(self) -> Result<Self, IdentifierError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| IdentifierError::Overflow {
                value: self.to_string(),
            })
    }
}

impl fmt::Display for PrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.0)
    }
}

impl FromStr for PrId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdentifierError::Malformed {
            value: s.to_string(),
        };

        let digits = IDENTIFIER_REGEX
            .captures(s)
            .and_then(|caps| caps.get(1))
            .ok_or_else(malformed)?;

        digits.as_str().parse::<u64>().map(Self).map_err(|_| malformed())
    }
}

/// Computes the identifier to assign after `latest`.
///
/// `None` means no identifier has been assigned yet and yields `RW10000`.
///
/// # Errors
///
/// Returns [`IdentifierError::Malformed`] if `latest` is not shaped `RW<digits>`.
pub fn next_identifier(latest: Option<&str>) -> Result<String, IdentifierError> {
    let next = match latest {
        None => PrId::FIRST,
        Some(value) => value.parse::<PrId>()?.successor()?,
    };

    Ok(next.to_string())
}

/// Finds the numerically largest identifier among `identifiers`.
///
/// # Errors
///
/// Fails on the first value that does not parse, so a corrupted row is
/// reported instead of being skipped.
pub fn max_identifier<'a, I>(identifiers: I) -> Result<Option<PrId>, IdentifierError>
where
    I: IntoIterator<Item = &'a str>,
{
    identifiers
        .into_iter()
        .map(str::parse::<PrId>)
        .try_fold(None, |max: Option<PrId>, parsed| -> Result<_, IdentifierError> {
            let id = parsed?;
            Ok(Some(max.map_or(id, |current| current.max(id))))
        })
}
