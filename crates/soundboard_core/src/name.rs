//! Validated sound display names.

use regex::Regex;
use serde::{Deserialize, Serialize};
use soundboard_error::{SoundError, SoundErrorKind};
use std::sync::LazyLock;

/// Longest accepted sound name, in characters.
pub const MAX_NAME_LEN: usize = 64;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^[a-zA-Z0-9 _'-]{{1,{MAX_NAME_LEN}}}$"))
        .unwrap_or_else(|e| panic!("sound name pattern is a constant: {e}"))
});

/// Unique display name of a sound.
///
/// Names are 1-64 characters drawn from letters, digits, space, underscore,
/// hyphen and apostrophe. Comparison is case-sensitive.
///
/// # Examples
///
/// ```
/// use soundboard_core::SoundName;
///
/// let name = SoundName::new("Red Flags").unwrap();
/// assert_eq!(name.as_str(), "Red Flags");
/// assert!(SoundName::new("###").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
pub struct SoundName(String);

impl SoundName {
    /// Validate and wrap a display name.
    #[track_caller]
    pub fn new(name: impl Into<String>) -> Result<Self, SoundError> {
        let name = name.into();
        if NAME_RE.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(SoundError::new(SoundErrorKind::InvalidName(name)))
        }
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match, used for autocomplete.
    pub fn matches_partial(&self, partial: &str) -> bool {
        self.0.to_lowercase().contains(&partial.to_lowercase())
    }
}

impl TryFrom<String> for SoundName {
    type Error = SoundError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SoundName> for String {
    fn from(name: SoundName) -> Self {
        name.0
    }
}

impl AsRef<str> for SoundName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
