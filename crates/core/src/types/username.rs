//! Account username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input is empty after trimming.
    #[error("username cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the allowed set.
    #[error("username contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// The login name of a storefront account.
///
/// Mirrors the rules the accounts backend applies when it registers a user.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 1-150 characters
/// - Letters, digits and `@ . + - _` only
///
/// ## Examples
///
/// ```
/// use ix_core::Username;
///
/// assert!(Username::parse("arjun_k").is_ok());
/// assert!(Username::parse("  padded  ").is_ok());
///
/// assert!(Username::parse("").is_err());
/// assert!(Username::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 150;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`] characters, or contains a disallowed character.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
        {
            return Err(UsernameError::InvalidCharacter(bad));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
