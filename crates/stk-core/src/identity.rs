//! # Account Identity
//!
//! The ledger keys every position sequence by [`AccountId`]. The identifier
//! is opaque to the ledger: wallet addresses, custody account keys, and test
//! names are all acceptable. Only emptiness and length are validated.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of an account identifier, in characters.
pub const MAX_ACCOUNT_ID_LEN: usize = 128;

/// Identifier of the account owning a position ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyAccountId`] for empty or
    /// whitespace-only input and [`ValidationError::AccountIdTooLong`] when
    /// the trimmed identifier exceeds [`MAX_ACCOUNT_ID_LEN`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAccountId);
        }
        let len = trimmed.chars().count();
        if len > MAX_ACCOUNT_ID_LEN {
            return Err(ValidationError::AccountIdTooLong {
                len,
                max: MAX_ACCOUNT_ID_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
