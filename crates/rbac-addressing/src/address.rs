//! The `Address` newtype and its strict parsing rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Total length of a ledger address in hex characters.
pub const ADDRESS_LENGTH: usize = 70;

/// Length of the family namespace prefix in hex characters.
pub const PREFIX_LENGTH: usize = 6;

/// Errors produced while parsing or classifying an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Address has the wrong length.
    #[error("address must be {ADDRESS_LENGTH} hex characters, got {got}")]
    InvalidLength { got: usize },

    /// Address contains characters outside lowercase hex.
    #[error("address contains non-hex or uppercase characters")]
    NotLowercaseHex,

    /// Address does not start with this family's namespace prefix.
    #[error("address namespace prefix does not belong to this family")]
    ForeignNamespace,

    /// Bucket selector falls outside every reserved sub-range.
    #[error("bucket selector {selector:#04x} is not reserved by any entity kind")]
    UnknownBucket { selector: u8 },
}

/// A 70-character lowercase hex key into the ledger's flat namespace.
///
/// Construction goes through [`Address::parse`] (or the codec constructors),
/// so a held `Address` is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and validate a raw string as an address.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if raw.len() != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength { got: raw.len() });
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(AddressError::NotLowercaseHex);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Assemble an address from its already-validated parts.
    ///
    /// Only the codec constructors call this; the parts are hex by
    /// construction there.
    pub(crate) fn from_parts(prefix: &str, selector: u8, suffix: &str) -> Self {
        debug_assert_eq!(prefix.len(), PREFIX_LENGTH);
        debug_assert_eq!(suffix.len(), ADDRESS_LENGTH - PREFIX_LENGTH - 2);
        Self(format!("{prefix}{selector:02x}{suffix}"))
    }

    /// The namespace prefix portion.
    pub fn prefix(&self) -> &str {
        &self.0[..PREFIX_LENGTH]
    }

    /// The bucket selector byte.
    pub fn selector(&self) -> u8 {
        // Two hex chars, validated at construction.
        u8::from_str_radix(&self.0[PREFIX_LENGTH..PREFIX_LENGTH + 2], 16)
            .unwrap_or_default()
    }

    /// The full address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}
