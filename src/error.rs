//! Errors reported when a prefix is rejected.

use thiserror::Error;

/// Reasons for rejecting a prefix, either at parse time or at the insertion boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The prefix length exceeds the bit width of the address family.
    #[error("invalid prefix length /{len}: the address has only {max} bits")]
    InvalidPrefixLength {
        /// The requested prefix length.
        len: u8,
        /// The bit width of the address.
        max: u8,
    },
    /// The text is not a valid address or prefix.
    #[error("could not parse `{input}` as an address or prefix")]
    Parse {
        /// The rejected input.
        input: String,
    },
}

impl Error {
    pub(crate) fn parse(input: &str) -> Self {
        Self::Parse {
            input: input.to_owned(),
        }
    }
}
