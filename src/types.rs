//! Common type definitions.
//!
//! - [`Operation`]: Distinguishes between encryption and decryption runs

use std::fmt::{Display, Formatter, Result};

/// The direction of a transform.
///
/// Carried across the engine boundary as `1` (encrypt) or `2` (decrypt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl Operation {
    /// Array containing both operations for iteration.
    pub const ALL: &'static [Self] = &[Self::Encrypt, Self::Decrypt];

    /// Operation id on the engine boundary.
    #[inline]
    pub fn native_id(self) -> i32 {
        match self {
            Self::Encrypt => 1,
            Self::Decrypt => 2,
        }
    }

    #[inline]
    pub fn from_native(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Encrypt),
            2 => Some(Self::Decrypt),
            _ => None,
        }
    }

    /// Returns a human-readable label for the operation.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Encrypt => "Encrypt",
            Self::Decrypt => "Decrypt",
        }
    }

    /// Noun used in status and log messages ("Encryption completed ...").
    #[inline]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Encrypt => "Encryption",
            Self::Decrypt => "Decryption",
        }
    }

    /// Progress label ("Encrypting...").
    #[inline]
    pub fn progress_label(self) -> &'static str {
        match self {
            Self::Encrypt => "Encrypting",
            Self::Decrypt => "Decrypting",
        }
    }

    /// Past participle used in success messages.
    #[inline]
    pub fn past(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypted",
            Self::Decrypt => "decrypted",
        }
    }
}

impl Display for Operation {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}
