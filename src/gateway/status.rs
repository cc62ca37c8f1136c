use thiserror::Error;

/// Every failure status the transform engine can report.
///
/// `Success` (`0`) is not a variant: a successful call yields output bytes
/// instead of a status. Codes outside the known taxonomy are preserved in
/// [`StatusCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StatusCode {
    #[error("Invalid parameters")]
    InvalidParams,

    #[error("Unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("Unsupported mode")]
    UnsupportedMode,

    #[error("Invalid key size")]
    InvalidKeySize,

    #[error("Memory error")]
    MemoryError,

    #[error("Cryptographic error")]
    CryptoError,

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Output buffer too small")]
    OutputBufferTooSmall,

    #[error("Unknown error ({0})")]
    Unknown(i32),
}

pub const STATUS_SUCCESS: i32 = 0;
pub const STATUS_INVALID_PARAMS: i32 = -1;
pub const STATUS_UNSUPPORTED_ALGORITHM: i32 = -2;
pub const STATUS_UNSUPPORTED_MODE: i32 = -3;
pub const STATUS_INVALID_KEY_SIZE: i32 = -4;
pub const STATUS_MEMORY_ERROR: i32 = -5;
pub const STATUS_CRYPTO_ERROR: i32 = -6;
pub const STATUS_PASSWORD_TOO_SHORT: i32 = -7;
pub const STATUS_OUTPUT_BUFFER_TOO_SMALL: i32 = -8;
pub const STATUS_UNKNOWN_ERROR: i32 = -9;

impl StatusCode {
    /// Decodes a raw engine status. Returns `None` for success.
    pub fn from_raw(code: i32) -> Option<Self> {
        let status = match code {
            STATUS_SUCCESS => return None,
            STATUS_INVALID_PARAMS => Self::InvalidParams,
            STATUS_UNSUPPORTED_ALGORITHM => Self::UnsupportedAlgorithm,
            STATUS_UNSUPPORTED_MODE => Self::UnsupportedMode,
            STATUS_INVALID_KEY_SIZE => Self::InvalidKeySize,
            STATUS_MEMORY_ERROR => Self::MemoryError,
            STATUS_CRYPTO_ERROR => Self::CryptoError,
            STATUS_PASSWORD_TOO_SHORT => Self::PasswordTooShort,
            STATUS_OUTPUT_BUFFER_TOO_SMALL => Self::OutputBufferTooSmall,
            other => Self::Unknown(other),
        };
        Some(status)
    }

    /// The raw code as it travels across the boundary.
    pub fn raw(self) -> i32 {
        match self {
            Self::InvalidParams => STATUS_INVALID_PARAMS,
            Self::UnsupportedAlgorithm => STATUS_UNSUPPORTED_ALGORITHM,
            Self::UnsupportedMode => STATUS_UNSUPPORTED_MODE,
            Self::InvalidKeySize => STATUS_INVALID_KEY_SIZE,
            Self::MemoryError => STATUS_MEMORY_ERROR,
            Self::CryptoError => STATUS_CRYPTO_ERROR,
            Self::PasswordTooShort => STATUS_PASSWORD_TOO_SHORT,
            Self::OutputBufferTooSmall => STATUS_OUTPUT_BUFFER_TOO_SMALL,
            Self::Unknown(code) => code,
        }
    }
}

/// Human-readable message for any raw status, including success.
pub fn status_message(code: i32) -> String {
    StatusCode::from_raw(code).map_or_else(|| "Success".to_owned(), |status| status.to_string())
}
