//! Global Configuration Constants
//!
//! Every tunable the core relies on lives here: audit log capacity, the
//! boundary call buffer layout, output naming, thread bounds, the default
//! "maximum security" configuration and the reference engine's key
//! derivation parameters.
//!
//! Runtime choices (algorithm, key size, mode, password, thread count) come
//! from the command line and are validated against the capability matrix
//! before anything crosses the engine boundary.

use crate::capability::{Algorithm, Mode};

/// Application name used in banners and log messages.
pub const APP_NAME: &str = "CryptingTool";

// === Audit Log ===

/// Maximum number of entries retained by the audit log.
///
/// Once exceeded, the oldest entry is evicted on every insertion.
pub const LOG_CAPACITY: usize = 100;

// === Boundary Call Layout ===
// These values are part of the fixed call contract with the transform engine
// and must not change without a matching engine build.

/// Extra output capacity reserved on top of the input length.
///
/// Absorbs block padding and authentication tag overhead; the engine reports
/// the true written length through the out-parameter.
pub const OUTPUT_OVERHEAD: usize = 1024;

/// Size of the initialization vector buffer handed to every call.
pub const IV_SIZE: usize = 16;

/// Size of the authentication tag buffer handed to every call.
pub const TAG_SIZE: usize = 16;

// === Output Naming ===

/// Suffix appended to encrypted outputs.
pub const ENCRYPTED_EXTENSION: &str = ".encrypted";

/// Suffix appended to decrypted outputs whose input lacked [`ENCRYPTED_EXTENSION`].
pub const DECRYPTED_EXTENSION: &str = ".decrypted";

// === Thread Count Hint ===

/// Smallest accepted compute thread count.
pub const MIN_THREADS: usize = 1;

/// Largest accepted compute thread count.
pub const MAX_THREADS: usize = 16;

// === Defaults ===

/// Default algorithm: the strongest tier-one cipher.
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::Aes256;

/// Default key size in bits, matching [`DEFAULT_ALGORITHM`].
pub const DEFAULT_KEY_SIZE: u32 = 256;

/// Default block mode. GCM is the only authenticated mode in the vocabulary.
pub const DEFAULT_MODE: Mode = Mode::Gcm;

/// Default compute thread count.
pub const DEFAULT_THREADS: usize = 4;

// === Reference Engine Key Derivation ===
// The reference engine derives key and IV from the password alone, so the
// same password always yields the same key/IV pair. See DESIGN.md.

/// Fixed PBKDF2 salt.
pub const KDF_SALT: &[u8] = b"CryptingTool2024";

/// PBKDF2-HMAC-SHA256 iteration count.
pub const KDF_ITERATIONS: u32 = 10_000;

/// Minimum password length enforced by the reference engine unless overridden.
///
/// The native engine enforces 8; see [`NATIVE_PASSWORD_MIN_LENGTH`].
pub const PASSWORD_MIN_LENGTH: usize = 1;

/// Minimum password length enforced by the native engine.
pub const NATIVE_PASSWORD_MIN_LENGTH: usize = 8;

// === Self Test ===

/// Plaintext used by the post-initialization round-trip self-test.
pub const SELF_TEST_PLAINTEXT: &[u8] = b"Hello, CryptingTool!";

/// Password used by the post-initialization round-trip self-test.
pub const SELF_TEST_PASSWORD: &str = "test123";

// === File Discovery ===

/// Patterns skipped by the interactive file browser.
pub const EXCLUDED_PATTERNS: &[&str] = &[
    "**/target/**",
    "**/vendor/**",
    "**/node_modules/**",
    "**/.git/**",
    "**/.github/**",
    "**/.config/**",
    "**/.local/**",
    "**/.cache/**",
    "**/.ssh/**",
    "**/.gnupg/**",
    "**/*.rs",
    "**/*.go",
];
