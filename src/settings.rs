//! Encryption configuration value object.
//!
//! An [`EncryptionConfig`] is never edited in place: every `with_*` call
//! returns a new value, so a reader holding a configuration can never observe
//! a half-applied edit. Construction performs no checks; callers validate with
//! [`EncryptionConfig::validate`] before dispatching a run.

use thiserror::Error;

use crate::capability::{self, Algorithm, Mode};
use crate::config::{DEFAULT_ALGORITHM, DEFAULT_KEY_SIZE, DEFAULT_MODE, DEFAULT_THREADS, MAX_THREADS, MIN_THREADS};
use crate::secret::Password;

/// Reasons a configuration is rejected before reaching the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{algorithm} does not support a {bits}-bit key (supported: {supported:?})")]
    KeySize { algorithm: Algorithm, bits: u32, supported: &'static [u32] },

    #[error("{algorithm} does not support {mode} mode")]
    Mode { algorithm: Algorithm, mode: Mode },

    #[error("thread count {0} is outside 1..=16")]
    Threads(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionConfig {
    algorithm: Algorithm,
    key_size: u32,
    mode: Mode,
    password: Password,
    threads: usize,
}

impl EncryptionConfig {
    pub fn new(algorithm: Algorithm, key_size: u32, mode: Mode, password: Password, threads: usize) -> Self {
        Self { algorithm, key_size, mode, password, threads }
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[inline]
    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn password(&self) -> &Password {
        &self.password
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    #[must_use]
    pub fn with_algorithm(&self, algorithm: Algorithm) -> Self {
        Self { algorithm, ..self.clone() }
    }

    /// Switches algorithm and snaps key size and mode to the first supported
    /// values when the current ones are no longer legal.
    ///
    /// This is what a settings screen does when the user picks a new cipher;
    /// [`with_algorithm`](Self::with_algorithm) leaves the other fields alone.
    #[must_use]
    pub fn with_algorithm_defaults(&self, algorithm: Algorithm) -> Self {
        let key_size = if capability::supports_key_size(algorithm, self.key_size) {
            self.key_size
        } else {
            capability::supported_key_sizes(algorithm)[0]
        };
        let mode = if capability::supports_mode(algorithm, self.mode) { self.mode } else { capability::supported_modes(algorithm)[0] };

        Self { algorithm, key_size, mode, ..self.clone() }
    }

    #[must_use]
    pub fn with_key_size(&self, key_size: u32) -> Self {
        Self { key_size, ..self.clone() }
    }

    #[must_use]
    pub fn with_mode(&self, mode: Mode) -> Self {
        Self { mode, ..self.clone() }
    }

    #[must_use]
    pub fn with_password(&self, password: Password) -> Self {
        Self { password, ..self.clone() }
    }

    #[must_use]
    pub fn with_threads(&self, threads: usize) -> Self {
        Self { threads, ..self.clone() }
    }

    /// Checks the configuration against the capability matrix.
    ///
    /// The password is deliberately not inspected; the engine reports
    /// unacceptable passwords through its status code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !capability::supports_key_size(self.algorithm, self.key_size) {
            return Err(ConfigError::KeySize {
                algorithm: self.algorithm,
                bits: self.key_size,
                supported: capability::supported_key_sizes(self.algorithm),
            });
        }

        if !capability::supports_mode(self.algorithm, self.mode) {
            return Err(ConfigError::Mode { algorithm: self.algorithm, mode: self.mode });
        }

        if !(MIN_THREADS..=MAX_THREADS).contains(&self.threads) {
            return Err(ConfigError::Threads(self.threads));
        }

        Ok(())
    }

    /// One-line summary used in log messages, e.g. `AES-256 256-bit GCM`.
    pub fn summary(&self) -> String {
        format!("{} {}-bit {}", self.algorithm, self.key_size, self.mode)
    }
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ALGORITHM, DEFAULT_KEY_SIZE, DEFAULT_MODE, Password::default(), DEFAULT_THREADS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EncryptionConfig::default();
        assert_eq!(config.algorithm(), Algorithm::Aes256);
        assert_eq!(config.key_size(), 256);
        assert_eq!(config.mode(), Mode::Gcm);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_every_supported_combination_validates() {
        for algorithm in capability::algorithms() {
            for &bits in capability::supported_key_sizes(algorithm) {
                for &mode in capability::supported_modes(algorithm) {
                    let config = EncryptionConfig::new(algorithm, bits, mode, Password::default(), 4);
                    assert!(config.validate().is_ok(), "{} rejected", config.summary());
                }
            }
        }
    }

    #[test]
    fn test_rejects_unsupported_key_size() {
        let config = EncryptionConfig::default().with_algorithm(Algorithm::ChaCha20).with_mode(Mode::Ctr).with_key_size(512);
        assert!(matches!(config.validate(), Err(ConfigError::KeySize { bits: 512, .. })));
    }

    #[test]
    fn test_rejects_unsupported_mode() {
        let config = EncryptionConfig::default().with_algorithm(Algorithm::ChaCha20);
        assert_eq!(config.validate(), Err(ConfigError::Mode { algorithm: Algorithm::ChaCha20, mode: Mode::Gcm }));
    }

    #[test]
    fn test_rejects_thread_count() {
        assert_eq!(EncryptionConfig::default().with_threads(0).validate(), Err(ConfigError::Threads(0)));
        assert_eq!(EncryptionConfig::default().with_threads(17).validate(), Err(ConfigError::Threads(17)));
        assert!(EncryptionConfig::default().with_threads(16).validate().is_ok());
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let original = EncryptionConfig::default();
        let edited = original.with_mode(Mode::Cbc).with_password(Password::new("secret"));
        assert_eq!(original.mode(), Mode::Gcm);
        assert!(original.password().is_empty());
        assert_eq!(edited.mode(), Mode::Cbc);
        assert_eq!(edited.password().expose_secret(), "secret");
    }

    #[test]
    fn test_with_algorithm_defaults_snaps_fields() {
        let config = EncryptionConfig::default().with_algorithm_defaults(Algorithm::Des);
        assert_eq!(config.key_size(), 56);
        assert_eq!(config.mode(), Mode::Cbc);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary() {
        assert_eq!(EncryptionConfig::default().summary(), "AES-256 256-bit GCM");
    }
}
