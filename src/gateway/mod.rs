//! # Boundary Gateway
//!
//! Translates a validated request into the engine's fixed call contract and
//! decodes the numeric status it returns.
//!
//! ## Call Contract
//!
//! - The output buffer is pre-allocated at `input length + 1024` bytes and the
//!   output length out-parameter starts at that capacity.
//! - A 16-byte IV buffer and a 16-byte tag buffer are always supplied, even for
//!   modes that never touch them.
//! - A call succeeds only when the engine returns `0` **and** reports a written
//!   length in `1..=capacity`. Anything else discards the buffer.
//! - On success exactly the written prefix is returned.
//!
//! The gateway keeps no state besides the engine handle and never logs; it is
//! a pure request/response translator. Every failure comes back as a
//! [`StatusCode`], engine panics included.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use anyhow::{Context, Result, ensure};

use crate::capability;
use crate::config::{IV_SIZE, OUTPUT_OVERHEAD, SELF_TEST_PASSWORD, SELF_TEST_PLAINTEXT, TAG_SIZE};
use crate::secret::Password;
use crate::settings::EncryptionConfig;
use crate::types::Operation;

#[cfg(feature = "native")]
mod native;
mod status;

#[cfg(feature = "native")]
pub use native::NativeEngine;
pub use status::{STATUS_CRYPTO_ERROR, STATUS_INVALID_KEY_SIZE, STATUS_INVALID_PARAMS, STATUS_MEMORY_ERROR, STATUS_OUTPUT_BUFFER_TOO_SMALL, STATUS_PASSWORD_TOO_SHORT, STATUS_SUCCESS, STATUS_UNKNOWN_ERROR, STATUS_UNSUPPORTED_ALGORITHM, STATUS_UNSUPPORTED_MODE, StatusCode, status_message};

/// Arguments of a single `crypto_bridge_process` call.
///
/// Lengths are implied by the slices; the native binding re-derives the
/// explicit `int` lengths the C signature expects.
pub struct BoundaryCall<'a> {
    pub algorithm: i32,
    pub mode: i32,
    pub key_size_bits: i32,
    pub operation: i32,
    pub password: &'a [u8],
    pub input: &'a [u8],
    pub output: &'a mut [u8],
    /// In: output capacity. Out: bytes written.
    pub output_len: &'a mut i32,
    pub iv: &'a mut [u8; IV_SIZE],
    pub auth_tag: &'a mut [u8; TAG_SIZE],
}

/// The opaque transform engine on the far side of the boundary.
///
/// Implementations return raw status codes exactly as the native library
/// does. The query methods return `None` when the engine is unavailable.
pub trait TransformEngine: Send + Sync {
    fn process(&self, call: &mut BoundaryCall<'_>) -> i32;

    fn version(&self) -> Option<String>;

    fn algorithm_ids(&self) -> Option<Vec<i32>>;

    fn mode_ids(&self) -> Option<Vec<i32>>;
}

/// Handle to an initialized transform engine.
#[derive(Clone)]
pub struct Gateway {
    engine: Arc<dyn TransformEngine>,
    version: String,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("version", &self.version).finish_non_exhaustive()
    }
}

impl Gateway {
    /// Initializes the gateway over `engine`.
    ///
    /// # Errors
    ///
    /// Fails when the engine cannot report a version, which is how an engine
    /// that failed to load presents itself.
    pub fn initialize<E: TransformEngine + 'static>(engine: E) -> Result<Self> {
        Self::initialize_shared(Arc::new(engine))
    }

    /// Like [`initialize`](Self::initialize) for an engine that is already shared.
    pub fn initialize_shared(engine: Arc<dyn TransformEngine>) -> Result<Self> {
        let version = engine.version().context("transform engine unavailable")?;
        Ok(Self { engine, version })
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[inline]
    pub fn algorithm_ids(&self) -> Option<Vec<i32>> {
        self.engine.algorithm_ids()
    }

    #[inline]
    pub fn mode_ids(&self) -> Option<Vec<i32>> {
        self.engine.mode_ids()
    }

    /// Runs one transform through the call contract.
    ///
    /// # Errors
    ///
    /// Returns the decoded engine status on any failure. Inputs or passwords
    /// too large for the 32-bit contract fail with
    /// [`StatusCode::InvalidParams`] before the engine is called.
    pub fn invoke(&self, algorithm: i32, mode: i32, key_size_bits: i32, operation: Operation, password: &Password, input: &[u8]) -> Result<Vec<u8>, StatusCode> {
        let password = password.expose_secret().as_bytes();
        i32::try_from(password.len()).map_err(|_| StatusCode::InvalidParams)?;

        let capacity = input.len().checked_add(OUTPUT_OVERHEAD).ok_or(StatusCode::InvalidParams)?;
        let mut output_len = i32::try_from(capacity).map_err(|_| StatusCode::InvalidParams)?;
        let mut output = vec![0u8; capacity];
        let mut iv = [0u8; IV_SIZE];
        let mut auth_tag = [0u8; TAG_SIZE];

        let status = {
            let mut call = BoundaryCall {
                algorithm,
                mode,
                key_size_bits,
                operation: operation.native_id(),
                password,
                input,
                output: &mut output,
                output_len: &mut output_len,
                iv: &mut iv,
                auth_tag: &mut auth_tag,
            };

            catch_unwind(AssertUnwindSafe(|| self.engine.process(&mut call))).unwrap_or(STATUS_UNKNOWN_ERROR)
        };

        if let Some(failure) = StatusCode::from_raw(status) {
            return Err(failure);
        }

        // Success with nothing written is still a failure.
        let written = usize::try_from(output_len).ok().filter(|&len| len > 0).ok_or(StatusCode::CryptoError)?;
        if written > capacity {
            return Err(StatusCode::OutputBufferTooSmall);
        }

        output.truncate(written);
        Ok(output)
    }

    /// [`invoke`](Self::invoke) with ids taken from a configuration.
    ///
    /// The configuration is not validated here.
    pub fn transform(&self, config: &EncryptionConfig, operation: Operation, input: &[u8]) -> Result<Vec<u8>, StatusCode> {
        let key_size_bits = i32::try_from(config.key_size()).map_err(|_| StatusCode::InvalidParams)?;
        self.invoke(
            capability::native_id(config.algorithm()),
            capability::mode_native_id(config.mode()),
            key_size_bits,
            operation,
            config.password(),
            input,
        )
    }

    /// Encrypts and decrypts a fixed plaintext with AES-256/CBC and checks the
    /// result matches.
    pub fn self_test(&self) -> Result<()> {
        let config = EncryptionConfig::default().with_mode(capability::Mode::Cbc).with_password(Password::new(SELF_TEST_PASSWORD));

        let encrypted = self.transform(&config, Operation::Encrypt, SELF_TEST_PLAINTEXT).context("self-test encryption failed")?;
        let decrypted = self.transform(&config, Operation::Decrypt, &encrypted).context("self-test decryption failed")?;
        ensure!(decrypted == SELF_TEST_PLAINTEXT, "self-test round trip mismatch");

        Ok(())
    }
}
