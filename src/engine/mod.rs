//! # Reference Engine
//!
//! A pure-Rust [`TransformEngine`] that speaks the same call contract as the
//! native library for the ciphers the RustCrypto project covers: AES, ChaCha20,
//! DES and 3DES. Every other algorithm id is answered with
//! `STATUS_UNSUPPORTED_ALGORITHM`, exactly as an engine build without that
//! cipher would.
//!
//! ## Validation Order
//!
//! 1. Operation id must be encrypt or decrypt.
//! 2. Password must meet the configured minimum length.
//! 3. Input and output capacity must be non-empty.
//! 4. Key size is checked for the algorithm (unknown algorithms fail here).
//! 5. Mode is checked for the algorithm.
//! 6. Output capacity must hold the worst-case result; if not, the required
//!    size is written back through `output_len`.
//!
//! ## Output Layout
//!
//! CBC and ECB add PKCS#7 padding. CFB, OFB, CTR and ChaCha20 keep the input
//! length. GCM appends its 16-byte tag to the ciphertext and also copies it
//! into the tag buffer; decryption reads the tag back from the end of the
//! input.

mod aead;
mod block;
mod derive;

use crate::capability::{self, Algorithm, Mode};
use crate::config::{PASSWORD_MIN_LENGTH, TAG_SIZE};
use crate::gateway::{BoundaryCall, STATUS_SUCCESS, StatusCode, TransformEngine};
use crate::types::Operation;

use self::block::{Aes128Suite, Aes192Suite, Aes256Suite, DesSuite, TripleDesSuite};

/// Cipher families the reference engine implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Aes,
    ChaCha20,
    TripleDes,
    Des,
}

impl Family {
    const ALL: [Self; 4] = [Self::Aes, Self::ChaCha20, Self::TripleDes, Self::Des];

    /// A representative algorithm for looking up the family's boundary id.
    fn algorithm(self) -> Algorithm {
        match self {
            Self::Aes => Algorithm::Aes256,
            Self::ChaCha20 => Algorithm::ChaCha20,
            Self::TripleDes => Algorithm::Des3,
            Self::Des => Algorithm::Des,
        }
    }

    fn from_native(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|family| capability::native_id(family.algorithm()) == id)
    }

    /// Key length in bytes for a requested key size, if the family accepts it.
    fn key_len(self, bits: i32) -> Option<usize> {
        match (self, bits) {
            (Self::Aes, 128) => Some(16),
            (Self::Aes, 192) => Some(24),
            (Self::Aes | Self::ChaCha20, 256) => Some(32),
            (Self::TripleDes, 168 | 192) => Some(24),
            // DES keys carry 56 effective bits in 8 bytes.
            (Self::Des, 56) => Some(8),
            _ => None,
        }
    }

    fn supports(self, mode: Mode) -> bool {
        match self {
            Self::ChaCha20 => mode == Mode::Ctr,
            Self::Aes => true,
            Self::TripleDes | Self::Des => mode != Mode::Gcm,
        }
    }

    fn iv_len(self) -> usize {
        match self {
            Self::ChaCha20 => 12,
            Self::Aes | Self::TripleDes | Self::Des => 16,
        }
    }
}

/// Software implementation of the engine boundary.
#[derive(Debug, Clone)]
pub struct ReferenceEngine {
    min_password_len: usize,
}

impl ReferenceEngine {
    pub fn new() -> Self {
        Self { min_password_len: PASSWORD_MIN_LENGTH }
    }

    /// Rejects passwords shorter than `len` bytes with
    /// `STATUS_PASSWORD_TOO_SHORT`, the way the native engine enforces 8.
    #[must_use]
    pub fn with_min_password_len(mut self, len: usize) -> Self {
        self.min_password_len = len;
        self
    }

    fn run(&self, call: &mut BoundaryCall<'_>) -> Result<(), StatusCode> {
        let operation = Operation::from_native(call.operation).ok_or(StatusCode::InvalidParams)?;

        if call.password.len() < self.min_password_len {
            return Err(StatusCode::PasswordTooShort);
        }

        let capacity = usize::try_from(*call.output_len).unwrap_or(0).min(call.output.len());
        if call.input.is_empty() || capacity == 0 {
            return Err(StatusCode::InvalidParams);
        }

        let family = Family::from_native(call.algorithm).ok_or(StatusCode::UnsupportedAlgorithm)?;
        let key_len = family.key_len(call.key_size_bits).ok_or(StatusCode::InvalidKeySize)?;
        let mode = capability::mode_from_native(call.mode).filter(|&mode| family.supports(mode)).ok_or(StatusCode::UnsupportedMode)?;

        let required = match operation {
            Operation::Encrypt => call.input.len() + TAG_SIZE,
            Operation::Decrypt => call.input.len(),
        };
        if capacity < required {
            *call.output_len = i32::try_from(required).unwrap_or(i32::MAX);
            return Err(StatusCode::OutputBufferTooSmall);
        }

        let (key, iv) = derive::derive_key_and_iv(call.password, key_len, family.iv_len())?;
        *call.iv = iv;
        let key = key.expose_secret();

        let output = match (family, mode, operation) {
            (Family::Aes, Mode::Gcm, Operation::Encrypt) => aead::seal(key, &iv, call.input, call.auth_tag)?,
            (Family::Aes, Mode::Gcm, Operation::Decrypt) => aead::open(key, &iv, call.input)?,
            (Family::Aes, _, _) => match key_len {
                16 => block::transform::<Aes128Suite>(mode, operation, key, &iv, call.input)?,
                24 => block::transform::<Aes192Suite>(mode, operation, key, &iv, call.input)?,
                _ => block::transform::<Aes256Suite>(mode, operation, key, &iv, call.input)?,
            },
            (Family::ChaCha20, _, _) => block::keystream::<chacha20::ChaCha20>(key, &iv, call.input)?,
            (Family::TripleDes, _, _) => block::transform::<TripleDesSuite>(mode, operation, key, &iv, call.input)?,
            (Family::Des, _, _) => block::transform::<DesSuite>(mode, operation, key, &iv, call.input)?,
        };

        if output.len() > capacity {
            *call.output_len = i32::try_from(output.len()).unwrap_or(i32::MAX);
            return Err(StatusCode::OutputBufferTooSmall);
        }

        call.output[..output.len()].copy_from_slice(&output);
        *call.output_len = i32::try_from(output.len()).map_err(|_| StatusCode::InvalidParams)?;
        Ok(())
    }
}

impl Default for ReferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformEngine for ReferenceEngine {
    fn process(&self, call: &mut BoundaryCall<'_>) -> i32 {
        match self.run(call) {
            Ok(()) => STATUS_SUCCESS,
            Err(status) => status.raw(),
        }
    }

    fn version(&self) -> Option<String> {
        Some(format!("reference {}", env!("CARGO_PKG_VERSION")))
    }

    fn algorithm_ids(&self) -> Option<Vec<i32>> {
        Some(Family::ALL.into_iter().map(|family| capability::native_id(family.algorithm())).collect())
    }

    fn mode_ids(&self) -> Option<Vec<i32>> {
        Some(Mode::ALL.iter().map(|&mode| capability::mode_native_id(mode)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IV_SIZE, SELF_TEST_PASSWORD};
    use crate::gateway::{Gateway, STATUS_OUTPUT_BUFFER_TOO_SMALL};
    use crate::secret::Password;
    use crate::settings::EncryptionConfig;

    const PLAINTEXT: &[u8] = b"Hello, CryptingTool! This spans more than one block.";

    fn gateway() -> Gateway {
        Gateway::initialize(ReferenceEngine::new()).unwrap()
    }

    fn config(algorithm: Algorithm, key_size: u32, mode: Mode) -> EncryptionConfig {
        EncryptionConfig::default().with_algorithm(algorithm).with_key_size(key_size).with_mode(mode).with_password(Password::new(SELF_TEST_PASSWORD))
    }

    fn round_trip(config: &EncryptionConfig) -> Vec<u8> {
        let gateway = gateway();
        let encrypted = gateway.transform(config, Operation::Encrypt, PLAINTEXT).unwrap();
        assert_ne!(encrypted, PLAINTEXT);

        let decrypted = gateway.transform(config, Operation::Decrypt, &encrypted).unwrap();
        assert_eq!(decrypted, PLAINTEXT, "{}", config.summary());
        encrypted
    }

    #[test]
    fn test_aes_every_mode_and_size() {
        for (algorithm, bits) in [(Algorithm::Aes128, 128), (Algorithm::Aes192, 192), (Algorithm::Aes256, 256)] {
            for &mode in Mode::ALL {
                round_trip(&config(algorithm, bits, mode));
            }
        }
    }

    #[test]
    fn test_aes_gcm_appends_tag() {
        let encrypted = round_trip(&config(Algorithm::Aes256, 256, Mode::Gcm));
        assert_eq!(encrypted.len(), PLAINTEXT.len() + TAG_SIZE);
    }

    #[test]
    fn test_aes_gcm_detects_tampering() {
        let gateway = gateway();
        let config = config(Algorithm::Aes256, 256, Mode::Gcm);
        let mut encrypted = gateway.transform(&config, Operation::Encrypt, PLAINTEXT).unwrap();
        encrypted[3] ^= 0x01;

        assert_eq!(gateway.transform(&config, Operation::Decrypt, &encrypted), Err(StatusCode::CryptoError));
    }

    #[test]
    fn test_aes_gcm_wrong_password() {
        let gateway = gateway();
        let config = config(Algorithm::Aes256, 256, Mode::Gcm);
        let encrypted = gateway.transform(&config, Operation::Encrypt, PLAINTEXT).unwrap();

        let wrong = config.with_password(Password::new("test124"));
        assert_eq!(gateway.transform(&wrong, Operation::Decrypt, &encrypted), Err(StatusCode::CryptoError));
    }

    #[test]
    fn test_chacha20_keeps_length() {
        let encrypted = round_trip(&config(Algorithm::ChaCha20, 256, Mode::Ctr));
        assert_eq!(encrypted.len(), PLAINTEXT.len());
    }

    #[test]
    fn test_des_family() {
        for &mode in &[Mode::Cbc, Mode::Ecb, Mode::Cfb, Mode::Ofb, Mode::Ctr] {
            round_trip(&config(Algorithm::Des, 56, mode));
            round_trip(&config(Algorithm::Des3, 168, mode));
            round_trip(&config(Algorithm::Des3, 192, mode));
        }
    }

    #[test]
    fn test_deterministic_for_same_password() {
        let gateway = gateway();
        let config = config(Algorithm::Aes256, 256, Mode::Cbc);
        let first = gateway.transform(&config, Operation::Encrypt, PLAINTEXT).unwrap();
        let second = gateway.transform(&config, Operation::Encrypt, PLAINTEXT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejections() {
        let gateway = gateway();
        let password = Password::new("password");

        // Serpent has a boundary id but no implementation here.
        let serpent = capability::native_id(Algorithm::Serpent256);
        assert_eq!(gateway.invoke(serpent, 1, 256, Operation::Encrypt, &password, PLAINTEXT), Err(StatusCode::UnsupportedAlgorithm));
        assert_eq!(gateway.invoke(99, 1, 256, Operation::Encrypt, &password, PLAINTEXT), Err(StatusCode::UnsupportedAlgorithm));

        assert_eq!(gateway.invoke(1, 1, 512, Operation::Encrypt, &password, PLAINTEXT), Err(StatusCode::InvalidKeySize));
        assert_eq!(gateway.invoke(12, 1, 256, Operation::Encrypt, &password, PLAINTEXT), Err(StatusCode::UnsupportedMode));
        assert_eq!(gateway.invoke(28, 2, 56, Operation::Encrypt, &password, PLAINTEXT), Err(StatusCode::UnsupportedMode));
        assert_eq!(gateway.invoke(1, 7, 256, Operation::Encrypt, &password, PLAINTEXT), Err(StatusCode::UnsupportedMode));
        assert_eq!(gateway.invoke(1, 1, 256, Operation::Encrypt, &password, b""), Err(StatusCode::InvalidParams));
    }

    #[test]
    fn test_password_minimum() {
        let gateway = Gateway::initialize(ReferenceEngine::new().with_min_password_len(8)).unwrap();
        let result = gateway.invoke(1, 1, 256, Operation::Encrypt, &Password::new("test123"), PLAINTEXT);
        assert_eq!(result, Err(StatusCode::PasswordTooShort));

        let result = Gateway::initialize(ReferenceEngine::new()).unwrap().invoke(1, 1, 256, Operation::Encrypt, &Password::new(""), PLAINTEXT);
        assert_eq!(result, Err(StatusCode::PasswordTooShort));
    }

    #[test]
    fn test_invalid_operation_id() {
        let mut output = [0u8; 64];
        let mut output_len = 64;
        let mut iv = [0u8; IV_SIZE];
        let mut auth_tag = [0u8; TAG_SIZE];
        let mut call = BoundaryCall {
            algorithm: 1,
            mode: 1,
            key_size_bits: 256,
            operation: 3,
            password: b"password",
            input: b"data",
            output: &mut output,
            output_len: &mut output_len,
            iv: &mut iv,
            auth_tag: &mut auth_tag,
        };

        assert_eq!(ReferenceEngine::new().process(&mut call), StatusCode::InvalidParams.raw());
    }

    #[test]
    fn test_small_buffer_reports_required_length() {
        let mut output = [0u8; 8];
        let mut output_len = 8;
        let mut iv = [0u8; IV_SIZE];
        let mut auth_tag = [0u8; TAG_SIZE];
        let mut call = BoundaryCall {
            algorithm: 1,
            mode: 1,
            key_size_bits: 256,
            operation: Operation::Encrypt.native_id(),
            password: b"password",
            input: &[0u8; 10],
            output: &mut output,
            output_len: &mut output_len,
            iv: &mut iv,
            auth_tag: &mut auth_tag,
        };

        assert_eq!(ReferenceEngine::new().process(&mut call), STATUS_OUTPUT_BUFFER_TOO_SMALL);
        assert_eq!(output_len, 26);
    }

    #[test]
    fn test_iv_and_tag_written() {
        let mut output = [0u8; 64];
        let mut output_len = 64;
        let mut iv = [0u8; IV_SIZE];
        let mut auth_tag = [0u8; TAG_SIZE];
        let mut call = BoundaryCall {
            algorithm: 1,
            mode: capability::mode_native_id(Mode::Gcm),
            key_size_bits: 256,
            operation: Operation::Encrypt.native_id(),
            password: b"password",
            input: b"data",
            output: &mut output,
            output_len: &mut output_len,
            iv: &mut iv,
            auth_tag: &mut auth_tag,
        };

        assert_eq!(ReferenceEngine::new().process(&mut call), STATUS_SUCCESS);
        assert_eq!(output_len, 4 + 16);
        assert_ne!(iv, [0u8; IV_SIZE]);
        assert_eq!(&output[4..20], &auth_tag);
    }

    #[test]
    fn test_queries() {
        let engine = ReferenceEngine::new();
        assert_eq!(engine.algorithm_ids(), Some(vec![1, 12, 23, 28]));
        assert_eq!(engine.mode_ids(), Some(vec![1, 2, 3, 4, 5, 6]));
        assert!(engine.version().unwrap().starts_with("reference "));
    }

    #[test]
    fn test_self_test_passes() {
        gateway().self_test().unwrap();
    }
}
