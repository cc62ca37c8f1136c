//! Block-cipher modes over the RustCrypto mode crates.
//!
//! Every function takes the full derived IV and slices it to the mode's own
//! IV length, which is the cipher block size for the block modes (8 bytes for
//! DES, 16 for AES).

use cipher::block_padding::Pkcs7;
use cipher::{AsyncStreamCipher, BlockCipher, BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipher};

use crate::capability::Mode;
use crate::gateway::StatusCode;
use crate::types::Operation;

/// The concrete cipher and stream-mode types used for one block cipher.
///
/// OFB and CTR need block-size specific types (`Ctr128BE` vs `Ctr64BE`), so
/// they are named per cipher instead of derived generically.
pub trait BlockSuite {
    type Cipher: BlockCipher + BlockEncrypt + BlockDecrypt + KeyInit;
    type Ofb: KeyIvInit + StreamCipher;
    type Ctr: KeyIvInit + StreamCipher;
}

pub struct Aes128Suite;
pub struct Aes192Suite;
pub struct Aes256Suite;
pub struct DesSuite;
pub struct TripleDesSuite;

impl BlockSuite for Aes128Suite {
    type Cipher = aes::Aes128;
    type Ofb = ofb::Ofb<aes::Aes128>;
    type Ctr = ctr::Ctr128BE<aes::Aes128>;
}

impl BlockSuite for Aes192Suite {
    type Cipher = aes::Aes192;
    type Ofb = ofb::Ofb<aes::Aes192>;
    type Ctr = ctr::Ctr128BE<aes::Aes192>;
}

impl BlockSuite for Aes256Suite {
    type Cipher = aes::Aes256;
    type Ofb = ofb::Ofb<aes::Aes256>;
    type Ctr = ctr::Ctr128BE<aes::Aes256>;
}

impl BlockSuite for DesSuite {
    type Cipher = des::Des;
    type Ofb = ofb::Ofb<des::Des>;
    type Ctr = ctr::Ctr64BE<des::Des>;
}

impl BlockSuite for TripleDesSuite {
    type Cipher = des::TdesEde3;
    type Ofb = ofb::Ofb<des::TdesEde3>;
    type Ctr = ctr::Ctr64BE<des::TdesEde3>;
}

/// Runs `input` through `mode` of the suite's cipher. GCM is handled by the
/// AEAD path and reported as unsupported here.
pub fn transform<S: BlockSuite>(mode: Mode, operation: Operation, key: &[u8], iv: &[u8], input: &[u8]) -> Result<Vec<u8>, StatusCode> {
    match (mode, operation) {
        (Mode::Cbc, Operation::Encrypt) => encrypt_padded::<cbc::Encryptor<S::Cipher>>(init_iv(key, iv)?, input),
        (Mode::Cbc, Operation::Decrypt) => decrypt_padded::<cbc::Decryptor<S::Cipher>>(init_iv(key, iv)?, input),
        (Mode::Ecb, Operation::Encrypt) => encrypt_padded::<ecb::Encryptor<S::Cipher>>(init(key)?, input),
        (Mode::Ecb, Operation::Decrypt) => decrypt_padded::<ecb::Decryptor<S::Cipher>>(init(key)?, input),
        (Mode::Cfb, Operation::Encrypt) => {
            let mut buffer = input.to_vec();
            init_iv::<cfb_mode::Encryptor<S::Cipher>>(key, iv)?.encrypt(&mut buffer);
            Ok(buffer)
        }
        (Mode::Cfb, Operation::Decrypt) => {
            let mut buffer = input.to_vec();
            init_iv::<cfb_mode::Decryptor<S::Cipher>>(key, iv)?.decrypt(&mut buffer);
            Ok(buffer)
        }
        (Mode::Ofb, _) => keystream::<S::Ofb>(key, iv, input),
        (Mode::Ctr, _) => keystream::<S::Ctr>(key, iv, input),
        (Mode::Gcm, _) => Err(StatusCode::UnsupportedMode),
    }
}

/// XORs `input` with the keystream of `S`. Encryption and decryption are the
/// same operation.
pub fn keystream<S: KeyIvInit + StreamCipher>(key: &[u8], iv: &[u8], input: &[u8]) -> Result<Vec<u8>, StatusCode> {
    let mut buffer = input.to_vec();
    init_iv::<S>(key, iv)?.apply_keystream(&mut buffer);
    Ok(buffer)
}

fn init<M: KeyInit>(key: &[u8]) -> Result<M, StatusCode> {
    M::new_from_slice(key).map_err(|_| StatusCode::InvalidKeySize)
}

fn init_iv<M: KeyIvInit>(key: &[u8], iv: &[u8]) -> Result<M, StatusCode> {
    let iv = iv.get(..M::iv_size()).ok_or(StatusCode::InvalidParams)?;
    M::new_from_slices(key, iv).map_err(|_| StatusCode::InvalidKeySize)
}

fn encrypt_padded<M: BlockEncryptMut>(mode: M, input: &[u8]) -> Result<Vec<u8>, StatusCode> {
    Ok(mode.encrypt_padded_vec_mut::<Pkcs7>(input))
}

// Bad padding is what a wrong password usually looks like in CBC and ECB.
fn decrypt_padded<M: BlockDecryptMut>(mode: M, input: &[u8]) -> Result<Vec<u8>, StatusCode> {
    mode.decrypt_padded_vec_mut::<Pkcs7>(input).map_err(|_| StatusCode::CryptoError)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];
    const IV: [u8; 16] = [0x24; 16];
    const PLAINTEXT: &[u8] = b"The quick brown fox jumps over the lazy dog";

    fn round_trip<S: BlockSuite>(mode: Mode, key: &[u8]) {
        let encrypted = transform::<S>(mode, Operation::Encrypt, key, &IV, PLAINTEXT).unwrap();
        assert_ne!(encrypted, PLAINTEXT);

        let decrypted = transform::<S>(mode, Operation::Decrypt, key, &IV, &encrypted).unwrap();
        assert_eq!(decrypted, PLAINTEXT, "{mode} round trip");
    }

    #[test]
    fn test_aes_modes() {
        for mode in [Mode::Cbc, Mode::Ecb, Mode::Cfb, Mode::Ofb, Mode::Ctr] {
            round_trip::<Aes128Suite>(mode, &KEY[..16]);
            round_trip::<Aes192Suite>(mode, &KEY[..24]);
            round_trip::<Aes256Suite>(mode, &KEY);
        }
    }

    #[test]
    fn test_des_modes() {
        for mode in [Mode::Cbc, Mode::Ecb, Mode::Cfb, Mode::Ofb, Mode::Ctr] {
            round_trip::<DesSuite>(mode, &KEY[..8]);
            round_trip::<TripleDesSuite>(mode, &KEY[..24]);
        }
    }

    #[test]
    fn test_padding_grows_to_block() {
        let encrypted = transform::<Aes256Suite>(Mode::Cbc, Operation::Encrypt, &KEY, &IV, &[0u8; 16]).unwrap();
        assert_eq!(encrypted.len(), 32);

        let encrypted = transform::<DesSuite>(Mode::Cbc, Operation::Encrypt, &KEY[..8], &IV, &[0u8; 5]).unwrap();
        assert_eq!(encrypted.len(), 8);
    }

    #[test]
    fn test_stream_modes_keep_length() {
        for mode in [Mode::Cfb, Mode::Ofb, Mode::Ctr] {
            let encrypted = transform::<Aes256Suite>(mode, Operation::Encrypt, &KEY, &IV, PLAINTEXT).unwrap();
            assert_eq!(encrypted.len(), PLAINTEXT.len());
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let encrypted = transform::<Aes256Suite>(Mode::Cbc, Operation::Encrypt, &KEY, &IV, PLAINTEXT).unwrap();
        let result = transform::<Aes256Suite>(Mode::Cbc, Operation::Decrypt, &KEY, &IV, &encrypted[..encrypted.len() - 3]);
        assert_eq!(result.unwrap_err(), StatusCode::CryptoError);
    }

    #[test]
    fn test_wrong_key_length() {
        let result = transform::<Aes256Suite>(Mode::Cbc, Operation::Encrypt, &KEY[..20], &IV, PLAINTEXT);
        assert_eq!(result.unwrap_err(), StatusCode::InvalidKeySize);
    }

    #[test]
    fn test_gcm_not_a_block_mode() {
        let result = transform::<Aes256Suite>(Mode::Gcm, Operation::Encrypt, &KEY, &IV, PLAINTEXT);
        assert_eq!(result.unwrap_err(), StatusCode::UnsupportedMode);
    }
}
