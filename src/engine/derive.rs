use hmac::Hmac;
use sha2::Sha256;

use crate::config::{IV_SIZE, KDF_ITERATIONS, KDF_SALT};
use crate::gateway::StatusCode;
use crate::secret::SecretBytes;

/// Derives `key_len` key bytes and an `iv_len`-byte IV from `password`.
///
/// Both are taken from the same PBKDF2-HMAC-SHA256 output stream with a fixed
/// salt, so identical passwords always produce identical key and IV. This is
/// what the native engine computes, and files stay interchangeable with it.
///
/// # Weaknesses
///
/// - The IV is a prefix of the key material. Whoever stores or publishes the
///   IV returned through the engine boundary discloses that many key bytes.
/// - The IV is fixed per password, so CTR, OFB, GCM and ChaCha20 reuse one
///   keystream for every file encrypted under the same password.
pub fn derive_key_and_iv(password: &[u8], key_len: usize, iv_len: usize) -> Result<(SecretBytes, [u8; IV_SIZE]), StatusCode> {
    if iv_len > IV_SIZE {
        return Err(StatusCode::InvalidParams);
    }

    let mut material = vec![0u8; key_len.max(iv_len)];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, KDF_SALT, KDF_ITERATIONS, &mut material).map_err(|_| StatusCode::CryptoError)?;

    let mut iv = [0u8; IV_SIZE];
    iv[..iv_len].copy_from_slice(&material[..iv_len]);
    material.truncate(key_len);

    Ok((SecretBytes::from_vec(material), iv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_lengths() {
        let (key, iv) = derive_key_and_iv(b"password", 32, 16).unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(&iv[..], &key.expose_secret()[..16]);
    }

    #[test]
    fn test_derive_deterministic() {
        let (key1, iv1) = derive_key_and_iv(b"password", 24, 16).unwrap();
        let (key2, iv2) = derive_key_and_iv(b"password", 24, 16).unwrap();
        assert_eq!(key1.expose_secret(), key2.expose_secret());
        assert_eq!(iv1, iv2);

        let (other, _) = derive_key_and_iv(b"passw0rd", 24, 16).unwrap();
        assert_ne!(key1.expose_secret(), other.expose_secret());
    }

    #[test]
    fn test_short_iv_leaves_tail_zeroed() {
        let (_, iv) = derive_key_and_iv(b"password", 32, 12).unwrap();
        assert_eq!(&iv[12..], &[0u8; 4]);
    }

    #[test]
    fn test_iv_longer_than_buffer_rejected() {
        assert_eq!(derive_key_and_iv(b"password", 32, 17).unwrap_err(), StatusCode::InvalidParams);
    }
}
