use aes_gcm::aead::AeadInPlace;
use aes_gcm::{AesGcm, KeyInit, Nonce, Tag};
use cipher::consts::U16;
use cipher::{BlockCipher, BlockEncrypt, BlockSizeUser};

use crate::config::{IV_SIZE, TAG_SIZE};
use crate::gateway::StatusCode;

/// AES-GCM with the full 16-byte derived IV as nonce.
type Gcm<C> = AesGcm<C, U16>;

/// Encrypts `input` and returns `ciphertext || tag`. The tag is also copied
/// into `tag_out` for callers that want it separately.
pub fn seal(key: &[u8], iv: &[u8; IV_SIZE], input: &[u8], tag_out: &mut [u8; TAG_SIZE]) -> Result<Vec<u8>, StatusCode> {
    match key.len() {
        16 => seal_with::<aes::Aes128>(key, iv, input, tag_out),
        24 => seal_with::<aes::Aes192>(key, iv, input, tag_out),
        32 => seal_with::<aes::Aes256>(key, iv, input, tag_out),
        _ => Err(StatusCode::InvalidKeySize),
    }
}

/// Splits the trailing tag off `input`, verifies it and returns the plaintext.
pub fn open(key: &[u8], iv: &[u8; IV_SIZE], input: &[u8]) -> Result<Vec<u8>, StatusCode> {
    match key.len() {
        16 => open_with::<aes::Aes128>(key, iv, input),
        24 => open_with::<aes::Aes192>(key, iv, input),
        32 => open_with::<aes::Aes256>(key, iv, input),
        _ => Err(StatusCode::InvalidKeySize),
    }
}

fn seal_with<C>(key: &[u8], iv: &[u8; IV_SIZE], input: &[u8], tag_out: &mut [u8; TAG_SIZE]) -> Result<Vec<u8>, StatusCode>
where
    C: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt + KeyInit,
{
    let aead = Gcm::<C>::new_from_slice(key).map_err(|_| StatusCode::InvalidKeySize)?;

    let mut buffer = Vec::with_capacity(input.len() + TAG_SIZE);
    buffer.extend_from_slice(input);
    let tag = aead.encrypt_in_place_detached(Nonce::<U16>::from_slice(iv), b"", &mut buffer).map_err(|_| StatusCode::CryptoError)?;

    tag_out.copy_from_slice(&tag);
    buffer.extend_from_slice(&tag);
    Ok(buffer)
}

fn open_with<C>(key: &[u8], iv: &[u8; IV_SIZE], input: &[u8]) -> Result<Vec<u8>, StatusCode>
where
    C: BlockCipher + BlockSizeUser<BlockSize = U16> + BlockEncrypt + KeyInit,
{
    if input.len() <= TAG_SIZE {
        return Err(StatusCode::CryptoError);
    }

    let aead = Gcm::<C>::new_from_slice(key).map_err(|_| StatusCode::InvalidKeySize)?;
    let (ciphertext, tag) = input.split_at(input.len() - TAG_SIZE);

    let mut buffer = ciphertext.to_vec();
    aead.decrypt_in_place_detached(Nonce::<U16>::from_slice(iv), b"", &mut buffer, Tag::from_slice(tag))
        .map_err(|_| StatusCode::CryptoError)?;

    Ok(buffer)
}
