//! Authenticated token format
//!
//! Tokens follow the Fernet layout:
//!
//! ```text
//! +---------+---------------+---------+--------------------+-------------+
//! | 0x80    | timestamp     | IV      | AES-128-CBC data   | HMAC-SHA256 |
//! | 1 byte  | u64 BE        | 16 B    | PKCS7 padded       | 32 B        |
//! +---------+---------------+---------+--------------------+-------------+
//! ```
//!
//! The whole token is URL-safe base64. The HMAC covers everything before
//! it and is checked in constant time before any decryption happens.

use std::time::{SystemTime, UNIX_EPOCH};

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::{EncryptionError, EncryptionResult};
use super::kdf::KEY_LEN;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

const VERSION: u8 = 0x80;
const IV_LEN: usize = 16;
const MAC_LEN: usize = 32;
const HEADER_LEN: usize = 1 + 8 + IV_LEN;
const BLOCK_LEN: usize = 16;

/// Encrypts `data` into a base64 token using a 32-byte key
pub(super) fn seal(key: &[u8; KEY_LEN], data: &[u8]) -> EncryptionResult<Vec<u8>> {
    let (signing_key, encryption_key) = key.split_at(KEY_LEN / 2);

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let ciphertext = Aes128CbcEnc::new_from_slices(encryption_key, &iv)
        .map_err(|e| EncryptionError::Encrypt(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(data);

    let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + MAC_LEN);
    token.push(VERSION);
    token.extend_from_slice(&timestamp.to_be_bytes());
    token.extend_from_slice(&iv);
    token.extend_from_slice(&ciphertext);

    let tag = sign(signing_key, &token)?;
    token.extend_from_slice(&tag);

    Ok(URL_SAFE.encode(token).into_bytes())
}

/// Verifies and decrypts a base64 token
pub(super) fn open(key: &[u8; KEY_LEN], token: &[u8]) -> EncryptionResult<Vec<u8>> {
    let (signing_key, encryption_key) = key.split_at(KEY_LEN / 2);

    let raw = URL_SAFE
        .decode(trim_ascii_whitespace(token))
        .map_err(|_| EncryptionError::Decrypt)?;
    if raw.len() < HEADER_LEN + BLOCK_LEN + MAC_LEN || raw[0] != VERSION {
        return Err(EncryptionError::Decrypt);
    }

    let (signed, tag) = raw.split_at(raw.len() - MAC_LEN);
    let expected = sign(signing_key, signed)?;
    if !bool::from(expected[..].ct_eq(tag)) {
        return Err(EncryptionError::Decrypt);
    }

    let iv = &signed[9..HEADER_LEN];
    let ciphertext = &signed[HEADER_LEN..];
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(EncryptionError::Decrypt);
    }

    Aes128CbcDec::new_from_slices(encryption_key, iv)
        .map_err(|_| EncryptionError::Decrypt)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EncryptionError::Decrypt)
}

fn sign(key: &[u8], data: &[u8]) -> EncryptionResult<[u8; MAC_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| EncryptionError::Encrypt(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

fn trim_ascii_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &data[start..end]
}
