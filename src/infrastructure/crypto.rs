//! Symmetric encryption of provider credentials at rest
//!
//! Credentials are persisted as `ivHex:cipherHex` (AES-256-CBC, PKCS7, fresh
//! 16-byte IV per encryption). Decryption never fails loudly: any malformed
//! token, wrong key, or corrupted ciphertext is treated as "no credential".

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::RngCore;
use tracing::warn;

use crate::domain::DomainError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Encrypts and decrypts provider secrets with a process-wide key.
pub struct CredentialCodec {
    key: [u8; KEY_LEN],
}

impl CredentialCodec {
    /// The key must be exactly 32 bytes (AES-256).
    pub fn new(key: &str) -> Result<Self, DomainError> {
        let bytes = key.as_bytes();
        if bytes.len() != KEY_LEN {
            return Err(DomainError::configuration(format!(
                "Encryption key must be exactly {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            )));
        }

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Encrypt a plaintext secret, returning `ivHex:cipherHex`.
    ///
    /// A fresh random IV is drawn per call, so encrypting the same plaintext
    /// twice yields different tokens.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        format!("{}:{}", hex::encode(iv), hex::encode(ciphertext))
    }

    /// Decrypt an `ivHex:cipherHex` token.
    ///
    /// Returns None on any failure; the caller treats that as a missing
    /// credential rather than an error.
    pub fn decrypt(&self, token: &str) -> Option<String> {
        match self.try_decrypt(token) {
            Some(plaintext) => Some(plaintext),
            None => {
                warn!("Credential decryption failed; treating as missing credential");
                None
            }
        }
    }

    fn try_decrypt(&self, token: &str) -> Option<String> {
        let (iv_hex, cipher_hex) = token.split_once(':')?;
        let iv: [u8; IV_LEN] = hex::decode(iv_hex).ok()?.try_into().ok()?;
        let ciphertext = hex::decode(cipher_hex).ok()?;

        let plaintext = Aes256CbcDec::new(&self.key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .ok()?;

        String::from_utf8(plaintext).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_key_must_be_32_bytes() {
        assert!(CredentialCodec::new("short").is_err());
        assert!(CredentialCodec::new(TEST_KEY).is_ok());
    }

    #[test]
    fn test_round_trip() {
        let codec = CredentialCodec::new(TEST_KEY).unwrap();

        for plaintext in ["sk-abc123", "", "密钥 with unicode ✓", "a"] {
            let token = codec.encrypt(plaintext);
            assert_eq!(codec.decrypt(&token).as_deref(), Some(plaintext));
        }
    }

    #[test]
    fn test_token_format() {
        let codec = CredentialCodec::new(TEST_KEY).unwrap();
        let token = codec.encrypt("sk-abc123");

        let (iv_hex, cipher_hex) = token.split_once(':').unwrap();
        assert_eq!(iv_hex.len(), 32);
        assert!(cipher_hex.len() % 32 == 0);
        assert!(hex::decode(iv_hex).is_ok());
        assert!(hex::decode(cipher_hex).is_ok());
    }

    #[test]
    fn test_iv_freshness() {
        let codec = CredentialCodec::new(TEST_KEY).unwrap();

        let mut tokens = std::collections::HashSet::new();
        for _ in 0..64 {
            assert!(tokens.insert(codec.encrypt("same plaintext")));
        }
    }

    #[test]
    fn test_malformed_tokens_decrypt_to_none() {
        let codec = CredentialCodec::new(TEST_KEY).unwrap();

        assert_eq!(codec.decrypt(""), None);
        assert_eq!(codec.decrypt("no-separator"), None);
        assert_eq!(codec.decrypt("nothex:nothex"), None);
        assert_eq!(codec.decrypt("abcd:1234"), None);
        assert_eq!(codec.decrypt(":"), None);
    }

    #[test]
    fn test_wrong_key_does_not_recover_plaintext() {
        let codec = CredentialCodec::new(TEST_KEY).unwrap();
        let other = CredentialCodec::new("fedcba9876543210fedcba9876543210").unwrap();

        let token = codec.encrypt("top-secret-api-key");
        assert_ne!(other.decrypt(&token), Some("top-secret-api-key".to_string()));
    }

    #[test]
    fn test_corrupted_ciphertext_decrypts_to_none() {
        let codec = CredentialCodec::new(TEST_KEY).unwrap();
        let token = codec.encrypt("sk-abc123");

        // Truncate the ciphertext to an incomplete block
        let truncated = &token[..token.len() - 2];
        assert_eq!(codec.decrypt(truncated), None);
    }
}
