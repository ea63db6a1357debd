use std::fs;
use std::path::Path;

use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::core::{CryptoError, PadnextError};

type Aes256CfbEnc = cfb_mode::Encryptor<aes::Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<aes::Aes256>;

/// AES-256 content key length in bytes.
pub const CONTENT_KEY_LEN: usize = 32;
/// CFB initialization vector length in bytes.
pub const IV_LEN: usize = 16;
const PREFIX_LEN: usize = 4;

/// Encrypt `plaintext` for the holder of `public_key`.
///
/// Output layout: `[u32 BE wrapped key length][wrapped key][16-byte IV][ciphertext]`.
/// The content key is a fresh AES-256 key wrapped with RSA-OAEP (SHA-256,
/// MGF1-SHA-256); the body is AES-256-CFB with 128-bit segments.
pub fn encrypt(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Vec<u8>, PadnextError> {
    let mut rng = OsRng;
    let mut key = [0u8; CONTENT_KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut iv);

    let wrapped = public_key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), &key)
        .map_err(|e| CryptoError::Encrypt(e.to_string()))?;
    let wrapped_len = u32::try_from(wrapped.len())
        .map_err(|_| CryptoError::Encrypt("wrapped key too long".into()))?;

    let mut body = plaintext.to_vec();
    Aes256CfbEnc::new(&key.into(), &iv.into()).encrypt(&mut body);

    let mut out = Vec::with_capacity(PREFIX_LEN + wrapped.len() + IV_LEN + body.len());
    out.extend_from_slice(&wrapped_len.to_be_bytes());
    out.extend_from_slice(&wrapped);
    out.extend_from_slice(&iv);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Inverse of [`encrypt`].
///
/// # Errors
///
/// - [`CryptoError::MalformedLengthPrefix`] when the prefix is missing, zero or
///   points past the end of the input
/// - [`CryptoError::KeyUnwrap`] when the private key does not open the content key
/// - [`CryptoError::Truncated`] when the IV is incomplete
pub fn decrypt(data: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>, PadnextError> {
    let Some((prefix, rest)) = data.split_first_chunk::<PREFIX_LEN>() else {
        return Err(CryptoError::MalformedLengthPrefix {
            declared: 0,
            available: data.len(),
        }
        .into());
    };
    let declared = u32::from_be_bytes(*prefix) as usize;
    if declared == 0 || declared > rest.len() {
        return Err(CryptoError::MalformedLengthPrefix {
            declared,
            available: rest.len(),
        }
        .into());
    }
    let (wrapped, rest) = rest.split_at(declared);

    let key = private_key
        .decrypt(Oaep::new::<Sha256>(), wrapped)
        .map_err(|_| CryptoError::KeyUnwrap)?;
    let key: [u8; CONTENT_KEY_LEN] = key.try_into().map_err(|_| CryptoError::KeyUnwrap)?;

    let Some((iv, ciphertext)) = rest.split_first_chunk::<IV_LEN>() else {
        return Err(CryptoError::Truncated.into());
    };

    let mut body = ciphertext.to_vec();
    Aes256CfbDec::new(&key.into(), &(*iv).into()).decrypt(&mut body);
    Ok(body)
}

/// Encrypt the file at `input` into `output`.
pub fn encrypt_file(
    input: &Path,
    output: &Path,
    public_key: &RsaPublicKey,
) -> Result<(), PadnextError> {
    let plaintext = fs::read(input)?;
    fs::write(output, encrypt(&plaintext, public_key)?)?;
    tracing::debug!(input = %input.display(), output = %output.display(), "file encrypted");
    Ok(())
}

/// Decrypt the file at `input` into `output`.
pub fn decrypt_file(
    input: &Path,
    output: &Path,
    private_key: &RsaPrivateKey,
) -> Result<(), PadnextError> {
    let data = fs::read(input)?;
    fs::write(output, decrypt(&data, private_key)?)?;
    tracing::debug!(input = %input.display(), output = %output.display(), "file decrypted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static KEY: LazyLock<RsaPrivateKey> =
        LazyLock::new(|| RsaPrivateKey::new(&mut OsRng, 1024).unwrap());

    #[test]
    fn roundtrip() {
        let public = RsaPublicKey::from(&*KEY);
        let message = b"PADnext payload \x00\x01\x02 with binary bytes".repeat(50);
        let sealed = encrypt(&message, &public).unwrap();
        assert_ne!(&sealed[sealed.len() - message.len()..], &message[..]);
        assert_eq!(decrypt(&sealed, &KEY).unwrap(), message);
    }

    #[test]
    fn layout_prefix_matches_modulus_size() {
        let public = RsaPublicKey::from(&*KEY);
        let sealed = encrypt(b"abc", &public).unwrap();
        let declared = u32::from_be_bytes(sealed[..4].try_into().unwrap()) as usize;
        assert_eq!(declared, 128);
        assert_eq!(sealed.len(), 4 + 128 + IV_LEN + 3);
    }

    #[test]
    fn empty_plaintext() {
        let public = RsaPublicKey::from(&*KEY);
        let sealed = encrypt(b"", &public).unwrap();
        assert!(decrypt(&sealed, &KEY).unwrap().is_empty());
    }

    #[test]
    fn oversized_prefix_is_malformed() {
        let mut data = vec![0u8; 40];
        data[..4].copy_from_slice(&1000u32.to_be_bytes());
        let err = decrypt(&data, &KEY).unwrap_err();
        assert!(matches!(
            err,
            PadnextError::Crypto(CryptoError::MalformedLengthPrefix {
                declared: 1000,
                available: 36
            })
        ));
        assert!(matches!(
            decrypt(&[0, 0], &KEY).unwrap_err(),
            PadnextError::Crypto(CryptoError::MalformedLengthPrefix { .. })
        ));
    }

    #[test]
    fn missing_iv_is_truncated() {
        let public = RsaPublicKey::from(&*KEY);
        let sealed = encrypt(b"payload", &public).unwrap();
        let cut = &sealed[..4 + 128 + 5];
        assert!(matches!(
            decrypt(cut, &KEY).unwrap_err(),
            PadnextError::Crypto(CryptoError::Truncated)
        ));
    }

    #[test]
    fn garbage_wrapped_key_fails_unwrap() {
        let mut data = Vec::new();
        data.extend_from_slice(&128u32.to_be_bytes());
        data.extend_from_slice(&[0x5a; 128]);
        data.extend_from_slice(&[0u8; IV_LEN]);
        assert!(matches!(
            decrypt(&data, &KEY).unwrap_err(),
            PadnextError::Crypto(CryptoError::KeyUnwrap)
        ));
    }
}
