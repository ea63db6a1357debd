//! Transfer envelope: hybrid encryption, zip containers and key material.
//!
//! Encrypted inner archives (procedure `1`) use this layout:
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 4 | big-endian length `n` of the wrapped key |
//! | n | AES-256 key wrapped with RSA-OAEP (SHA-256, MGF1-SHA-256) |
//! | 16 | CFB initialization vector |
//! | rest | AES-256-CFB ciphertext of the inner zip |

mod archive;
mod crypto;
mod keys;

pub use archive::{compress_files, extract_zip};
pub use crypto::{CONTENT_KEY_LEN, IV_LEN, decrypt, decrypt_file, encrypt, encrypt_file};
pub use keys::{
    InMemoryKeys, KeyProvider, NoKeys, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE, PemKeyStore, generate_key_pair,
};
pub use rsa::{RsaPrivateKey, RsaPublicKey};
