use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::core::{CryptoError, PadnextError};

/// File name of the recipient's public key inside a key directory.
pub const PUBLIC_KEY_FILE: &str = "public_key.pem";
/// File name of the recipient's private key inside a key directory.
pub const PRIVATE_KEY_FILE: &str = "private_key.pem";

/// Source of RSA keys, addressed by the `idcert` of the order manifest.
///
/// Senders need [`public_key`](KeyProvider::public_key); receivers need
/// [`private_key`](KeyProvider::private_key). A provider may hold only one of them.
pub trait KeyProvider {
    /// Certificate id written to `verschluesselung/@idcert` when encrypting.
    fn certificate_id(&self) -> &str;

    fn public_key(&self, certificate_id: &str) -> Result<&RsaPublicKey, PadnextError>;

    fn private_key(&self, certificate_id: &str) -> Result<&RsaPrivateKey, PadnextError>;
}

impl<K: KeyProvider + ?Sized> KeyProvider for &K {
    fn certificate_id(&self) -> &str {
        (**self).certificate_id()
    }

    fn public_key(&self, certificate_id: &str) -> Result<&RsaPublicKey, PadnextError> {
        (**self).public_key(certificate_id)
    }

    fn private_key(&self, certificate_id: &str) -> Result<&RsaPrivateKey, PadnextError> {
        (**self).private_key(certificate_id)
    }
}

/// Provider for plain transfers (procedure `0`): every key lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeys;

impl KeyProvider for NoKeys {
    fn certificate_id(&self) -> &str {
        "0"
    }

    fn public_key(&self, certificate_id: &str) -> Result<&RsaPublicKey, PadnextError> {
        Err(CryptoError::KeyUnavailable(certificate_id.to_string()).into())
    }

    fn private_key(&self, certificate_id: &str) -> Result<&RsaPrivateKey, PadnextError> {
        Err(CryptoError::KeyUnavailable(certificate_id.to_string()).into())
    }
}

/// Keys held in memory for a single certificate id.
pub struct InMemoryKeys {
    certificate_id: String,
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
}

impl InMemoryKeys {
    /// Generate a fresh key pair of `bits` modulus size.
    pub fn generate(certificate_id: impl Into<String>, bits: usize) -> Result<Self, PadnextError> {
        let private = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::Encrypt(format!("key generation failed: {e}")))?;
        Ok(Self::from_private_key(certificate_id, private))
    }

    pub fn from_private_key(certificate_id: impl Into<String>, private: RsaPrivateKey) -> Self {
        Self {
            certificate_id: certificate_id.into(),
            public: RsaPublicKey::from(&private),
            private: Some(private),
        }
    }

    /// Sender-side provider that can encrypt but not decrypt.
    pub fn public_only(certificate_id: impl Into<String>, public: RsaPublicKey) -> Self {
        Self {
            certificate_id: certificate_id.into(),
            public,
            private: None,
        }
    }
}

impl KeyProvider for InMemoryKeys {
    fn certificate_id(&self) -> &str {
        &self.certificate_id
    }

    fn public_key(&self, certificate_id: &str) -> Result<&RsaPublicKey, PadnextError> {
        if certificate_id != self.certificate_id {
            return Err(CryptoError::KeyUnavailable(certificate_id.to_string()).into());
        }
        Ok(&self.public)
    }

    fn private_key(&self, certificate_id: &str) -> Result<&RsaPrivateKey, PadnextError> {
        if certificate_id != self.certificate_id {
            return Err(CryptoError::KeyUnavailable(certificate_id.to_string()).into());
        }
        self.private
            .as_ref()
            .ok_or_else(|| CryptoError::KeyUnavailable(certificate_id.to_string()).into())
    }
}

impl std::fmt::Debug for InMemoryKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeys")
            .field("certificate_id", &self.certificate_id)
            .field("has_private_key", &self.private.is_some())
            .finish_non_exhaustive()
    }
}

/// PEM key pair loaded from a directory holding `public_key.pem` and/or
/// `private_key.pem`.
///
/// Public keys may be SPKI or PKCS#1, private keys PKCS#8 or PKCS#1.
pub struct PemKeyStore {
    dir: PathBuf,
    certificate_id: String,
    public: Option<RsaPublicKey>,
    private: Option<RsaPrivateKey>,
}

impl PemKeyStore {
    /// Load whatever key files exist in `dir`. At least one must be present.
    pub fn open(dir: impl AsRef<Path>, certificate_id: impl Into<String>) -> Result<Self, PadnextError> {
        let dir = dir.as_ref().to_path_buf();
        let certificate_id = certificate_id.into();

        let private = match read_optional(&dir.join(PRIVATE_KEY_FILE))? {
            Some(pem) => Some(parse_private_key(&pem)?),
            None => None,
        };
        let public = match read_optional(&dir.join(PUBLIC_KEY_FILE))? {
            Some(pem) => Some(parse_public_key(&pem)?),
            None => private.as_ref().map(RsaPublicKey::from),
        };
        if public.is_none() {
            return Err(CryptoError::KeyUnavailable(certificate_id).into());
        }

        tracing::debug!(
            dir = %dir.display(),
            certificate_id = %certificate_id,
            has_private_key = private.is_some(),
            "key store opened"
        );
        Ok(Self {
            dir,
            certificate_id,
            public,
            private,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyProvider for PemKeyStore {
    fn certificate_id(&self) -> &str {
        &self.certificate_id
    }

    fn public_key(&self, certificate_id: &str) -> Result<&RsaPublicKey, PadnextError> {
        if certificate_id != self.certificate_id {
            return Err(CryptoError::KeyUnavailable(certificate_id.to_string()).into());
        }
        self.public
            .as_ref()
            .ok_or_else(|| CryptoError::KeyUnavailable(certificate_id.to_string()).into())
    }

    fn private_key(&self, certificate_id: &str) -> Result<&RsaPrivateKey, PadnextError> {
        if certificate_id != self.certificate_id {
            return Err(CryptoError::KeyUnavailable(certificate_id.to_string()).into());
        }
        self.private
            .as_ref()
            .ok_or_else(|| CryptoError::KeyUnavailable(certificate_id.to_string()).into())
    }
}

impl std::fmt::Debug for PemKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PemKeyStore")
            .field("dir", &self.dir)
            .field("certificate_id", &self.certificate_id)
            .field("has_private_key", &self.private.is_some())
            .finish_non_exhaustive()
    }
}

/// Generate an RSA key pair and write `private_key.pem` (PKCS#8) and
/// `public_key.pem` (SPKI) into `dir`.
pub fn generate_key_pair(dir: &Path, bits: usize) -> Result<RsaPrivateKey, PadnextError> {
    fs::create_dir_all(dir)?;
    let private = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| CryptoError::Encrypt(format!("key generation failed: {e}")))?;
    let public = RsaPublicKey::from(&private);

    let private_pem = private
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| CryptoError::Encrypt(format!("private key encoding failed: {e}")))?;
    let public_pem = public
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::Encrypt(format!("public key encoding failed: {e}")))?;

    let private_path = dir.join(PRIVATE_KEY_FILE);
    fs::write(&private_path, private_pem.as_bytes())?;
    restrict_permissions(&private_path)?;
    fs::write(dir.join(PUBLIC_KEY_FILE), public_pem.as_bytes())?;

    tracing::info!(dir = %dir.display(), bits, "key pair generated");
    Ok(private)
}

fn parse_public_key(pem: &str) -> Result<RsaPublicKey, PadnextError> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|_| CryptoError::KeyUnavailable(format!("unreadable {PUBLIC_KEY_FILE}")).into())
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, PadnextError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|_| CryptoError::KeyUnavailable(format!("unreadable {PRIVATE_KEY_FILE}")).into())
}

fn read_optional(path: &Path) -> Result<Option<String>, PadnextError> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PadnextError::Io(format!("{}: {e}", path.display()))),
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), PadnextError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), PadnextError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};

    #[test]
    fn generated_pair_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let private = generate_key_pair(dir.path(), 1024).unwrap();
        let store = PemKeyStore::open(dir.path(), "cert-01").unwrap();
        assert_eq!(store.certificate_id(), "cert-01");
        assert_eq!(store.private_key("cert-01").unwrap(), &private);
        assert_eq!(store.public_key("cert-01").unwrap(), &RsaPublicKey::from(&private));
    }

    #[test]
    fn pkcs1_files_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let private = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
        let public = RsaPublicKey::from(&private);
        fs::write(
            dir.path().join(PRIVATE_KEY_FILE),
            private.to_pkcs1_pem(LineEnding::LF).unwrap().as_bytes(),
        )
        .unwrap();
        fs::write(
            dir.path().join(PUBLIC_KEY_FILE),
            public.to_pkcs1_pem(LineEnding::LF).unwrap(),
        )
        .unwrap();
        let store = PemKeyStore::open(dir.path(), "x").unwrap();
        assert_eq!(store.public_key("x").unwrap(), &public);
    }

    #[test]
    fn public_only_store_cannot_decrypt() {
        let dir = tempfile::tempdir().unwrap();
        generate_key_pair(dir.path(), 1024).unwrap();
        fs::remove_file(dir.path().join(PRIVATE_KEY_FILE)).unwrap();
        let store = PemKeyStore::open(dir.path(), "cert").unwrap();
        assert!(store.public_key("cert").is_ok());
        assert!(matches!(
            store.private_key("cert").unwrap_err(),
            PadnextError::Crypto(CryptoError::KeyUnavailable(_))
        ));
    }

    #[test]
    fn unknown_certificate_id() {
        let keys = InMemoryKeys::generate("a", 1024).unwrap();
        assert!(keys.public_key("a").is_ok());
        assert!(matches!(
            keys.public_key("b").unwrap_err(),
            PadnextError::Crypto(CryptoError::KeyUnavailable(ref id)) if id == "b"
        ));
    }

    #[test]
    fn empty_directory_has_no_keys() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PemKeyStore::open(dir.path(), "cert").is_err());
    }

    #[test]
    fn debug_output_hides_key_material() {
        let keys = InMemoryKeys::generate("cert", 1024).unwrap();
        let shown = format!("{keys:?}");
        assert!(shown.contains("has_private_key: true"));
        assert!(!shown.contains("RsaPrivateKey"));
    }
}
