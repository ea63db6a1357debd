//! Inbound and outbound transfer orchestration.
//!
//! Inbound ([`Packager::unpack`]):
//!
//! | Stage | Work |
//! |-------|------|
//! | `read_manifest` | open the transfer zip, validate and parse `*_auf.xml` |
//! | `determine_encryption` | branch on `verfahren` `0` or `1` |
//! | `unpack_plain` / `decrypt_then_unpack` | open the inner archive |
//! | `validate_payload` | schema and model checks of `*_padx.xml` |
//! | `match_filenames` | manifest and payload share one batch stem |
//! | `verify_file_list` | presence, count, length and SHA-1 of every file |
//! | `materialize` | hand the verified batch to the caller |
//!
//! Outbound ([`Packager::pack`]) runs `build_model`, `serialize`,
//! `checksum_files`, `compress_files`, `encrypt_payload` or
//! `skip_encryption`, `write_manifest`, `assemble_archive` and `cleanup`.
//!
//! Every run works in its own scratch directory and logs one `tracing`
//! event per stage inside an `unpack` or `pack` span. A failed run leaves
//! nothing behind.

mod pack;
mod scratch;
mod unpack;

pub use pack::{PackRequest, PackedArchive, RepackOptions};
pub use unpack::{Delivery, UnpackedBatch};

use crate::config::PadnextConfig;
use crate::core::PadnextError;
use crate::envelope::{KeyProvider, PemKeyStore};

/// Packs and unpacks PADnext transfer archives with one key provider and
/// one configuration.
#[derive(Debug)]
pub struct Packager<K> {
    keys: K,
    config: PadnextConfig,
}

impl<K: KeyProvider> Packager<K> {
    pub fn new(keys: K, config: PadnextConfig) -> Self {
        Self { keys, config }
    }

    pub fn config(&self) -> &PadnextConfig {
        &self.config
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }
}

impl Packager<PemKeyStore> {
    /// Packager whose keys come from the `[keys]` section.
    pub fn from_config(config: PadnextConfig) -> Result<Self, PadnextError> {
        let keys = config.key_store()?;
        Ok(Self::new(keys, config))
    }
}
