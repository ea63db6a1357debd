//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! [keys]
//! dir = "/etc/padnext/keys"
//! certificate_id = "AZH-2026-01"
//!
//! [packaging]
//! encrypt = true
//! payload_validation = "strict"
//! real_data = false
//!
//! [system]
//! product = "Praxis Office"
//! version = "4.2"
//! manufacturer = "Example Software GmbH"
//! ```
//!
//! Every section is optional; [`PadnextConfig::default`] is usable as is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{PadnextError, SystemInfo};
use crate::envelope::PemKeyStore;
use crate::schema::PayloadValidation;

const MAX_CONFIG_FILE_SIZE: u64 = 256 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PadnextConfig {
    pub keys: KeysConfig,
    pub packaging: PackagingConfig,
    pub system: SystemConfig,
}

/// `[keys]`: where PEM key files live and which certificate they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeysConfig {
    pub dir: Option<PathBuf>,
    pub certificate_id: Option<String>,
}

/// `[packaging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagingConfig {
    /// Encrypt the inner archive (procedure `1`).
    pub encrypt: bool,
    /// Parent for per-run scratch directories. System temp dir when unset.
    pub scratch_root: Option<PathBuf>,
    pub payload_validation: PayloadValidation,
    /// `@echtdaten` of outgoing manifests.
    pub real_data: bool,
    /// `nachrichtentyp/@version` of outgoing manifests.
    pub message_version: String,
    pub request_receipt: bool,
    pub receipt_email: Option<String>,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            encrypt: false,
            scratch_root: None,
            payload_validation: PayloadValidation::Strict,
            real_data: false,
            message_version: "2.12".into(),
            request_receipt: false,
            receipt_email: None,
        }
    }
}

/// `[system]`: identification of the sending software.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    pub product: String,
    pub version: String,
    pub manufacturer: String,
    pub certification_number: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            product: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            manufacturer: "padnext".into(),
            certification_number: None,
        }
    }
}

impl From<&SystemConfig> for SystemInfo {
    fn from(system: &SystemConfig) -> Self {
        SystemInfo {
            product: system.product.clone(),
            version: system.version.clone(),
            manufacturer: system.manufacturer.clone(),
            certification_number: system.certification_number.clone(),
        }
    }
}

impl PadnextConfig {
    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PadnextError> {
        let path = path.as_ref();
        let size = fs::metadata(path)
            .map_err(|e| PadnextError::Config(format!("{}: {e}", path.display())))?
            .len();
        if size > MAX_CONFIG_FILE_SIZE {
            return Err(PadnextError::Config(format!(
                "{} exceeds {MAX_CONFIG_FILE_SIZE} bytes",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| PadnextError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, PadnextError> {
        let config: Self =
            toml::from_str(content).map_err(|e| PadnextError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), PadnextError> {
        if self.packaging.encrypt {
            let id = self.keys.certificate_id.as_deref().map(str::trim);
            if matches!(id, None | Some("") | Some("0")) {
                return Err(PadnextError::Config(
                    "packaging.encrypt requires keys.certificate_id".into(),
                ));
            }
        }
        if let Some(id) = &self.keys.certificate_id
            && id.chars().count() > 128
        {
            return Err(PadnextError::Config(
                "keys.certificate_id is longer than 128 characters".into(),
            ));
        }

        check_len("system.product", &self.system.product, 40)?;
        check_len("system.version", &self.system.version, 20)?;
        check_len("system.manufacturer", &self.system.manufacturer, 40)?;
        if let Some(number) = &self.system.certification_number {
            check_len("system.certification_number", number, 20)?;
        }
        check_len("packaging.message_version", &self.packaging.message_version, 5)?;

        if let Some(root) = &self.packaging.scratch_root
            && root.as_os_str().is_empty()
        {
            return Err(PadnextError::Config("packaging.scratch_root is empty".into()));
        }
        Ok(())
    }

    pub fn system_info(&self) -> SystemInfo {
        SystemInfo::from(&self.system)
    }

    /// Open the PEM key store named by `[keys]`.
    pub fn key_store(&self) -> Result<PemKeyStore, PadnextError> {
        let dir = self
            .keys
            .dir
            .as_ref()
            .ok_or_else(|| PadnextError::Config("keys.dir is not set".into()))?;
        let id = self
            .keys
            .certificate_id
            .as_deref()
            .ok_or_else(|| PadnextError::Config("keys.certificate_id is not set".into()))?;
        PemKeyStore::open(dir, id)
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), PadnextError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(PadnextError::Config(format!(
            "{field} must be 1..{max} characters, got {len}"
        )));
    }
    Ok(())
}
