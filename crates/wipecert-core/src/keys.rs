//! Key loading from prioritized sources.
//!
//! Sources are tried in fixed order:
//! 1. key content supplied directly (e.g. from configuration)
//! 2. an explicitly given key file
//! 3. a default well-known path
//!
//! The first source that yields key bytes wins and later sources are never
//! consulted, even when those bytes then fail to parse.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::crypto::{PrivateKey, PublicKey};
use crate::error::KeyError;

/// Where to look for a key.
#[derive(Debug, Clone, Default)]
pub struct KeySources {
    /// PEM text supplied directly. Empty text counts as absent.
    pub content: Option<String>,
    /// An explicitly configured key file.
    pub path: Option<PathBuf>,
    /// The well-known fallback location.
    pub default_path: Option<PathBuf>,
}

impl KeySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, pem: impl Into<String>) -> Self {
        self.content = Some(pem.into());
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    /// Resolve the first available source to PEM text and a source name.
    fn resolve(&self, kind: &'static str) -> Result<(String, String), KeyError> {
        if let Some(pem) = self.content.as_deref().filter(|c| !c.trim().is_empty()) {
            return Ok((pem.to_string(), "inline content".to_string()));
        }

        for candidate in [self.path.as_deref(), self.default_path.as_deref()]
            .into_iter()
            .flatten()
        {
            if !candidate.exists() {
                debug!(kind, path = %candidate.display(), "key path does not exist, skipping");
                continue;
            }
            return read_pem(kind, candidate).map(|pem| (pem, candidate.display().to_string()));
        }

        Err(KeyError::NotFound {
            kind,
            detail: self.describe(),
        })
    }

    fn describe(&self) -> String {
        let mut checked = Vec::new();
        if self.content.is_some() {
            checked.push("inline content (empty)".to_string());
        }
        for path in [&self.path, &self.default_path].into_iter().flatten() {
            checked.push(path.display().to_string());
        }
        if checked.is_empty() {
            "no sources configured".to_string()
        } else {
            format!("checked {}", checked.join(", "))
        }
    }
}

fn read_pem(kind: &'static str, path: &Path) -> Result<String, KeyError> {
    let bytes = std::fs::read(path).map_err(|e| KeyError::NotFound {
        kind,
        detail: format!("{}: {}", path.display(), e),
    })?;
    String::from_utf8(bytes).map_err(|_| KeyError::Parse {
        kind,
        source_name: path.display().to_string(),
        reason: "key file is not UTF-8 PEM text".to_string(),
    })
}

/// Load the signing key from the first available source.
pub fn load_private_key(sources: &KeySources) -> Result<PrivateKey, KeyError> {
    let (pem, source_name) = sources.resolve("private")?;
    let key = PrivateKey::from_pem(&pem, &source_name)?;
    info!(source = %source_name, bits = key.bits(), "loaded private key");
    Ok(key)
}

/// Load the verifying key from the first available source.
pub fn load_public_key(sources: &KeySources) -> Result<PublicKey, KeyError> {
    let (pem, source_name) = sources.resolve("public")?;
    let key = PublicKey::from_pem(&pem, &source_name)?;
    info!(
        source = %source_name,
        bits = key.bits(),
        fingerprint = key.fingerprint(),
        "loaded public key"
    );
    Ok(key)
}
