//! Runtime configuration: key sources and the receipt directory.
//!
//! Settings come from the process environment (or any lookup function in
//! tests) and are turned into [`KeySources`] and store handles here. The
//! core crates never read the environment.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wipecert_core::{load_private_key, load_public_key, KeySources, PrivateKey};
use wipecert_store::FileStore;

use crate::error::{Error, Result};
use crate::service::SubmissionService;

pub const ENV_PRIVATE_KEY_CONTENT: &str = "PRIVATE_KEY_CONTENT";
pub const ENV_PRIVATE_KEY_PATH: &str = "PRIVATE_KEY_PATH";
pub const ENV_PUBLIC_KEY_CONTENT: &str = "PUBKEY_CONTENT";
pub const ENV_PUBLIC_KEY_PATH: &str = "PUBKEY_PATH";
pub const ENV_RECEIPT_DIR: &str = "VERIFIER_OUT";

/// Receipt directory used when none is configured.
pub const DEFAULT_RECEIPT_DIR: &str = "./out/receipts";

/// Directory under `$HOME` holding the default key pair.
pub const KEY_DIR_NAME: &str = ".securewipe";

/// Resolved settings for signing, verification, and receipt storage.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// PEM private key supplied inline.
    pub private_key_content: Option<String>,
    pub private_key_path: Option<PathBuf>,
    /// PEM public key supplied inline.
    pub public_key_content: Option<String>,
    pub public_key_path: Option<PathBuf>,
    /// Where receipts are written.
    pub receipt_dir: PathBuf,
    /// Directory searched for `private.pem` / `public.pem` when nothing else resolves.
    pub key_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            private_key_content: None,
            private_key_path: None,
            public_key_content: None,
            public_key_path: None,
            receipt_dir: PathBuf::from(DEFAULT_RECEIPT_DIR),
            key_dir: None,
        }
    }
}

// Key content never reaches logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |c: &Option<String>| c.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("private_key_content", &redact(&self.private_key_content))
            .field("private_key_path", &self.private_key_path)
            .field("public_key_content", &redact(&self.public_key_content))
            .field("public_key_path", &self.public_key_path)
            .field("receipt_dir", &self.receipt_dir)
            .field("key_dir", &self.key_dir)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            private_key_content: get(ENV_PRIVATE_KEY_CONTENT),
            private_key_path: get(ENV_PRIVATE_KEY_PATH).map(PathBuf::from),
            public_key_content: get(ENV_PUBLIC_KEY_CONTENT),
            public_key_path: get(ENV_PUBLIC_KEY_PATH).map(PathBuf::from),
            receipt_dir: get(ENV_RECEIPT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RECEIPT_DIR)),
            key_dir: get("HOME").map(|home| PathBuf::from(home).join(KEY_DIR_NAME)),
        }
    }

    fn default_key(&self, file: &str) -> Option<PathBuf> {
        self.key_dir.as_ref().map(|dir| dir.join(file))
    }

    pub fn private_key_sources(&self) -> KeySources {
        KeySources {
            content: self.private_key_content.clone(),
            path: self.private_key_path.clone(),
            default_path: self.default_key("private.pem"),
        }
    }

    pub fn public_key_sources(&self) -> KeySources {
        KeySources {
            content: self.public_key_content.clone(),
            path: self.public_key_path.clone(),
            default_path: self.default_key("public.pem"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.receipt_dir.as_os_str().is_empty() {
            return Err(Error::Config("receipt directory must not be empty".into()));
        }
        Ok(())
    }

    /// Load the signing key.
    pub fn signing_key(&self) -> Result<PrivateKey> {
        Ok(load_private_key(&self.private_key_sources())?)
    }

    /// Load the verifying key and open the receipt directory.
    pub fn submission_service(&self) -> Result<SubmissionService<FileStore>> {
        self.validate()?;
        let public_key = load_public_key(&self.public_key_sources())?;
        let store = FileStore::open(&self.receipt_dir)?;
        Ok(SubmissionService::new(public_key, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;
    use wipecert_testkit::keys;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.receipt_dir, Path::new("./out/receipts"));
        assert!(config.public_key_sources().default_path.is_none());
    }

    #[test]
    fn test_home_supplies_default_key_paths() {
        let config = Config::from_lookup(lookup(&[("HOME", "/home/op")]));
        assert_eq!(
            config.private_key_sources().default_path.unwrap(),
            Path::new("/home/op/.securewipe/private.pem")
        );
        assert_eq!(
            config.public_key_sources().default_path.unwrap(),
            Path::new("/home/op/.securewipe/public.pem")
        );
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(lookup(&[
            ("PUBKEY_CONTENT", "-----BEGIN PUBLIC KEY-----"),
            ("PRIVATE_KEY_PATH", "/etc/wipe/signer.pem"),
            ("PRIVATE_KEY_CONTENT", "  "),
            ("VERIFIER_OUT", "/var/lib/receipts"),
        ]));
        assert!(config.private_key_content.is_none());
        assert_eq!(
            config.private_key_sources().path.unwrap(),
            Path::new("/etc/wipe/signer.pem")
        );
        assert!(config.public_key_sources().content.is_some());
        assert_eq!(config.receipt_dir, Path::new("/var/lib/receipts"));
    }

    #[test]
    fn test_debug_redacts_key_content() {
        let config = Config {
            private_key_content: Some(keys::SIGNER_PRIVATE_PEM.to_string()),
            ..Config::default()
        };
        let shown = format!("{:?}", config);
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains("PRIVATE KEY"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config =
            serde_json::from_str(r#"{"receipt_dir": "/srv/receipts"}"#).unwrap();
        assert_eq!(config.receipt_dir, Path::new("/srv/receipts"));
        assert!(config.key_dir.is_none());
    }

    #[tokio::test]
    async fn test_submission_service_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            public_key_content: Some(keys::SIGNER_PUBLIC_PEM.to_string()),
            receipt_dir: dir.path().join("receipts"),
            ..Config::default()
        };

        let service = config.submission_service().unwrap();
        assert!(dir.path().join("receipts").is_dir());
        assert_eq!(service.public_key().bits(), 2048);
    }

    #[test]
    fn test_missing_keys_are_fatal() {
        let config = Config::from_lookup(lookup(&[]));
        assert!(matches!(config.signing_key(), Err(Error::Key(_))));
    }

    #[test]
    fn test_empty_receipt_dir_rejected() {
        let config = Config {
            receipt_dir: PathBuf::new(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
