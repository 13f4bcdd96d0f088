use file::layout::DEFAULT_SLOT_ALLOWANCE;
use serde::Deserialize;
use std::path::PathBuf;
use std::{num::NonZeroUsize, path::Path};
use storage_api::index_storage::StoreOptions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot parse config file {path}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config: {message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagevaultConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub page_size: NonZeroUsize,
    #[serde(default = "default_slot_allowance")]
    pub slot_allowance: usize,
    /// Raw 32-byte private key. Needed to read stores.
    pub key_file: Option<PathBuf>,
    /// Raw 32-byte public key. Enough to write stores.
    pub public_key_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub logs_dir: PathBuf,
}

fn default_slot_allowance() -> usize {
    DEFAULT_SLOT_ALLOWANCE
}

impl StoreConfig {
    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            page_size: self.page_size,
            slot_allowance: self.slot_allowance,
        }
    }
}

impl PagevaultConfig {
    /// Loads and validates a config file. Relative key paths are resolved against the directory
    /// holding the config file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut cfg: PagevaultConfig =
            toml::from_str(&text).map_err(|e| ConfigError::ParseToml {
                path: path.clone(),
                source: e,
            })?;

        if let Some(base) = path.parent() {
            cfg.resolve_key_paths(base);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn resolve_key_paths(&mut self, base: &Path) {
        for key in [&mut self.store.key_file, &mut self.store.public_key_file]
            .into_iter()
            .flatten()
        {
            if key.is_relative() {
                *key = base.join(&*key);
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // page_size is already NonZeroUsize, so "0" can't happen.
        // Key files are optional; commands that need one fail when loading the certificate.
        if self.logging.logs_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: "logging.logs_dir must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
