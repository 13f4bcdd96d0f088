//! Operator commands over encrypted stores.

use crate::config::StoreConfig;
use envelope::{Certificate, CryptoError};
use file::errors::FileError;
use file::header::{FileHeader, HEADER_SIZE};
use std::fs;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage_api::index_storage::{IndexStorage, StoreError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(String),
    #[error("I/O error on {path}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Key file {path} is not usable")]
    Key {
        path: PathBuf,
        source: CryptoError,
    },
    #[error("No key file configured that can {purpose}")]
    MissingKey { purpose: &'static str },
    #[error("Store {path} already holds {length} bytes")]
    StoreNotEmpty { path: PathBuf, length: u64 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    File(#[from] FileError),
}

/// A parsed command line, without the config path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Writes a new private key to the path and its public key next to it with a `.pub` suffix.
    Keygen { out: PathBuf },
    /// Prints the plaintext header of a store. Needs no key.
    Inspect { store: PathBuf },
    /// Copies a plain file into a new store.
    Import { plain: PathBuf, store: PathBuf },
    /// Decrypts a whole store into a plain file.
    Export { store: PathBuf, plain: PathBuf },
}

pub const USAGE: &str = "pagevault <config> (keygen <out> | inspect <store> | import <plain> <store> | export <store> <plain>)";

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CommandError> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["keygen", out] => Ok(Command::Keygen { out: out.into() }),
            ["inspect", store] => Ok(Command::Inspect {
                store: store.into(),
            }),
            ["import", plain, store] => Ok(Command::Import {
                plain: plain.into(),
                store: store.into(),
            }),
            ["export", store, plain] => Ok(Command::Export {
                store: store.into(),
                plain: plain.into(),
            }),
            _ => Err(CommandError::Usage(USAGE.to_string())),
        }
    }

    pub fn run(&self, config: &StoreConfig) -> Result<(), CommandError> {
        match self {
            Command::Keygen { out } => keygen(out),
            Command::Inspect { store } => {
                let report = inspect(store, config)?;
                println!("{report}");
                Ok(())
            }
            Command::Import { plain, store } => {
                let written = import(plain, store, config)?;
                println!("imported {written} bytes into {}", store.display());
                Ok(())
            }
            Command::Export { store, plain } => {
                let read = export(store, plain, config)?;
                println!("exported {read} bytes to {}", plain.display());
                Ok(())
            }
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CommandError + '_ {
    move |source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn public_key_path(out: &Path) -> PathBuf {
    let mut name = out.as_os_str().to_owned();
    name.push(".pub");
    PathBuf::from(name)
}

/// Generates a key pair and writes both halves as raw bytes.
pub fn keygen(out: &Path) -> Result<(), CommandError> {
    let certificate = Certificate::generate();
    let secret = certificate
        .secret_key_bytes()
        .ok_or(CommandError::MissingKey { purpose: "decrypt" })?;
    let public_path = public_key_path(out);

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    write_private_key(out, secret.as_slice()).map_err(io_error(out))?;
    fs::write(&public_path, certificate.public_key_bytes()).map_err(io_error(&public_path))?;

    info!(
        key = %out.display(),
        public_key = %public_path.display(),
        fingerprint = %certificate.fingerprint(),
        "key pair generated"
    );
    Ok(())
}

/// Creates the private key file readable by its owner only (on unix).
fn write_private_key(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Loads the configured certificate. Reading needs the private key file; writing falls back to
/// the public key file.
pub fn load_certificate(
    config: &StoreConfig,
    needs_private_key: bool,
) -> Result<Certificate, CommandError> {
    if let Some(path) = &config.key_file {
        let bytes = fs::read(path).map_err(io_error(path))?;
        return Certificate::secret_from_slice(&bytes).map_err(|source| CommandError::Key {
            path: path.clone(),
            source,
        });
    }
    if needs_private_key {
        return Err(CommandError::MissingKey { purpose: "decrypt" });
    }
    match &config.public_key_file {
        Some(path) => {
            let bytes = fs::read(path).map_err(io_error(path))?;
            Certificate::public_from_slice(&bytes).map_err(|source| CommandError::Key {
                path: path.clone(),
                source,
            })
        }
        None => Err(CommandError::MissingKey { purpose: "encrypt" }),
    }
}

/// Header fields and slot usage of a store, read without decrypting anything.
pub fn inspect(store: &Path, config: &StoreConfig) -> Result<String, CommandError> {
    let file = File::open(store).map_err(io_error(store))?;
    let header = FileHeader::read_from(&file)?;
    let physical = file.metadata().map_err(io_error(store))?.len();
    let layout = config.options().layout();
    let slots = physical.saturating_sub(HEADER_SIZE as u64).div_ceil(layout.stride());

    Ok(format!(
        "{}: version {}, logical length {} bytes, {} bytes on disk, {} page slots of {} bytes",
        store.display(),
        header.version,
        header.logical_length,
        physical,
        slots,
        layout.stride()
    ))
}

/// Copies `plain` into a new or empty store. Returns the number of bytes written.
pub fn import(plain: &Path, store: &Path, config: &StoreConfig) -> Result<u64, CommandError> {
    let certificate = load_certificate(config, false)?;
    let storage = IndexStorage::new(config.options(), Arc::new(certificate));

    let mut source = File::open(plain).map_err(io_error(plain))?;
    let mut output = storage.open_output(store)?;
    if output.length() > 0 {
        return Err(CommandError::StoreNotEmpty {
            path: store.to_path_buf(),
            length: output.length(),
        });
    }

    let written = io::copy(&mut source, &mut output).map_err(io_error(store))?;
    output.close()?;
    info!(plain = %plain.display(), store = %store.display(), written, "store imported");
    Ok(written)
}

/// Decrypts `store` into `plain`. Returns the number of bytes read.
pub fn export(store: &Path, plain: &Path, config: &StoreConfig) -> Result<u64, CommandError> {
    let certificate = load_certificate(config, true)?;
    let storage = IndexStorage::new(config.options(), Arc::new(certificate));

    let mut input = storage.open_input(store)?;
    let mut target = File::create(plain).map_err(io_error(plain))?;
    let read = io::copy(&mut input, &mut target).map_err(io_error(store))?;
    target.sync_all().map_err(io_error(plain))?;
    input.close()?;
    info!(store = %store.display(), plain = %plain.display(), read, "store exported");
    Ok(read)
}
