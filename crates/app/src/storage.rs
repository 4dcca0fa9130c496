//! On-device persistence.
//!
//! Customer profile and saved addresses live in small JSON files under the
//! app data directory, so a returning customer does not retype contact
//! details. Corrupt files degrade to "nothing saved" rather than blocking
//! checkout.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;
use vitrine::profile::{CustomerProfile, SavedAddress};

const PROFILE_FILE: &str = "customer-profile.json";
const ADDRESSES_FILE: &str = "saved-addresses.json";

/// Errors from the on-device profile store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("profile storage i/o error")]
    Io(#[from] std::io::Error),

    #[error("could not encode profile data")]
    Encode(#[from] serde_json::Error),
}

/// File-backed store for the customer profile and saved addresses.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The saved profile, or `None` when absent or unreadable.
    pub fn load_profile(&self) -> Option<CustomerProfile> {
        read_json(&self.dir.join(PROFILE_FILE))
    }

    /// Persist the profile for later checkouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or file cannot be written.
    pub fn save_profile(&self, profile: &CustomerProfile) -> Result<(), StorageError> {
        write_json(&self.dir, PROFILE_FILE, profile)
    }

    /// Forget the saved profile. Missing files are fine.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub fn clear_profile(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.dir.join(PROFILE_FILE)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    /// Addresses saved for quick reuse; empty when none are stored.
    pub fn load_addresses(&self) -> Vec<SavedAddress> {
        read_json(&self.dir.join(ADDRESSES_FILE)).unwrap_or_default()
    }

    /// Replace the saved address list.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or file cannot be written.
    pub fn save_addresses(&self, addresses: &[SavedAddress]) -> Result<(), StorageError> {
        write_json(&self.dir, ADDRESSES_FILE, &addresses)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => return None,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "could not read profile data");
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "discarding corrupt profile data");
            None
        }
    }
}

fn write_json<T: serde::Serialize>(dir: &Path, file: &str, value: &T) -> Result<(), StorageError> {
    fs::create_dir_all(dir)?;

    let contents = serde_json::to_string_pretty(value)?;
    fs::write(dir.join(file), contents)?;

    Ok(())
}
