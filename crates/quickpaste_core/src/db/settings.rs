//! Settings storage, kept as JSON so stored objects merge over defaults.

use crate::{
    constants::SETTINGS_KEY,
    db::tables::STORAGE_AREA,
    error::AppError,
    models::settings::{Settings, SettingsPatch},
};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for the `settings` value in the storage area.
pub struct SettingsDb {
    db: Arc<redb::Database>,
}

fn decode_settings(bytes: Option<&[u8]>) -> Settings {
    let Some(bytes) = bytes else {
        return Settings::default();
    };
    match serde_json::from_slice(bytes) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Stored settings are unreadable, using defaults: {}", err);
            Settings::default()
        }
    }
}

impl SettingsDb {
    pub(crate) fn new(db: Arc<redb::Database>) -> Self {
        Self { db }
    }

    /// Load settings; missing or unreadable values fall back to defaults.
    ///
    /// # Errors
    /// Returns an error only when storage access fails.
    pub fn get(&self) -> Result<Settings, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORAGE_AREA)?;
        let guard = table.get(SETTINGS_KEY)?;
        Ok(decode_settings(guard.as_ref().map(|value| value.value())))
    }

    /// Persist the full settings object.
    ///
    /// # Errors
    /// Returns an error when encoding or the write fails.
    pub fn put(&self, settings: &Settings) -> Result<(), AppError> {
        let encoded = serde_json::to_vec(settings)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STORAGE_AREA)?;
            table.insert(SETTINGS_KEY, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Merge `patch` into the stored settings and persist the result.
    ///
    /// # Returns
    /// The merged settings.
    ///
    /// # Errors
    /// Returns an error when the read or the write fails.
    pub fn update(&self, patch: SettingsPatch) -> Result<Settings, AppError> {
        let write_txn = self.db.begin_write()?;
        let merged = {
            let mut table = write_txn.open_table(STORAGE_AREA)?;
            let current = table.get(SETTINGS_KEY)?.map(|value| value.value().to_vec());
            let merged = decode_settings(current.as_deref()).merged(patch);
            let encoded = serde_json::to_vec(&merged)?;
            table.insert(SETTINGS_KEY, encoded.as_slice())?;
            merged
        };
        write_txn.commit()?;
        Ok(merged)
    }
}
