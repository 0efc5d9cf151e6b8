//! Flash-backed [`StoragePort`].
//!
//! The only value kept across reboots is the selected speed (see
//! `app::persistence`).  On the target each call opens the namespace on the
//! default NVS partition through `esp-idf-svc`; `set_raw` commits before
//! returning, so a write is all-or-nothing.  Host builds keep values in a
//! map keyed by `namespace::key`.

use log::info;

use crate::app::ports::{StorageError, StoragePort};
use crate::error::Error;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvs, EspDefaultNvsPartition};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    EspError, ESP_ERR_NVS_INVALID_LENGTH, ESP_ERR_NVS_NOT_ENOUGH_SPACE, ESP_ERR_NVS_NOT_FOUND,
};
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

pub struct NvsAdapter {
    #[cfg(target_os = "espidf")]
    partition: EspDefaultNvsPartition,
    #[cfg(not(target_os = "espidf"))]
    values: HashMap<String, Vec<u8>>,
}

#[cfg(target_os = "espidf")]
fn storage_error(e: EspError) -> StorageError {
    let code = e.code();
    if code == ESP_ERR_NVS_NOT_FOUND as i32 {
        StorageError::NotFound
    } else if code == ESP_ERR_NVS_INVALID_LENGTH as i32 {
        StorageError::TooLong
    } else if code == ESP_ERR_NVS_NOT_ENOUGH_SPACE as i32 {
        StorageError::Full
    } else {
        StorageError::IoError
    }
}

impl NvsAdapter {
    /// Take the default NVS partition.  A partition left by an older IDF
    /// or with no free pages is erased and re-initialised by `esp-idf-svc`.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, Error> {
        let partition = EspDefaultNvsPartition::take().map_err(|e| {
            warn!("nvs: partition unavailable ({e})");
            Error::Storage(StorageError::IoError)
        })?;
        info!("nvs: default partition ready");
        Ok(Self { partition })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, Error> {
        info!("nvs(sim): in-memory store");
        Ok(Self {
            values: HashMap::new(),
        })
    }

    #[cfg(target_os = "espidf")]
    fn open(&self, namespace: &str, read_write: bool) -> Result<EspDefaultNvs, StorageError> {
        EspDefaultNvs::new(self.partition.clone(), namespace, read_write).map_err(storage_error)
    }
}

#[cfg(target_os = "espidf")]
impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let nvs = self.open(namespace, false)?;
        match nvs.get_raw(key, buf) {
            Ok(Some(value)) => Ok(value.len()),
            Ok(None) => Err(StorageError::NotFound),
            Err(e) => {
                let err = storage_error(e);
                if err != StorageError::TooLong {
                    warn!("nvs: read {namespace}::{key} failed ({e})");
                }
                Err(err)
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let mut nvs = self.open(namespace, true)?;
        nvs.set_raw(key, data).map(|_| ()).map_err(|e| {
            warn!("nvs: write {namespace}::{key} failed ({e})");
            storage_error(e)
        })
    }
}

#[cfg(not(target_os = "espidf"))]
impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let value = self
            .values
            .get(&format!("{namespace}::{key}"))
            .ok_or(StorageError::NotFound)?;
        // Same contract as NVS: a short buffer is an error, not a prefix.
        let dst = buf.get_mut(..value.len()).ok_or(StorageError::TooLong)?;
        dst.copy_from_slice(value);
        Ok(value.len())
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.values.insert(format!("{namespace}::{key}"), data.to_vec());
        Ok(())
    }
}
