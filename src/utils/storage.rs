// ============================================================================
// STORAGE - Persistencia local (localStorage) detrás de un trait
// ============================================================================

use gloo_storage::{LocalStorage, Storage};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("localStorage is not available")]
    Unavailable,
    #[error("could not write key {0}")]
    Write(String),
    #[error("could not remove key {0}")]
    Remove(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Almacenamiento clave/valor de texto plano
pub trait CredentialStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub fn save_json<T: Serialize>(
    storage: &dyn CredentialStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.set(key, &json)
}

/// JSON corrupto se trata como ausente
pub fn load_json<T: DeserializeOwned>(storage: &dyn CredentialStorage, key: &str) -> Option<T> {
    let json = storage.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ [STORAGE] Valor inválido en '{}': {}", key, e);
            None
        }
    }
}

/// localStorage del navegador vía gloo-storage
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn raw() -> Option<web_sys::Storage> {
        // LocalStorage::raw() hace panic si no hay window
        web_sys::window()?;
        Some(LocalStorage::raw())
    }
}

impl CredentialStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::raw()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::raw()
            .ok_or(StorageError::Unavailable)?
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::raw()
            .ok_or(StorageError::Unavailable)?
            .remove_item(key)
            .map_err(|_| StorageError::Remove(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStorage;
    use std::collections::BTreeMap;

    #[test]
    fn json_values_survive_storage() {
        let storage = MemoryStorage::new();
        let value = BTreeMap::from([("role".to_string(), "admin".to_string())]);

        save_json(storage.as_ref(), "profile", &value).expect("saved");

        assert_eq!(load_json::<BTreeMap<String, String>>(storage.as_ref(), "profile"), Some(value));
        assert_eq!(load_json::<BTreeMap<String, String>>(storage.as_ref(), "missing"), None);
    }
}
