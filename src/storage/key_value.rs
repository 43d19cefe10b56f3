use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Operaciones de almacenamiento clave-valor (valores JSON como texto)
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Leer y deserializar una clave. Cualquier fallo se registra y se trata
/// como ausencia de valor.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                log::debug!("📥 Configuración cargada para clave: {}", key);
                Some(value)
            }
            Err(e) => {
                log::warn!("⚠️ No se pudo interpretar la clave \"{}\": {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("⚠️ Error leyendo la clave \"{}\": {}", key, e);
            None
        }
    }
}

/// Serializar y guardar una clave. Best-effort: los fallos sólo se registran.
pub fn persist_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|raw| store.set(key, &raw));

    match result {
        Ok(()) => log::debug!("💾 Configuración guardada para clave: {}", key),
        Err(e) => log::warn!("⚠️ No se pudo persistir la clave \"{}\": {}", key, e),
    }
}

/// Eliminar una clave. Best-effort.
pub fn remove_key(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        log::warn!("⚠️ No se pudo eliminar la clave \"{}\": {}", key, e);
    }
}

/// Almacenamiento en memoria, sin durabilidad
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Almacenamiento en disco: un archivo `<clave>.json` por clave
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        base_url: String,
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryKeyValueStore::new();
        let value = Sample { base_url: "http://tracker:8082".into() };

        persist_json(&store, "traccarConfig", &value);
        assert_eq!(load_json::<Sample>(&store, "traccarConfig"), Some(value));

        remove_key(&store, "traccarConfig");
        assert_eq!(load_json::<Sample>(&store, "traccarConfig"), None);
    }

    #[test]
    fn test_garbled_value_loads_as_none() {
        let store = MemoryKeyValueStore::new();
        store.set("mapConfig", "{not json").unwrap();
        assert_eq!(load_json::<Sample>(&store, "mapConfig"), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path()).unwrap();

        assert_eq!(store.get("mapConfig").unwrap(), None);
        store.set("mapConfig", "{\"provider\":\"google\"}").unwrap();
        assert!(dir.path().join("mapConfig.json").exists());
        assert_eq!(
            store.get("mapConfig").unwrap().as_deref(),
            Some("{\"provider\":\"google\"}")
        );

        store.remove("mapConfig").unwrap();
        store.remove("mapConfig").unwrap();
        assert_eq!(store.get("mapConfig").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileKeyValueStore::new(dir.path())
            .unwrap()
            .set("traccarConfig", "{}")
            .unwrap();

        let reopened = FileKeyValueStore::new(dir.path()).unwrap();
        assert_eq!(reopened.get("traccarConfig").unwrap().as_deref(), Some("{}"));
    }
}
