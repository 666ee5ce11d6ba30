// src/storage.rs
//
// Almacenamiento clave/valor donde se guardan los blobs de progreso y ajustes.

use std::collections::HashMap;

use crate::error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Backend de persistencia: cada clave guarda un documento serializado completo.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// En memoria. Lo usan los tests y el modo degradado cuando no hay backend real.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Un fichero `<clave>.json` por clave dentro del directorio de datos.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn open(dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Escribe en temporal y renombra
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `window.localStorage` del navegador.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        // En modo privado local_storage() puede lanzar o devolver None
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Web(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Web(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Web(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Web(format!("{e:?}")))
    }
}

/// Abre el backend de la plataforma; si falla, sigue en memoria.
/// Devuelve además si el backend real está disponible.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_platform_store(config: &crate::config::AppConfig) -> (Box<dyn KeyValueStore>, bool) {
    match FileStore::open(&config.data_dir) {
        Ok(store) => {
            log::info!("Progress stored in {}", config.data_dir.display());
            (Box::new(store), true)
        }
        Err(e) => {
            log::warn!("Falling back to in-memory storage: {e}");
            (Box::new(MemoryStore::new()), false)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn open_platform_store(_config: &crate::config::AppConfig) -> (Box<dyn KeyValueStore>, bool) {
    match LocalStorage::open() {
        Ok(store) => (Box::new(store), true),
        Err(e) => {
            log::warn!("Falling back to in-memory storage: {e}");
            (Box::new(MemoryStore::new()), false)
        }
    }
}
