use crate::error::StoreError;
use crate::mapping::MappingStore;
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage for the mapping document.
pub trait MappingPersistence {
    /// Reads the stored document. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<MappingStore>, StoreError>;

    fn save(&self, store: &MappingStore) -> Result<(), StoreError>;
}

/// Keeps the mapping document as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl MappingPersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<MappingStore>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => MappingStore::from_json(&json).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, store: &MappingStore) -> Result<(), StoreError> {
        let json = store.to_json()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Keeps the serialized document in memory, the way a key-value store would.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    document: RefCell<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already-serialized document.
    pub fn with_document(json: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(json.into())),
        }
    }

    /// The last document written, as text.
    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl MappingPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<MappingStore>, StoreError> {
        self.document
            .borrow()
            .as_deref()
            .map(MappingStore::from_json)
            .transpose()
    }

    fn save(&self, store: &MappingStore) -> Result<(), StoreError> {
        let json = store.to_json()?;
        self.document.replace(Some(json));
        Ok(())
    }
}

impl<P: MappingPersistence + ?Sized> MappingPersistence for std::rc::Rc<P> {
    fn load(&self) -> Result<Option<MappingStore>, StoreError> {
        (**self).load()
    }

    fn save(&self, store: &MappingStore) -> Result<(), StoreError> {
        (**self).save(store)
    }
}
