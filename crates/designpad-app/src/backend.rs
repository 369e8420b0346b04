//! Backend selection for the command line.

use designpad_core::EditorConfig;
use designpad_core::storage::{
    BoxFuture, DesignBackend, DesignInfo, FileBackend, PersistenceResult, RemoteBackend,
};
use std::path::PathBuf;

/// The backend chosen from flags and config.
pub enum AnyBackend {
    File(FileBackend),
    Remote(RemoteBackend),
}

impl AnyBackend {
    /// `--remote` wins over the config's `remote_url`; otherwise the file
    /// store at `--store` or the default data directory.
    pub fn open(store: Option<PathBuf>, remote: Option<&str>, config: &EditorConfig) -> PersistenceResult<Self> {
        if let Some(url) = remote.or(config.remote_url.as_deref()).filter(|_| store.is_none()) {
            return Ok(AnyBackend::Remote(RemoteBackend::connect(url)?));
        }
        let backend = match store {
            Some(dir) => FileBackend::new(dir)?,
            None => FileBackend::default_location()?,
        };
        log::debug!("Using file store at {}", backend.base_path().display());
        Ok(AnyBackend::File(backend))
    }

    fn inner(&self) -> &dyn DesignBackend {
        match self {
            AnyBackend::File(backend) => backend,
            AnyBackend::Remote(backend) => backend,
        }
    }
}

impl DesignBackend for AnyBackend {
    fn save_design(&self, name: &str, payload: &str) -> BoxFuture<'_, PersistenceResult<u64>> {
        self.inner().save_design(name, payload)
    }

    fn load_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<String>>> {
        self.inner().load_design(name)
    }

    fn list_designs(&self) -> BoxFuture<'_, PersistenceResult<Vec<DesignInfo>>> {
        self.inner().list_designs()
    }

    fn delete_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<bool>> {
        self.inner().delete_design(name)
    }

    fn design_version(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<u64>>> {
        self.inner().design_version(name)
    }
}
