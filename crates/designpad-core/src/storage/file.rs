//! File-based design backend for native platforms.

use super::{BoxFuture, DesignBackend, DesignInfo, PersistenceError, PersistenceResult, now_millis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk record wrapping a design payload.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// Design name as given, before encoding.
    #[serde(default)]
    name: Option<String>,
    version: u64,
    saved_at: i64,
    payload: String,
}

impl Envelope {
    fn is_for(&self, name: &str) -> bool {
        self.name.as_deref().is_none_or(|stored| stored == name)
    }
}

/// File stem for a design name.
///
/// Lowercase ASCII letters, digits and `-` are kept; every other byte becomes
/// `_XX` (uppercase hex). Distinct names always get distinct stems, also on
/// case-insensitive filesystems.
fn encode_name(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => stem.push(byte as char),
            _ => stem.push_str(&format!("_{:02X}", byte)),
        }
    }
    stem
}

/// File-based backend for native platforms.
///
/// Stores one JSON envelope per design in a base directory.
pub struct FileBackend {
    base_path: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> PersistenceResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                PersistenceError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a backend in the default location.
    ///
    /// On Unix: `~/.local/share/designpad/designs/`
    /// On Windows: `%LOCALAPPDATA%\designpad\designs\`
    pub fn default_location() -> PersistenceResult<Self> {
        Self::new(data_dir()?.join("designs"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn design_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_name(name)))
    }

    fn read_envelope(path: &Path) -> PersistenceResult<Option<Envelope>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)
            .map_err(|e| PersistenceError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map(Some).map_err(|e| {
            PersistenceError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Read the envelope stored for `name`, ignoring a file that belongs to
    /// another name.
    fn read_named(path: &Path, name: &str) -> PersistenceResult<Option<Envelope>> {
        let envelope = Self::read_envelope(path)?;
        Ok(envelope.filter(|e| {
            let matches = e.is_for(name);
            if !matches {
                log::warn!("{} does not hold design '{}'", path.display(), name);
            }
            matches
        }))
    }
}

/// Application data directory (`<data_local_dir>/designpad`).
pub(crate) fn data_dir() -> PersistenceResult<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| PersistenceError::Io("Could not determine home directory".to_string()))?;
    Ok(base.join("designpad"))
}

impl DesignBackend for FileBackend {
    fn save_design(&self, name: &str, payload: &str) -> BoxFuture<'_, PersistenceResult<u64>> {
        let path = self.design_path(name);
        let name = name.to_string();
        let payload = payload.to_string();

        Box::pin(async move {
            let previous = Self::read_named(&path, &name).ok().flatten();
            let version = previous.map_or(1, |e| e.version + 1);
            let envelope = Envelope {
                name: Some(name),
                version,
                saved_at: now_millis(),
                payload,
            };
            let json = serde_json::to_string(&envelope)
                .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
            fs::write(&path, json)
                .map_err(|e| PersistenceError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            Ok(version)
        })
    }

    fn load_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<String>>> {
        let path = self.design_path(name);
        let name = name.to_string();
        Box::pin(async move { Ok(Self::read_named(&path, &name)?.map(|e| e.payload)) })
    }

    fn list_designs(&self) -> BoxFuture<'_, PersistenceResult<Vec<DesignInfo>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| PersistenceError::Io(format!("Failed to read directory: {}", e)))?;

            let mut designs = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|e| e != "json") {
                    continue;
                }
                let envelope = match Self::read_envelope(&path) {
                    Ok(Some(envelope)) => envelope,
                    Ok(None) => continue,
                    Err(e) => {
                        log::warn!("Skipping unreadable design file: {}", e);
                        continue;
                    }
                };
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
                designs.push(DesignInfo {
                    name: envelope.name.unwrap_or_else(|| stem.to_string()),
                    saved_at: envelope.saved_at,
                    version: envelope.version,
                });
            }
            Ok(designs)
        })
    }

    fn delete_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<bool>> {
        let path = self.design_path(name);
        let name = name.to_string();

        Box::pin(async move {
            if Self::read_named(&path, &name)?.is_none() {
                return Ok(false);
            }
            fs::remove_file(&path)
                .map_err(|e| PersistenceError::Io(format!("Failed to delete {}: {}", path.display(), e)))?;
            Ok(true)
        })
    }

    fn design_version(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<u64>>> {
        let path = self.design_path(name);
        let name = name.to_string();
        Box::pin(async move { Ok(Self::read_named(&path, &name)?.map(|e| e.version)) })
    }
}
