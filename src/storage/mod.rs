// Key-value layout store backed by a JSON document in the data directory.
// Remembers desktop icon positions and receives exported paintings.
//
// Nothing here is allowed to take the desktop down: the icon helpers log and
// fall back to "nothing remembered" when the store is unreadable.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::paint::EXPORT_FILENAME;
use crate::state::geometry::Position;

/// File holding every stored key
pub const LAYOUT_FILE: &str = "layout.json";
/// Key under which icon positions are kept
pub const ICON_POSITIONS_KEY: &str = "iconPositions";

#[derive(Debug, Clone)]
pub struct LayoutStore {
    dir: PathBuf,
}

impl LayoutStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn layout_path(&self) -> PathBuf {
        self.dir.join(LAYOUT_FILE)
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    /// Whole store document; a missing file is an empty store
    async fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let path = self.layout_path();
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(StorageError::NotAnObject),
        }
    }

    async fn write_all(&self, map: Map<String, Value>) -> Result<(), StorageError> {
        self.ensure_dir().await?;
        let path = self.layout_path();
        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(&Value::Object(map))?;

        tokio::fs::write(&tmp, text)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;
        // Replace in one step so a crash never leaves a half-written store
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StorageError::Io { path, source })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let mut map = self.read_all().await?;
        match map.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        // An unreadable store is replaced rather than blocking every later write
        let mut map = match self.read_all().await {
            Ok(map) => map,
            Err(e) => {
                warn!("[Store] Replacing unreadable {}: {}", LAYOUT_FILE, e);
                Map::new()
            }
        };
        map.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_all(map).await?;
        debug!("[Store] Saved key {}", key);
        Ok(())
    }

    /// Saved icon positions, or nothing if the store cannot be read
    pub async fn load_icon_positions(&self) -> HashMap<String, Position> {
        match self.get(ICON_POSITIONS_KEY).await {
            Ok(Some(positions)) => positions,
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!("[Store] Ignoring saved icon positions: {}", e);
                HashMap::new()
            }
        }
    }

    pub async fn save_icon_positions(&self, positions: &HashMap<String, Position>) {
        if let Err(e) = self.set(ICON_POSITIONS_KEY, positions).await {
            warn!("[Store] Could not save icon positions: {}", e);
        }
    }

    /// Write an exported painting, replacing the previous export
    pub async fn save_export(&self, png_bytes: &[u8]) -> Result<PathBuf, StorageError> {
        self.ensure_dir().await?;
        let path = self.dir.join(EXPORT_FILENAME);
        tokio::fs::write(&path, png_bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        info!("[Store] Wrote {} ({} bytes)", path.display(), png_bytes.len());
        Ok(path)
    }
}
