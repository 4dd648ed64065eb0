//! Local persistence: key-value snapshots and whole-file export/import.
//!
//! A snapshot is `{ "elements": [...], "playName": "..." }`. The same shape
//! is written to the local key-value store (one fixed key, last write wins)
//! and to exported files. Everything read back goes through
//! [`crate::schema::validate_elements`], so a corrupt snapshot never reaches
//! the editor.
//!
//! ERROR HANDLING
//! ==============
//! `load_local` swallows failures into `None` (logged) so startup falls back
//! to [`crate::doc::default_lineup`]. `import_file` returns the error so the
//! host can tell the user; the editor state is untouched either way.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::doc::Element;
use crate::schema::{SchemaError, validate_elements};

/// Storage key holding the current play snapshot.
pub const LOCAL_SNAPSHOT_KEY: &str = "lacrosse-playbook:current";

/// File name used when exporting a play with a blank name.
const FALLBACK_FILE_STEM: &str = "play";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    Schema(#[from] SchemaError),
}

// =============================================================================
// KEY-VALUE STORES
// =============================================================================

/// Durable string key-value storage.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store, used in tests and as a fallback when nothing durable exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory. Native builds only.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    /// Open the page's local storage.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` outside a browser window or when storage is disabled.
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_owned()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StoreError::Unavailable("localStorage disabled".to_owned())),
            Err(e) => Err(StoreError::Unavailable(format!("{e:?}"))),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// A play's elements plus its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elements: Vec<Element>,
    pub play_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    elements: &'a [Element],
    play_name: &'a str,
}

fn to_json(elements: &[Element], name: &str, pretty: bool) -> Result<String, serde_json::Error> {
    let snapshot = SnapshotRef { elements, play_name: name };
    if pretty { serde_json::to_string_pretty(&snapshot) } else { serde_json::to_string(&snapshot) }
}

/// Parse and validate snapshot JSON. Older snapshots keyed the name as `name`.
///
/// # Errors
///
/// Returns `Json` for unparseable input and `Schema` for structural problems.
pub fn parse_snapshot(raw: &str) -> Result<Snapshot, PersistError> {
    let value: Value = serde_json::from_str(raw)?;
    let Some(obj) = value.as_object() else {
        return Err(SchemaError { path: "$".to_owned(), message: "expected an object".to_owned() }.into());
    };

    let elements = match obj.get("elements") {
        Some(elements) => validate_elements(elements, "elements")?,
        None => {
            return Err(SchemaError { path: "elements".to_owned(), message: "required".to_owned() }.into());
        }
    };
    let play_name = match obj.get("playName").or_else(|| obj.get("name")) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(SchemaError { path: "playName".to_owned(), message: "expected a string".to_owned() }.into());
        }
    };
    Ok(Snapshot { elements, play_name })
}

/// Write the current play to `store`, overwriting the previous snapshot.
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn save_local(store: &mut impl KeyValueStore, elements: &[Element], name: &str) -> Result<(), PersistError> {
    let raw = to_json(elements, name, false)?;
    store.set(LOCAL_SNAPSHOT_KEY, &raw)?;
    Ok(())
}

/// Read the saved play. Absent, unreadable, or corrupt data yields `None`.
#[must_use]
pub fn load_local(store: &impl KeyValueStore) -> Option<Snapshot> {
    let raw = match store.get(LOCAL_SNAPSHOT_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            log::warn!("local snapshot unreadable: {e}");
            return None;
        }
    };
    match parse_snapshot(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("discarding corrupt local snapshot: {e}");
            None
        }
    }
}

/// Contents and suggested file name for a downloaded play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

/// File name for an exported play: whitespace runs become `_`, plus `.json`.
#[must_use]
pub fn export_file_name(name: &str) -> String {
    let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        format!("{FALLBACK_FILE_STEM}.json")
    } else {
        format!("{stem}.json")
    }
}

/// Serialize a play as pretty-printed snapshot JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_file(elements: &[Element], name: &str) -> Result<ExportedFile, PersistError> {
    Ok(ExportedFile { file_name: export_file_name(name), contents: to_json(elements, name, true)? })
}

/// Parse an exported play file.
///
/// # Errors
///
/// Returns an error describing why the file cannot be opened.
pub fn import_file(contents: &str) -> Result<Snapshot, PersistError> {
    parse_snapshot(contents)
}
