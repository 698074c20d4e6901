//! File-backed config stores.
//!
//! A store binds one YAML document to one file under a host-provided base
//! directory. Opening is failure-tolerant by policy: a missing file is
//! seeded from the bundled default when one exists, and a malformed file
//! logs one error and yields an empty document. A bad config file must not
//! take the host down at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use outpost_common::{
    COLOR_MARKER, LogLevel, LogSink, Resources, TracingLog, translate_color_codes,
};

use crate::value::{Document, Value};

/// Canonical extension for store files.
pub const STORE_EXTENSION: &str = "yml";

/// Errors from reading or writing a backing file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("top level of {path} is not a mapping")]
    NotAMapping { path: PathBuf },
}

/// Outcome of materializing a bundled default for a store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The file already exists; nothing was written.
    Existing,
    /// The bundled default was copied into place.
    Created,
    /// The bundle has no default under this name; nothing to do.
    ResourceAbsent,
    /// The default could not be read or written (details on the log sink).
    Failed,
}

/// A named YAML document bound to its backing file.
pub struct Store {
    path: PathBuf,
    doc: Document,
    log: Arc<dyn LogSink>,
}

impl Store {
    /// Open the store named `name` under `base`, logging through `tracing`.
    pub fn open(base: impl AsRef<Path>, name: &str, resources: &dyn Resources) -> Self {
        Self::open_with(base, name, resources, Arc::new(TracingLog))
    }

    /// Open with an explicit log sink.
    ///
    /// The name is normalized to carry exactly one `.yml` extension, so
    /// `"db"` and `"db.yml"` address the same store.
    pub fn open_with(
        base: impl AsRef<Path>,
        name: &str,
        resources: &dyn Resources,
        log: Arc<dyn LogSink>,
    ) -> Self {
        let file_name = canonical_name(name);
        let path = base.as_ref().join(&file_name);

        match seed_default(&path, &file_name, resources, log.as_ref()) {
            SeedOutcome::Created => {
                log.log(LogLevel::Debug, &format!("seeded default config '{file_name}'"));
            }
            SeedOutcome::ResourceAbsent => {
                log.log(LogLevel::Debug, &format!("no bundled default for '{file_name}'"));
            }
            SeedOutcome::Existing | SeedOutcome::Failed => {}
        }

        let doc = match load_document(&path) {
            Ok(doc) => doc,
            Err(e) => {
                log.log(
                    LogLevel::Error,
                    &format!("failed to load config {}: {e}", path.display()),
                );
                Document::default()
            }
        };

        Self { path, doc, log }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current in-memory document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Serialize the document and write it out, then reload from disk so
    /// memory matches what was durably written. On write failure: log and
    /// leave the in-memory document untouched.
    pub fn save(&mut self) {
        if let Err(e) = write_document(&self.path, &self.doc) {
            self.log.log(
                LogLevel::Error,
                &format!("failed to save config {}: {e}", self.path.display()),
            );
            return;
        }
        self.reload();
    }

    /// Replace the in-memory document with the file's current contents. On
    /// failure: log, keep the previous document. A missing file reloads as
    /// an empty document.
    pub fn reload(&mut self) {
        match load_document(&self.path) {
            Ok(doc) => self.doc = doc,
            Err(e) => {
                self.log.log(
                    LogLevel::Error,
                    &format!("failed to reload config {}: {e}", self.path.display()),
                );
            }
        }
    }

    /// True when `path` holds anything.
    pub fn contains(&self, path: &str) -> bool {
        self.doc.contains(path)
    }

    /// Write `path` in memory; [`save`](Store::save) persists it.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        self.doc.set(path, value);
    }

    /// Stored string at `path`, display-coerced; `None` when absent.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.doc.get(path).and_then(Value::as_string)
    }

    /// Like [`get_string`](Store::get_string), with `&`-escaped color codes
    /// rewritten to native `§` markup.
    pub fn get_formatted(&self, path: &str) -> Option<String> {
        self.get_string(path)
            .map(|s| translate_color_codes(COLOR_MARKER, &s))
    }

    /// Stored list at `path` as strings; `None` when absent. A present
    /// non-list value reads as the empty list.
    pub fn get_string_list(&self, path: &str) -> Option<Vec<String>> {
        self.doc
            .get(path)
            .map(|v| v.as_string_list().unwrap_or_default())
    }

    /// Stored integer at `path`; 0 when absent.
    pub fn get_int(&self, path: &str) -> i32 {
        self.get_long(path) as i32
    }

    /// Stored integer at `path`, full width; 0 when absent.
    pub fn get_long(&self, path: &str) -> i64 {
        self.doc.get(path).map_or(0, Value::as_long)
    }

    /// Stored float at `path`; 0.0 when absent.
    pub fn get_double(&self, path: &str) -> f64 {
        self.doc.get(path).map_or(0.0, Value::as_double)
    }

    /// Stored boolean at `path`; false when absent or not a boolean.
    pub fn get_bool(&self, path: &str) -> bool {
        self.doc.get(path).is_some_and(Value::as_bool)
    }
}

/// Materialize the bundled default for `name` at `path` when the file does
/// not exist yet. Creates parent directories as needed. A missing bundled
/// resource is not an error; read and write failures are logged with detail
/// and reported as [`SeedOutcome::Failed`].
pub fn seed_default(
    path: &Path,
    name: &str,
    resources: &dyn Resources,
    log: &dyn LogSink,
) -> SeedOutcome {
    if path.exists() {
        return SeedOutcome::Existing;
    }
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log.log(
                LogLevel::Error,
                &format!("failed to create config directory {}: {e}", parent.display()),
            );
            return SeedOutcome::Failed;
        }
    }
    match resources.read(name) {
        Ok(Some(bytes)) => match std::fs::write(path, &bytes) {
            Ok(()) => SeedOutcome::Created,
            Err(e) => {
                log.log(
                    LogLevel::Error,
                    &format!("failed to write default config {}: {e}", path.display()),
                );
                SeedOutcome::Failed
            }
        },
        Ok(None) => SeedOutcome::ResourceAbsent,
        Err(e) => {
            log.log(LogLevel::Error, &format!("failed to read bundled default '{name}': {e}"));
            SeedOutcome::Failed
        }
    }
}

/// Parse the document at `path`. A missing or empty file is an empty
/// document.
pub fn load_document(path: &Path) -> Result<Document, StoreError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(e) => return Err(e.into()),
    };
    if text.trim().is_empty() {
        return Ok(Document::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(&text)?;
    Document::from_yaml(yaml).ok_or_else(|| StoreError::NotAMapping {
        path: path.to_path_buf(),
    })
}

fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = serde_yaml::to_string(&doc.to_yaml())?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Normalize a store name to carry exactly one extension.
fn canonical_name(name: &str) -> String {
    let suffix = format!(".{STORE_EXTENSION}");
    let stem = name.trim_end_matches(suffix.as_str());
    format!("{stem}{suffix}")
}
