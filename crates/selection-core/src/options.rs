//! Site options record.
//!
//! Options are named JSON values. The file-backed store keeps the whole
//! record in one JSON object and writes it through on every change.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

pub trait OptionsStore: Send + Sync {
    fn get(&self, name: &str) -> Option<Value>;

    fn set(&self, name: &str, value: Value) -> Result<()>;
}

/// In-memory store, for tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemoryOptions {
    values: Mutex<Map<String, Value>>,
}

impl MemoryOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionsStore for MemoryOptions {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.lock().get(name).cloned()
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        self.values.lock().insert(name.to_string(), value);
        Ok(())
    }
}

/// Options record persisted as a JSON object on disk.
#[derive(Debug)]
pub struct JsonFileOptions {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileOptions {
    /// Open the record, starting empty if the file doesn't exist.
    ///
    /// A file that exists but isn't a JSON object is an error.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = fs::read_to_string(path)?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            debug!("Options file {} not found, starting empty", path.display());
            Map::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl OptionsStore for JsonFileOptions {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.lock().get(name).cloned()
    }

    fn set(&self, name: &str, value: Value) -> Result<()> {
        let mut values = self.values.lock();
        let previous = values.insert(name.to_string(), value);
        if let Err(e) = self.write(&values) {
            debug!("Failed to write options to {}: {}", self.path.display(), e);
            match previous {
                Some(prev) => values.insert(name.to_string(), prev),
                None => values.remove(name),
            };
            return Err(e);
        }
        Ok(())
    }
}
