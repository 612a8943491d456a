use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

const PAGE_PREFIX: &str = "page_";

/// A directory of JSON files owned by one provider for the length of a run.
#[derive(Debug, Clone)]
pub struct CacheDir {
    path: PathBuf,
}

impl CacheDir {
    /// Opens `path`, creating it if it doesn't exist.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            fs::create_dir_all(&path)
                .wrap_err_with(|| format!("failed to create {}", path.display()))?;
            info!("created cache directory: {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes every regular file in the directory. A file that can't be
    /// removed is reported and skipped.
    pub fn clear(&self) {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("failed to list {}: {}", self.path.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let file = entry.path();
            if !file.is_file() {
                continue;
            }
            match fs::remove_file(&file) {
                Ok(()) => debug!("removed cached file {}", file.display()),
                Err(e) => warn!("failed to remove {}: {}", file.display(), e),
            }
        }
    }

    pub fn save_json<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<PathBuf> {
        let file = self.path.join(name);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&file, json).wrap_err_with(|| format!("failed to write {}", file.display()))?;
        debug!("saved {}", file.display());
        Ok(file)
    }

    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let file = self.path.join(name);
        let content = fs::read_to_string(&file)
            .wrap_err_with(|| format!("failed to read {}", file.display()))?;
        serde_json::from_str(&content).wrap_err_with(|| format!("failed to parse {}", file.display()))
    }

    /// Page files are zero-padded so lexical order is fetch order.
    pub fn page_name(index: u32) -> String {
        format!("{PAGE_PREFIX}{index:02}.json")
    }

    pub fn write_page<T: Serialize>(&self, index: u32, items: &[T]) -> Result<PathBuf> {
        self.save_json(&Self::page_name(index), items)
    }

    /// Concatenates all page files in name order. Unreadable pages are
    /// reported and skipped.
    pub fn read_pages<T: DeserializeOwned>(&self) -> Vec<T> {
        let mut names: Vec<String> = match fs::read_dir(&self.path) {
            Ok(entries) => entries
                .flatten()
                .filter(|entry| entry.path().is_file())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| name.starts_with(PAGE_PREFIX) && name.ends_with(".json"))
                .collect(),
            Err(e) => {
                warn!("failed to list {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };
        names.sort();

        let mut items = Vec::new();
        for name in names {
            match self.load_json::<Vec<T>>(&name) {
                Ok(mut page) => {
                    debug!("loaded {} items from {}", page.len(), name);
                    items.append(&mut page);
                }
                Err(e) => warn!("skipping page {}: {:#}", name, e),
            }
        }
        items
    }
}
