//! Catalog loading from JSON / JSON-lines files or directories of them.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::CatalogEntry;

#[derive(Default)]
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn new() -> Self {
        Self
    }

    /// Loads a single catalog file, or every `*.json`/`*.jsonl` file under a directory.
    pub fn load(&self, path: &Path) -> Result<Vec<CatalogEntry>> {
        if path.is_file() {
            return self.read_file(path);
        }
        self.load_files(self.list_catalog_files(path))
    }

    pub fn load_limited(&self, path: &Path, limit: usize) -> Result<Vec<CatalogEntry>> {
        if path.is_file() {
            return self.read_file(path);
        }
        let mut files = self.list_catalog_files(path);
        files.truncate(limit);
        self.load_files(files)
    }

    fn load_files(&self, files: Vec<PathBuf>) -> Result<Vec<CatalogEntry>> {
        let mut entries = Vec::new();
        for file in &files {
            entries.extend(self.read_file(file)?);
        }
        Ok(entries)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<CatalogEntry>> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            return raw
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(n, line)| {
                    serde_json::from_str(line).with_context(|| format!("{}:{}: invalid entry", path.display(), n + 1))
                })
                .collect();
        }
        serde_json::from_str(&raw).with_context(|| format!("{}: expected a JSON array of entries", path.display()))
    }

    fn list_catalog_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| matches!(p.extension().and_then(|s| s.to_str()), Some("json") | Some("jsonl")))
            .collect();
        files.sort();
        files
    }

    /// Writes entries back as a pretty JSON array.
    pub fn save(&self, path: &Path, entries: &[CatalogEntry]) -> Result<()> {
        let body = serde_json::to_string_pretty(entries)?;
        fs::write(path, body).with_context(|| format!("writing {}", path.display()))
    }
}
