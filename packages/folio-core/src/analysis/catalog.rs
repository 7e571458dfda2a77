//! Scheme metadata lookup.

use crate::types::SchemeMetadata;
use crate::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Anything that can resolve a scheme code to its metadata.
pub trait SchemeLookup {
    /// Find a scheme by code.
    fn find_scheme(&self, code: &str) -> Option<&SchemeMetadata>;
}

impl SchemeLookup for [SchemeMetadata] {
    fn find_scheme(&self, code: &str) -> Option<&SchemeMetadata> {
        self.iter().find(|s| s.code.eq_ignore_ascii_case(code))
    }
}

/// Read-mostly catalog of scheme metadata, optionally backed by a JSON file.
#[derive(Debug, Default)]
pub struct SchemeCatalog {
    /// Path to the catalog JSON file (empty for in-memory catalogs)
    path: PathBuf,
    /// Known schemes
    schemes: Vec<SchemeMetadata>,
}

impl SchemeCatalog {
    /// Load the catalog from the default path, falling back to an empty catalog.
    ///
    /// Default path: `~/.folio/schemes.json`
    /// Can be overridden with `FOLIO_SCHEME_CATALOG` environment variable.
    pub fn load() -> Self {
        let path = Self::default_path();
        match Self::from_path(&path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Could not read scheme catalog {}: {}", path.display(), e);
                Self {
                    path,
                    schemes: Vec::new(),
                }
            }
        }
    }

    /// Create an in-memory catalog (no persistence).
    pub fn in_memory(schemes: Vec<SchemeMetadata>) -> Self {
        Self {
            path: PathBuf::new(),
            schemes,
        }
    }

    /// Get the default catalog file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("FOLIO_SCHEME_CATALOG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".folio/schemes.json"))
            .unwrap_or_else(|| PathBuf::from("schemes.json"))
    }

    /// Load a catalog from a JSON file.
    ///
    /// Accepts either a bare array of schemes or `{"schemes": [...]}`. A path
    /// that does not exist yields an empty catalog bound to that path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut catalog = Self {
            path: path.to_path_buf(),
            schemes: Vec::new(),
        };

        if !path.exists() {
            return Ok(catalog);
        }

        let content = fs::read_to_string(path)?;
        let mut data: serde_json::Value = serde_json::from_str(&content)?;

        if let Some(wrapped) = data.get_mut("schemes") {
            data = wrapped.take();
        }

        catalog.schemes = serde_json::from_value(data)?;
        debug!(
            "Loaded {} schemes from {}",
            catalog.schemes.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Save the catalog to its file as a JSON array.
    pub fn save(&self) -> Result<()> {
        // Skip if in-memory only
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.schemes)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Get the current path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All schemes in insertion order.
    pub fn schemes(&self) -> &[SchemeMetadata] {
        &self.schemes
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Add a scheme or replace the one with the same code.
    ///
    /// Returns true when an existing entry was replaced.
    pub fn insert(&mut self, scheme: SchemeMetadata) -> bool {
        if let Some(existing) = self
            .schemes
            .iter_mut()
            .find(|s| s.code.eq_ignore_ascii_case(&scheme.code))
        {
            *existing = scheme;
            true
        } else {
            self.schemes.push(scheme);
            false
        }
    }

    /// Remove a scheme by code.
    pub fn remove(&mut self, code: &str) -> Result<SchemeMetadata> {
        match self
            .schemes
            .iter()
            .position(|s| s.code.eq_ignore_ascii_case(code))
        {
            Some(idx) => Ok(self.schemes.remove(idx)),
            None => Err(Error::NotFound(format!("scheme {}", code))),
        }
    }
}

impl SchemeLookup for SchemeCatalog {
    fn find_scheme(&self, code: &str) -> Option<&SchemeMetadata> {
        self.schemes.as_slice().find_scheme(code)
    }
}
