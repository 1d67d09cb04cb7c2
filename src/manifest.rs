//! Template manifest and the in-memory template library
//!
//! `manifest.json` is a JSON array of template file names living next to it:
//!
//! ```json
//! ["banana.json", "apple.json"]
//! ```
//!
//! A template's identifier is its file name without the `.json` extension.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::template::Template;

/// Error reading or writing a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File I/O error
    #[error("Failed to access manifest: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("Failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered list of selectable template files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        Ok(Self { entries: serde_json::from_str(json)? })
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Load `path`, treating a missing or malformed file as an empty manifest.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "starting a new manifest");
                Self::default()
            }
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `file` unless already listed. Returns whether it was added.
    pub fn add(&mut self, file: &str) -> bool {
        if self.entries.iter().any(|e| e == file) {
            return false;
        }
        self.entries.push(file.to_string());
        true
    }

    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

/// Identifier shown to users for a manifest entry
pub fn template_id(file: &str) -> &str {
    file.strip_suffix(".json").unwrap_or(file)
}

/// Loaded templates keyed by identifier, in manifest order
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    order: Vec<String>,
    templates: HashMap<String, Template>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template. New identifiers keep insertion order.
    pub fn insert(&mut self, id: impl Into<String>, template: Template) {
        let id = id.into();
        if !self.templates.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.templates.insert(id, template);
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The template that becomes active at startup.
    pub fn first(&self) -> Option<(&str, &Template)> {
        let id = self.order.first()?;
        Some((id.as_str(), &self.templates[id]))
    }

    /// Draw a loaded template uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&str, &Template)> {
        let id = self.order.choose(rng)?;
        Some((id.as_str(), &self.templates[id]))
    }

    /// Load every template listed in `manifest`, resolving names against `dir`.
    ///
    /// Templates that fail to load are skipped with a warning.
    pub fn load(dir: &Path, manifest: &Manifest) -> Self {
        let mut library = Self::new();
        for file in manifest.entries() {
            let path = dir.join(file);
            match Template::load(&path) {
                Ok(template) => {
                    debug!(
                        id = template_id(file),
                        width = template.width(),
                        height = template.height(),
                        "loaded template"
                    );
                    library.insert(template_id(file), template);
                }
                Err(err) => warn!(path = %path.display(), error = %err, "skipping template"),
            }
        }
        library
    }

    /// Load `dir/manifest_name` and the templates it lists.
    ///
    /// A missing or unreadable manifest yields an empty library, which keeps
    /// the engine waiting rather than failing.
    pub fn load_dir(dir: &Path, manifest_name: &str) -> Self {
        let manifest_path = dir.join(manifest_name);
        match Manifest::load(&manifest_path) {
            Ok(manifest) => {
                if manifest.is_empty() {
                    warn!(path = %manifest_path.display(), "manifest lists no templates");
                }
                Self::load(dir, &manifest)
            }
            Err(err) => {
                warn!(path = %manifest_path.display(), error = %err, "no usable manifest");
                Self::new()
            }
        }
    }
}
