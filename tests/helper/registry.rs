//! Registry document builders

use std::path::PathBuf;

use serde_json::{Map, Value, json};
use tempfile::TempDir;

use vellum_index::registry::{RegistryDocument, loader};

/// One version entry of a package in a test document
#[derive(Debug, Clone, Default)]
pub struct VersionSpec {
    os_min: Option<String>,
    os_max: Option<String>,
    depends: Vec<String>,
    categories: Vec<String>,
    devices: Vec<String>,
    author: Option<String>,
    auto_install_only: bool,
}

impl VersionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn os(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.os_min = min.map(str::to_string);
        self.os_max = max.map(str::to_string);
        self
    }

    pub fn depends(mut self, deps: &[&str]) -> Self {
        self.depends = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn devices(mut self, devices: &[&str]) -> Self {
        self.devices = devices.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn auto_install_only(mut self) -> Self {
        self.auto_install_only = true;
        self
    }

    fn to_json(&self, name: &str) -> Value {
        json!({
            "pkgdesc": format!("{name} package"),
            "upstream_author": self.author.clone().unwrap_or_else(|| "upstream".to_string()),
            "maintainer": "Test Maintainer <test@example.com>",
            "categories": self.categories,
            "license": "MIT",
            "url": format!("https://example.com/{name}"),
            "os_min": self.os_min,
            "os_max": self.os_max,
            "devices": if self.devices.is_empty() { vec!["rm2".to_string()] } else { self.devices.clone() },
            "depends": self.depends,
            "conflicts": [],
            "provides": [],
            "arch": ["noarch"],
            "auto_install_only": self.auto_install_only,
        })
    }
}

/// Builds a registry document through its JSON form
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    packages: Map<String, Value>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, name: &str, version: &str, spec: VersionSpec) -> Self {
        let entry = self
            .packages
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(versions) = entry {
            versions.insert(version.to_string(), spec.to_json(name));
        }
        self
    }

    pub fn to_json(&self) -> String {
        json!({
            "packages": self.packages,
            "generated": "2025-01-15T10:30:00Z",
        })
        .to_string()
    }

    pub fn build(&self) -> RegistryDocument {
        loader::from_json_str(&self.to_json()).unwrap()
    }
}

/// Write a document to a temp dir, returning the dir guard and file path
pub fn write_document(builder: &RegistryBuilder) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("packages-metadata.json");
    std::fs::write(&path, builder.to_json()).unwrap();
    (temp_dir, path)
}
