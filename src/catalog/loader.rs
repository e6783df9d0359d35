// src/catalog/loader.rs

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::catalog::model::CatalogFile;
use crate::catalog::store::Catalog;
use crate::errors::Result;

/// Built-in catalog: the standard LHE pools and physics campaigns of the
/// production setup. Used when no `--catalog` path is given.
const DEFAULT_CATALOG: &str = include_str!("default_catalog.toml");

/// Load and validate a catalog from an explicit path, or fall back to the
/// built-in default catalog.
pub fn load(path: Option<&str>) -> Result<Catalog> {
    match path {
        Some(path) => load_from_path(path),
        None => load_default(),
    }
}

/// Load a catalog file from a given path, parse it and build the stores.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading catalog file at {path:?}"))?;

    let file: CatalogFile = toml::from_str(&contents)?;
    debug!(
        path = %path.display(),
        pools = file.pool.len(),
        campaigns = file.campaign.len(),
        "loaded catalog file"
    );

    Catalog::from_file(file)
}

/// Parse and validate a catalog from a TOML string.
pub fn load_from_str(contents: &str) -> Result<Catalog> {
    let file: CatalogFile = toml::from_str(contents)?;
    Catalog::from_file(file)
}

/// Load the embedded default catalog.
pub fn load_default() -> Result<Catalog> {
    let file: CatalogFile = toml::from_str(DEFAULT_CATALOG)?;
    debug!(
        pools = file.pool.len(),
        campaigns = file.campaign.len(),
        "loaded built-in catalog"
    );
    Catalog::from_file(file)
}
