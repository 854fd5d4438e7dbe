//! Overview items and their JSON catalog.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog bundled with the binary, used when no `--catalog` is given.
const DEMO_CATALOG: &str = include_str!("../assets/overview.json");

/// One card of the overview.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// First label line.
    pub title: String,
    /// Second label line; also fed to the placeholder classifier.
    pub description: String,
    /// Background image, relative to the asset root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Natural image width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<f32>,
    /// Natural image height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<f32>,
    /// Hyperlink target of the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Errors raised while reading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses a catalog from JSON text. `origin` names the source in errors.
pub fn parse(json: &str, origin: &str) -> Result<Vec<Item>, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Parse {
        origin: origin.to_owned(),
        source,
    })
}

/// Reads and parses a catalog file.
pub fn load(path: &Path) -> Result<Vec<Item>, CatalogError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&json, &path.display().to_string())
}

/// The bundled demo catalog.
pub fn demo() -> Result<Vec<Item>, CatalogError> {
    parse(DEMO_CATALOG, "<built-in>")
}

/// Default placeholder rule: the description starts with "todo", ignoring
/// case and leading whitespace.
pub fn is_todo(description: &str) -> bool {
    description
        .trim_start()
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("todo"))
}
