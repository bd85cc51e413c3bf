use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::params::DiffParams;
use crate::error::Result;

/// A primary raster and its expected counterpart, keyed by base name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    pub base_name: String,
    pub primary: PathBuf,
    /// Derived from the base name; may not exist
    pub secondary: PathBuf,
}

impl MatchedPair {
    /// File name of the primary raster, extension included
    pub fn primary_file_name(&self) -> String {
        self.primary
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.base_name.clone())
    }
}

/// List `primary_dir` for `*.<primary_ext>` files and derive each counterpart in
/// `secondary_dir`. Pairs come back in directory enumeration order.
///
/// A missing primary directory matches nothing, like an unmatched glob.
pub fn discover_pairs(params: &DiffParams) -> Result<Vec<MatchedPair>> {
    let entries = match fs::read_dir(&params.primary_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Primary directory {:?} does not exist", params.primary_dir);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut pairs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !matches_extension(&path, &params.primary_ext) {
            continue;
        }
        let Some(base_name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let secondary = params
            .secondary_dir
            .join(format!("{}.{}", base_name, params.secondary_ext));
        debug!("Paired {:?} -> {:?}", path, secondary);
        pairs.push(MatchedPair {
            base_name,
            primary: path,
            secondary,
        });
    }
    Ok(pairs)
}

// Shell-glob semantics: `*` never matches a leading dot and the suffix is case-sensitive.
fn matches_extension(path: &Path, ext: &str) -> bool {
    let hidden = path
        .file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'));
    !hidden && path.extension().is_some_and(|e| e == ext)
}
