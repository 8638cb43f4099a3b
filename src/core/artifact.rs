//! The build artifact and its placement in the working tree

use crate::core::error::{WebpubError, WebpubResult};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// A built artifact on its way to the publishing branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  /// Build output location
  pub source_path: PathBuf,
  /// Destination relative to the working-tree root
  pub published_path: PathBuf,
  /// SHA-256 of the staged bytes (hex), filled in by `stage`
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sha256: Option<String>,
  /// Size of the staged bytes
  #[serde(skip_serializing_if = "Option::is_none")]
  pub size: Option<u64>,
}

impl Artifact {
  /// Describe an artifact that `stage` will copy from `source_path`
  ///
  /// `published_path` defaults to the source's file name at the tree root.
  pub fn new(source_path: PathBuf, published_path: Option<PathBuf>) -> WebpubResult<Self> {
    let published_path = match published_path {
      Some(path) => path,
      None => source_path
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| WebpubError::message(format!("Artifact path has no file name: {}", source_path.display())))?,
    };

    Ok(Self {
      source_path,
      published_path,
      sha256: None,
      size: None,
    })
  }

  /// Copy the artifact into `work_tree`, overwriting whatever is there
  ///
  /// Records the digest and size of what was written.
  pub fn stage(&mut self, work_tree: &Path) -> WebpubResult<PathBuf> {
    let destination = work_tree.join(&self.published_path);
    let stage_error = |source| WebpubError::Stage {
      from: self.source_path.clone(),
      to: destination.clone(),
      source,
    };

    let bytes = fs::read(&self.source_path).map_err(stage_error)?;
    if let Some(parent) = destination.parent() {
      fs::create_dir_all(parent).map_err(stage_error)?;
    }
    fs::write(&destination, &bytes).map_err(stage_error)?;

    self.sha256 = Some(digest(&bytes));
    self.size = Some(bytes.len() as u64);
    Ok(destination)
  }

  /// Short digest for display
  pub fn short_digest(&self) -> &str {
    self.sha256.as_deref().map(|d| &d[..12.min(d.len())]).unwrap_or("-")
  }
}

/// Hex SHA-256 of `bytes`
pub fn digest(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  format!("{:x}", hasher.finalize())
}
