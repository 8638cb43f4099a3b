//! Cargo integration: naming and building the artifact

pub mod build;
pub mod manifest;

pub use build::CargoBuilder;

use crate::core::config::BuildConfig;
use crate::core::error::WebpubResult;
use std::path::{Path, PathBuf};

/// Something that can turn the crate at `root` into an artifact file
pub trait Toolchain {
  /// Command line that `build` runs, for plans and progress output
  fn command_line(&self, build: &BuildConfig) -> String;

  /// Build and return the path of the produced artifact
  ///
  /// Must not touch the repository: the output lives outside version control.
  fn build(&self, root: &Path, build: &BuildConfig) -> WebpubResult<PathBuf>;
}
