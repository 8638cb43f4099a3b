//! Publish context - resolve once, pass everywhere
//!
//! ```text
//! main.rs:
//!   PublishContext::build() -> &PublishContext
//!   |
//!   v
//! commands/publish.rs, doctor.rs, restore.rs:
//!   fn run_*(ctx: &PublishContext, ..)
//! ```

use crate::core::config::WebpubConfig;
use crate::core::error::WebpubResult;
use crate::core::vcs::SystemGit;
use std::path::{Path, PathBuf};

/// Repository, working-tree root and configuration shared by all commands
pub struct PublishContext {
  /// Working-tree root (absolute path)
  pub root: PathBuf,

  /// Configuration, defaults when no file was found
  pub config: WebpubConfig,

  /// File the configuration came from
  pub config_path: Option<PathBuf>,

  pub git: SystemGit,
}

impl PublishContext {
  /// Open the repository containing `dir` and load its configuration.
  ///
  /// The configuration is searched at the working-tree root, not in `dir`.
  pub fn build(dir: &Path) -> WebpubResult<Self> {
    let git = SystemGit::open(dir)?;
    let root = git.work_tree.clone();
    let (config, config_path) = WebpubConfig::load(&root)?;

    Ok(Self {
      root,
      config,
      config_path,
      git,
    })
  }

  /// Human-readable config source for status lines
  pub fn config_source(&self) -> String {
    match self.config_path {
      Some(ref path) => path.strip_prefix(&self.root).unwrap_or(path).display().to_string(),
      None => "defaults (no webpub.toml)".to_string(),
    }
  }
}
