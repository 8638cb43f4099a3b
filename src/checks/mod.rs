//! Health checks run by `cargo webpub doctor`
//!
//! # Built-in Checks
//!
//! - **configuration**: webpub.toml parses and validates
//! - **repository-state**: the working tree is in a state a publish run accepts
//! - **interrupted-run**: no restore marker left behind by a killed run
//! - **remote**: the remote is configured (and reachable, in thorough mode)
//! - **toolchain**: cargo runs and the build target is installed

mod configuration;
mod interrupted;
mod remote;
mod repository;
mod runner;
mod toolchain;
mod trait_def;

pub use runner::create_default_runner;
pub use trait_def::{CheckContext, Severity};

use crate::core::config::WebpubConfig;
use crate::core::error::WebpubResult;
use crate::core::vcs::SystemGit;

/// Open the repository and its configuration for a check
///
/// An invalid config falls back to defaults here; the configuration check reports it.
fn open_repository(ctx: &CheckContext) -> WebpubResult<(SystemGit, WebpubConfig)> {
  let git = SystemGit::open(&ctx.root)?;
  let config = WebpubConfig::load(&git.work_tree)
    .map(|(config, _)| config)
    .unwrap_or_default();
  Ok((git, config))
}
