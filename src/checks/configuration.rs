//! webpub.toml validity

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::WebpubConfig;
use crate::core::error::WebpubResult;
use crate::core::vcs::SystemGit;

pub struct ConfigurationCheck;

impl Check for ConfigurationCheck {
  fn name(&self) -> &str {
    "configuration"
  }

  fn description(&self) -> &str {
    "Validates webpub.toml (or confirms defaults are in use)"
  }

  fn run(&self, ctx: &CheckContext) -> WebpubResult<CheckResult> {
    // Config lives at the working-tree root; outside a repository use the directory itself
    let root = SystemGit::open(&ctx.root)
      .map(|git| git.work_tree)
      .unwrap_or_else(|_| ctx.root.clone());

    match WebpubConfig::load(&root) {
      Ok((config, Some(path))) => Ok(CheckResult::pass(
        self.name(),
        format!(
          "{} is valid (publishing to {}/{})",
          path.strip_prefix(&root).unwrap_or(&path).display(),
          config.publish.remote,
          config.publish.branch
        ),
      )),
      Ok((config, None)) => Ok(CheckResult::pass(
        self.name(),
        format!(
          "No webpub.toml, using defaults (publishing to {}/{})",
          config.publish.remote, config.publish.branch
        ),
      )),
      Err(e) => Ok(CheckResult::error(self.name(), e.to_string(), e.help_message())),
    }
  }
}
