//! Leftovers from a publish run that was killed on the publishing branch

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::WebpubResult;
use crate::core::guard;
use crate::core::vcs::Repository;

pub struct InterruptedRunCheck;

impl Check for InterruptedRunCheck {
  fn name(&self) -> &str {
    "interrupted-run"
  }

  fn description(&self) -> &str {
    "Detects a restore marker left by an interrupted publish"
  }

  fn run(&self, ctx: &CheckContext) -> WebpubResult<CheckResult> {
    let (git, config) = super::open_repository(ctx)?;

    let Some(branch) = guard::read_marker(&git)? else {
      return Ok(CheckResult::pass(self.name(), "No interrupted run"));
    };

    if Repository::current_branch(&git)? == config.publish.branch {
      Ok(CheckResult::error(
        self.name(),
        format!("A publish was interrupted on '{}'; the tree belongs on '{}'", config.publish.branch, branch),
        Some("Run `cargo webpub restore`"),
      ))
    } else {
      Ok(CheckResult::warning(
        self.name(),
        format!("Stale restore marker for '{}' (the next publish removes it)", branch),
        Some("Run `cargo webpub restore` to remove it now"),
      ))
    }
  }
}
