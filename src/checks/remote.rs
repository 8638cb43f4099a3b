//! Remote configuration and reachability

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::WebpubResult;

pub struct RemoteCheck;

impl Check for RemoteCheck {
  fn name(&self) -> &str {
    "remote"
  }

  fn description(&self) -> &str {
    "Checks the remote is configured (and reachable with --thorough)"
  }

  fn run(&self, ctx: &CheckContext) -> WebpubResult<CheckResult> {
    let (git, config) = super::open_repository(ctx)?;
    let remote = &config.publish.remote;
    let branch = &config.publish.branch;

    let Some(url) = git.get_remote_url(remote)? else {
      return Ok(CheckResult::error(
        self.name(),
        format!("Remote '{}' is not configured", remote),
        Some(format!("git remote add {} <url>", remote)),
      ));
    };

    if !ctx.thorough {
      return Ok(CheckResult::pass(
        self.name(),
        format!("'{}' → {} (use --thorough to test connectivity)", remote, url),
      ));
    }

    match git.remote_branch_head(remote, branch) {
      Ok(Some(sha)) => Ok(CheckResult::pass(
        self.name(),
        format!("{}/{} reachable at {}", remote, branch, &sha[..12.min(sha.len())]),
      )),
      Ok(None) => Ok(CheckResult::warning(
        self.name(),
        format!("'{}' is reachable but has no '{}' branch yet", remote, branch),
        Some("The first publish creates it"),
      )),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        format!("Cannot reach '{}' ({})", remote, url),
        Some(e.to_string()),
      )),
    }
  }
}
