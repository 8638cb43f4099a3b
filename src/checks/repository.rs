//! Working-tree state a publish run requires

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::WebpubResult;
use crate::core::vcs::Repository;

pub struct RepositoryStateCheck;

impl Check for RepositoryStateCheck {
  fn name(&self) -> &str {
    "repository-state"
  }

  fn description(&self) -> &str {
    "Checks the current branch, the publishing branch and uncommitted changes"
  }

  fn run(&self, ctx: &CheckContext) -> WebpubResult<CheckResult> {
    let (git, config) = super::open_repository(ctx)?;
    let publish = &config.publish.branch;
    let current = Repository::current_branch(&git)?;

    if current == "HEAD" {
      return Ok(CheckResult::error(
        self.name(),
        "HEAD is detached",
        Some("Check out your development branch"),
      ));
    }

    if &current == publish {
      return Ok(CheckResult::error(
        self.name(),
        format!("Currently on the publishing branch '{}'", publish),
        Some("Check out your development branch"),
      ));
    }

    if !git.branch_exists(publish)? {
      return Ok(CheckResult::error(
        self.name(),
        format!("Publishing branch '{}' does not exist locally", publish),
        Some(format!(
          "git checkout --orphan {0} && git rm -rf --cached . && git commit --allow-empty -m {0}",
          publish
        )),
      ));
    }

    let dirty = git.modified_files()?;
    if !dirty.is_empty() {
      return Ok(CheckResult::error(
        self.name(),
        format!("{} file(s) with uncommitted changes: {}", dirty.len(), dirty.join(", ")),
        Some("Commit or stash your changes before publishing"),
      ));
    }

    // Amending only replaces the newest commit; older ones stay reachable
    let commits = git.commit_count(publish)?;
    if commits > 1 {
      return Ok(CheckResult::warning(
        self.name(),
        format!("'{}' has {} commits; publishing replaces only the newest", publish, commits),
        Some(format!(
          "Recreate it as a single orphan commit: git branch -D {0}, then create the orphan branch again",
          publish
        )),
      ));
    }

    Ok(CheckResult::pass(
      self.name(),
      format!("On '{}', '{}' exists, working tree clean", current, publish),
    ))
  }
}
