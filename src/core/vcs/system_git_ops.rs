//! Branch, index and remote operations for SystemGit

use super::Repository;
use super::system_git::{SystemGit, command_failed};
use crate::core::error::{GitError, WebpubError, WebpubResult, ResultExt};
use crate::utils::path_to_git_format;
use std::path::Path;

impl SystemGit {
  /// List all remotes
  pub fn list_remotes(&self) -> WebpubResult<Vec<(String, String)>> {
    let output = self
      .git_cmd()
      .args(["remote", "-v"])
      .output()
      .context("Failed to list remotes")?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut remotes = Vec::new();

    for line in stdout.lines() {
      // Format: "origin  git@github.com:user/repo.git (fetch)"
      let parts: Vec<&str> = line.split_whitespace().collect();
      if parts.len() >= 2 && line.contains("(fetch)") {
        remotes.push((parts[0].to_string(), parts[1].to_string()));
      }
    }

    Ok(remotes)
  }

  /// Get remote URL
  pub fn get_remote_url(&self, name: &str) -> WebpubResult<Option<String>> {
    let remotes = self.list_remotes()?;
    Ok(remotes.iter().find(|(n, _)| n == name).map(|(_, url)| url.clone()))
  }

  /// SHA of `branch` on `remote`, as reported by `git ls-remote` (network call)
  pub fn remote_branch_head(&self, remote: &str, branch: &str) -> WebpubResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["ls-remote", "--heads", remote])
      .arg(format!("refs/heads/{}", branch))
      .output()
      .context("Failed to run git ls-remote")?;

    if !output.status.success() {
      return Err(WebpubError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch: branch.to_string(),
        reason: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    // Format: "<sha>\trefs/heads/<branch>"
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| line.split_whitespace().next().map(str::to_string)),
    )
  }
}

impl Repository for SystemGit {
  fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  fn state_dir(&self) -> &Path {
    &self.git_dir
  }

  fn current_branch(&self) -> WebpubResult<String> {
    SystemGit::current_branch(self)
  }

  fn branch_exists(&self, branch: &str) -> WebpubResult<bool> {
    let status = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet"])
      .arg(format!("refs/heads/{}", branch))
      .output()
      .context("Failed to look up branch")?
      .status;

    Ok(status.success())
  }

  fn modified_files(&self) -> WebpubResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["status", "--porcelain", "--untracked-files=no"])
      .output()
      .context("Failed to get working tree status")?;

    if !output.status.success() {
      return Err(command_failed("git status --porcelain", &output));
    }

    // Format: "XY path" (or "XY old -> new" for renames)
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| line[3..].to_string())
        .collect(),
    )
  }

  fn has_remote(&self, remote: &str) -> WebpubResult<bool> {
    let remotes = self.list_remotes()?;
    Ok(remotes.iter().any(|(n, _)| n == remote))
  }

  fn checkout(&self, branch: &str) -> WebpubResult<()> {
    let output = self
      .git_cmd()
      .args(["checkout", branch, "--"])
      .output()
      .context("Failed to checkout branch")?;

    if !output.status.success() {
      return Err(WebpubError::Git(GitError::CheckoutFailed {
        branch: branch.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }

  fn stage_file(&self, path: &Path) -> WebpubResult<()> {
    let output = self
      .git_cmd()
      .args(["add", "--force", "--"])
      .arg(path_to_git_format(path))
      .output()
      .context("Failed to stage file")?;

    if !output.status.success() {
      return Err(command_failed("git add", &output));
    }

    Ok(())
  }

  fn has_staged_changes(&self) -> WebpubResult<bool> {
    let output = self
      .git_cmd()
      .args(["diff", "--cached", "--quiet"])
      .output()
      .context("Failed to diff index")?;

    // --quiet: 0 = no differences, 1 = differences, anything else = error
    match output.status.code() {
      Some(0) => Ok(false),
      Some(1) => Ok(true),
      _ => Err(command_failed("git diff --cached --quiet", &output)),
    }
  }

  fn amend_commit(&self, message: &str) -> WebpubResult<String> {
    let output = self
      .git_cmd()
      .args(["commit", "--amend", "--quiet", "-m", message])
      .output()
      .context("Failed to amend commit")?;

    if !output.status.success() {
      return Err(command_failed("git commit --amend", &output));
    }

    self.head_commit()
  }

  fn discard_changes(&self, path: &Path) -> WebpubResult<()> {
    let output = self
      .git_cmd()
      .args(["reset", "--hard", "--quiet", "HEAD"])
      .output()
      .context("Failed to reset working tree")?;

    if !output.status.success() {
      return Err(command_failed("git reset --hard", &output));
    }

    // -x: the artifact is often gitignored on the development side
    let output = self
      .git_cmd()
      .args(["clean", "--force", "-x", "--quiet", "--"])
      .arg(path_to_git_format(path))
      .output()
      .context("Failed to clean working tree")?;

    if !output.status.success() {
      return Err(command_failed("git clean", &output));
    }

    Ok(())
  }

  fn push_force(&self, remote: &str, branch: &str) -> WebpubResult<()> {
    let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
    let output = self
      .git_cmd()
      .args(["push", "--force", "--quiet", remote, &refspec])
      .output()
      .context("Failed to push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(WebpubError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch: branch.to_string(),
        reason: stderr.to_string(),
      }));
    }

    Ok(())
  }
}
