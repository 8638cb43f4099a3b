//! System git backend
//!
//! Drives the `git` binary through plumbing/porcelain commands with an isolated
//! environment. Repository paths are resolved once in [`SystemGit::open`].

use crate::core::error::{GitError, WebpubError, WebpubResult, ResultExt};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git
pub struct SystemGit {
  /// Directory every git command runs in (the working-tree root, so pathspecs
  /// are root-relative even when opened from a subdirectory)
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,

  /// Absolute `.git` directory (differs from `work_tree/.git` for worktrees)
  pub(crate) git_dir: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> WebpubResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel", "--absolute-git-dir"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(WebpubError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(WebpubError::with_help(
        format!("Failed to open git repository: {}", stderr.trim()),
        "Check that git is installed and the directory is readable.",
      ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines().map(str::trim);
    let (Some(work_tree), Some(git_dir)) = (lines.next(), lines.next()) else {
      return Err(WebpubError::Git(GitError::RepoNotFound {
        path: path.to_path_buf(),
      }));
    };

    Ok(Self {
      repo_path: PathBuf::from(work_tree),
      work_tree: PathBuf::from(work_tree),
      git_dir: PathBuf::from(git_dir),
    })
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> WebpubResult<String> {
    self.rev_parse("HEAD")
  }

  /// Resolve a revision to a full SHA
  pub fn rev_parse(&self, rev: &str) -> WebpubResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", rev])
      .output()
      .with_context(|| format!("Failed to resolve {}", rev))?;

    if !output.status.success() {
      return Err(command_failed(&format!("git rev-parse {}", rev), &output));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Get current branch name
  pub fn current_branch(&self) -> WebpubResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string()); // Detached HEAD or unborn branch
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Number of commits reachable from `rev`
  pub fn commit_count(&self, rev: &str) -> WebpubResult<usize> {
    let output = self
      .git_cmd()
      .args(["rev-list", "--count", rev])
      .output()
      .context("Failed to count commits")?;

    if !output.status.success() {
      return Err(command_failed("git rev-list --count", &output));
    }

    let count = String::from_utf8_lossy(&output.stdout)
      .trim()
      .parse::<usize>()
      .map_err(|e| WebpubError::message(format!("Unexpected rev-list output: {}", e)))?;
    Ok(count)
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the working-tree root
  /// - Clears environment variables, then passes through [`PASSTHROUGH_ENV`]
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust inherited GIT_DIR/GIT_INDEX_FILE state)
    pass_through_env(&mut cmd, |var| std::env::var_os(var));

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Variables kept when git runs with a cleared environment
///
/// Commits need identity and signing setup, pushes need SSH agents and
/// credential prompts. Repository-location variables are never passed.
pub(crate) const PASSTHROUGH_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "USER",
  "LANG",
  "XDG_CONFIG_HOME",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
  "GIT_ASKPASS",
  "SSH_ASKPASS",
  "SSH_AUTH_SOCK",
  "GIT_SSH",
  "GIT_SSH_COMMAND",
  "GIT_TERMINAL_PROMPT",
  "GNUPGHOME",
  "GPG_TTY",
];

fn pass_through_env(cmd: &mut Command, lookup: impl Fn(&str) -> Option<OsString>) {
  cmd.env_clear();
  for &var in PASSTHROUGH_ENV {
    if let Some(value) = lookup(var) {
      cmd.env(var, value);
    }
  }
}

/// Build a `CommandFailed` error from a finished git invocation
pub(crate) fn command_failed(command: &str, output: &Output) -> WebpubError {
  WebpubError::Git(GitError::CommandFailed {
    command: command.to_string(),
    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
  })
}
