pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::WebpubResult;
use std::path::Path;

/// Typed operations the publish pipeline performs on the working tree
///
/// Every state transition goes through one of these calls, so the pipeline can be
/// driven against an in-memory repository in tests.
pub trait Repository {
  /// Root of the working tree
  fn work_tree(&self) -> &Path;

  /// Directory for tool-private state (the `.git` dir for real repositories)
  fn state_dir(&self) -> &Path;

  /// Currently checked-out branch, or `"HEAD"` when detached
  fn current_branch(&self) -> WebpubResult<String>;

  /// Whether a local branch exists
  fn branch_exists(&self, branch: &str) -> WebpubResult<bool>;

  /// Tracked files with uncommitted changes (untracked files are ignored)
  fn modified_files(&self) -> WebpubResult<Vec<String>>;

  /// Whether a remote is configured
  fn has_remote(&self, remote: &str) -> WebpubResult<bool>;

  /// Switch the working tree to `branch`
  fn checkout(&self, branch: &str) -> WebpubResult<()>;

  /// Add a path (relative to the work tree) to the index
  fn stage_file(&self, path: &Path) -> WebpubResult<()>;

  /// Whether the index differs from HEAD
  fn has_staged_changes(&self) -> WebpubResult<bool>;

  /// Replace the HEAD commit with one built from the index; returns the new SHA
  fn amend_commit(&self, message: &str) -> WebpubResult<String>;

  /// Reset the index and tracked files to HEAD, and delete `path` if it is
  /// left untracked
  ///
  /// Only used on the publishing branch, which holds nothing but the artifact.
  fn discard_changes(&self, path: &Path) -> WebpubResult<()>;

  /// Overwrite `remote`'s `branch` with the local one
  fn push_force(&self, remote: &str, branch: &str) -> WebpubResult<()>;
}
