//! Error types for cargo-webpub with contextual messages and exit codes
//!
//! Every failure the publish pipeline can hit is one of the variants below. Each
//! variant knows its [`FailureKind`], the process exit code it maps to, and an
//! optional help line printed under the error.

use crate::core::pipeline::{RestoreOutcome, Step};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cargo-webpub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, repository state, invalid args)
  User = 1,
  /// System error (toolchain, network, I/O)
  System = 2,
  /// Validation failure (doctor checks failed)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  /// Compiler unavailable, build error, or missing build output
  Toolchain,
  /// Branch missing, uncommitted changes, refused checkout
  RepositoryState,
  /// Artifact copy or other filesystem failure
  Io,
  /// Remote missing, push rejected or unreachable
  Remote,
  /// Invalid configuration file
  Config,
}

impl fmt::Display for FailureKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FailureKind::Toolchain => write!(f, "toolchain"),
      FailureKind::RepositoryState => write!(f, "repository state"),
      FailureKind::Io => write!(f, "I/O"),
      FailureKind::Remote => write!(f, "remote"),
      FailureKind::Config => write!(f, "configuration"),
    }
  }
}

/// Main error type for cargo-webpub
#[derive(Debug)]
pub enum WebpubError {
  /// Configuration errors
  Config(ConfigError),

  /// Build toolchain errors
  Toolchain(ToolchainError),

  /// Git operation errors
  Git(GitError),

  /// Copying the artifact into the working tree failed
  Stage {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },

  /// I/O errors
  Io(io::Error),

  /// A pipeline run that stopped before completing
  Aborted(Box<AbortedRun>),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

/// A pipeline failure together with what happened to the working tree afterwards
#[derive(Debug)]
pub struct AbortedRun {
  /// Step that failed
  pub step: Step,
  /// The underlying failure
  pub cause: WebpubError,
  /// Outcome of returning to the development branch
  pub restore: RestoreOutcome,
}

impl WebpubError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    WebpubError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    WebpubError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Wrap a step failure with the restore outcome
  pub fn aborted(step: Step, cause: WebpubError, restore: RestoreOutcome) -> Self {
    WebpubError::Aborted(Box::new(AbortedRun { step, cause, restore }))
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      WebpubError::Message { message, context, help } => WebpubError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      WebpubError::Io(e) => WebpubError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Classify this error
  pub fn kind(&self) -> FailureKind {
    match self {
      WebpubError::Config(_) => FailureKind::Config,
      WebpubError::Toolchain(_) => FailureKind::Toolchain,
      WebpubError::Git(e) => e.kind(),
      WebpubError::Stage { .. } | WebpubError::Io(_) => FailureKind::Io,
      WebpubError::Aborted(run) => run.cause.kind(),
      WebpubError::Message { .. } => FailureKind::RepositoryState,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      WebpubError::Message { .. } => ExitCode::User,
      WebpubError::Aborted(run) => run.cause.exit_code(),
      _ => match self.kind() {
        FailureKind::Config | FailureKind::RepositoryState => ExitCode::User,
        FailureKind::Toolchain | FailureKind::Io | FailureKind::Remote => ExitCode::System,
      },
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      WebpubError::Config(e) => e.help_message(),
      WebpubError::Toolchain(e) => e.help_message(),
      WebpubError::Git(e) => e.help_message(),
      WebpubError::Stage { from, .. } => Some(format!(
        "Check that {} exists and the working tree is writable.",
        from.display()
      )),
      WebpubError::Aborted(run) => match &run.restore {
        RestoreOutcome::Failed { branch, .. } => Some(format!(
          "The working tree is still on the publishing branch. Run `cargo webpub restore` or `git checkout {}`.",
          branch
        )),
        _ => run.cause.help_message(),
      },
      WebpubError::Message { help, .. } => help.clone(),
      WebpubError::Io(_) => None,
    }
  }
}

impl fmt::Display for WebpubError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WebpubError::Config(e) => write!(f, "{}", e),
      WebpubError::Toolchain(e) => write!(f, "{}", e),
      WebpubError::Git(e) => write!(f, "{}", e),
      WebpubError::Stage { from, to, source } => write!(
        f,
        "Failed to copy artifact {} -> {}: {}",
        from.display(),
        to.display(),
        source
      ),
      WebpubError::Io(e) => write!(f, "I/O error: {}", e),
      WebpubError::Aborted(run) => {
        write!(f, "Publish aborted during {} ({} failure): {}", run.step, run.cause.kind(), run.cause)?;
        if run.step == Step::Restore {
          return Ok(());
        }
        match &run.restore {
          RestoreOutcome::NotNeeded => Ok(()),
          RestoreOutcome::Restored { branch } => write!(f, "\nWorking tree restored to '{}'", branch),
          RestoreOutcome::Failed { branch, reason } => {
            write!(f, "\nFailed to restore '{}': {}", branch, reason)
          }
        }
      }
      WebpubError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for WebpubError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      WebpubError::Io(e) => Some(e),
      WebpubError::Stage { source, .. } => Some(source),
      WebpubError::Aborted(run) => Some(&run.cause),
      _ => None,
    }
  }
}

impl From<io::Error> for WebpubError {
  fn from(err: io::Error) -> Self {
    WebpubError::Io(err)
  }
}

impl From<String> for WebpubError {
  fn from(msg: String) -> Self {
    WebpubError::message(msg)
  }
}

impl From<&str> for WebpubError {
  fn from(msg: &str) -> Self {
    WebpubError::message(msg)
  }
}

impl From<ConfigError> for WebpubError {
  fn from(err: ConfigError) -> Self {
    WebpubError::Config(err)
  }
}

impl From<ToolchainError> for WebpubError {
  fn from(err: ToolchainError) -> Self {
    WebpubError::Toolchain(err)
  }
}

impl From<GitError> for WebpubError {
  fn from(err: GitError) -> Self {
    WebpubError::Git(err)
  }
}

impl From<toml_edit::TomlError> for WebpubError {
  fn from(err: toml_edit::TomlError) -> Self {
    WebpubError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for WebpubError {
  fn from(err: toml_edit::de::Error) -> Self {
    WebpubError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for WebpubError {
  fn from(err: toml_edit::ser::Error) -> Self {
    WebpubError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for WebpubError {
  fn from(err: serde_json::Error) -> Self {
    WebpubError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file exists but could not be parsed
  Parse { path: PathBuf, reason: String },

  /// A field holds a value that cannot be used
  InvalidField { field: String, reason: String },

  /// `init` would overwrite an existing file
  AlreadyExists { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Parse { path, .. } => Some(format!("Fix or remove {}.", path.display())),
      ConfigError::InvalidField { field, .. } => Some(format!("Edit `{}` in webpub.toml.", field)),
      ConfigError::AlreadyExists { .. } => Some("Pass --force to overwrite it.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse {}: {}", path.display(), reason)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid value for `{}`: {}", field, reason)
      }
      ConfigError::AlreadyExists { path } => {
        write!(f, "Configuration already exists: {}", path.display())
      }
    }
  }
}

/// Compiler / build errors
#[derive(Debug)]
pub enum ToolchainError {
  /// The compiler binary could not be started
  NotFound { program: String, reason: String },

  /// The compiler ran and exited unsuccessfully
  BuildFailed { command: String, code: Option<i32> },

  /// The compiler reported success but the artifact is not where expected
  ArtifactMissing { path: PathBuf },

  /// Cargo.toml could not be read or lacks what is needed to name the artifact
  Manifest { path: PathBuf, reason: String },
}

impl ToolchainError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolchainError::NotFound { .. } => Some("Install Rust via https://rustup.rs and make sure `cargo` is on PATH.".to_string()),
      ToolchainError::BuildFailed { .. } => Some(
        "Fix the compiler errors above. If the target is missing: rustup target add wasm32-unknown-unknown".to_string(),
      ),
      ToolchainError::ArtifactMissing { .. } => {
        Some("Set `build.artifact` in webpub.toml to the file cargo actually produces.".to_string())
      }
      ToolchainError::Manifest { .. } => {
        Some("Set `build.artifact` in webpub.toml to name the artifact explicitly.".to_string())
      }
    }
  }
}

impl fmt::Display for ToolchainError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolchainError::NotFound { program, reason } => {
        write!(f, "Failed to run `{}`: {}", program, reason)
      }
      ToolchainError::BuildFailed { command, code } => match code {
        Some(code) => write!(f, "Build failed: `{}` exited with code {}", command, code),
        None => write!(f, "Build failed: `{}` was terminated by a signal", command),
      },
      ToolchainError::ArtifactMissing { path } => {
        write!(f, "Build succeeded but no artifact at {}", path.display())
      }
      ToolchainError::Manifest { path, reason } => {
        write!(f, "Cannot determine artifact from {}: {}", path.display(), reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// HEAD does not point at a branch
  DetachedHead,

  /// Run started on the publishing branch itself
  OnPublishBranch { branch: String },

  /// Branch missing locally
  BranchNotFound { branch: String },

  /// Tracked files have uncommitted changes
  DirtyTree { files: Vec<String> },

  /// git refused to switch branches
  CheckoutFailed { branch: String, stderr: String },

  /// A previous run was killed while on the publishing branch
  InterruptedRun { branch: String },

  /// Remote not configured
  RemoteNotFound { remote: String },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn kind(&self) -> FailureKind {
    match self {
      GitError::RemoteNotFound { .. } | GitError::PushFailed { .. } => FailureKind::Remote,
      _ => FailureKind::RepositoryState,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        let reason = reason.to_lowercase();
        if reason.contains("protected branch") || reason.contains("pre-receive hook declined") {
          Some("The remote rejected the force-push. Allow force-pushes to the publishing branch.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key permissions and repository access.".to_string())
        } else if reason.contains("could not read from remote") || reason.contains("does not appear to be a git") {
          Some("Check the remote URL and your network connection. Run `cargo webpub doctor --thorough`.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run cargo webpub from inside a git checkout (looked in {}).",
        path.display()
      )),
      GitError::DetachedHead => Some("Check out your development branch first.".to_string()),
      GitError::OnPublishBranch { .. } => Some("Check out your development branch first.".to_string()),
      GitError::BranchNotFound { branch } => Some(format!(
        "Create it first, e.g. `git checkout --orphan {0} && git commit --allow-empty -m {0}`.",
        branch
      )),
      GitError::DirtyTree { .. } => Some("Commit or stash your changes before publishing.".to_string()),
      GitError::CheckoutFailed { stderr, .. } if stderr.contains("would be overwritten") => {
        Some("Move the conflicting files out of the way, then retry.".to_string())
      }
      GitError::InterruptedRun { .. } => Some("Run `cargo webpub restore` first.".to_string()),
      GitError::RemoteNotFound { remote } => Some(format!("Add it with `git remote add {} <url>`.", remote)),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::DetachedHead => write!(f, "HEAD is detached; no development branch to return to"),
      GitError::OnPublishBranch { branch } => {
        write!(f, "Already on the publishing branch '{}'", branch)
      }
      GitError::BranchNotFound { branch } => write!(f, "Branch '{}' does not exist locally", branch),
      GitError::DirtyTree { files } => {
        write!(f, "Working tree has uncommitted changes:")?;
        for file in files {
          write!(f, "\n  {}", file)?;
        }
        Ok(())
      }
      GitError::CheckoutFailed { branch, stderr } => {
        write!(f, "Failed to check out '{}': {}", branch, stderr.trim())
      }
      GitError::InterruptedRun { branch } => write!(
        f,
        "A previous publish was interrupted; the tree should return to '{}'",
        branch
      ),
      GitError::RemoteNotFound { remote } => write!(f, "Remote '{}' is not configured", remote),
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason.trim())
      }
    }
  }
}

/// Result type alias for cargo-webpub
pub type WebpubResult<T> = Result<T, WebpubError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> WebpubResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> WebpubResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<WebpubError>,
{
  fn context(self, ctx: impl Into<String>) -> WebpubResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> WebpubResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &WebpubError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_failure_kinds() {
    let push = WebpubError::Git(GitError::PushFailed {
      remote: "origin".into(),
      branch: "web".into(),
      reason: "unreachable".into(),
    });
    assert_eq!(push.kind(), FailureKind::Remote);
    assert_eq!(push.exit_code(), ExitCode::System);

    let dirty = WebpubError::Git(GitError::DirtyTree {
      files: vec!["src/main.rs".into()],
    });
    assert_eq!(dirty.kind(), FailureKind::RepositoryState);
    assert_eq!(dirty.exit_code(), ExitCode::User);

    let build = WebpubError::Toolchain(ToolchainError::BuildFailed {
      command: "cargo build".into(),
      code: Some(101),
    });
    assert_eq!(build.kind(), FailureKind::Toolchain);

    let copy = WebpubError::Stage {
      from: "a".into(),
      to: "b".into(),
      source: io::Error::new(io::ErrorKind::NotFound, "gone"),
    };
    assert_eq!(copy.kind(), FailureKind::Io);
  }

  #[test]
  fn test_aborted_keeps_cause_kind_and_exit_code() {
    let cause = WebpubError::Git(GitError::PushFailed {
      remote: "origin".into(),
      branch: "web".into(),
      reason: "fatal: Could not read from remote repository.".into(),
    });
    let err = WebpubError::aborted(
      Step::Push,
      cause,
      RestoreOutcome::Restored {
        branch: "master".into(),
      },
    );
    assert_eq!(err.kind(), FailureKind::Remote);
    assert_eq!(err.exit_code(), ExitCode::System);
    let text = err.to_string();
    assert!(text.contains("push"));
    assert!(text.contains("restored to 'master'"));
    assert!(err.help_message().unwrap().contains("doctor --thorough"));
  }

  #[test]
  fn test_failed_restore_overrides_help() {
    let err = WebpubError::aborted(
      Step::Stage,
      WebpubError::message("copy failed"),
      RestoreOutcome::Failed {
        branch: "master".into(),
        reason: "checkout refused".into(),
      },
    );
    assert!(err.to_string().contains("Failed to restore 'master'"));
    assert!(err.help_message().unwrap().contains("cargo webpub restore"));
  }

  #[test]
  fn test_context_chains() {
    let err = WebpubError::message("base").context("outer");
    assert_eq!(err.to_string(), "base\nouter");

    let res: Result<(), io::Error> = Err(io::Error::other("disk"));
    let err = res.context("reading marker").unwrap_err();
    assert!(err.to_string().contains("reading marker"));
  }
}
