//! The publish pipeline
//!
//! ```text
//! OnDev → Built → OnPublish → Staged → Committed → Published → Restored
//! ```
//!
//! Each step runs only if the previous one succeeded. Once the publishing branch
//! has been entered, returning to the development branch happens on every exit
//! path, and the outcome of that return is part of the result.

use crate::cargo::Toolchain;
use crate::core::artifact::Artifact;
use crate::core::config::WebpubConfig;
use crate::core::error::{GitError, WebpubError, WebpubResult};
use crate::core::guard::{self, BranchGuard};
use crate::core::vcs::Repository;
use crate::ui::progress::StepProgress;
use crate::utils::format_size;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Number of forward steps shown in progress output
pub const STEP_COUNT: usize = 6;

/// Pipeline step, used to report where a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
  Preflight,
  Build,
  Switch,
  Stage,
  Commit,
  Push,
  Restore,
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::Preflight => "preflight",
      Step::Build => "build",
      Step::Switch => "branch switch",
      Step::Stage => "stage",
      Step::Commit => "commit",
      Step::Push => "push",
      Step::Restore => "restore",
    };
    write!(f, "{}", name)
  }
}

/// States a run passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
  OnDev,
  Built,
  OnPublish,
  Staged,
  Committed,
  Published,
  Restored,
}

/// What the commit step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommitOutcome {
  /// The publishing branch's commit was replaced
  Amended { sha: String },
  /// Artifact identical to what is committed; nothing to do
  Unchanged,
}

/// What happened when returning to the development branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreOutcome {
  /// The publishing branch was never entered
  NotNeeded,
  Restored { branch: String },
  Failed { branch: String, reason: String },
}

/// Summary of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub development_branch: String,
  pub publish_branch: String,
  pub remote: String,
  pub artifact: Artifact,
  pub commit: CommitOutcome,
  pub states: Vec<PipelineState>,
  pub restore: RestoreOutcome,
}

/// Drives one publish run against a repository and a toolchain
pub struct Pipeline<'a, R: Repository, T: Toolchain> {
  repo: &'a R,
  toolchain: &'a T,
  config: &'a WebpubConfig,
  progress: Option<StepProgress>,
  states: Vec<PipelineState>,
}

impl<'a, R: Repository, T: Toolchain> Pipeline<'a, R, T> {
  pub fn new(repo: &'a R, toolchain: &'a T, config: &'a WebpubConfig) -> Self {
    Self {
      repo,
      toolchain,
      config,
      progress: None,
      states: Vec::new(),
    }
  }

  /// Print step lines and draw a progress bar while running
  pub fn with_progress(mut self, progress: StepProgress) -> Self {
    self.progress = Some(progress);
    self
  }

  /// Read-only checks that must hold before anything is built or switched
  ///
  /// Returns the development branch.
  pub fn preflight(&self) -> WebpubResult<String> {
    let publish = &self.config.publish;
    let current = self.repo.current_branch()?;

    if current == "HEAD" {
      return Err(GitError::DetachedHead.into());
    }

    if let Some(recorded) = guard::read_marker(self.repo)? {
      if current == publish.branch {
        return Err(GitError::InterruptedRun { branch: recorded }.into());
      }
      eprintln!("⚠️  Removing stale restore marker (recorded '{}')", recorded);
      guard::clear_marker(self.repo)?;
    }

    if current == publish.branch {
      return Err(GitError::OnPublishBranch { branch: current }.into());
    }

    if !self.repo.branch_exists(&publish.branch)? {
      return Err(
        GitError::BranchNotFound {
          branch: publish.branch.clone(),
        }
        .into(),
      );
    }

    let files = self.repo.modified_files()?;
    if !files.is_empty() {
      return Err(GitError::DirtyTree { files }.into());
    }

    if !self.repo.has_remote(&publish.remote)? {
      return Err(
        GitError::RemoteNotFound {
          remote: publish.remote.clone(),
        }
        .into(),
      );
    }

    Ok(current)
  }

  /// Run every step, restoring the development branch on the way out
  pub fn run(&mut self) -> WebpubResult<PublishReport> {
    let started_at = Utc::now();
    let config = self.config;
    let publish = &config.publish;

    let development = self
      .preflight()
      .map_err(|e| WebpubError::aborted(Step::Preflight, e, RestoreOutcome::NotNeeded))?;
    self.enter(PipelineState::OnDev);

    // 1. Build (nothing in the repository changes here)
    self.announce(&format!("🔨 Building: {}", self.toolchain.command_line(&config.build)));
    let mut artifact = self
      .toolchain
      .build(self.repo.work_tree(), &config.build)
      .and_then(|source| Artifact::new(source, publish.path.clone()))
      .map_err(|e| WebpubError::aborted(Step::Build, e, RestoreOutcome::NotNeeded))?;
    self.enter(PipelineState::Built);
    self.advance();

    // 2. Switch
    self.announce(&format!("🔀 Switching {} → {}", development, publish.branch));
    let branch_guard = BranchGuard::acquire(self.repo, &development, &publish.branch)
      .map_err(|e| WebpubError::aborted(Step::Switch, e, RestoreOutcome::NotNeeded))?;
    self.enter(PipelineState::OnPublish);
    self.advance();

    // 3-5. Stage, commit, push
    let result = self.publish_on_branch(&mut artifact);

    // A half-done stage or commit would block the checkout back, or follow it
    if result.is_err() {
      if let Err(e) = self.repo.discard_changes(&artifact.published_path) {
        eprintln!("⚠️  Could not discard uncommitted changes on {}: {}", publish.branch, e);
      }
    }

    // 6. Restore, whatever happened above
    self.announce(&format!("↩️  Returning to {}", branch_guard.original()));
    let restore = branch_guard.release();
    if matches!(restore, RestoreOutcome::Restored { .. }) {
      self.enter(PipelineState::Restored);
      self.advance();
    }

    let commit = match result {
      Err((step, cause)) => return Err(WebpubError::aborted(step, cause, restore)),
      Ok(commit) => commit,
    };

    // Published, but the tree is still on the publishing branch
    if let RestoreOutcome::Failed { ref branch, ref reason } = restore {
      let cause = GitError::CheckoutFailed {
        branch: branch.clone(),
        stderr: reason.clone(),
      };
      return Err(WebpubError::aborted(Step::Restore, cause.into(), restore.clone()));
    }

    Ok(PublishReport {
      started_at,
      finished_at: Utc::now(),
      development_branch: development,
      publish_branch: publish.branch.clone(),
      remote: publish.remote.clone(),
      artifact,
      commit,
      states: self.states.clone(),
      restore,
    })
  }

  fn publish_on_branch(&mut self, artifact: &mut Artifact) -> Result<CommitOutcome, (Step, WebpubError)> {
    let config = self.config;
    let publish = &config.publish;

    // 3. Stage
    artifact
      .stage(self.repo.work_tree())
      .and_then(|_| self.repo.stage_file(&artifact.published_path))
      .map_err(|e| (Step::Stage, e))?;
    self.announce(&format!(
      "📦 Staged {} ({}, sha256 {})",
      artifact.published_path.display(),
      format_size(artifact.size.unwrap_or(0)),
      artifact.short_digest()
    ));
    self.enter(PipelineState::Staged);
    self.advance();

    // 4. Commit
    let commit = self
      .commit(&publish.message)
      .map_err(|e| (Step::Commit, e))?;
    match commit {
      CommitOutcome::Amended { ref sha } => {
        self.announce(&format!("📝 Amended {} → {}", publish.branch, &sha[..12.min(sha.len())]))
      }
      CommitOutcome::Unchanged => self.announce("📝 Artifact unchanged, keeping existing commit"),
    }
    self.enter(PipelineState::Committed);
    self.advance();

    // 5. Push
    self.announce(&format!("🚀 Force-pushing {} to {}", publish.branch, publish.remote));
    self
      .repo
      .push_force(&publish.remote, &publish.branch)
      .map_err(|e| (Step::Push, e))?;
    self.enter(PipelineState::Published);
    self.advance();

    Ok(commit)
  }

  fn commit(&self, message: &str) -> WebpubResult<CommitOutcome> {
    if !self.repo.has_staged_changes()? {
      return Ok(CommitOutcome::Unchanged);
    }
    let sha = self.repo.amend_commit(message)?;
    Ok(CommitOutcome::Amended { sha })
  }

  fn enter(&mut self, state: PipelineState) {
    self.states.push(state);
  }

  fn announce(&self, line: &str) {
    if self.progress.is_some() {
      println!("{}", line);
    }
  }

  fn advance(&mut self) {
    if let Some(ref mut progress) = self.progress {
      progress.inc();
    }
  }
}
