//! Publish plans for dry runs
//!
//! A plan lists, in order, what a real run would do to the repository and the
//! remote. `--dry-run` prints it instead of executing anything.
//!
//! ```text
//! preflight (read-only)
//!   ↓
//! PublishPlan (what would happen)
//!   ↓
//! human-readable or JSON output
//! ```

use crate::cargo::Toolchain;
use crate::core::config::WebpubConfig;
use crate::core::error::WebpubResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// Plan identifier (SHA256 hash of the operations)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// A single step a publish run performs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
  /// Compile the artifact
  Build { command: String, artifact: String },

  /// Switch branches
  Checkout { branch: String },

  /// Copy the artifact into the working tree
  CopyArtifact { from: String, to: String },

  /// Add the published file to the index
  Stage { path: String },

  /// Replace the branch's commit
  AmendCommit { branch: String, message: String },

  /// Overwrite the remote branch
  PushForce { remote: String, branch: String },
}

/// The ordered operations of one publish run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishPlan {
  pub id: PlanId,
  pub development_branch: String,
  pub publish_branch: String,
  pub remote: String,
  pub operations: Vec<Operation>,
}

impl PublishPlan {
  /// Describe the run `config` would perform from `development_branch`
  pub fn new<T: Toolchain>(
    root: &Path,
    development_branch: &str,
    config: &WebpubConfig,
    toolchain: &T,
    artifact: &Path,
  ) -> Self {
    let publish = &config.publish;
    let published = publish
      .path
      .clone()
      .or_else(|| artifact.file_name().map(Into::into))
      .unwrap_or_default();
    let shown_artifact = artifact.strip_prefix(root).unwrap_or(artifact);

    let operations = vec![
      Operation::Build {
        command: toolchain.command_line(&config.build),
        artifact: shown_artifact.display().to_string(),
      },
      Operation::Checkout {
        branch: publish.branch.clone(),
      },
      Operation::CopyArtifact {
        from: shown_artifact.display().to_string(),
        to: published.display().to_string(),
      },
      Operation::Stage {
        path: published.display().to_string(),
      },
      Operation::AmendCommit {
        branch: publish.branch.clone(),
        message: publish.message.clone(),
      },
      Operation::PushForce {
        remote: publish.remote.clone(),
        branch: publish.branch.clone(),
      },
      Operation::Checkout {
        branch: development_branch.to_string(),
      },
    ];

    let id = PlanId::from_contents(&serde_json::to_vec(&operations).unwrap_or_default());
    Self {
      id,
      development_branch: development_branch.to_string(),
      publish_branch: publish.branch.clone(),
      remote: publish.remote.clone(),
      operations,
    }
  }

  /// Serialize to JSON
  pub fn to_json(&self) -> WebpubResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Get human-readable representation
  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!(
      "📋 Plan: publish {} → {}/{} ({})\n",
      self.development_branch, self.remote, self.publish_branch, self.id
    ));
    output.push_str(&format!("\n   Operations ({}):\n", self.operations.len()));

    for (i, op) in self.operations.iter().enumerate() {
      output.push_str(&format!("   {}. {}\n", i + 1, operation_to_string(op)));
    }

    output.push_str(&format!(
      "\n⚠️  NOTE: {}/{} will be overwritten with a single commit\n",
      self.remote, self.publish_branch
    ));

    output
  }
}

fn operation_to_string(op: &Operation) -> String {
  match op {
    Operation::Build { command, artifact } => format!("Build: {} → {}", command, artifact),
    Operation::Checkout { branch } => format!("Checkout branch {}", branch),
    Operation::CopyArtifact { from, to } => format!("Copy {} → {}", from, to),
    Operation::Stage { path } => format!("Stage {}", path),
    Operation::AmendCommit { branch, message } => {
      format!("Amend the commit on {} (message: {}), skipped if unchanged", branch, message)
    }
    Operation::PushForce { remote, branch } => format!("Force push to {}/{}", remote, branch),
  }
}
