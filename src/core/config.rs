use crate::core::error::{ConfigError, WebpubError, WebpubResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_TARGET: &str = "wasm32-unknown-unknown";
pub const DEFAULT_PROFILE: &str = "release";
pub const DEFAULT_BRANCH: &str = "web";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_MESSAGE: &str = "web";

/// Configuration for cargo-webpub
/// Searched in order: webpub.toml, .webpub.toml, .cargo/webpub.toml, .config/webpub.toml
///
/// Every field has a default, so a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebpubConfig {
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub publish: PublishConfig,
}

/// How the artifact is produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Target platform identifier passed to `cargo build --target`
  #[serde(default = "default_target")]
  pub target: String,

  /// Cargo profile (`release`, `dev`, or a custom profile)
  #[serde(default = "default_profile")]
  pub profile: String,

  /// Package to build (`-p`), for workspaces
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package: Option<String>,

  /// File name of the artifact inside `<target-dir>/<target>/<profile>/`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artifact: Option<String>,

  /// Overrides CARGO_TARGET_DIR and `<root>/target`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_dir: Option<PathBuf>,
}

/// Where the artifact goes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishConfig {
  /// Publishing branch, rewritten on every run
  #[serde(default = "default_branch")]
  pub branch: String,

  #[serde(default = "default_remote")]
  pub remote: String,

  /// Message of the single commit on the publishing branch
  #[serde(default = "default_message")]
  pub message: String,

  /// Destination relative to the working-tree root (default: the artifact file name)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<PathBuf>,
}

fn default_target() -> String {
  DEFAULT_TARGET.to_string()
}

fn default_profile() -> String {
  DEFAULT_PROFILE.to_string()
}

fn default_branch() -> String {
  DEFAULT_BRANCH.to_string()
}

fn default_remote() -> String {
  DEFAULT_REMOTE.to_string()
}

fn default_message() -> String {
  DEFAULT_MESSAGE.to_string()
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      target: default_target(),
      profile: default_profile(),
      package: None,
      artifact: None,
      target_dir: None,
    }
  }
}

impl Default for PublishConfig {
  fn default() -> Self {
    Self {
      branch: default_branch(),
      remote: default_remote(),
      message: default_message(),
      path: None,
    }
  }
}

impl WebpubConfig {
  /// Find config file in search order: webpub.toml, .webpub.toml, .cargo/webpub.toml, .config/webpub.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("webpub.toml"),
      path.join(".webpub.toml"),
      path.join(".cargo").join("webpub.toml"),
      path.join(".config").join("webpub.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  ///
  /// Returns the config together with the file it came from.
  pub fn load(path: &Path) -> WebpubResult<(Self, Option<PathBuf>)> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok((Self::default(), None));
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).map_err(|e| match e {
      WebpubError::Config(ConfigError::InvalidField { .. }) => e,
      other => WebpubError::Config(ConfigError::Parse {
        path: config_path.clone(),
        reason: other.to_string(),
      }),
    })?;

    Ok((config, Some(config_path)))
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> WebpubResult<Self> {
    let config: WebpubConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Save config to webpub.toml (default location)
  pub fn save(&self, path: &Path) -> WebpubResult<PathBuf> {
    let config_path = path.join("webpub.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }

  /// Validate field values
  pub fn validate(&self) -> WebpubResult<()> {
    require_non_empty("build.target", &self.build.target)?;
    require_non_empty("build.profile", &self.build.profile)?;
    require_non_empty("publish.branch", &self.publish.branch)?;
    require_non_empty("publish.remote", &self.publish.remote)?;
    require_non_empty("publish.message", &self.publish.message)?;

    for (field, value) in [
      ("publish.branch", &self.publish.branch),
      ("publish.remote", &self.publish.remote),
    ] {
      if value.starts_with('-') {
        return Err(invalid(field, "must not start with '-'"));
      }
    }

    if let Some(ref artifact) = self.build.artifact
      && (artifact.is_empty() || artifact.contains('/') || artifact.contains('\\'))
    {
      return Err(invalid("build.artifact", "must be a plain file name"));
    }

    if let Some(ref path) = self.publish.path {
      if path.as_os_str().is_empty() {
        return Err(invalid("publish.path", "must not be empty"));
      }
      if path.is_absolute() || path.components().any(|c| !matches!(c, Component::Normal(_))) {
        return Err(invalid(
          "publish.path",
          "must be a relative path inside the working tree (no '..')",
        ));
      }
    }

    Ok(())
  }
}

fn require_non_empty(field: &str, value: &str) -> WebpubResult<()> {
  if value.trim().is_empty() {
    return Err(invalid(field, "must not be empty"));
  }
  Ok(())
}

fn invalid(field: &str, reason: &str) -> WebpubError {
  WebpubError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
