//! Building the artifact with cargo

use super::Toolchain;
use super::manifest;
use crate::core::config::BuildConfig;
use crate::core::error::{ToolchainError, WebpubResult};
use crate::utils::display_command;
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs `cargo build` for the configured target and profile
pub struct CargoBuilder {
  program: OsString,
}

impl CargoBuilder {
  /// Use `$CARGO` when cargo launched us as a subcommand, `cargo` from PATH otherwise
  pub fn from_env() -> Self {
    Self {
      program: env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo")),
    }
  }

  /// Output of `cargo --version`
  pub fn version(&self) -> WebpubResult<String> {
    let output = Command::new(&self.program)
      .arg("--version")
      .stdin(Stdio::null())
      .output()
      .map_err(|e| ToolchainError::NotFound {
        program: self.program.to_string_lossy().to_string(),
        reason: e.to_string(),
      })?;
    if !output.status.success() {
      return Err(
        ToolchainError::BuildFailed {
          command: display_command(&self.program.to_string_lossy(), &["--version"]),
          code: output.status.code(),
        }
        .into(),
      );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Arguments passed to cargo
  pub fn args(build: &BuildConfig) -> Vec<String> {
    let mut args = vec!["build".to_string()];
    match build.profile.as_str() {
      "release" => args.push("--release".to_string()),
      "dev" => {}
      other => {
        args.push("--profile".to_string());
        args.push(other.to_string());
      }
    }
    args.push("--target".to_string());
    args.push(build.target.clone());
    if let Some(ref package) = build.package {
      args.push("-p".to_string());
      args.push(package.clone());
    }
    args
  }

  /// Directory cargo writes build output to
  ///
  /// `build.target_dir` wins, then `CARGO_TARGET_DIR`, then `<root>/target`.
  /// Relative values are resolved against `root`.
  pub fn target_dir(root: &Path, build: &BuildConfig) -> PathBuf {
    let dir = build
      .target_dir
      .clone()
      .or_else(|| env::var_os("CARGO_TARGET_DIR").map(PathBuf::from))
      .unwrap_or_else(|| PathBuf::from("target"));
    if dir.is_absolute() { dir } else { root.join(dir) }
  }

  /// Where the artifact lands: `<target-dir>/<target>/<profile-dir>/<file>`
  pub fn output_path(root: &Path, build: &BuildConfig) -> WebpubResult<PathBuf> {
    let file_name = match build.artifact {
      Some(ref name) => name.clone(),
      None => manifest::artifact_file_name(root, &build.target, build.package.as_deref())?,
    };
    let profile_dir = match build.profile.as_str() {
      "dev" => "debug",
      other => other,
    };
    Ok(
      Self::target_dir(root, build)
        .join(&build.target)
        .join(profile_dir)
        .join(file_name),
    )
  }
}

impl Toolchain for CargoBuilder {
  fn command_line(&self, build: &BuildConfig) -> String {
    display_command(&self.program.to_string_lossy(), &Self::args(build))
  }

  fn build(&self, root: &Path, build: &BuildConfig) -> WebpubResult<PathBuf> {
    // Resolve the output path first so a bad manifest fails before compiling
    let output = Self::output_path(root, build)?;
    let command = self.command_line(build);

    // Compiler chatter goes to stderr so stdout stays clean for --json
    let status = Command::new(&self.program)
      .current_dir(root)
      .args(Self::args(build))
      .stdin(Stdio::null())
      .stdout(Stdio::from(io::stderr()))
      .status()
      .map_err(|e| ToolchainError::NotFound {
        program: self.program.to_string_lossy().to_string(),
        reason: e.to_string(),
      })?;

    if !status.success() {
      return Err(
        ToolchainError::BuildFailed {
          command,
          code: status.code(),
        }
        .into(),
      );
    }

    if !output.is_file() {
      return Err(ToolchainError::ArtifactMissing { path: output }.into());
    }

    Ok(output)
  }
}
