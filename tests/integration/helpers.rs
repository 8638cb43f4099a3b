//! Test helpers for integration tests

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Stand-in for cargo: answers `--version` and writes `$FAKE_CARGO_PAYLOAD`
/// where a release wasm build of `solsys` would land. `$FAKE_CARGO_FAIL` makes
/// the build fail like a compile error.
const FAKE_CARGO: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "cargo 1.91.0 (webpub test stub)"
  exit 0
fi
if [ -n "$FAKE_CARGO_FAIL" ]; then
  echo "error[E0425]: cannot find value \`orbit\` in this scope" >&2
  exit 101
fi
mkdir -p target/wasm32-unknown-unknown/release
printf '%s' "$FAKE_CARGO_PAYLOAD" > target/wasm32-unknown-unknown/release/solsys.wasm
echo "    Finished \`release\` profile [optimized] target(s)"
"#;

/// A project repository with a `web` publishing branch and a bare `origin`
pub struct TestRepo {
  _root: TempDir,
  /// Working tree on `master`
  pub path: PathBuf,
  /// Bare repository registered as `origin`
  pub origin: PathBuf,
  cargo: PathBuf,
}

impl TestRepo {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("solsys");
    let origin = root.path().join("origin.git");
    let cargo = root.path().join("fake-cargo");
    std::fs::create_dir_all(path.join("src"))?;

    write_executable(&cargo, FAKE_CARGO)?;

    git(&path, &["init", "--initial-branch=master"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;

    std::fs::write(
      path.join("Cargo.toml"),
      "[package]\nname = \"solsys\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
    )?;
    std::fs::write(path.join("src/main.rs"), "fn main() {}\n")?;
    std::fs::write(path.join(".gitignore"), "target/\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;

    // `web` starts as a single empty-tree commit with no shared history
    let tree = stdout(&git(&path, &["mktree"])?);
    let commit = stdout(&git(&path, &["commit-tree", &tree, "-m", "web"])?);
    git(&path, &["branch", "web", &commit])?;

    git(root.path(), &["init", "--bare", "origin.git"])?;
    git(&path, &["remote", "add", "origin", &origin.to_string_lossy()])?;
    git(&path, &["push", "--quiet", "origin", "web"])?;

    Ok(Self {
      _root: root,
      path,
      origin,
      cargo,
    })
  }

  /// Run `cargo webpub <args>` with the fake cargo building `payload`
  pub fn webpub(&self, args: &[&str], payload: &str) -> Result<Output> {
    self.webpub_with(args, payload, &[])
  }

  /// Like `webpub`, with extra environment variables
  pub fn webpub_with(&self, args: &[&str], payload: &str, env: &[(&str, &str)]) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cargo-webpub"));
    cmd
      .current_dir(&self.path)
      .arg("webpub")
      .args(args)
      .env("CARGO", &self.cargo)
      .env("FAKE_CARGO_PAYLOAD", payload)
      .env_remove("CARGO_TARGET_DIR")
      .env_remove("FAKE_CARGO_FAIL");
    for (key, value) in env {
      cmd.env(key, value);
    }
    cmd.output().context("Failed to run cargo-webpub")
  }

  pub fn current_branch(&self) -> Result<String> {
    Ok(stdout(&git(&self.path, &["rev-parse", "--abbrev-ref", "HEAD"])?))
  }

  pub fn rev(&self, rev: &str) -> Result<String> {
    Ok(stdout(&git(&self.path, &["rev-parse", rev])?))
  }

  pub fn origin_rev(&self, rev: &str) -> Result<String> {
    Ok(stdout(&git(&self.origin, &["rev-parse", rev])?))
  }

  pub fn commit_count(&self, rev: &str) -> Result<usize> {
    Ok(stdout(&git(&self.path, &["rev-list", "--count", rev])?).parse()?)
  }

  /// Content of `path` as committed on `rev`
  pub fn show(&self, rev: &str, path: &str) -> Result<String> {
    Ok(String::from_utf8(git(&self.path, &["show", &format!("{}:{}", rev, path)])?.stdout)?)
  }

  /// Tracked files with uncommitted changes
  pub fn status(&self) -> Result<String> {
    Ok(stdout(&git(&self.path, &["status", "--porcelain", "--untracked-files=no"])?))
  }

  /// Install a `pre-commit` hook that rejects every commit
  pub fn reject_commits(&self) -> Result<()> {
    write_executable(
      &self.path.join(".git/hooks/pre-commit"),
      "#!/bin/sh\necho 'commits are frozen' >&2\nexit 1\n",
    )
  }

  pub fn marker(&self) -> PathBuf {
    self.path.join(".git").join("webpub-restore")
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

#[cfg(unix)]
fn write_executable(path: &Path, content: &str) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;
  std::fs::write(path, content)?;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
  Ok(())
}

#[cfg(not(unix))]
fn write_executable(path: &Path, content: &str) -> Result<()> {
  std::fs::write(path, content)?;
  Ok(())
}
