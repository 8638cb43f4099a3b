//! Tests for the publish pipeline end to end

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_publish_replaces_web_commit_and_returns() -> Result<()> {
  let repo = TestRepo::new()?;
  let before = repo.rev("web")?;

  let output = repo.webpub(&[], "wasm orbit v1")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  assert_eq!(repo.current_branch()?, "master");
  assert_eq!(repo.status()?, "");
  assert_ne!(repo.rev("web")?, before);
  assert_eq!(repo.commit_count("web")?, 1);
  assert_eq!(repo.show("web", "solsys.wasm")?, "wasm orbit v1");
  assert_eq!(repo.origin_rev("web")?, repo.rev("web")?);
  assert!(!repo.marker().exists());

  // Development history is untouched
  assert_eq!(repo.commit_count("master")?, 1);
  Ok(())
}

#[test]
fn test_build_failure_touches_nothing() -> Result<()> {
  let repo = TestRepo::new()?;
  let web = repo.rev("web")?;

  let output = repo.webpub_with(&["publish"], "x", &[("FAKE_CARGO_FAIL", "1")])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("build"), "stderr: {}", stderr(&output));

  assert_eq!(repo.current_branch()?, "master");
  assert_eq!(repo.rev("web")?, web);
  assert_eq!(repo.origin_rev("web")?, web);
  Ok(())
}

#[test]
fn test_push_failure_still_returns_to_master() -> Result<()> {
  let repo = TestRepo::new()?;
  let remote_web = repo.origin_rev("web")?;
  git(&repo.path, &["remote", "set-url", "origin", "/nonexistent/webpub-origin.git"])?;

  let output = repo.webpub(&[], "wasm orbit v2")?;
  let err = stderr(&output);
  assert_eq!(output.status.code(), Some(2));
  assert!(err.contains("push"), "stderr: {}", err);
  assert!(err.contains("restored to 'master'"), "stderr: {}", err);

  assert_eq!(repo.current_branch()?, "master");
  assert_eq!(repo.status()?, "");
  assert_eq!(repo.show("web", "solsys.wasm")?, "wasm orbit v2");
  assert_eq!(repo.origin_rev("web")?, remote_web);
  assert!(!repo.marker().exists());
  Ok(())
}

#[test]
fn test_unchanged_artifact_keeps_commit() -> Result<()> {
  let repo = TestRepo::new()?;

  let first = repo.webpub(&[], "wasm same")?;
  assert!(first.status.success(), "stderr: {}", stderr(&first));
  let web = repo.rev("web")?;

  let second = repo.webpub(&[], "wasm same")?;
  assert!(second.status.success(), "stderr: {}", stderr(&second));
  assert!(String::from_utf8_lossy(&second.stdout).contains("unchanged"));

  assert_eq!(repo.rev("web")?, web);
  assert_eq!(repo.commit_count("web")?, 1);
  assert_eq!(repo.origin_rev("web")?, web);
  assert_eq!(repo.current_branch()?, "master");
  Ok(())
}

#[test]
fn test_repeated_publishes_keep_one_commit() -> Result<()> {
  let repo = TestRepo::new()?;

  for payload in ["v1", "v2", "v3"] {
    let output = repo.webpub(&[], payload)?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
  }

  assert_eq!(repo.commit_count("web")?, 1);
  assert_eq!(repo.show("web", "solsys.wasm")?, "v3");
  assert_eq!(repo.origin_rev("web")?, repo.rev("web")?);
  Ok(())
}

#[test]
fn test_dirty_tree_is_rejected_before_building() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.path.join("src/main.rs"), "fn main() { println!(\"wip\"); }\n")?;

  let output = repo.webpub(&[], "x")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("uncommitted"), "stderr: {}", stderr(&output));
  assert!(!repo.path.join("target").exists());
  assert_eq!(repo.current_branch()?, "master");
  Ok(())
}

#[test]
fn test_missing_publish_branch_is_rejected() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["branch", "-D", "web"])?;

  let output = repo.webpub(&[], "x")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("'web' does not exist"), "stderr: {}", stderr(&output));
  Ok(())
}

#[test]
fn test_dry_run_prints_plan_only() -> Result<()> {
  let repo = TestRepo::new()?;
  let web = repo.rev("web")?;

  let output = repo.webpub(&["publish", "--dry-run"], "x")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  let out = String::from_utf8_lossy(&output.stdout);
  assert!(out.contains("Plan: publish master → origin/web"), "stdout: {}", out);
  assert!(out.contains("Force push to origin/web"));

  assert!(!repo.path.join("target").exists());
  assert_eq!(repo.rev("web")?, web);
  Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.webpub(&["publish", "--json"], "wasm json")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["development_branch"], "master");
  assert_eq!(report["publish_branch"], "web");
  assert_eq!(report["commit"]["outcome"], "amended");
  assert_eq!(report["commit"]["sha"], repo.rev("web")?);
  assert_eq!(report["restore"]["status"], "restored");
  assert_eq!(report["artifact"]["size"], 9);
  Ok(())
}

#[test]
fn test_config_redirects_branch_and_path() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["branch", "pages", "web"])?;
  std::fs::write(
    repo.path.join("webpub.toml"),
    "[publish]\nbranch = \"pages\"\npath = \"pkg/game.wasm\"\nmessage = \"deploy\"\n",
  )?;
  git(&repo.path, &["add", "webpub.toml"])?;
  git(&repo.path, &["commit", "-m", "Configure webpub"])?;

  let output = repo.webpub(&[], "wasm pages")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  assert_eq!(repo.show("pages", "pkg/game.wasm")?, "wasm pages");
  assert_eq!(repo.commit_count("pages")?, 1);
  assert_eq!(
    stdout(&git(&repo.path, &["log", "-1", "--format=%s", "pages"])?),
    "deploy"
  );
  assert_eq!(repo.origin_rev("pages")?, repo.rev("pages")?);
  assert_eq!(repo.current_branch()?, "master");
  Ok(())
}

#[test]
fn test_rejected_first_commit_leaves_master_clean() -> Result<()> {
  let repo = TestRepo::new()?;
  let web = repo.rev("web")?;
  repo.reject_commits()?;

  let output = repo.webpub(&[], "wasm orbit v1")?;
  let err = stderr(&output);
  assert!(!output.status.success());
  assert!(err.contains("commit"), "stderr: {}", err);
  assert!(err.contains("restored to 'master'"), "stderr: {}", err);

  assert_eq!(repo.current_branch()?, "master");
  assert_eq!(repo.status()?, "");
  assert!(!repo.path.join("solsys.wasm").exists());
  assert!(!repo.marker().exists());
  assert_eq!(repo.rev("web")?, web);
  Ok(())
}

#[test]
fn test_rejected_commit_after_earlier_publish_returns_to_master() -> Result<()> {
  let repo = TestRepo::new()?;
  let first = repo.webpub(&[], "wasm orbit v1")?;
  assert!(first.status.success(), "stderr: {}", stderr(&first));
  let web = repo.rev("web")?;

  repo.reject_commits()?;
  let output = repo.webpub(&[], "wasm orbit v2")?;
  let err = stderr(&output);
  assert!(!output.status.success());
  assert!(err.contains("restored to 'master'"), "stderr: {}", err);

  assert_eq!(repo.current_branch()?, "master");
  assert_eq!(repo.status()?, "");
  assert!(!repo.marker().exists());
  assert_eq!(repo.rev("web")?, web);
  assert_eq!(repo.show("web", "solsys.wasm")?, "wasm orbit v1");
  assert_eq!(repo.origin_rev("web")?, web);
  Ok(())
}

#[test]
fn test_committer_identity_comes_from_environment() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.webpub_with(
    &[],
    "wasm orbit v1",
    &[("GIT_COMMITTER_NAME", "Deploy Bot"), ("GIT_COMMITTER_EMAIL", "deploy@example.com")],
  )?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  assert_eq!(
    stdout(&git(&repo.path, &["log", "-1", "--format=%cn <%ce>", "web"])?),
    "Deploy Bot <deploy@example.com>"
  );
  Ok(())
}
