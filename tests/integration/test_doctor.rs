//! Tests for the `doctor` command

use crate::helpers::*;
use anyhow::Result;

fn results(output: &std::process::Output) -> Result<Vec<serde_json::Value>> {
  Ok(serde_json::from_slice(&output.stdout)?)
}

fn find<'a>(results: &'a [serde_json::Value], name: &str) -> &'a serde_json::Value {
  results
    .iter()
    .find(|r| r["check_name"] == name)
    .unwrap_or_else(|| panic!("no result for {}", name))
}

#[test]
fn test_doctor_on_healthy_repo() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.webpub(&["doctor", "--thorough", "--json"], "")?;
  assert!(output.status.success(), "stdout: {}", String::from_utf8_lossy(&output.stdout));

  let results = results(&output)?;
  for name in ["configuration", "repository-state", "interrupted-run", "remote"] {
    assert_eq!(find(&results, name)["passed"], true, "{} failed", name);
  }
  assert!(
    find(&results, "toolchain")["message"]
      .as_str()
      .unwrap_or_default()
      .contains("webpub test stub")
  );
  Ok(())
}

#[test]
fn test_doctor_fails_on_dirty_tree() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.path.join("Cargo.toml"), "[package]\nname = \"solsys\"\n")?;

  let output = repo.webpub(&["doctor", "--json"], "")?;
  assert_eq!(output.status.code(), Some(3));
  let results = results(&output)?;
  let state = find(&results, "repository-state");
  assert_eq!(state["passed"], false);
  assert!(state["message"].as_str().unwrap_or_default().contains("Cargo.toml"));
  Ok(())
}

#[test]
fn test_doctor_reports_unreachable_remote() -> Result<()> {
  let repo = TestRepo::new()?;
  git(&repo.path, &["remote", "set-url", "origin", "/nonexistent/webpub-origin.git"])?;

  let quick = repo.webpub(&["doctor", "--json"], "")?;
  assert_eq!(find(&results(&quick)?, "remote")["passed"], true);

  let thorough = repo.webpub(&["doctor", "--thorough", "--json"], "")?;
  assert_eq!(thorough.status.code(), Some(3));
  assert_eq!(find(&results(&thorough)?, "remote")["passed"], false);
  Ok(())
}
