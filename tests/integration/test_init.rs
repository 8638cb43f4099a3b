//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_writes_detected_defaults() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = repo.webpub(&["init"], "")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let config = std::fs::read_to_string(repo.path.join("webpub.toml"))?;
  assert!(config.contains("artifact = \"solsys.wasm\""), "config: {}", config);
  assert!(config.contains("branch = \"web\""));
  assert!(config.contains("target = \"wasm32-unknown-unknown\""));
  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.path.join("webpub.toml"), "[publish]\nbranch = \"pages\"\n")?;

  let output = repo.webpub(&["init"], "")?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--force"));
  assert!(std::fs::read_to_string(repo.path.join("webpub.toml"))?.contains("pages"));

  let output = repo.webpub(&["init", "--force"], "")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(std::fs::read_to_string(repo.path.join("webpub.toml"))?.contains("branch = \"web\""));
  Ok(())
}
