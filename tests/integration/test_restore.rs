//! Tests for recovering from an interrupted publish

use crate::helpers::*;
use anyhow::Result;

/// Leave the repository the way a killed run would: on `web` with the marker written
fn interrupt(repo: &TestRepo) -> Result<()> {
  std::fs::write(repo.marker(), "master\n")?;
  git(&repo.path, &["checkout", "web"])?;
  Ok(())
}

#[test]
fn test_publish_refuses_after_interruption() -> Result<()> {
  let repo = TestRepo::new()?;
  interrupt(&repo)?;

  let output = repo.webpub(&[], "x")?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("interrupted"), "stderr: {}", err);
  assert!(err.contains("cargo webpub restore"), "stderr: {}", err);
  assert_eq!(repo.current_branch()?, "web");
  Ok(())
}

#[test]
fn test_restore_returns_to_recorded_branch() -> Result<()> {
  let repo = TestRepo::new()?;
  interrupt(&repo)?;

  let output = repo.webpub(&["restore"], "")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(repo.current_branch()?, "master");
  assert!(!repo.marker().exists());

  // A normal publish works again
  let output = repo.webpub(&[], "after restore")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  Ok(())
}

#[test]
fn test_restore_without_marker_is_a_no_op() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = repo.webpub(&["restore"], "")?;
  assert!(output.status.success());
  assert!(String::from_utf8_lossy(&output.stdout).contains("Nothing to restore"));
  assert_eq!(repo.current_branch()?, "master");
  Ok(())
}

#[test]
fn test_stale_marker_does_not_block_publish() -> Result<()> {
  let repo = TestRepo::new()?;
  std::fs::write(repo.marker(), "master\n")?;

  let output = repo.webpub(&[], "x")?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(!repo.marker().exists());
  Ok(())
}
