//! Scoped residence on the publishing branch
//!
//! [`BranchGuard::acquire`] records the development branch in a marker file
//! inside the git directory and checks out the publishing branch. Releasing the
//! guard (explicitly, or by dropping it during a panic) checks the development
//! branch back out and removes the marker. A process that is killed outright
//! leaves the marker behind for `cargo webpub restore` to act on.

use crate::core::error::WebpubResult;
use crate::core::pipeline::RestoreOutcome;
use crate::core::vcs::Repository;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Marker file name inside the repository's state dir
pub const MARKER_FILE: &str = "webpub-restore";

/// Location of the marker for `repo`
pub fn marker_path<R: Repository + ?Sized>(repo: &R) -> PathBuf {
  repo.state_dir().join(MARKER_FILE)
}

/// Branch recorded by an unfinished run, if any
pub fn read_marker<R: Repository + ?Sized>(repo: &R) -> WebpubResult<Option<String>> {
  match fs::read_to_string(marker_path(repo)) {
    Ok(content) => {
      let branch = content.trim();
      Ok((!branch.is_empty()).then(|| branch.to_string()))
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e.into()),
  }
}

/// Remove the marker; a missing marker is not an error
pub fn clear_marker<R: Repository + ?Sized>(repo: &R) -> WebpubResult<()> {
  match fs::remove_file(marker_path(repo)) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e.into()),
  }
}

/// Check out `branch` and drop the marker
pub fn restore_branch<R: Repository + ?Sized>(repo: &R, branch: &str) -> RestoreOutcome {
  match repo.checkout(branch) {
    Ok(()) => {
      if let Err(e) = clear_marker(repo) {
        eprintln!("⚠️  Restored '{}' but could not remove {}: {}", branch, MARKER_FILE, e);
      }
      RestoreOutcome::Restored {
        branch: branch.to_string(),
      }
    }
    Err(e) => RestoreOutcome::Failed {
      branch: branch.to_string(),
      reason: e.to_string(),
    },
  }
}

/// Holds the working tree on the publishing branch until released
pub struct BranchGuard<'a, R: Repository + ?Sized> {
  repo: &'a R,
  original: String,
  released: bool,
}

impl<'a, R: Repository + ?Sized> BranchGuard<'a, R> {
  /// Record `original` and switch to `target`
  ///
  /// If the checkout fails the marker is removed again and nothing needs restoring.
  pub fn acquire(repo: &'a R, original: &str, target: &str) -> WebpubResult<Self> {
    fs::write(marker_path(repo), format!("{}\n", original))?;

    if let Err(e) = repo.checkout(target) {
      let _ = clear_marker(repo);
      return Err(e);
    }

    Ok(Self {
      repo,
      original: original.to_string(),
      released: false,
    })
  }

  /// Branch the guard returns to
  pub fn original(&self) -> &str {
    &self.original
  }

  /// Return to the original branch
  pub fn release(mut self) -> RestoreOutcome {
    self.released = true;
    restore_branch(self.repo, &self.original)
  }
}

impl<R: Repository + ?Sized> Drop for BranchGuard<'_, R> {
  fn drop(&mut self) {
    if self.released {
      return;
    }
    if let RestoreOutcome::Failed { branch, reason } = restore_branch(self.repo, &self.original) {
      eprintln!("⚠️  Could not return to '{}': {}", branch, reason);
      eprintln!("   Run `cargo webpub restore` to retry.");
    }
  }
}
