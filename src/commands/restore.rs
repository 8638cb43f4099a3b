use crate::core::error::{GitError, WebpubResult};
use crate::core::guard;
use crate::core::pipeline::RestoreOutcome;
use crate::core::vcs::{Repository, SystemGit};
use std::path::Path;

/// Return the working tree to the branch recorded by an interrupted run
pub fn run_restore(dir: &Path) -> WebpubResult<()> {
  let git = SystemGit::open(dir)?;

  let Some(branch) = guard::read_marker(&git)? else {
    println!("✅ Nothing to restore");
    return Ok(());
  };

  if Repository::current_branch(&git)? == branch {
    guard::clear_marker(&git)?;
    println!("✅ Already on '{}'; removed stale restore marker", branch);
    return Ok(());
  }

  println!("↩️  Returning to {}", branch);
  match guard::restore_branch(&git, &branch) {
    RestoreOutcome::Failed { branch, reason } => Err(
      GitError::CheckoutFailed {
        branch,
        stderr: reason,
      }
      .into(),
    ),
    _ => {
      println!("✅ Restored '{}'", branch);
      Ok(())
    }
  }
}
