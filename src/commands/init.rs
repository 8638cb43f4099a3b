use crate::cargo::manifest;
use crate::core::config::WebpubConfig;
use crate::core::error::{ConfigError, WebpubResult};
use crate::core::vcs::SystemGit;
use std::path::Path;

/// Write webpub.toml at the working-tree root
///
/// The artifact name is filled in from Cargo.toml when it can be derived.
pub fn run_init(dir: &Path, force: bool) -> WebpubResult<()> {
  let root = SystemGit::open(dir)
    .map(|git| git.work_tree)
    .unwrap_or_else(|_| dir.to_path_buf());

  if let Ok(name) = manifest::package_name(&root) {
    println!("📦 Found package {} at {}", name, root.display());
  }

  if let Some(existing) = WebpubConfig::find_config_path(&root)
    && !force
  {
    return Err(ConfigError::AlreadyExists { path: existing }.into());
  }

  let mut config = WebpubConfig::default();
  match manifest::artifact_file_name(&root, &config.build.target, None) {
    Ok(name) => {
      println!("🔍 Detected artifact: {}", name);
      config.build.artifact = Some(name);
    }
    Err(e) => println!("⚠️  Could not detect the artifact name ({}); it will be derived at build time", e),
  }

  let path = config.save(&root)?;
  println!("✅ Wrote {}", path.display());
  println!(
    "   Publishing {}/{} from {} builds for {}",
    config.publish.remote, config.publish.branch, config.build.profile, config.build.target
  );
  Ok(())
}
