//! Compiler availability

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::cargo::CargoBuilder;
use crate::core::config::WebpubConfig;
use crate::core::error::WebpubResult;
use std::process::{Command, Stdio};

pub struct ToolchainCheck;

impl Check for ToolchainCheck {
  fn name(&self) -> &str {
    "toolchain"
  }

  fn description(&self) -> &str {
    "Checks cargo runs and the build target is installed"
  }

  fn run(&self, ctx: &CheckContext) -> WebpubResult<CheckResult> {
    let target = super::open_repository(ctx)
      .map(|(_, config)| config.build.target)
      .unwrap_or_else(|_| WebpubConfig::default().build.target);

    let version = match CargoBuilder::from_env().version() {
      Ok(version) => version,
      Err(e) => return Ok(CheckResult::error(self.name(), e.to_string(), e.help_message())),
    };

    match installed_targets() {
      Some(targets) if !targets.iter().any(|t| t == &target) => Ok(CheckResult::warning(
        self.name(),
        format!("{}, but target '{}' is not installed", version, target),
        Some(format!("rustup target add {}", target)),
      )),
      _ => Ok(CheckResult::pass(self.name(), format!("{} (target {})", version, target))),
    }
  }
}

/// Targets reported by `rustup target list --installed`, or None without rustup
fn installed_targets() -> Option<Vec<String>> {
  let output = Command::new("rustup")
    .args(["target", "list", "--installed"])
    .stdin(Stdio::null())
    .output()
    .ok()?;
  if !output.status.success() {
    return None;
  }
  Some(
    String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|line| line.trim().to_string())
      .filter(|line| !line.is_empty())
      .collect(),
  )
}
