//! Check runner for executing health checks

use super::trait_def::{Check, CheckContext, CheckResult};
use std::sync::Arc;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  ///
  /// A check that cannot run at all becomes an error result.
  pub fn run_all(&self, ctx: &CheckContext) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for check in &self.checks {
      if check.is_expensive() && !ctx.thorough {
        continue;
      }

      match check.run(ctx) {
        Ok(result) => results.push(result),
        Err(err) => {
          results.push(CheckResult::error(
            check.name(),
            format!("Check failed to run: {}", err),
            err.help_message(),
          ));
        }
      }
    }

    results
  }

  /// Get all registered checks
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();

  runner.add_check(Arc::new(super::configuration::ConfigurationCheck));
  runner.add_check(Arc::new(super::repository::RepositoryStateCheck));
  runner.add_check(Arc::new(super::interrupted::InterruptedRunCheck));
  runner.add_check(Arc::new(super::remote::RemoteCheck));
  runner.add_check(Arc::new(super::toolchain::ToolchainCheck));

  runner
}
