use crate::checks::{CheckContext, Severity, create_default_runner};
use crate::core::error::{ExitCode, WebpubResult};
use std::path::Path;

/// Run health checks; exits with the validation code when any error-severity check fails
pub fn run_doctor(dir: &Path, thorough: bool, json: bool) -> WebpubResult<()> {
  let ctx = CheckContext {
    root: dir.to_path_buf(),
    thorough,
  };

  let runner = create_default_runner();
  let results = runner.run_all(&ctx);
  let has_errors = results
    .iter()
    .any(|r| !r.passed && r.severity == Severity::Error);

  if json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else {
    println!("🏥 Running health checks...\n");

    println!("📋 Registered checks:");
    for check in runner.checks() {
      println!("   • {}: {}", check.name(), check.description());
    }
    println!();

    let mut has_warnings = false;
    for result in &results {
      let icon = match (result.passed, result.severity) {
        (true, _) => "✅",
        (false, Severity::Warning) => "⚠️ ",
        (false, _) => "❌",
      };
      println!("{} {}: {}", icon, result.check_name, result.message);

      if !result.passed {
        if let Some(ref suggestion) = result.suggestion {
          println!("   💡 Fix: {}", suggestion);
        }
        has_warnings |= result.severity == Severity::Warning;
      }
      println!();
    }

    let passed_count = results.iter().filter(|r| r.passed).count();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Summary: {}/{} checks passed", passed_count, results.len());

    if has_errors {
      println!("\n⚠️  Critical issues found. Fix errors before publishing.");
    } else if has_warnings {
      println!("\n⚠️  Some warnings found. Consider addressing them.");
    } else {
      println!("\n✨ All checks passed! Ready to publish.");
    }
  }

  if has_errors {
    std::process::exit(ExitCode::Validation.as_i32());
  }
  Ok(())
}
