use crate::cargo::CargoBuilder;
use crate::core::context::PublishContext;
use crate::core::error::WebpubResult;
use crate::core::pipeline::{CommitOutcome, Pipeline, PublishReport, STEP_COUNT};
use crate::core::plan::PublishPlan;
use crate::ui::progress::StepProgress;
use crate::utils::format_size;

/// Run the publish pipeline, or print its plan with `dry_run`
pub fn run_publish(ctx: &PublishContext, dry_run: bool, json: bool) -> WebpubResult<()> {
  let toolchain = CargoBuilder::from_env();

  if dry_run {
    let pipeline = Pipeline::new(&ctx.git, &toolchain, &ctx.config);
    let development = pipeline.preflight()?;
    let artifact = CargoBuilder::output_path(&ctx.root, &ctx.config.build)?;
    let plan = PublishPlan::new(&ctx.root, &development, &ctx.config, &toolchain, &artifact);

    if json {
      println!("{}", plan.to_json()?);
    } else {
      println!("{}", plan.to_human_readable());
      println!("🔍 Dry run: nothing was built, switched or pushed");
    }
    return Ok(());
  }

  let mut pipeline = Pipeline::new(&ctx.git, &toolchain, &ctx.config);
  if !json {
    println!("📦 Publishing {} (config: {})", ctx.root.display(), ctx.config_source());
    pipeline = pipeline.with_progress(StepProgress::new(STEP_COUNT, "Publishing"));
  }

  let report = pipeline.run()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_summary(&report);
  }
  Ok(())
}

fn print_summary(report: &PublishReport) {
  let elapsed = report.finished_at - report.started_at;
  let size = report.artifact.size.map(format_size).unwrap_or_default();

  match report.commit {
    CommitOutcome::Amended { ref sha } => println!(
      "\n✅ Published {} ({}) to {}/{} at {} in {:.1}s",
      report.artifact.published_path.display(),
      size,
      report.remote,
      report.publish_branch,
      &sha[..12.min(sha.len())],
      elapsed.num_milliseconds() as f64 / 1000.0
    ),
    CommitOutcome::Unchanged => println!(
      "\n✅ {} unchanged; pushed existing {}/{} in {:.1}s",
      report.artifact.published_path.display(),
      report.remote,
      report.publish_branch,
      elapsed.num_milliseconds() as f64 / 1000.0
    ),
  }
  println!("   Back on {}", report.development_branch);
}
