mod cargo;
mod checks;
mod commands;
mod core;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use crate::core::error::{WebpubError, print_error};

/// Build a wasm artifact and publish it as a single-commit snapshot on a git branch
#[derive(Parser)]
#[command(name = "cargo")]
#[command(bin_name = "cargo")]
#[command(styles = get_styles())]
enum CargoCli {
  Webpub(WebpubCli),
}

#[derive(Parser)]
#[command(name = "webpub")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct WebpubCli {
  /// Defaults to `publish`
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Build, commit to the publishing branch, force-push, and return
  Publish {
    /// Show the plan without building, switching or pushing
    #[arg(long)]
    dry_run: bool,
    /// Output the plan or run report as JSON
    #[arg(long)]
    json: bool,
  },

  /// Write webpub.toml with detected defaults
  Init {
    /// Overwrite an existing configuration
    #[arg(short, long)]
    force: bool,
  },

  /// Run health checks and diagnostics
  Doctor {
    /// Run thorough checks (includes network tests)
    #[arg(long)]
    thorough: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Return to the development branch after an interrupted publish
  Restore,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let CargoCli::Webpub(cli) = CargoCli::parse();

  let current_dir = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let command = cli.command.unwrap_or(Commands::Publish {
    dry_run: false,
    json: false,
  });

  let result = match command {
    Commands::Publish { dry_run, json } => {
      crate::core::context::PublishContext::build(&current_dir).and_then(|ctx| commands::run_publish(&ctx, dry_run, json))
    }
    Commands::Init { force } => commands::run_init(&current_dir, force),
    Commands::Doctor { thorough, json } => commands::run_doctor(&current_dir, thorough, json),
    Commands::Restore => commands::run_restore(&current_dir),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: WebpubError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
