//! Command-line front end rewriting a serialized page snapshot.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use use_cdnjs::{CdnRewriter, PageAssets, Phase, RewriteConfig, RuleFile};

#[derive(Debug, Parser)]
#[command(name = "use-cdnjs", version, about = "Serve known libraries from cdnjs")]
struct Cli {
  /// Configuration file; defaults to use-cdnjs.config.json in the working directory.
  #[arg(long, global = true)]
  config: Option<PathBuf>,
  /// Additional JSON or YAML rule files, merged in order.
  #[arg(long = "rules", global = true)]
  rules: Vec<PathBuf>,
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Rewrite the sources of a page snapshot and print the result as JSON.
  Rewrite {
    /// Page snapshot with `scripts` and `styles` arrays, or `-` for stdin.
    page: PathBuf,
    /// Request unminified files.
    #[arg(long)]
    debug: bool,
    /// Last lifecycle phase to run.
    #[arg(long, value_enum, default_value_t = PhaseArg::FooterScripts)]
    through: PhaseArg,
    /// Keep the `ver` query argument on cdnjs sources.
    #[arg(long)]
    keep_version: bool,
  },
  /// Print the effective rule table as JSON.
  Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PhaseArg {
  Init,
  DefaultAssets,
  EnqueueAssets,
  FooterScripts,
}

impl From<PhaseArg> for Phase {
  fn from(value: PhaseArg) -> Self {
    match value {
      PhaseArg::Init => Phase::Init,
      PhaseArg::DefaultAssets => Phase::DefaultAssets,
      PhaseArg::EnqueueAssets => Phase::EnqueueAssets,
      PhaseArg::FooterScripts => Phase::FooterScripts,
    }
  }
}

fn main() -> Result<()> {
  init_logging();
  let cli = Cli::parse();

  let (config, base_dir) = load_config(cli.config.as_deref())?;
  let rewriter = CdnRewriter::from_config(&config, &base_dir, &cli.rules)?;

  match cli.command {
    Command::Rewrite {
      page,
      debug,
      through,
      keep_version,
    } => {
      let page = read_page(&page)?;
      let mut env = config.environment();
      env.script_debug |= debug;

      let mut output = rewriter.rewrite_page(page, &mut env, through.into());
      if !keep_version {
        output.strip_cdn_versions();
      }

      println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Command::Rules => {
      println!("{}", serde_json::to_string_pretty(&RuleFile::from_table(rewriter.rules()))?);
    }
  }

  Ok(())
}

fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(io::stderr).with_target(false))
    .init();
}

fn load_config(path: Option<&Path>) -> Result<(RewriteConfig, PathBuf)> {
  match path {
    Some(path) => {
      let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
      Ok((RewriteConfig::load(path)?, base_dir))
    }
    None => {
      let cwd = std::env::current_dir().context("failed to resolve working directory")?;
      Ok((RewriteConfig::discover(&cwd), cwd))
    }
  }
}

fn read_page(path: &Path) -> Result<PageAssets> {
  let content = if path == Path::new("-") {
    let mut buffer = String::new();
    io::stdin()
      .read_to_string(&mut buffer)
      .context("failed to read page snapshot from stdin")?;
    buffer
  } else {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
  };

  serde_json::from_str(&content).context("failed to parse page snapshot JSON")
}
