//! Entry points the host calls at fixed points of its page lifecycle.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RewriteConfig;
use crate::engine::{SubstitutionReport, apply};
use crate::models::{AssetKind, PageAssets};
use crate::registry::{AssetRegistry, DependencyRegistry};
use crate::rules::RuleTable;

/// Host flags the rewriter reads or adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEnvironment {
  /// Serve unminified files.
  pub script_debug: bool,
  /// Whether the host concatenates local assets into a single request.
  pub concatenate_scripts: bool,
}

impl Default for HostEnvironment {
  fn default() -> Self {
    Self {
      script_debug: false,
      concatenate_scripts: true,
    }
  }
}

/// Lifecycle points at which the host invokes [`CdnRewriter::run_pass`], in the order
/// they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
  /// Host initialisation; concatenation is switched off.
  Init,
  /// Default scripts and styles have been registered.
  DefaultAssets,
  /// Themes and plugins have enqueued their assets.
  EnqueueAssets,
  /// Footer scripts are about to be printed.
  FooterScripts,
}

impl Phase {
  /// Every phase in lifecycle order.
  pub const ALL: [Phase; 4] = [
    Self::Init,
    Self::DefaultAssets,
    Self::EnqueueAssets,
    Self::FooterScripts,
  ];
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Init => "init",
      Self::DefaultAssets => "default-assets",
      Self::EnqueueAssets => "enqueue-assets",
      Self::FooterScripts => "footer-scripts",
    };
    f.write_str(name)
  }
}

/// Outcome of one lifecycle pass; `None` means the kind was not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
  /// Phase that ran.
  pub phase: Phase,
  /// Script substitution result.
  pub scripts: Option<SubstitutionReport>,
  /// Style substitution result.
  pub styles: Option<SubstitutionReport>,
}

impl PassReport {
  fn empty(phase: Phase) -> Self {
    Self {
      phase,
      scripts: None,
      styles: None,
    }
  }

  /// Total number of rewritten sources across both kinds.
  pub fn rewritten(&self) -> usize {
    [&self.scripts, &self.styles]
      .into_iter()
      .flatten()
      .map(|report| report.rewritten.len())
      .sum()
  }
}

/// Owns the rule table and sequences substitution passes for the host.
#[derive(Debug, Clone)]
pub struct CdnRewriter {
  rules: RuleTable,
}

impl Default for CdnRewriter {
  fn default() -> Self {
    Self::new(RuleTable::with_defaults())
  }
}

impl CdnRewriter {
  /// Rewriter working from an existing table.
  pub fn new(rules: RuleTable) -> Self {
    Self { rules }
  }

  /// Default rules merged with the extra rules declared in `config`, then `extra_files`.
  ///
  /// Configured rule files are resolved against `base_dir`.
  pub fn from_config(
    config: &RewriteConfig,
    base_dir: &Path,
    extra_files: &[PathBuf],
  ) -> Result<Self> {
    Ok(Self::new(config.build_rule_table(base_dir, extra_files)?))
  }

  /// Current rule table.
  pub fn rules(&self) -> &RuleTable {
    &self.rules
  }

  /// Mutable rule table, for hosts contributing rules between passes.
  pub fn rules_mut(&mut self) -> &mut RuleTable {
    &mut self.rules
  }

  /// Run whatever `phase` requires against the host registries.
  ///
  /// The default-assets pass always processes both kinds. The later passes only re-run
  /// for a kind whose rules were extended, since assets matching the defaults were
  /// already rewritten.
  pub fn run_pass<S, T>(
    &self,
    phase: Phase,
    env: &mut HostEnvironment,
    scripts: &mut S,
    styles: &mut T,
  ) -> PassReport
  where
    S: AssetRegistry + ?Sized,
    T: AssetRegistry + ?Sized,
  {
    let mut report = PassReport::empty(phase);

    match phase {
      Phase::Init => {
        debug!("disabling asset concatenation");
        env.concatenate_scripts = false;
      }
      Phase::DefaultAssets => {
        report.scripts = Some(apply(&self.rules, scripts, env.script_debug));
        report.styles = Some(apply(&self.rules, styles, env.script_debug));
      }
      Phase::EnqueueAssets | Phase::FooterScripts => {
        if self.rules.is_extended(AssetKind::Script) {
          report.scripts = Some(apply(&self.rules, scripts, env.script_debug));
        }
        if self.rules.is_extended(AssetKind::Style) {
          report.styles = Some(apply(&self.rules, styles, env.script_debug));
        }
      }
    }

    info!(%phase, rewritten = report.rewritten(), "cdnjs pass complete");
    report
  }

  /// Replay the lifecycle on a page snapshot, running every phase up to and including
  /// `through`. Assets come back in handle order.
  pub fn rewrite_page(
    &self,
    page: PageAssets,
    env: &mut HostEnvironment,
    through: Phase,
  ) -> PageAssets {
    let mut scripts = DependencyRegistry::from_assets(AssetKind::Script, page.scripts);
    let mut styles = DependencyRegistry::from_assets(AssetKind::Style, page.styles);

    for phase in Phase::ALL.into_iter().filter(|phase| *phase <= through) {
      self.run_pass(phase, env, &mut scripts, &mut styles);
    }

    PageAssets {
      scripts: scripts.into_assets(),
      styles: styles.into_assets(),
    }
  }
}
