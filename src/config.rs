//! Configuration loader for rewriter flags and externally contributed rules.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::lifecycle::HostEnvironment;
use crate::models::{AssetKind, RuleEntry};
use crate::rules::{MergeOutcome, RuleTable};

/// File name looked up by [`RewriteConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "use-cdnjs.config.json";

/// Extra rules for both kinds, as stored in rule files and inline in the config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleFile {
  /// Script rules keyed by handle.
  pub scripts: BTreeMap<String, RuleEntry>,
  /// Style rules keyed by handle.
  pub styles: BTreeMap<String, RuleEntry>,
}

impl RuleFile {
  /// Read a rule file, parsing YAML for `.yaml`/`.yml` and JSON otherwise.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("failed to read rule file {}", path.display()))?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse YAML rule file {}", path.display()))
    } else {
      serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON rule file {}", path.display()))
    }
  }

  /// Snapshot of every rule currently held by `table`.
  pub fn from_table(table: &RuleTable) -> Self {
    let collect = |kind: AssetKind| -> BTreeMap<String, RuleEntry> {
      table
        .entries(kind)
        .map(|(handle, rule)| (handle.to_string(), rule.clone()))
        .collect()
    };
    Self {
      scripts: collect(AssetKind::Script),
      styles: collect(AssetKind::Style),
    }
  }

  /// Merge the non-empty kinds into `table`, warning once per kind with rejected rules.
  ///
  /// A kind without rules is left alone so it does not trigger later passes. `origin`
  /// names where the rules came from in the warning.
  pub fn merge_into(&self, table: &mut RuleTable, origin: &str) -> Vec<(AssetKind, MergeOutcome)> {
    let mut outcomes = Vec::new();
    for (kind, rules) in [(AssetKind::Script, &self.scripts), (AssetKind::Style, &self.styles)] {
      if rules.is_empty() {
        continue;
      }
      let outcome = table.extend(kind, rules.iter().map(|(h, r)| (h.clone(), r.clone())));
      if !outcome.is_clean() {
        warn!(
          %kind,
          origin,
          rejected = outcome.rejected.len(),
          "some rules were rejected"
        );
      }
      outcomes.push((kind, outcome));
    }
    outcomes
  }
}

/// Discoverable rewriter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
  /// Request unminified files from cdnjs.
  pub script_debug: bool,
  /// Initial state of the host's concatenation flag.
  pub concatenate_scripts: bool,
  /// Inline extra script rules.
  pub scripts: BTreeMap<String, RuleEntry>,
  /// Inline extra style rules.
  pub styles: BTreeMap<String, RuleEntry>,
  /// Rule files to merge, relative to the directory holding the config.
  pub rule_files: Vec<String>,
}

impl Default for RewriteConfig {
  fn default() -> Self {
    Self {
      script_debug: false,
      concatenate_scripts: true,
      scripts: BTreeMap::new(),
      styles: BTreeMap::new(),
      rule_files: Vec::new(),
    }
  }
}

impl RewriteConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// A missing or unparsable file falls back to defaults.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file, ignoring errors.
  pub fn from_path(path: &Path) -> Option<Self> {
    Self::load(path).ok()
  }

  /// Read configuration from a specific JSON file, reporting errors.
  ///
  /// The document must be a JSON object; serde would otherwise accept an array as the
  /// fields in declaration order.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("failed to read config {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
      .with_context(|| format!("failed to parse config {}", path.display()))?;
    ensure!(
      value.is_object(),
      "failed to parse config {}: expected a JSON object",
      path.display()
    );
    serde_json::from_value(value)
      .with_context(|| format!("failed to parse config {}", path.display()))
  }

  /// Host flags implied by this configuration.
  pub fn environment(&self) -> HostEnvironment {
    HostEnvironment {
      script_debug: self.script_debug,
      concatenate_scripts: self.concatenate_scripts,
    }
  }

  /// Inline rules as a [`RuleFile`].
  pub fn inline_rules(&self) -> RuleFile {
    RuleFile {
      scripts: self.scripts.clone(),
      styles: self.styles.clone(),
    }
  }

  /// Locations of the configured rule files.
  pub fn rule_file_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
    self
      .rule_files
      .iter()
      .map(|file| base_dir.join(file))
      .collect()
  }

  /// Default rules extended with the inline rules, each configured rule file, then
  /// `extra_files` in order.
  pub fn build_rule_table(&self, base_dir: &Path, extra_files: &[PathBuf]) -> Result<RuleTable> {
    let mut table = RuleTable::with_defaults();
    self.inline_rules().merge_into(&mut table, "inline config");

    let paths = self.rule_file_paths(base_dir).into_iter().chain(extra_files.iter().cloned());
    for path in paths {
      RuleFile::load(&path)?.merge_into(&mut table, &path.display().to_string());
    }
    Ok(table)
  }
}
