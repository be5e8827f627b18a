//! Substitution engine rewriting registered sources to their cdnjs copies.

use tracing::{debug, trace};

use crate::cdn::{build_cdn_url, minified_suffix};
use crate::registry::AssetRegistry;
use crate::rules::RuleTable;
use crate::version::is_standard_version;

/// What a single substitution pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
  /// Handles whose source now points at cdnjs.
  pub rewritten: Vec<String>,
  /// Handles left alone because their version is not a release version.
  pub skipped_versions: Vec<String>,
  /// Rules with no matching registered asset.
  pub unmatched: usize,
}

impl SubstitutionReport {
  /// Returns `true` when no source was rewritten.
  pub fn is_noop(&self) -> bool {
    self.rewritten.is_empty()
  }
}

/// Rewrite every asset in `registry` that has a rule of the registry's kind.
///
/// Assets with a hyphenated version keep their source. Only `src` is ever written and
/// running the pass again with the same inputs produces the same sources.
pub fn apply<R>(table: &RuleTable, registry: &mut R, script_debug: bool) -> SubstitutionReport
where
  R: AssetRegistry + ?Sized,
{
  let kind = registry.kind();
  let extension = kind.extension();
  let mut report = SubstitutionReport::default();

  for (handle, rule) in table.entries(kind) {
    let Some(asset) = registry.query_mut(handle) else {
      report.unmatched += 1;
      continue;
    };

    if !is_standard_version(&asset.ver) {
      debug!(%kind, handle, version = %asset.ver, "skipping non-standard version");
      report.skipped_versions.push(handle.to_string());
      continue;
    }

    let suffix = minified_suffix(rule, script_debug);
    let url = build_cdn_url(&rule.library, &rule.file, suffix, extension, &asset.ver);
    trace!(%kind, handle, from = %asset.src, to = %url, "rewriting source");
    asset.src = url;
    report.rewritten.push(handle.to_string());
  }

  debug!(
    %kind,
    rewritten = report.rewritten.len(),
    skipped = report.skipped_versions.len(),
    unmatched = report.unmatched,
    "substitution pass finished"
  );
  report
}
