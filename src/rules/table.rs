use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::{AssetKind, RuleEntry};
use crate::rules::defaults::{default_script_rules, default_style_rules};
use crate::rules::validate::{RuleError, validate_rule};

/// Rules for one asset kind plus whether anything outside the defaults touched them.
#[derive(Debug, Clone, Default)]
struct KindRules {
  entries: BTreeMap<String, RuleEntry>,
  extended: bool,
}

/// Handle → cdnjs rule mapping, one independent namespace per [`AssetKind`].
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
  scripts: KindRules,
  styles: KindRules,
}

/// Result of merging externally contributed rules.
#[derive(Debug, Default)]
pub struct MergeOutcome {
  /// Handles that were added or replaced.
  pub accepted: Vec<String>,
  /// Entries refused by validation.
  pub rejected: Vec<RuleError>,
}

impl MergeOutcome {
  /// Returns `true` when every contributed entry was accepted.
  pub fn is_clean(&self) -> bool {
    self.rejected.is_empty()
  }
}

impl RuleTable {
  /// Empty table with no rules for either kind.
  pub fn new() -> Self {
    Self::default()
  }

  /// Table seeded with the built-in script and style rules.
  pub fn with_defaults() -> Self {
    Self {
      scripts: KindRules {
        entries: default_script_rules(),
        extended: false,
      },
      styles: KindRules {
        entries: default_style_rules(),
        extended: false,
      },
    }
  }

  /// Look up the rule for `handle` among rules of `kind`.
  pub fn get(&self, kind: AssetKind, handle: &str) -> Option<&RuleEntry> {
    self.kind(kind).entries.get(handle)
  }

  /// Iterate the `(handle, rule)` pairs of one kind in handle order.
  pub fn entries(&self, kind: AssetKind) -> impl Iterator<Item = (&str, &RuleEntry)> {
    self
      .kind(kind)
      .entries
      .iter()
      .map(|(handle, rule)| (handle.as_str(), rule))
  }

  /// Number of rules registered for `kind`.
  pub fn len(&self, kind: AssetKind) -> usize {
    self.kind(kind).entries.len()
  }

  /// Whether rules for `kind` were contributed or removed after construction.
  pub fn is_extended(&self, kind: AssetKind) -> bool {
    self.kind(kind).extended
  }

  /// Validate and insert a single rule, returning the rule it replaced.
  pub fn insert(
    &mut self,
    kind: AssetKind,
    handle: impl Into<String>,
    rule: RuleEntry,
  ) -> Result<Option<RuleEntry>, RuleError> {
    let handle = handle.into();
    validate_rule(&handle, &rule)?;
    let rules = self.kind_mut(kind);
    rules.extended = true;
    Ok(rules.entries.insert(handle, rule))
  }

  /// Merge externally contributed rules; the last writer wins on handle collisions.
  ///
  /// Malformed entries are logged and skipped so one bad contribution cannot break the
  /// remaining rules.
  pub fn extend<I, H>(&mut self, kind: AssetKind, rules: I) -> MergeOutcome
  where
    I: IntoIterator<Item = (H, RuleEntry)>,
    H: Into<String>,
  {
    let mut outcome = MergeOutcome::default();
    self.kind_mut(kind).extended = true;

    for (handle, rule) in rules {
      let handle = handle.into();
      match self.insert(kind, handle.clone(), rule) {
        Ok(previous) => {
          if previous.is_some() {
            debug!(%kind, %handle, "replaced cdnjs rule");
          }
          outcome.accepted.push(handle);
        }
        Err(err) => {
          warn!(%kind, error = %err, "rejected cdnjs rule");
          outcome.rejected.push(err);
        }
      }
    }

    outcome
  }

  /// Drop the rule for `handle`, returning it when present.
  pub fn remove(&mut self, kind: AssetKind, handle: &str) -> Option<RuleEntry> {
    let rules = self.kind_mut(kind);
    rules.extended = true;
    rules.entries.remove(handle)
  }

  fn kind(&self, kind: AssetKind) -> &KindRules {
    match kind {
      AssetKind::Script => &self.scripts,
      AssetKind::Style => &self.styles,
    }
  }

  fn kind_mut(&mut self, kind: AssetKind) -> &mut KindRules {
    match kind {
      AssetKind::Script => &mut self.scripts,
      AssetKind::Style => &mut self.styles,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_not_marked_extended() {
    let table = RuleTable::with_defaults();
    assert!(!table.is_extended(AssetKind::Script));
    assert!(!table.is_extended(AssetKind::Style));
    assert_eq!(
      table.get(AssetKind::Script, "underscore"),
      Some(&RuleEntry::new("underscore.js", "underscore", "-min"))
    );
  }

  #[test]
  fn kinds_are_independent_namespaces() {
    let mut table = RuleTable::with_defaults();
    table
      .insert(AssetKind::Style, "underscore", RuleEntry::new("underscore.js", "underscore", ""))
      .unwrap();

    assert_eq!(table.get(AssetKind::Style, "underscore").unwrap().minified, "");
    assert_eq!(table.get(AssetKind::Script, "underscore").unwrap().minified, "-min");
    assert!(table.get(AssetKind::Style, "jquery-core").is_none());
    assert!(!table.is_extended(AssetKind::Script));
  }

  #[test]
  fn extend_replaces_on_collision_and_marks_kind() {
    let mut table = RuleTable::with_defaults();
    let outcome = table.extend(AssetKind::Script, [
      ("jquery-core", RuleEntry::new("jquery", "jquery.slim", ".min")),
      ("lodash", RuleEntry::new("lodash.js", "lodash", ".min")),
    ]);

    assert!(outcome.is_clean());
    assert_eq!(outcome.accepted, vec!["jquery-core".to_string(), "lodash".to_string()]);
    assert_eq!(table.get(AssetKind::Script, "jquery-core").unwrap().file, "jquery.slim");
    assert_eq!(table.len(AssetKind::Script), 11);
    assert!(table.is_extended(AssetKind::Script));
    assert!(!table.is_extended(AssetKind::Style));
  }

  #[test]
  fn extend_rejects_malformed_entries_without_dropping_valid_ones() {
    let mut table = RuleTable::new();
    let outcome = table.extend(AssetKind::Style, [
      ("broken", RuleEntry::new("", "file", "")),
      ("fontawesome", RuleEntry::new("font-awesome", "css/font-awesome", ".min")),
    ]);

    assert!(!outcome.is_clean());
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.accepted, vec!["fontawesome".to_string()]);
    assert!(table.get(AssetKind::Style, "broken").is_none());
  }

  #[test]
  fn empty_extension_still_marks_kind() {
    let mut table = RuleTable::with_defaults();
    table.extend(AssetKind::Style, Vec::<(String, RuleEntry)>::new());
    assert!(table.is_extended(AssetKind::Style));
  }

  #[test]
  fn remove_drops_rule() {
    let mut table = RuleTable::with_defaults();
    assert!(table.remove(AssetKind::Script, "backbone").is_some());
    assert!(table.get(AssetKind::Script, "backbone").is_none());
    assert!(table.remove(AssetKind::Script, "backbone").is_none());
    assert!(table.is_extended(AssetKind::Script));
  }
}
