//! Capability the substitution engine needs from the host's dependency registry.

use std::collections::BTreeMap;

use crate::models::{AssetKind, RegisteredAsset};

/// Live registry of assets of a single kind.
///
/// Implementations hand out the stored record itself so rewritten sources are visible to
/// whatever prints the page later.
pub trait AssetRegistry {
  /// Kind of the assets held by this registry.
  fn kind(&self) -> AssetKind;

  /// Mutable access to the asset registered under `handle`.
  fn query_mut(&mut self, handle: &str) -> Option<&mut RegisteredAsset>;
}

/// In-memory registry keyed by handle.
#[derive(Debug, Clone)]
pub struct DependencyRegistry {
  kind: AssetKind,
  assets: BTreeMap<String, RegisteredAsset>,
}

impl DependencyRegistry {
  /// Empty registry for `kind`.
  pub fn new(kind: AssetKind) -> Self {
    Self {
      kind,
      assets: BTreeMap::new(),
    }
  }

  /// Registry holding `assets`; later duplicates replace earlier ones.
  pub fn from_assets(kind: AssetKind, assets: impl IntoIterator<Item = RegisteredAsset>) -> Self {
    let mut registry = Self::new(kind);
    for asset in assets {
      registry.register(asset);
    }
    registry
  }

  /// Register or replace an asset, returning the previous record.
  pub fn register(&mut self, asset: RegisteredAsset) -> Option<RegisteredAsset> {
    self.assets.insert(asset.handle.clone(), asset)
  }

  /// Read-only lookup.
  pub fn query(&self, handle: &str) -> Option<&RegisteredAsset> {
    self.assets.get(handle)
  }

  /// Number of registered assets.
  pub fn len(&self) -> usize {
    self.assets.len()
  }

  /// Returns `true` when nothing is registered.
  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  /// Consume the registry, yielding its records in handle order.
  pub fn into_assets(self) -> Vec<RegisteredAsset> {
    self.assets.into_values().collect()
  }
}

impl AssetRegistry for DependencyRegistry {
  fn kind(&self) -> AssetKind {
    self.kind
  }

  fn query_mut(&mut self, handle: &str) -> Option<&mut RegisteredAsset> {
    self.assets.get_mut(handle)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn query_mut_exposes_live_record() {
    let mut registry = DependencyRegistry::from_assets(AssetKind::Script, [RegisteredAsset::new(
      "backbone",
      "1.2.3",
      "/wp-includes/js/backbone.min.js",
    )]);

    registry.query_mut("backbone").unwrap().src = "rewritten".into();
    assert_eq!(registry.query("backbone").unwrap().src, "rewritten");
    assert!(registry.query_mut("missing").is_none());
  }

  #[test]
  fn later_registration_replaces_earlier() {
    let mut registry = DependencyRegistry::new(AssetKind::Style);
    assert!(registry.is_empty());
    assert!(registry.register(RegisteredAsset::new("mediaelement", "2.21.0", "a.css")).is_none());
    let previous = registry.register(RegisteredAsset::new("mediaelement", "2.22.0", "b.css"));

    assert_eq!(previous.unwrap().ver, "2.21.0");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.kind(), AssetKind::Style);
  }
}
