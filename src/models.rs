//! Data structures shared by the rule table, the registry and the substitution engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cdn::remove_version;

/// Kind of dependency an asset or rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
  /// JavaScript include.
  Script,
  /// Stylesheet include.
  Style,
}

impl AssetKind {
  /// File extension appended to cdnjs URLs for this kind.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Script => ".js",
      Self::Style => ".css",
    }
  }

  /// Both kinds, scripts first.
  pub fn all() -> [AssetKind; 2] {
    [Self::Script, Self::Style]
  }
}

impl fmt::Display for AssetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Script => f.write_str("script"),
      Self::Style => f.write_str("style"),
    }
  }
}

/// Where a registered handle lives on cdnjs.
///
/// The handle itself is the key in [`crate::rules::RuleTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
  /// Library name as listed on cdnjs.
  pub library: String,
  /// File name without suffix or extension, possibly inside a subdirectory.
  pub file: String,
  /// Suffix of the minified variant, empty when the library ships none.
  #[serde(default)]
  pub minified: String,
}

impl RuleEntry {
  /// Convenience constructor used by the default table and tests.
  pub fn new(
    library: impl Into<String>,
    file: impl Into<String>,
    minified: impl Into<String>,
  ) -> Self {
    Self {
      library: library.into(),
      file: file.into(),
      minified: minified.into(),
    }
  }

  /// Returns `true` when cdnjs hosts a minified variant for this rule.
  pub fn has_minified(&self) -> bool {
    !self.minified.is_empty()
  }
}

/// Asset record owned by the host registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAsset {
  /// Handle the asset was registered under.
  pub handle: String,
  /// Registered version string.
  #[serde(default)]
  pub ver: String,
  /// Source URL printed for the asset.
  #[serde(default)]
  pub src: String,
}

impl RegisteredAsset {
  /// Build a record from its three fields.
  pub fn new(handle: impl Into<String>, ver: impl Into<String>, src: impl Into<String>) -> Self {
    Self {
      handle: handle.into(),
      ver: ver.into(),
      src: src.into(),
    }
  }
}

/// Serializable snapshot of the assets registered for a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAssets {
  /// Registered scripts.
  #[serde(default)]
  pub scripts: Vec<RegisteredAsset>,
  /// Registered stylesheets.
  #[serde(default)]
  pub styles: Vec<RegisteredAsset>,
}

impl PageAssets {
  /// Drop the `ver` cache-busting argument from every cdnjs source.
  pub fn strip_cdn_versions(&mut self) {
    for asset in self.scripts.iter_mut().chain(self.styles.iter_mut()) {
      let stripped = remove_version(&asset.src).into_owned();
      asset.src = stripped;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_follows_kind() {
    assert_eq!(AssetKind::Script.extension(), ".js");
    assert_eq!(AssetKind::Style.extension(), ".css");
  }

  #[test]
  fn rule_entry_defaults_missing_suffix_to_empty() {
    let rule: RuleEntry =
      serde_json::from_str(r#"{"library": "plupload", "file": "plupload.full.min"}"#).unwrap();
    assert_eq!(rule, RuleEntry::new("plupload", "plupload.full.min", ""));
    assert!(!rule.has_minified());
  }

  #[test]
  fn page_assets_accept_partial_snapshots() {
    let page: PageAssets =
      serde_json::from_str(r#"{"scripts": [{"handle": "underscore", "ver": "1.8.3"}]}"#).unwrap();
    assert_eq!(page.scripts, vec![RegisteredAsset::new("underscore", "1.8.3", "")]);
    assert!(page.styles.is_empty());
  }

  #[test]
  fn strip_cdn_versions_only_touches_cdnjs_sources() {
    let mut page = PageAssets {
      scripts: vec![
        RegisteredAsset::new(
          "jquery-core",
          "1.12.4",
          "https://cdnjs.cloudflare.com/ajax/libs/jquery/1.12.4/jquery.min.js?ver=1.12.4",
        ),
        RegisteredAsset::new("wp-util", "4.7", "/wp-includes/js/wp-util.min.js?ver=4.7"),
      ],
      styles: vec![RegisteredAsset::new(
        "mediaelement",
        "2.21.0",
        "https://cdnjs.cloudflare.com/ajax/libs/mediaelement/2.21.0/mediaelementplayer.min.css?ver=2.21.0",
      )],
    };
    let untouched = page.clone();

    page.strip_cdn_versions();

    assert_eq!(
      page.scripts[0].src,
      "https://cdnjs.cloudflare.com/ajax/libs/jquery/1.12.4/jquery.min.js"
    );
    assert_eq!(page.scripts[1].src, untouched.scripts[1].src);
    assert_eq!(
      page.styles[0].src,
      "https://cdnjs.cloudflare.com/ajax/libs/mediaelement/2.21.0/mediaelementplayer.min.css"
    );
    assert_ne!(untouched.scripts[0].src, page.scripts[0].src);
  }
}
