use std::collections::BTreeMap;

use crate::models::RuleEntry;

// (handle, library, file, minified suffix)
const SCRIPT_RULES: &[(&str, &str, &str, &str)] = &[
  ("jquery-core", "jquery", "jquery", ".min"),
  ("jquery-migrate", "jquery-migrate", "jquery-migrate", ".min"),
  ("jquery-form", "jquery.form", "jquery.form", ".min"),
  ("jquery-color", "jquery-color", "jquery.color", ".min"),
  ("jquery-touch-punch", "jqueryui-touch-punch", "jquery.ui.touch-punch.min", ""),
  ("jcrop", "jquery-jcrop", "js/jquery.Jcrop", ".min"),
  ("plupload", "plupload", "plupload.full.min", ""),
  ("underscore", "underscore.js", "underscore", "-min"),
  ("backbone", "backbone.js", "backbone", "-min"),
  ("twentysixteen-html5", "html5shiv", "html5shiv", ".min"),
];

const STYLE_RULES: &[(&str, &str, &str, &str)] =
  &[("mediaelement", "mediaelement", "mediaelementplayer", ".min")];

/// Scripts available for replacement out of the box.
pub fn default_script_rules() -> BTreeMap<String, RuleEntry> {
  collect(SCRIPT_RULES)
}

/// Styles available for replacement out of the box.
pub fn default_style_rules() -> BTreeMap<String, RuleEntry> {
  collect(STYLE_RULES)
}

fn collect(rules: &[(&str, &str, &str, &str)]) -> BTreeMap<String, RuleEntry> {
  rules
    .iter()
    .map(|(handle, library, file, minified)| {
      (handle.to_string(), RuleEntry::new(*library, *file, *minified))
    })
    .collect()
}
