use crate::models::RuleEntry;

/// Root every generated URL starts with.
pub const CDNJS_BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs";

/// Assemble the cdnjs URL for a library file.
///
/// Segments are concatenated verbatim; rule values are trusted configuration and the
/// version comes from the host registry.
pub fn build_cdn_url(
  library: &str,
  file: &str,
  suffix: &str,
  extension: &str,
  version: &str,
) -> String {
  format!("{CDNJS_BASE}/{library}/{version}/{file}{suffix}{extension}")
}

/// Suffix to request for `rule`: empty in debug mode or when no minified variant exists.
pub fn minified_suffix(rule: &RuleEntry, script_debug: bool) -> &str {
  if script_debug || !rule.has_minified() {
    ""
  } else {
    &rule.minified
  }
}
