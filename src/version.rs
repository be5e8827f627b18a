//! Version gate deciding whether a registered version can be requested from cdnjs.

/// Returns `false` for versions containing a hyphen.
///
/// Hosts tag development and patched builds with a hyphenated suffix
/// (`4.7-alpha-38178`, `1.12.4-wp`), and those strings do not exist on cdnjs. Genuine
/// pre-releases such as `2.0.0-rc1` are skipped as well. Everything else, including the
/// empty string, passes.
pub fn is_standard_version(version: &str) -> bool {
  !version.contains('-')
}

#[cfg(test)]
mod tests {
  use super::is_standard_version;

  #[test]
  fn accepts_release_versions() {
    assert!(is_standard_version("1.8.3"));
    assert!(is_standard_version("3.0.0"));
    assert!(is_standard_version("2.2.1.1"));
  }

  #[test]
  fn rejects_hyphenated_versions() {
    assert!(!is_standard_version("1.8.3-beta"));
    assert!(!is_standard_version("1.12.4-wp"));
    assert!(!is_standard_version("2.0.0-rc1"));
    assert!(!is_standard_version("-"));
  }

  #[test]
  fn empty_version_is_not_special_cased() {
    assert!(is_standard_version(""));
  }
}
