use std::borrow::Cow;

use regex::Regex;

/// Inline script restoring `jQuery.noConflict()`, which local copies call at the end of
/// the file but the cdnjs build does not.
pub const JQUERY_NOCONFLICT_SHIM: &str =
  "<script type='text/javascript'>try{jQuery.noConflict();}catch(e){};</script>";

const JQUERY_CORE_HANDLE: &str = "jquery-core";
const VERSION_ARG: &str = "ver";

fn cdnjs_host_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"cdnjs\.cloudflare\.com/").expect("invalid cdnjs regex"))
}

/// Returns `true` when `src` points at cdnjs.
pub fn is_cdnjs_url(src: &str) -> bool {
  cdnjs_host_pattern().is_match(src)
}

/// Strip the host's `ver` cache-busting argument from cdnjs URLs.
///
/// Other query arguments and the fragment survive. Sources served from anywhere else are
/// returned unchanged.
pub fn remove_version(src: &str) -> Cow<'_, str> {
  if !is_cdnjs_url(src) {
    return Cow::Borrowed(src);
  }

  let (without_fragment, fragment) = match src.split_once('#') {
    Some((head, fragment)) => (head, Some(fragment)),
    None => (src, None),
  };
  let Some((base, query)) = without_fragment.split_once('?') else {
    return Cow::Borrowed(src);
  };

  let kept: Vec<&str> = query
    .split('&')
    .filter(|pair| !pair.is_empty())
    .filter(|pair| pair.split('=').next() != Some(VERSION_ARG))
    .collect();

  let mut result = base.to_string();
  if !kept.is_empty() {
    result.push('?');
    result.push_str(&kept.join("&"));
  }
  if let Some(fragment) = fragment {
    result.push('#');
    result.push_str(fragment);
  }
  Cow::Owned(result)
}

/// Append the noConflict shim after the `jquery-core` script tag.
pub fn jquery_noconflict<'a>(tag: &'a str, handle: &str) -> Cow<'a, str> {
  if handle != JQUERY_CORE_HANDLE {
    return Cow::Borrowed(tag);
  }

  Cow::Owned(tag.replace(
    "</script>",
    &format!("</script>\n{JQUERY_NOCONFLICT_SHIM}"),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  const CDN_SRC: &str = "https://cdnjs.cloudflare.com/ajax/libs/jquery/1.12.4/jquery.min.js";

  #[test]
  fn detects_cdnjs_sources() {
    assert!(is_cdnjs_url(CDN_SRC));
    assert!(!is_cdnjs_url("/wp-includes/js/jquery/jquery.js"));
    assert!(!is_cdnjs_url("https://cdnjs.cloudflare.com"));
  }

  #[test]
  fn strips_version_argument_from_cdnjs_urls() {
    let src = format!("{CDN_SRC}?ver=1.12.4");
    assert_eq!(remove_version(&src), CDN_SRC);
  }

  #[test]
  fn keeps_other_arguments_and_fragment() {
    let src = format!("{CDN_SRC}?ver=1.12.4&foo=bar#top");
    assert_eq!(remove_version(&src), format!("{CDN_SRC}?foo=bar#top"));

    let src = format!("{CDN_SRC}?a=1&ver=2&ver=3&b");
    assert_eq!(remove_version(&src), format!("{CDN_SRC}?a=1&b"));
  }

  #[test]
  fn leaves_local_sources_untouched() {
    let src = "/wp-includes/js/underscore.min.js?ver=1.8.3";
    assert!(matches!(remove_version(src), Cow::Borrowed(value) if value == src));
  }

  #[test]
  fn leaves_cdnjs_urls_without_query_untouched() {
    assert!(matches!(remove_version(CDN_SRC), Cow::Borrowed(_)));
  }

  #[test]
  fn appends_noconflict_shim_for_jquery_core() {
    let tag = format!("<script type='text/javascript' src='{CDN_SRC}'></script>\n");
    let patched = jquery_noconflict(&tag, "jquery-core");
    assert_eq!(
      patched,
      format!("<script type='text/javascript' src='{CDN_SRC}'></script>\n{JQUERY_NOCONFLICT_SHIM}\n")
    );
  }

  #[test]
  fn other_handles_keep_their_tag() {
    let tag = "<script src='x.js'></script>";
    assert_eq!(jquery_noconflict(tag, "jquery-migrate"), tag);
  }
}
