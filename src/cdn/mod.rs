//! cdnjs URL construction and the filters applied to printed asset tags.
//!
//! [`build_cdn_url`] is the only place a cdnjs address is assembled. The filters in
//! [`filters`] run at print time on whatever source the host ends up emitting.

mod filters;
mod url;

pub use filters::{JQUERY_NOCONFLICT_SHIM, is_cdnjs_url, jquery_noconflict, remove_version};
pub use url::{CDNJS_BASE, build_cdn_url, minified_suffix};
