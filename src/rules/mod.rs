//! Table of handles known to exist on cdnjs, kept separately for scripts and styles.
//!
//! The defaults cover the libraries a stock install registers. Hosts contribute more
//! through [`RuleTable::extend`], which validates every entry before it can reach the
//! substitution engine.

mod defaults;
mod table;
mod validate;

pub use defaults::{default_script_rules, default_style_rules};
pub use table::{MergeOutcome, RuleTable};
pub use validate::{RuleError, validate_rule};
