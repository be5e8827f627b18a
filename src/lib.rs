#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod cdn;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod models;
pub mod registry;
pub mod rules;
pub mod version;

pub use config::{RewriteConfig, RuleFile};
pub use engine::{SubstitutionReport, apply};
pub use lifecycle::{CdnRewriter, HostEnvironment, PassReport, Phase};
pub use models::{AssetKind, PageAssets, RegisteredAsset, RuleEntry};
pub use registry::{AssetRegistry, DependencyRegistry};
pub use rules::{RuleError, RuleTable};
