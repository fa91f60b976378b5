//! wpmigrate - find and replace for WordPress database migrations
//!
//! Moving a WordPress site between hosts means rewriting URLs and paths throughout the
//! database. Many values are stored in a length-prefixed serialization format, so a
//! plain text replacement corrupts them. wpmigrate decodes those values, rewrites
//! their string leaves and re-encodes them with correct lengths.
//!
//! # Quick Start
//!
//! ```ignore
//! use wpmigrate::{IssueLog, Location, RuleSet, ValueRewriter};
//!
//! let rules: RuleSet = vec![("old.example", "new.example")].into_iter().collect();
//! let mut issues = IssueLog::new();
//! let at = Location::new("wp_options", "1", "option_value");
//! let out = ValueRewriter::new(&rules).rewrite_text(b"s:11:\"old.example\";", &at, &mut issues);
//! assert_eq!(out.unwrap(), b"s:11:\"new.example\";");
//! ```
//!
//! # Architecture
//!
//! - `wpmigrate_core`: the value model, detector and codec
//! - `wpmigrate_engine`: rules, rewriting, column strategies, the table driver,
//!   configuration and stores

pub use wpmigrate_core::{
    decode, encode, is_serialized, is_serialized_with, DecodeError, Object, Strictness, Value,
};
pub use wpmigrate_engine::*;

/// Core codec modules
pub mod core {
    pub use wpmigrate_core::*;
}
