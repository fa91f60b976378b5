//! Migration configuration via `wpmigrate.toml`
//!
//! Settings come from an optional TOML file and are then overridden by command line
//! arguments: scalar settings are replaced, list settings are appended to.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{split_pair, DomainChange};
use crate::dump::DEFAULT_DELIMITER;
use crate::error::{Error, Result};
use crate::migrate::{Migrator, DEFAULT_SELECT_LIMIT};
use crate::rules::RuleSet;
use crate::strategy::StrategyTable;

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "wpmigrate.toml";

/// One literal find/replace rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindReplace {
    /// Text to look for
    pub find: String,
    /// Replacement text
    pub replace: String,
}

/// Migration settings loaded from `wpmigrate.toml`.
///
/// # Example
///
/// ```toml
/// wp_prefix = "wp_"
/// select_limit = 100
/// domain_changes = ["example.com/blog => localhost/blog"]
///
/// [[find_replace]]
/// find = "/var/www/example"
/// replace = "/home/dev/site"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Table name prefix used to find the multisite `site` and `blogs` tables
    #[serde(default = "default_wp_prefix")]
    pub wp_prefix: String,
    /// Rows fetched per page
    #[serde(default = "default_select_limit")]
    pub select_limit: usize,
    /// Statement delimiter for dump files read by `split` and for written UPDATE output
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// `"remote_domain/path => local_domain/path"` pairs
    #[serde(default)]
    pub domain_changes: Vec<String>,
    /// Literal find/replace rules, applied in order
    #[serde(default)]
    pub find_replace: Vec<FindReplace>,
}

fn default_wp_prefix() -> String {
    "wp_".to_string()
}

fn default_select_limit() -> usize {
    DEFAULT_SELECT_LIMIT
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            wp_prefix: default_wp_prefix(),
            select_limit: default_select_limit(),
            delimiter: default_delimiter(),
            domain_changes: Vec::new(),
            find_replace: Vec::new(),
        }
    }
}

impl MigrateConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# wpmigrate configuration

# Prefix of the WordPress tables (default: "wp_")
wp_prefix = "wp_"

# Rows fetched per query (default: 100)
select_limit = 100

# Statement delimiter for dump files and UPDATE output (default: newline)
delimiter = "\n"

# Site moves, remote first. Scheme is optional.
# domain_changes = ["example.com/blog => localhost/blog"]
domain_changes = []

# Literal replacements applied to every column, in order.
# [[find_replace]]
# find = "/var/www/example"
# replace = "/home/dev/site"
"#
    }

    /// Parse config from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MigrateConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: MigrateConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero `select_limit`, an empty prefix or
    /// delimiter, or a find/replace rule with nothing to find.
    pub fn validate(&self) -> Result<()> {
        if self.select_limit == 0 {
            return Err(Error::config(
                "select_limit must be a positive integer greater than zero",
            ));
        }
        if self.wp_prefix.is_empty() {
            return Err(Error::config("wp_prefix must not be empty"));
        }
        if self.delimiter.is_empty() {
            return Err(Error::config("delimiter must not be empty"));
        }
        if let Some(rule) = self.find_replace.iter().find(|r| r.find.is_empty()) {
            return Err(Error::config(format!(
                "find_replace rule replacing with {:?} has an empty find value",
                rule.replace
            )));
        }
        Ok(())
    }

    /// Append a `"find => replace"` argument.
    pub fn add_find_replace_arg(&mut self, arg: &str) -> Result<()> {
        let (find, replace) = split_pair(arg).ok_or_else(|| {
            Error::config(format!(
                "The find_replace argument needs to be the following format: \"find => replace\" (got {:?})",
                arg
            ))
        })?;
        if find.is_empty() {
            return Err(Error::config(format!("find_replace argument {:?} has nothing to find", arg)));
        }
        self.find_replace.push(FindReplace {
            find: find.to_string(),
            replace: replace.to_string(),
        });
        Ok(())
    }

    /// Append a `"remote_domain/path => local_domain/path"` argument.
    ///
    /// The pair is parsed immediately so a bad argument fails before any work starts.
    pub fn add_domain_change_arg(&mut self, arg: &str) -> Result<()> {
        DomainChange::parse(arg)?;
        self.domain_changes.push(arg.to_string());
        Ok(())
    }

    /// Parse every configured domain change
    pub fn parsed_domain_changes(&self) -> Result<Vec<DomainChange>> {
        self.domain_changes
            .iter()
            .map(|pair| DomainChange::parse(pair))
            .collect()
    }

    /// The literal find/replace rules, without the domain URL rules
    pub fn rules(&self) -> RuleSet {
        self.find_replace
            .iter()
            .map(|r| (r.find.as_str(), r.replace.as_str()))
            .collect()
    }

    /// Column strategies for this configuration
    pub fn strategies(&self) -> Result<StrategyTable> {
        self.validate()?;
        Ok(StrategyTable::new(
            &self.wp_prefix,
            self.rules(),
            self.parsed_domain_changes()?,
        ))
    }

    /// A migrator for this configuration
    pub fn migrator(&self) -> Result<Migrator> {
        Ok(Migrator::new(self.strategies()?, self.select_limit))
    }
}
