//! Site domain and path changes
//!
//! A domain change moves a site from `remote_domain/remote_path` to
//! `local_domain/local_path`. Each change is configured as a single
//! `"remote => local"` pair, with or without a URL scheme, and normalized here into
//! separate domain and path parts.

use url::Url;

use crate::error::{Error, Result};
use crate::rules::RuleSet;

/// A find/replace pair for one part of a site address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Text to look for
    pub find: String,
    /// Replacement text
    pub replace: String,
}

/// One site move, normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainChange {
    /// Host names, e.g. `example.com` → `localhost`
    pub domain: Change,
    /// Paths, always with a trailing slash, e.g. `/blog/` → `/`
    pub path: Change,
}

impl DomainChange {
    /// Build a change from already-normalized parts.
    ///
    /// `remote_path` and `local_path` are given without a trailing slash.
    pub fn new(remote_domain: &str, remote_path: &str, local_domain: &str, local_path: &str) -> Self {
        DomainChange {
            domain: Change {
                find: remote_domain.to_string(),
                replace: local_domain.to_string(),
            },
            path: Change {
                find: format!("{}/", remote_path),
                replace: format!("{}/", local_path),
            },
        }
    }

    /// Parse a `"remote_domain/path => local_domain/path"` pair.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pair has no `=>` or either side is not a
    /// valid host/path.
    pub fn parse(pair: &str) -> Result<Self> {
        let (remote, local) = split_pair(pair).ok_or_else(|| {
            Error::config(format!(
                "domain change {:?} must look like \"remote_domain/path => local_domain/path\"",
                pair
            ))
        })?;
        let (remote_domain, remote_path) = parse_site(remote)?;
        let (local_domain, local_path) = parse_site(local)?;
        Ok(DomainChange::new(&remote_domain, &remote_path, &local_domain, &local_path))
    }

    /// True when the path does not change
    pub fn keeps_path(&self) -> bool {
        self.path.find == self.path.replace
    }

    /// Add the generic `//domain/path` rule this change implies.
    ///
    /// Site URLs stored anywhere in the database (options, post content, metadata) are
    /// rewritten by this rule; the domain and path columns of the site tables are
    /// handled by their own strategies.
    pub fn add_url_rule(&self, rules: &mut RuleSet) {
        let remote_path = self.path.find.trim_end_matches('/');
        let local_path = self.path.replace.trim_end_matches('/');
        rules.insert(
            format!("//{}{}", self.domain.find, remote_path),
            format!("//{}{}", self.domain.replace, local_path),
        );
    }
}

/// Split `"a => b"` into trimmed halves
pub fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (left, right) = pair.split_once("=>")?;
    Some((left.trim(), right.trim()))
}

/// Split `[scheme:]//host/path/` into `(host, path-without-trailing-slash)`.
///
/// Host and path are taken from the text as written, so they match what the database
/// stores: no lowercasing, punycode, percent-encoding or dot-segment removal. A port
/// stays on the host; user info, query and fragment are dropped.
fn parse_site(site: &str) -> Result<(String, String)> {
    let bare = strip_scheme(site.trim());
    let invalid = |reason: &dyn std::fmt::Display| {
        Error::config(format!("Unable to parse url {:?}: {}", site, reason))
    };

    // Parsed for validation only
    let url = Url::parse(&format!("http://{}", bare)).map_err(|e| invalid(&e))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(&"no host"));
    }

    let bare = bare.split(['?', '#']).next().unwrap_or(bare);
    let (authority, path) = match bare.find('/') {
        Some(slash) => bare.split_at(slash),
        None => (bare, ""),
    };
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let path = path.strip_suffix('/').unwrap_or(path);
    Ok((host.to_string(), path.to_string()))
}

/// Remove a leading `http://`, `https://` or `//`, case-insensitively
fn strip_scheme(site: &str) -> &str {
    let lower = site.to_ascii_lowercase();
    for prefix in ["https://", "http://", "//"] {
        if lower.starts_with(prefix) {
            return &site[prefix.len()..];
        }
    }
    site
}
