//! Find/replace rules
//!
//! A [`RuleSet`] is an ordered mapping from find text to replacement text. Every rule
//! is tried against every plain string, in insertion order, so a later rule sees the
//! output of the earlier ones. Matching is byte-oriented: non-overlapping, left to
//! right, all occurrences.

/// Ordered find → replace mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<(String, String)>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule.
    ///
    /// Inserting a find text that is already present overwrites its replacement and
    /// keeps the rule in its original position.
    pub fn insert(&mut self, find: impl Into<String>, replace: impl Into<String>) {
        let find = find.into();
        let replace = replace.into();
        match self.rules.iter_mut().find(|(f, _)| *f == find) {
            Some(rule) => rule.1 = replace,
            None => self.rules.push((find, replace)),
        }
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in application order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(f, r)| (f.as_str(), r.as_str()))
    }

    /// Apply every rule to `text`.
    ///
    /// Returns the rewritten bytes, or `None` when no rule matched.
    pub fn apply(&self, text: &[u8]) -> Option<Vec<u8>> {
        let mut current: Option<Vec<u8>> = None;
        for (find, replace) in self.iter() {
            let subject = current.as_deref().unwrap_or(text);
            if let Some(next) = replace_all(subject, find.as_bytes(), replace.as_bytes()) {
                current = Some(next);
            }
        }
        current
    }
}

impl<F: Into<String>, R: Into<String>> FromIterator<(F, R)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (F, R)>>(iter: I) -> Self {
        let mut rules = RuleSet::new();
        for (find, replace) in iter {
            rules.insert(find, replace);
        }
        rules
    }
}

/// Replace every non-overlapping occurrence of `find` in `haystack`.
///
/// Returns `None` when `find` is empty or does not occur.
pub fn replace_all(haystack: &[u8], find: &[u8], replace: &[u8]) -> Option<Vec<u8>> {
    let first = find_bytes(haystack, find)?;
    let mut out = Vec::with_capacity(haystack.len());
    out.extend_from_slice(&haystack[..first]);
    out.extend_from_slice(replace);
    let mut pos = first + find.len();
    while let Some(offset) = find_bytes(&haystack[pos..], find) {
        out.extend_from_slice(&haystack[pos..pos + offset]);
        out.extend_from_slice(replace);
        pos += offset + find.len();
    }
    out.extend_from_slice(&haystack[pos..]);
    Some(out)
}

/// Replace `find` only when it occurs at offset 0 of `value`.
///
/// Returns `None` when `value` does not start with `find`.
pub fn replace_prefix(value: &str, find: &str, replace: &str) -> Option<String> {
    let rest = value.strip_prefix(find)?;
    Some(format!("{}{}", replace, rest))
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all_occurrences() {
        let out = replace_all(b"a.example.com/x a.example.com/y", b"a.example.com", b"local");
        assert_eq!(out.unwrap(), b"local/x local/y");
    }

    #[test]
    fn test_replace_all_non_overlapping() {
        assert_eq!(replace_all(b"aaaa", b"aa", b"b").unwrap(), b"bb");
        assert_eq!(replace_all(b"aaa", b"aa", b"b").unwrap(), b"ba");
    }

    #[test]
    fn test_replace_all_no_match() {
        assert_eq!(replace_all(b"hello", b"world", b"x"), None);
        assert_eq!(replace_all(b"hello", b"", b"x"), None);
        assert_eq!(replace_all(b"", b"x", b"y"), None);
    }

    #[test]
    fn test_replace_prefix() {
        assert_eq!(replace_prefix("/old/sub", "/old", "/new").as_deref(), Some("/new/sub"));
        assert_eq!(replace_prefix("/otherold/sub", "/old", "/new"), None);
        assert_eq!(replace_prefix("/sub/old", "/old", "/new"), None);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut rules = RuleSet::new();
        rules.insert("a", "1");
        rules.insert("b", "2");
        rules.insert("a", "3");
        let collected: Vec<_> = rules.iter().collect();
        assert_eq!(collected, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_rules_apply_in_order() {
        // The second rule sees the output of the first
        let rules: RuleSet = vec![("http://old.test", "http://new.test"), ("new.test", "final.test")]
            .into_iter()
            .collect();
        assert_eq!(rules.apply(b"see http://old.test/").unwrap(), b"see http://final.test/");

        let reversed: RuleSet = vec![("new.test", "final.test"), ("http://old.test", "http://new.test")]
            .into_iter()
            .collect();
        assert_eq!(reversed.apply(b"see http://old.test/").unwrap(), b"see http://new.test/");
    }

    #[test]
    fn test_apply_no_match_returns_none() {
        let rules: RuleSet = vec![("x", "y")].into_iter().collect();
        assert_eq!(rules.apply(b"abc"), None);
    }

    #[test]
    fn test_apply_is_idempotent_once_rewritten() {
        let rules: RuleSet = vec![("//old.test", "//new.test")].into_iter().collect();
        let once = rules.apply(b"//old.test/a").unwrap();
        assert_eq!(rules.apply(&once), None);
    }
}
