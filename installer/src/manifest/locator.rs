//! Locator templates with version placeholder substitution.
//!
//! A locator is a URL that may embed `{placeholder}` tokens, typically
//! `{version}`. Substitution is pure string work: resolving what a
//! placeholder's concrete value is belongs to the resolver, which keeps this
//! type free of network concerns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A source locator that may contain version placeholders.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use gantry_installer::manifest::locator::LocatorTemplate;
///
/// let template = LocatorTemplate::new("https://x/a-{version}.tgz");
/// let mut versions = BTreeMap::new();
/// versions.insert("version".to_owned(), "1.2.3".to_owned());
/// assert_eq!(template.substitute(&versions), "https://x/a-1.2.3.tgz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorTemplate(String);

impl LocatorTemplate {
    /// Create a locator template from a string.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Return the raw template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Collect the placeholder names referenced by this template.
    ///
    /// A placeholder is a brace-delimited run of ASCII letters, digits,
    /// hyphens, and underscores. Malformed braces are treated as literal
    /// text, matching the pass-through rule for already-concrete locators.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut found = Vec::new();
        let mut rest = self.0.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_placeholder_name(&after[..close]) => {
                    let name = &after[..close];
                    if !found.contains(&name) {
                        found.push(name);
                    }
                    rest = &after[close + 1..];
                }
                _ => rest = after,
            }
        }
        found
    }

    /// Substitute resolved versions into the template.
    ///
    /// Every `{name}` token whose name appears in `versions` is replaced by
    /// the mapped value. Tokens with no mapping are left verbatim, so a
    /// template that is already concrete passes through unchanged.
    #[must_use]
    pub fn substitute(&self, versions: &BTreeMap<String, String>) -> String {
        let mut out = self.0.clone();
        for (name, value) in versions {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

impl From<&str> for LocatorTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for LocatorTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Return true when `name` is a well-formed placeholder name.
fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn versions(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn substitute_replaces_single_placeholder() {
        let template = LocatorTemplate::new("https://x/a-{version}.tgz");
        let out = template.substitute(&versions(&[("version", "1.2.3")]));
        assert_eq!(out, "https://x/a-1.2.3.tgz");
    }

    #[test]
    fn substitute_replaces_repeated_placeholder_everywhere() {
        let template = LocatorTemplate::new("https://x/{v}/a-{v}.tgz");
        let out = template.substitute(&versions(&[("v", "2.0")]));
        assert_eq!(out, "https://x/2.0/a-2.0.tgz");
    }

    #[test]
    fn substitute_leaves_unknown_placeholders_verbatim() {
        let template = LocatorTemplate::new("https://x/a-{version}.tgz");
        let out = template.substitute(&versions(&[("other", "9")]));
        assert_eq!(out, "https://x/a-{version}.tgz");
    }

    #[test]
    fn concrete_template_passes_through_unchanged() {
        let template = LocatorTemplate::new("https://x/a-3.6.2.tgz");
        let out = template.substitute(&versions(&[("version", "1.2.3")]));
        assert_eq!(out, "https://x/a-3.6.2.tgz");
    }

    #[rstest]
    #[case::single("https://x/{version}/a", vec!["version"])]
    #[case::distinct("https://x/{os}/{arch}/a-{version}", vec!["os", "arch", "version"])]
    #[case::repeated("https://x/{v}/a-{v}", vec!["v"])]
    #[case::none("https://x/a-1.0.tgz", vec![])]
    fn placeholders_are_collected_in_order(
        #[case] template: &str,
        #[case] expected: Vec<&str>,
    ) {
        let template = LocatorTemplate::new(template);
        assert_eq!(template.placeholders(), expected);
    }

    #[test]
    fn malformed_braces_are_literal_text() {
        let template = LocatorTemplate::new("https://x/a{unclosed");
        assert!(template.placeholders().is_empty());
    }

    #[test]
    fn braces_with_invalid_characters_are_literal_text() {
        let template = LocatorTemplate::new("https://x/{not a name}/a");
        assert!(template.placeholders().is_empty());
    }
}
