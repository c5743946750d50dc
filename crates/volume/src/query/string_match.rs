//! String matchers for string-typed primaries.

use std::borrow::Cow;

use super::predicate::StringPredicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMatchKind {
    Exact,
    Prefix,
    Suffix,
    Contains,
    /// Shell-style pattern with `*` and `?`.
    Glob,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringMatcher {
    kind: StringMatchKind,
    value: String,
    case_sensitive: bool,
}

impl StringMatcher {
    pub fn new(kind: StringMatchKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            case_sensitive: true,
        }
    }

    pub fn exact(value: impl Into<String>) -> Self {
        Self::new(StringMatchKind::Exact, value)
    }

    pub fn prefix(value: impl Into<String>) -> Self {
        Self::new(StringMatchKind::Prefix, value)
    }

    pub fn suffix(value: impl Into<String>) -> Self {
        Self::new(StringMatchKind::Suffix, value)
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self::new(StringMatchKind::Contains, value)
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::new(StringMatchKind::Glob, pattern)
    }

    /// Makes the matcher ignore ASCII case.
    pub fn case_insensitive(mut self) -> Self {
        self.value.make_ascii_lowercase();
        self.case_sensitive = false;
        self
    }

    pub fn kind(&self) -> StringMatchKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = if self.case_sensitive {
            Cow::Borrowed(candidate)
        } else {
            Cow::Owned(candidate.to_ascii_lowercase())
        };
        let value = self.value.as_str();
        match self.kind {
            StringMatchKind::Exact => candidate == value,
            StringMatchKind::Prefix => candidate.starts_with(value),
            StringMatchKind::Suffix => candidate.ends_with(value),
            StringMatchKind::Contains => candidate.contains(value),
            StringMatchKind::Glob => wildcard_matches(value, &candidate),
        }
    }
}

impl StringPredicate for StringMatcher {
    fn eval_string(&self, value: &str) -> bool {
        self.matches(value)
    }
}

/// Matches `pattern` (with `*` and `?` wildcards) against the whole of
/// `candidate`. `*` also matches `/`.
pub fn wildcard_matches(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0usize, 0usize);
    // Position of the last `*` and the candidate index it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, c));
                p += 1;
            }
            Some(&ch) if ch == '?' || ch == candidate[c] => {
                p += 1;
                c += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    backtrack = Some((star, absorbed + 1));
                    p = star + 1;
                    c = absorbed + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|ch| *ch == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_affix_matching() {
        assert!(StringMatcher::exact("docker/containers").matches("docker/containers"));
        assert!(!StringMatcher::exact("docker").matches("docker/containers"));
        assert!(StringMatcher::prefix("docker/").matches("docker/volumes"));
        assert!(StringMatcher::suffix("/container").matches("docker/containers/container"));
        assert!(StringMatcher::contains("contain").matches("docker/containers"));
    }

    #[test]
    fn glob_matching() {
        let matcher = StringMatcher::glob("docker/*/container");
        assert!(matcher.matches("docker/containers/container"));
        assert!(!matcher.matches("docker/containers/container/fs"));
        assert!(StringMatcher::glob("*.log").matches("var/log/syslog.log"));
        assert!(StringMatcher::glob("file?").matches("file1"));
        assert!(!StringMatcher::glob("file?").matches("file"));
        assert!(StringMatcher::glob("**").matches(""));
        assert!(StringMatcher::glob("a*b*c").matches("aXXbYYbc"));
    }

    #[test]
    fn case_insensitive_matching() {
        let matcher = StringMatcher::glob("Docker/*").case_insensitive();
        assert!(matcher.matches("DOCKER/containers"));
        assert!(!StringMatcher::exact("Docker").matches("docker"));
    }
}
