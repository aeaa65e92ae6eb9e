//! Cache keys, namespaces and single-wildcard key patterns.

use std::fmt;

use glob::Pattern;

use crate::error::CacheError;

/// The one wildcard token a [`KeyPattern`] may contain.
pub const WILDCARD: char = '*';

/// Separator between the namespace and the request target.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Characters with a glob meaning, not allowed in a namespace.
const GLOB_METACHARACTERS: [char; 5] = ['*', '?', '[', ']', '\\'];

/// Fixed prefix that partitions the cache key space.
///
/// Keys have the form `<namespace>:<request-target>`, so two namespaces never
/// share a key and every pattern built here stays inside its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace. Surrounding whitespace and trailing separators are dropped.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidNamespace` when the name is empty or
    /// contains a glob metacharacter (`*`, `?`, `[`, `]`, `\`).
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_cache::Namespace;
    ///
    /// let ns = Namespace::new("students:").unwrap();
    /// assert_eq!(ns.as_str(), "students");
    ///
    /// assert!(Namespace::new("stu?ents").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, CacheError> {
        let name = name.into();
        let name = name.trim().trim_end_matches(NAMESPACE_SEPARATOR);

        if name.is_empty() {
            return Err(CacheError::invalid_namespace(name, "namespace is empty"));
        }
        if let Some(c) = name.chars().find(|c| GLOB_METACHARACTERS.contains(c)) {
            return Err(CacheError::invalid_namespace(
                name,
                format!("contains glob metacharacter '{}'", c),
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the key for a request target (path plus query string).
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_cache::Namespace;
    ///
    /// let key = Namespace::new("students").unwrap().key("/api/students?grade=5");
    /// assert_eq!(key.as_str(), "students:/api/students?grade=5");
    /// ```
    pub fn key(&self, target: &str) -> CacheKey {
        CacheKey(format!("{}{}{}", self.0, NAMESPACE_SEPARATOR, target))
    }

    /// Builds a pattern matching every key whose target starts with `prefix`.
    ///
    /// Fails if `prefix` itself contains the wildcard.
    pub fn prefix_pattern(&self, prefix: &str) -> Result<KeyPattern, CacheError> {
        KeyPattern::new(format!(
            "{}{}{}{}",
            self.0, NAMESPACE_SEPARATOR, prefix, WILDCARD
        ))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A namespaced cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Glob pattern with exactly one `*`, matched against whole keys.
///
/// The wildcard matches any run of characters, `/` and `:` included. Nothing
/// else is escaped: `?` and `[...]` keep their glob meaning, which is also how
/// Redis `KEYS` reads them. Keys containing those characters can therefore
/// match patterns they were not built for.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    raw: String,
    glob: Pattern,
}

impl KeyPattern {
    /// Parses a pattern.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidPattern` when the pattern has no wildcard,
    /// more than one, starts with the wildcard (it would cross namespaces), or
    /// is not a valid glob.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_cache::KeyPattern;
    ///
    /// let pattern = KeyPattern::new("students:/api/students*").unwrap();
    /// assert!(pattern.matches("students:/api/students/123"));
    /// assert!(!pattern.matches("other:/foo"));
    ///
    /// assert!(KeyPattern::new("students:/api/students").is_err());
    /// assert!(KeyPattern::new("*:/api/students").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, CacheError> {
        let raw = raw.into();

        match raw.matches(WILDCARD).count() {
            1 => {},
            0 => return Err(CacheError::invalid_pattern(raw, "missing wildcard")),
            _ => return Err(CacheError::invalid_pattern(raw, "more than one wildcard")),
        }
        if raw.starts_with(WILDCARD) {
            return Err(CacheError::invalid_pattern(
                raw,
                "pattern must start with a namespace",
            ));
        }

        let glob = Pattern::new(&raw).map_err(|e| CacheError::invalid_pattern(&raw, e.msg))?;
        Ok(Self { raw, glob })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the whole key matches.
    pub fn matches(&self, key: &str) -> bool {
        self.glob.matches(key)
    }
}

impl PartialEq for KeyPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for KeyPattern {}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
