/// Checks whether a domain matches a pattern from the configuration.
///
/// Two pattern forms are supported:
/// - exact: `"example.com"` matches only `example.com`
/// - wildcard: `"*.example.com"` matches `example.com` and every
///   subdomain of it, at any nesting depth
///
/// Domains are normalized to lowercase before reaching this function;
/// matching itself is case-sensitive.
///
/// # Examples
///
/// ```
/// use ezhuthu::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "blog.example.com"));
/// assert!(matches_wildcard("*.example.com", "example.com"));
/// assert!(!matches_wildcard("*.example.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => candidate == base || candidate.ends_with(&format!(".{}", base)),
        None => candidate == pattern,
    }
}
