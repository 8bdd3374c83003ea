//! URL handling: normalization, domain matching, and crawl scope
//!
//! Normalization produces the canonical form used as the frontier dedup
//! key. [`CrawlScope`] decides whether a discovered link is followed at
//! all: by default only the seed domains (and their subdomains) are in
//! scope, the deny list always wins, and following external domains is an
//! explicit opt-in.

mod matcher;
mod normalize;

pub use matcher::matches_wildcard;
pub use normalize::{extract_domain, normalize_url};

use crate::config::Config;
use std::collections::HashSet;
use url::Url;

/// Decides which discovered links the crawl is allowed to follow.
///
/// Built once from the configuration and the normalized seed URLs, then
/// shared read-only across all workers.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    seed_domains: HashSet<String>,
    deny: Vec<String>,
    follow_external: bool,
}

impl CrawlScope {
    /// Builds the scope from the run configuration and the normalized seeds.
    pub fn new(config: &Config, seeds: &[Url]) -> Self {
        let seed_domains = seeds.iter().filter_map(extract_domain).collect();
        let deny = config.deny.iter().map(|e| e.domain.clone()).collect();

        Self {
            seed_domains,
            deny,
            follow_external: config.crawler.follow_external,
        }
    }

    /// Returns true if a link on the given domain may be followed.
    ///
    /// The deny list is checked first and always wins. Otherwise the
    /// domain must belong to a seed domain (or a subdomain of one) unless
    /// external following was enabled.
    pub fn allows(&self, domain: &str) -> bool {
        if self
            .deny
            .iter()
            .any(|pattern| matches_wildcard(pattern, domain))
        {
            return false;
        }

        if self.follow_external {
            return true;
        }

        self.seed_domains
            .iter()
            .any(|seed| domain == seed || domain.ends_with(&format!(".{}", seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, CrawlerConfig, DomainEntry, OcrConfig, OutputConfig, UserAgentConfig};

    fn config(follow_external: bool, deny: Vec<&str>) -> Config {
        Config {
            crawler: CrawlerConfig {
                workers: 4,
                min_text_length: 50,
                max_depth: 0,
                follow_external,
            },
            user_agent: UserAgentConfig {
                crawler_name: "EzhuthuBot".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            ocr: OcrConfig::default(),
            output: OutputConfig {
                text_dir: "./res".to_string(),
                metadata_path: "./metadata.csv".to_string(),
            },
            seeds: vec![],
            deny: deny
                .into_iter()
                .map(|d| DomainEntry {
                    domain: d.to_string(),
                })
                .collect(),
        }
    }

    fn seeds(urls: &[&str]) -> Vec<Url> {
        urls.iter().map(|u| Url::parse(u).unwrap()).collect()
    }

    #[test]
    fn test_seed_domain_in_scope() {
        let scope = CrawlScope::new(&config(false, vec![]), &seeds(&["https://example.com/"]));
        assert!(scope.allows("example.com"));
    }

    #[test]
    fn test_seed_subdomain_in_scope() {
        let scope = CrawlScope::new(&config(false, vec![]), &seeds(&["https://example.com/"]));
        assert!(scope.allows("blog.example.com"));
    }

    #[test]
    fn test_external_domain_out_of_scope_by_default() {
        let scope = CrawlScope::new(&config(false, vec![]), &seeds(&["https://example.com/"]));
        assert!(!scope.allows("other.org"));
    }

    #[test]
    fn test_follow_external_opens_scope() {
        let scope = CrawlScope::new(&config(true, vec![]), &seeds(&["https://example.com/"]));
        assert!(scope.allows("other.org"));
    }

    #[test]
    fn test_deny_wins_over_seed_domain() {
        let scope = CrawlScope::new(
            &config(false, vec!["example.com"]),
            &seeds(&["https://example.com/"]),
        );
        assert!(!scope.allows("example.com"));
    }

    #[test]
    fn test_deny_wildcard_wins_over_follow_external() {
        let scope = CrawlScope::new(
            &config(true, vec!["*.ads.example.com"]),
            &seeds(&["https://example.com/"]),
        );
        assert!(!scope.allows("tracker.ads.example.com"));
        assert!(scope.allows("other.org"));
    }

    #[test]
    fn test_multiple_seed_domains() {
        let scope = CrawlScope::new(
            &config(false, vec![]),
            &seeds(&["https://a.example/", "https://b.example/"]),
        );
        assert!(scope.allows("a.example"));
        assert!(scope.allows("b.example"));
        assert!(!scope.allows("c.example"));
    }

    #[test]
    fn test_lookalike_domain_not_in_scope() {
        let scope = CrawlScope::new(&config(false, vec![]), &seeds(&["https://example.com/"]));
        assert!(!scope.allows("notexample.com"));
    }
}
