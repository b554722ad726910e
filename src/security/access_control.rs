//! Hostname access control.
//! Enforces destination and origin allow/block lists.

use crate::config::{AccessConfig, HostListConfig};

/// An allow-list / block-list pair evaluated against one hostname.
///
/// Matching is exact and case-sensitive. A non-empty allow-list admits only
/// its own entries and is consulted before the block-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPolicy {
    allow: Vec<String>,
    block: Vec<String>,
}

impl HostPolicy {
    pub fn new(allow: Vec<String>, block: Vec<String>) -> Self {
        Self { allow, block }
    }

    /// Returns true if `hostname` may pass.
    pub fn permits(&self, hostname: &str) -> bool {
        if !self.allow.is_empty() && !self.allow.iter().any(|h| h == hostname) {
            return false;
        }
        !self.block.iter().any(|h| h == hostname)
    }
}

impl From<&HostListConfig> for HostPolicy {
    fn from(lists: &HostListConfig) -> Self {
        Self::new(lists.allow_list.clone(), lists.block_list.clone())
    }
}

/// Access rules applied by the request handler.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    pub destination: HostPolicy,
    pub origin: HostPolicy,
    pub require_origin: bool,
}

impl From<&AccessConfig> for AccessPolicy {
    fn from(config: &AccessConfig) -> Self {
        Self {
            destination: HostPolicy::from(&config.destination),
            origin: HostPolicy::from(&config.origin),
            require_origin: config.require_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_lists_allow_everything() {
        let policy = HostPolicy::default();
        assert!(policy.permits("example.com"));
        assert!(policy.permits(""));
    }

    #[test]
    fn test_allow_list_is_exclusive() {
        let policy = HostPolicy::new(hosts(&["a.com"]), vec![]);
        assert!(policy.permits("a.com"));
        assert!(!policy.permits("b.com"));
        assert!(!policy.permits("sub.a.com"));
    }

    #[test]
    fn test_block_list() {
        let policy = HostPolicy::new(vec![], hosts(&["a.com"]));
        assert!(!policy.permits("a.com"));
        assert!(policy.permits("b.com"));
    }

    #[test]
    fn test_block_list_applies_to_allowed_hosts() {
        let policy = HostPolicy::new(hosts(&["a.com", "b.com"]), hosts(&["b.com"]));
        assert!(policy.permits("a.com"));
        assert!(!policy.permits("b.com"));
        assert!(!policy.permits("c.com"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let policy = HostPolicy::new(hosts(&["Example.com"]), vec![]);
        assert!(!policy.permits("example.com"));
    }

    #[test]
    fn test_from_config() {
        let mut config = AccessConfig::default();
        config.destination.block_list = hosts(&["blocked.test"]);
        config.origin.allow_list = hosts(&["app.test"]);
        config.require_origin = true;

        let policy = AccessPolicy::from(&config);
        assert!(!policy.destination.permits("blocked.test"));
        assert!(policy.origin.permits("app.test"));
        assert!(!policy.origin.permits("other.test"));
        assert!(policy.require_origin);
    }
}
