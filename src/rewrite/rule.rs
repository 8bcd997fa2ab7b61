//! Compiled rewrite rules.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::config::RewriteConfig;
use crate::route::{Route, RouteError};

/// Error type for rewrite rule configuration.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid rewrite pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid rewrite target {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: RouteError,
    },
}

/// A single (pattern, target) rule.
#[derive(Debug, Clone)]
pub struct RequestRewrite {
    pattern: Regex,
    target: Route,
}

impl RequestRewrite {
    /// Compile a rule. The pattern is applied to the canonical route string.
    ///
    /// Canonical routes are lowercase, so patterns match case-insensitively.
    pub fn new(pattern: &str, target: &str) -> Result<Self, RewriteError> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RewriteError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        let target = Route::parse(target).map_err(|source| RewriteError::InvalidTarget {
            target: target.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: compiled,
            target,
        })
    }

    /// Returns the target route if the pattern matches.
    pub fn matches(&self, route: &Route) -> Option<&Route> {
        self.pattern.is_match(route.as_str()).then_some(&self.target)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn target(&self) -> &Route {
        &self.target
    }
}

/// Ordered list of rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct RewriteSet {
    rules: Vec<RequestRewrite>,
}

impl RewriteSet {
    pub fn new(rules: Vec<RequestRewrite>) -> Self {
        Self { rules }
    }

    /// Compile every configured rule, failing on the first invalid one.
    pub fn from_config(configs: &[RewriteConfig]) -> Result<Self, RewriteError> {
        let rules = configs
            .iter()
            .map(|c| RequestRewrite::new(&c.pattern, &c.target))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Targets of every rule matching `route`, in declaration order.
    ///
    /// Lazy: later rules are not evaluated until the caller asks.
    pub fn matches<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = &'a Route> + 'a {
        self.rules.iter().filter_map(move |rule| rule.matches(route))
    }

    pub fn rules(&self) -> &[RequestRewrite] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(raw: &str) -> Route {
        Route::parse(raw).unwrap()
    }

    #[test]
    fn test_rewrite_match() {
        let rule = RequestRewrite::new("^favicon.ico", "theme/favicon.ico").unwrap();
        assert_eq!(rule.matches(&route("/favicon.ico")), Some(&route("theme/favicon.ico")));
        assert_eq!(rule.matches(&route("docs/favicon.ico")), None);
    }

    #[test]
    fn test_pattern_case_is_ignored() {
        let rule = RequestRewrite::new("^Robots\\.TXT$", "theme/robots.txt").unwrap();
        assert_eq!(rule.matches(&route("/robots.txt")), Some(&route("theme/robots.txt")));
        assert_eq!(rule.matches(&route("/ROBOTS.txt")), Some(&route("theme/robots.txt")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RequestRewrite::new("^(unclosed", "x").unwrap_err();
        assert!(matches!(err, RewriteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_invalid_target() {
        let err = RequestRewrite::new("^a", "../etc").unwrap_err();
        assert!(matches!(err, RewriteError::InvalidTarget { .. }));
    }

    #[test]
    fn test_set_preserves_order() {
        let set = RewriteSet::from_config(&[
            RewriteConfig::new("^logo", "theme/missing.png"),
            RewriteConfig::new("^nomatch", "theme/never.png"),
            RewriteConfig::new("^logo", "theme/logo.png"),
        ])
        .unwrap();

        let r = route("logo.png");
        let targets: Vec<_> = set.matches(&r).map(Route::to_string).collect();
        assert_eq!(targets, vec!["theme/missing.png", "theme/logo.png"]);
        assert_eq!(set.len(), 3);
    }
}
