//! Ordered route authorization rules.
//!
//! Rules are evaluated top-down and the first rule whose method and path
//! pattern match decides the requirement. Requests matching no rule need an
//! authenticated identity.
//!
//! Path patterns are `/`-separated: `*` matches exactly one segment and `**`
//! matches zero or more, so `/records/**` also matches `/records`.

use std::fmt;

use actix_web::http::Method;

use crate::domain::{Principal, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
    Rest,
}

/// Compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match (pattern.split_first(), path.split_first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some((Segment::Rest, rest)), _) => {
            (0..=path.len()).any(|skip| match_segments(rest, path.get(skip..).unwrap_or_default()))
        }
        (Some(_), None) => false,
        (Some((Segment::Single, rest)), Some((_, tail))) => match_segments(rest, tail),
        (Some((Segment::Literal(expected), rest)), Some((actual, tail))) => {
            expected == actual && match_segments(rest, tail)
        }
    }
}

impl PathPattern {
    /// Compile a pattern such as `/records/**` or `/docs/*`.
    ///
    /// # Examples
    /// ```
    /// use anime_backend::inbound::http::access_policy::PathPattern;
    ///
    /// let pattern = PathPattern::new("/records/**");
    /// assert!(pattern.matches("/records"));
    /// assert!(pattern.matches("/records/7"));
    /// assert!(!pattern.matches("/recordsx"));
    /// ```
    pub fn new(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment {
                "**" => Segment::Rest,
                "*" => Segment::Single,
                literal => Segment::Literal(literal.to_owned()),
            })
            .collect();
        Self {
            raw: pattern.to_owned(),
            segments,
        }
    }

    /// Whether `path` satisfies the pattern.
    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_path(path).collect();
        match_segments(&self.segments, &path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// What a matched rule demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// No identity needed.
    PermitAll,
    /// Any authenticated identity.
    Authenticated,
    /// An authenticated identity holding at least one of the roles.
    AnyRole(Vec<Role>),
}

impl Requirement {
    /// Requirement satisfied by any of `roles`.
    pub fn any_role(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::AnyRole(roles.into_iter().collect())
    }

    /// Judge `principal` against this requirement.
    pub fn decide(&self, principal: Option<&Principal>) -> Decision {
        match (self, principal) {
            (Self::PermitAll, _) => Decision::Allow,
            (_, None) => Decision::Unauthenticated,
            (Self::Authenticated, Some(_)) => Decision::Allow,
            (Self::AnyRole(roles), Some(principal)) if principal.has_any_role(roles) => {
                Decision::Allow
            }
            (Self::AnyRole(_), Some(_)) => Decision::Forbidden,
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to the handler.
    Allow,
    /// No valid identity was presented.
    Unauthenticated,
    /// The identity lacks a required role.
    Forbidden,
}

/// Single entry of the rule table.
#[derive(Debug, Clone)]
pub struct Rule {
    method: Option<Method>,
    pattern: PathPattern,
    requirement: Requirement,
}

impl Rule {
    fn applies_to(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|expected| expected == method)
            && self.pattern.matches(path)
    }
}

/// Ordered rule table, first match wins.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<Rule>,
    fallback: Requirement,
}

impl AccessPolicy {
    /// Start an empty rule table.
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Rules guarding the record API.
    ///
    /// | Method | Pattern | Requirement |
    /// |---|---|---|
    /// | POST, PUT, DELETE | `/records/**` | ADMIN |
    /// | GET | `/records/**` | USER or ADMIN |
    /// | any | docs, health, login, logout | none |
    /// | any | `/**` | authenticated |
    pub fn records() -> Self {
        let admin = || Requirement::any_role([Role::Admin]);
        Self::builder()
            .method(Method::POST, "/records/**", admin())
            .method(Method::PUT, "/records/**", admin())
            .method(Method::DELETE, "/records/**", admin())
            .method(
                Method::GET,
                "/records/**",
                Requirement::any_role([Role::User, Role::Admin]),
            )
            .any_method("/docs/**", Requirement::PermitAll)
            .any_method("/api-docs/**", Requirement::PermitAll)
            .any_method("/health/**", Requirement::PermitAll)
            .any_method("/login", Requirement::PermitAll)
            .any_method("/logout", Requirement::PermitAll)
            .any_method("/**", Requirement::Authenticated)
            .build()
    }

    /// Requirement of the first rule matching `method` and `path`.
    pub fn requirement_for(&self, method: &Method, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(method, path))
            .map_or(&self.fallback, |rule| &rule.requirement)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::records()
    }
}

/// Builder for [`AccessPolicy`].
#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    rules: Vec<Rule>,
}

impl AccessPolicyBuilder {
    /// Append a rule restricted to `method`.
    #[must_use]
    pub fn method(mut self, method: Method, pattern: &str, requirement: Requirement) -> Self {
        self.rules.push(Rule {
            method: Some(method),
            pattern: PathPattern::new(pattern),
            requirement,
        });
        self
    }

    /// Append a rule matching every method.
    #[must_use]
    pub fn any_method(mut self, pattern: &str, requirement: Requirement) -> Self {
        self.rules.push(Rule {
            method: None,
            pattern: PathPattern::new(pattern),
            requirement,
        });
        self
    }

    /// Finish the table.
    pub fn build(self) -> AccessPolicy {
        AccessPolicy {
            rules: self.rules,
            fallback: Requirement::Authenticated,
        }
    }
}
