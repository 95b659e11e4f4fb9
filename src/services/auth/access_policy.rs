//! Static access rules: the gate's allow-list and the path authorization table.
//!
//! Both tables are `'static` data chosen once at startup (see [`RuleSet`]) and
//! never mutated afterwards.

use std::str::FromStr;

use crate::services::auth::role::Authority;

/// Path prefixes the request gate lets through without a token.
///
/// Matching is plain `starts_with`, so `/uploads/` covers every upload.
pub const ALLOW_LIST: &[&str] = &[
    "/api/login",
    "/api/users/register",
    "/api/users/check-id",
    "/api/users/check-email",
    "/api/agencyorder/draft",
    "/api/head/signup",
    "/api/head/checkEmail",
    "/api/auth/findPw",
    "/api/auth/resetPw",
    "/uploads/",
];

const PUBLIC_PATTERNS: &[&str] = &[
    "/api/login",
    "/api/login/**",
    "/api/auth/findPw",
    "/api/auth/resetPw",
    "/api/users/check-id",
    "/api/users/check-email",
    "/api/users/register",
    "/api/users/list",
    "/api/users/delete",
    "/api/head/signup",
    "/api/head/checkEmail",
    "/api/agencyorder/draft",
    "/uploads/**",
    "/uploads/profile/**",
    "/uploads/product/**",
];

const HEAD_ONLY: &[Authority] = &[Authority::Head];
const AGENCY_OR_HEAD: &[Authority] = &[Authority::Agency, Authority::Head];
const LOGISTIC_OR_HEAD: &[Authority] = &[Authority::Logistic, Authority::Head];
const ORDER_PARTIES: &[Authority] = &[Authority::Agency, Authority::Logistic, Authority::Head];

const ROLE_RULES: &[(&str, &[Authority])] = &[
    ("/api/head_office/**", HEAD_ONLY),
    ("/api/agency/**", AGENCY_OR_HEAD),
    ("/api/logistic/**", LOGISTIC_OR_HEAD),
    // order detail pages are shared by all three parties
    ("/api/agencyorder/**", ORDER_PARTIES),
];

// percent-encoded '.', '/', '\' and ';' (compared lowercase)
const BLOCKED_ENCODINGS: &[&str] = &["%2e", "%2f", "%5c", "%3b"];

/// Raw request paths that prefix matching cannot judge safely.
///
/// Rejects `.`/`..` segments, empty segments (`//`), backslashes, `;` and the
/// percent-encoded forms above. A single trailing `/` is allowed.
pub fn is_normalized(path: &str) -> bool {
    if !path.starts_with('/') || path.contains('\\') || path.contains(';') {
        return false;
    }

    let lower = path.to_ascii_lowercase();
    if BLOCKED_ENCODINGS.iter().any(|e| lower.contains(e)) {
        return false;
    }

    let segments: Vec<&str> = path[1..].split('/').collect();
    let last = segments.len() - 1;
    segments.iter().enumerate().all(|(i, seg)| match *seg {
        "." | ".." => false,
        "" => i == last,
        _ => true,
    })
}

/// Which authorization table the process runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSet {
    /// Public paths, then "authenticated" for everything else.
    Legacy,
    /// Public paths, per-area role rules, then "authenticated".
    #[default]
    Extended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownRuleSet;

impl FromStr for RuleSet {
    type Err = UnknownRuleSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "extended" => Ok(Self::Extended),
            _ => Err(UnknownRuleSet),
        }
    }
}

/// Ant-style path pattern, limited to the two shapes the tables use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Exact(&'static str),
    /// `"/x/**"`: `/x` itself and anything under `/x/`.
    Subtree(&'static str),
}

impl PathPattern {
    pub fn parse(pattern: &'static str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => Self::Subtree(prefix),
            None => Self::Exact(pattern),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == *p,
            Self::Subtree(prefix) => path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    PermitAll,
    Authenticated,
    AnyOf(&'static [Authority]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRule {
    pub pattern: PathPattern,
    pub requirement: Requirement,
}

/// Outcome of evaluating the table for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rule_set: RuleSet,
    allow_list: &'static [&'static str],
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rule_set: RuleSet) -> Self {
        let public = PUBLIC_PATTERNS.iter().map(|p| AccessRule {
            pattern: PathPattern::parse(*p),
            requirement: Requirement::PermitAll,
        });

        let roles = ROLE_RULES.iter().map(|(p, required)| AccessRule {
            pattern: PathPattern::parse(*p),
            requirement: Requirement::AnyOf(*required),
        });

        let rules = match rule_set {
            RuleSet::Legacy => public.collect(),
            RuleSet::Extended => public.chain(roles).collect(),
        };

        Self {
            rule_set,
            allow_list: ALLOW_LIST,
            rules,
        }
    }

    pub fn rule_set(&self) -> RuleSet {
        self.rule_set
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.allow_list.iter().any(|prefix| path.starts_with(prefix))
    }

    /// First matching rule wins; unmatched paths only need a principal.
    pub fn requirement_for(&self, path: &str) -> Requirement {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| rule.requirement)
            .unwrap_or(Requirement::Authenticated)
    }

    /// `authorities` is `None` when no principal was installed for the request.
    pub fn decide<'a, I>(&self, path: &str, authorities: Option<I>) -> Decision
    where
        I: IntoIterator<Item = &'a Authority>,
    {
        let granted = match (self.requirement_for(path), authorities) {
            (Requirement::PermitAll, _) => true,
            (_, None) => false,
            (Requirement::Authenticated, Some(_)) => true,
            (Requirement::AnyOf(required), Some(held)) => {
                held.into_iter().any(|a| required.contains(a))
            }
        };

        if granted {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}
