use super::routes::{RouteRule, RouteTable};
use super::token::SessionClaims;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision<'a> {
    Allow,
    /// Denied by `rule`; the browser goes to its fallback page
    Deny { rule: &'a RouteRule },
}

impl AccessDecision<'_> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Check a session against the rule governing `path`.
///
/// Paths without a rule are open to any session. A rule with no session
/// behind it always denies.
pub fn evaluate_access<'a>(
    table: &'a RouteTable,
    path: &str,
    claims: Option<&SessionClaims>,
) -> AccessDecision<'a> {
    let Some(rule) = table.find(path) else {
        return AccessDecision::Allow;
    };

    match claims {
        Some(claims) if rule.admits(claims) => AccessDecision::Allow,
        _ => AccessDecision::Deny { rule },
    }
}
