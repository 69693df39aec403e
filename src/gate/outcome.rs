use serde::Serialize;
use url::form_urlencoded;

use super::access::{evaluate_access, AccessDecision};
use super::routes::{PublicRoutes, RouteTable};
use super::scope::MatcherScope;
use super::token::{read_claims, RequestView, TokenSources};

pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Terminal state of one gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    PublicPass,
    UnauthenticatedRedirect,
    UnauthorizedRedirect,
    AuthorizedPass,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::PublicPass => "PUBLIC_PASS",
            GateState::UnauthenticatedRedirect => "UNAUTHENTICATED_REDIRECT",
            GateState::UnauthorizedRedirect => "UNAUTHORIZED_REDIRECT",
            GateState::AuthorizedPass => "AUTHORIZED_PASS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    pub state: GateState,
    /// Redirect target, set for both redirect states
    pub location: Option<String>,
    /// Whether the response gets the no-store header set
    pub no_store: bool,
}

impl GateOutcome {
    fn pass(state: GateState, no_store: bool) -> Self {
        Self {
            state,
            location: None,
            no_store,
        }
    }

    fn redirect(state: GateState, location: String) -> Self {
        Self {
            state,
            location: Some(location),
            no_store: true,
        }
    }

    pub fn is_redirect(&self) -> bool {
        self.location.is_some()
    }
}

/// Route gate: public list, role table and token lookup, fixed at startup
#[derive(Debug, Clone, Serialize)]
pub struct Gate {
    public: PublicRoutes,
    table: RouteTable,
    tokens: TokenSources,
    scope: MatcherScope,
    login_path: String,
    log_decisions: bool,
}

impl Gate {
    pub fn new(public: PublicRoutes, table: RouteTable) -> Self {
        Self {
            public,
            table,
            tokens: TokenSources::default(),
            scope: MatcherScope::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            log_decisions: false,
        }
    }

    pub fn with_token_sources(mut self, tokens: TokenSources) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_scope(mut self, scope: MatcherScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn with_decision_logging(mut self, enabled: bool) -> Self {
        self.log_decisions = enabled;
        self
    }

    pub fn public_routes(&self) -> &PublicRoutes {
        &self.public
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn token_sources(&self) -> &TokenSources {
        &self.tokens
    }

    pub fn scope(&self) -> &MatcherScope {
        &self.scope
    }

    pub fn logs_decisions(&self) -> bool {
        self.log_decisions
    }

    /// Run one request through classify → read token → check access.
    ///
    /// Pure: the same request always yields the same outcome.
    pub fn evaluate(&self, request: &RequestView) -> GateOutcome {
        let path = request.path.as_str();
        let no_store = !self.scope.is_asset(path);

        if self.public.is_public(path) {
            return GateOutcome::pass(GateState::PublicPass, no_store);
        }

        let Some(claims) = read_claims(request, &self.tokens) else {
            let location = with_query(&self.login_path, &[("redirect", path)]);
            return GateOutcome::redirect(GateState::UnauthenticatedRedirect, location);
        };

        match evaluate_access(&self.table, path, Some(&claims)) {
            AccessDecision::Allow => GateOutcome::pass(GateState::AuthorizedPass, no_store),
            AccessDecision::Deny { rule } => {
                let location = with_query(
                    &rule.fallback_path,
                    &[("error", "access_denied"), ("from", path)],
                );
                GateOutcome::redirect(GateState::UnauthorizedRedirect, location)
            }
        }
    }
}

fn with_query(base: &str, pairs: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}")
}
