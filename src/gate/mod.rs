// gate - page access decisions made before render
//
// classify (public?) → read token → check role → pass or redirect
//
// Everything here is pure and synchronous. The axum wiring, the response
// headers and the fail-open policy live in crate::middleware::gate.

pub mod access;
pub mod outcome;
pub mod routes;
pub mod scope;
pub mod token;
pub mod unwind;

pub use access::{evaluate_access, AccessDecision};
pub use outcome::{Gate, GateOutcome, GateState, DEFAULT_LOGIN_PATH};
pub use routes::{is_local_path, PublicRoutes, RouteRule, RouteTable, DEFAULT_FALLBACK_PATH};
pub use scope::MatcherScope;
pub use token::{decode_claims, read_claims, RequestView, SessionClaims, TokenSources};
pub use unwind::{absorb, install_quiet_hook};
