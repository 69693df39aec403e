use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::GateError;
use crate::gate::{absorb, Gate, RequestView};
use super::response::{apply_no_store, redirect_response};

enum Plan {
    Redirect(Response),
    Continue { no_store: bool },
    /// The gate itself failed; pass the request through untouched
    FailOpen,
}

/// Page-access gate, mounted with `axum::middleware::from_fn_with_state`.
///
/// FAIL-OPEN: any error or panic while deciding lets the request through
/// without redirect or extra headers, and is not logged. A broken gate must
/// not take the dashboards down; the backend API still rejects every call the
/// session is not entitled to, so this trades UX gating for availability.
///
/// Absorbed panics print nothing once [`crate::gate::install_quiet_hook`] has
/// run. `crate::server::gated` installs it.
pub async fn route_gate_middleware(
    State(gate): State<Arc<Gate>>,
    request: Request,
    next: Next,
) -> Response {
    if gate.scope().bypasses(request.uri().path()) {
        return next.run(request).await;
    }

    let plan = match absorb(|| plan_request(&gate, &request)) {
        Some(Ok(plan)) => plan,
        Some(Err(_)) | None => Plan::FailOpen,
    };

    match plan {
        Plan::Redirect(response) => response,
        Plan::Continue { no_store } => {
            let mut response = next.run(request).await;
            if no_store {
                apply_no_store(response.headers_mut());
            }
            response
        }
        Plan::FailOpen => next.run(request).await,
    }
}

fn plan_request(gate: &Gate, request: &Request) -> Result<Plan, GateError> {
    let view = request_view(request);
    let outcome = gate.evaluate(&view);

    if gate.logs_decisions() {
        tracing::debug!("Route gate {} for {}", outcome.state.as_str(), view.path);
    }

    match &outcome.location {
        Some(location) => Ok(Plan::Redirect(redirect_response(location)?)),
        None => Ok(Plan::Continue {
            no_store: outcome.no_store,
        }),
    }
}

/// Copy path, cookies and the authorization header out of the axum request
pub fn request_view(request: &Request) -> RequestView {
    let headers = request.headers();
    let mut view = RequestView::new(request.uri().path());

    for raw in headers.get_all(header::COOKIE) {
        if let Ok(raw) = raw.to_str() {
            view = view.with_cookie_header(raw);
        }
    }

    if let Some(authorization) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        view = view.with_header("authorization", authorization);
    }

    view
}
