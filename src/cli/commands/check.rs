use anyhow::anyhow;
use serde_json::json;

use crate::cli::utils::output_result;
use crate::cli::OutputFormat;
use crate::gate::{read_claims, Gate, RequestView};

/// Build the request the gate would see for these CLI arguments
pub fn request_for(path: &str, token: Option<&str>, cookies: &[String]) -> anyhow::Result<RequestView> {
    let mut request = RequestView::new(path);

    for pair in cookies {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("cookie '{}' must be given as name=value", pair))?;
        request = request.with_cookie(name.trim(), value.trim());
    }

    if let Some(token) = token {
        request = request.with_header("authorization", format!("Bearer {}", token));
    }

    Ok(request)
}

pub fn handle(
    gate: &Gate,
    path: &str,
    token: Option<&str>,
    cookies: &[String],
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    if !path.starts_with('/') {
        return Err(anyhow!("path '{}' must start with '/'", path));
    }

    if gate.scope().bypasses(path) {
        return output_result(
            output_format,
            json!({ "path": path, "bypassed": true }),
            &[format!("{} is outside the gate (asset or API path)", path)],
        );
    }

    let request = request_for(path, token, cookies)?;
    let claims = read_claims(&request, gate.token_sources());
    let outcome = gate.evaluate(&request);

    let mut lines = vec![format!("{} {}", outcome.state.as_str(), path)];
    if let Some(location) = &outcome.location {
        lines.push(format!("  -> {}", location));
    }
    if let Some(rule) = gate.table().find(path) {
        lines.push(format!("  rule: {}", rule.path_prefix));
    }
    lines.push(format!("  no-store: {}", outcome.no_store));

    output_result(
        output_format,
        json!({
            "path": path,
            "bypassed": false,
            "outcome": outcome,
            "claims": claims,
        }),
        &lines,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies_and_token_end_up_in_request() {
        let request = request_for(
            "/medico",
            Some("a.b.c"),
            &["access_token = x.y.z".to_string(), "theme=dark".to_string()],
        )
        .unwrap();
        assert_eq!(request.cookie("access_token"), Some("x.y.z"));
        assert_eq!(request.cookie("theme"), Some("dark"));
        assert_eq!(request.header("Authorization"), Some("Bearer a.b.c"));
    }

    #[test]
    fn cookie_without_value_is_rejected() {
        assert!(request_for("/medico", None, &["access_token".to_string()]).is_err());
    }
}
