use serde_json::json;

use crate::cli::utils::{join_or_dash, output_result};
use crate::cli::OutputFormat;
use crate::gate::Gate;

pub fn handle(gate: &Gate, output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut lines = vec![format!(
        "Public: {}",
        join_or_dash(gate.public_routes().paths())
    )];

    for rule in gate.table().rules() {
        lines.push(format!(
            "{:<14} ids [{}] names [{}] enums [{}] -> {}",
            rule.path_prefix,
            join_or_dash(&rule.allowed_role_ids),
            join_or_dash(&rule.allowed_role_names),
            join_or_dash(&rule.allowed_role_enums),
            rule.fallback_path
        ));
    }

    output_result(
        output_format,
        json!({
            "public_routes": gate.public_routes().paths(),
            "routes": gate.table().rules(),
            "token_sources": gate.token_sources(),
        }),
        &lines,
    )
}
