use clap::Subcommand;
use serde_json::json;

use crate::auth::{mint_dev_token, DevClaims};
use crate::cli::utils::output_result;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::gate::decode_claims;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Show the role claims the gate reads from a token (no signature check)")]
    Decode {
        #[arg(help = "Token in header.payload.signature form")]
        token: String,
    },

    #[command(about = "Sign a development token with the configured dev secret")]
    Mint {
        #[arg(long, default_value = "dev", help = "Subject claim")]
        sub: String,
        #[arg(long, help = "Numeric role id (role_id)")]
        role_id: Option<i64>,
        #[arg(long, help = "Role display name (role_name)")]
        role_name: Option<String>,
        #[arg(long, help = "Role code (role), e.g. doctor")]
        role: Option<String>,
    },
}

pub fn handle(cmd: TokenCommands, app_config: &AppConfig, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Decode { token } => {
            let claims = decode_claims(&token);
            let line = match &claims {
                Some(c) => format!(
                    "role_id: {}  role_name: {}  role: {}",
                    c.role_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    c.role_name.as_deref().unwrap_or("-"),
                    c.role_enum.as_deref().unwrap_or("-"),
                ),
                None => "none (token is not a decodable JWT; the gate treats it as missing)".to_string(),
            };
            output_result(output_format, json!({ "claims": claims }), &[line])
        }
        TokenCommands::Mint { sub, role_id, role_name, role } => {
            let claims = DevClaims::new(sub, role_id, role_name, role, app_config.dev_tokens.expiry_hours)?;
            let token = mint_dev_token(&claims, &app_config.dev_tokens)?;
            let data = json!({ "token": &token, "claims": claims });
            output_result(output_format, data, &[token])
        }
    }
}
