pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{self, AppConfig};
use crate::gate::Gate;

#[derive(Parser)]
#[command(name = "gatectl")]
#[command(about = "gatectl - inspect and exercise the clinic route gate")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Route file to load instead of GATE_ROUTES_FILE")]
    pub routes: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Evaluate a request path against the gate")]
    Check {
        #[arg(help = "Request path, e.g. /medico/consultas")]
        path: String,
        #[arg(long, help = "Bearer token sent in the Authorization header")]
        token: Option<String>,
        #[arg(long = "cookie", help = "Cookie as name=value (repeatable)")]
        cookies: Vec<String>,
    },

    #[command(about = "Show public routes and the role table")]
    Routes,

    #[command(about = "Decode or mint access tokens")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut app_config = config::config().clone();
    if let Some(path) = cli.routes {
        app_config.gate.routes_file = Some(path);
    }

    match cli.command {
        Commands::Check { path, token, cookies } => {
            let gate = load_gate(&app_config)?;
            commands::check::handle(&gate, &path, token.as_deref(), &cookies, &output_format)
        }
        Commands::Routes => {
            let gate = load_gate(&app_config)?;
            commands::routes::handle(&gate, &output_format)
        }
        Commands::Token { cmd } => commands::token::handle(cmd, &app_config, &output_format),
    }
}

fn load_gate(app_config: &AppConfig) -> anyhow::Result<Gate> {
    app_config
        .build_gate()
        .context("failed to load gate configuration")
}
