//! Operator CLI: issue, validate, and refresh tokens against the configured secret.

use clap::{Parser, Subcommand};
use serde_json::json;

use crate::auth::TokenService;
use crate::error::AppError;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "stateless_auth",
    about = "Issue and check stateless access/refresh tokens"
)]
pub struct Args {
    /// Log level used when RUST_LOG is unset (overrides configuration)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Issue an access/refresh token pair for a subject
    Issue {
        #[arg(allow_negative_numbers = true)]
        subject_id: i64,
    },
    /// Validate an access token and print its claims
    Validate {
        access_token: String,
    },
    /// Exchange an encrypted refresh token for a new access token
    Refresh {
        refresh_token: String,
    },
}

/// Execute one command and return the JSON document to print
pub fn execute(command: &Command, service: &TokenService) -> Result<serde_json::Value, AppError> {
    match command {
        Command::Issue { subject_id } => {
            let pair = service.issue_pair(*subject_id)?;
            serde_json::to_value(pair).map_err(|e| AppError::Internal(e.to_string()))
        }
        Command::Validate { access_token } => {
            let claims = service.validate_access(access_token)?;
            Ok(json!({ "id": claims.subject_id, "exp": claims.exp }))
        }
        Command::Refresh { refresh_token } => {
            let access_token = service.refresh(refresh_token)?;
            Ok(json!({ "access_token": access_token }))
        }
    }
}
