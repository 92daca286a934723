use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use stateless_auth::auth::TokenService;
use stateless_auth::cli::{execute, Args};
use stateless_auth::configuration::get_configuration;
use stateless_auth::telemetry::init_telemetry;

fn main() -> ExitCode {
    let args = Args::parse();

    // 설정 로드
    let configuration = match get_configuration() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to read configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 구조화된 로깅 초기화
    let level = args.log_level.as_deref().unwrap_or(&configuration.log.level);
    init_telemetry(level);
    tracing::info!("Configuration loaded successfully");

    let service = match TokenService::new(Arc::new(configuration.auth)) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Invalid token settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match execute(&args.command, &service) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
