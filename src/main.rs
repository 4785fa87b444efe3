//! gh-app-token - print a GitHub App installation access token
//!
//! The token is the only thing written to stdout, so the command can be used
//! as `export GITHUB_TOKEN=$(gh-app-token)`. Diagnostics go to stderr.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gh_app_token::cli::Cli;
use gh_app_token::config::Config;
use gh_app_token::github::GitHubClient;
use gh_app_token::token::{cache_for, get_token};

/// Sets up stderr logging, overridable through `GH_APP_TOKEN_LOG`
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GH_APP_TOKEN_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("gh_app_token=debug")
        } else {
            EnvFilter::new("gh_app_token=info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_cli(&cli);
    let client = GitHubClient::new(config.api_url.as_str());
    let cache = cache_for(&config);

    match get_token(&config, &client, cache.as_ref()).await {
        Ok(token) => {
            println!("{}", token);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
