//! Command-line interface parsing for gh-app-token
//!
//! Every option can also be supplied through an environment variable, which is
//! how CI jobs usually pass the App credentials in.

use std::path::PathBuf;

use clap::Parser;

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Generate a GitHub App installation access token and print it to stdout
#[derive(Parser, Debug)]
#[command(name = "gh-app-token")]
#[command(about = "Generate (and cache) a GitHub App installation access token")]
#[command(version)]
pub struct Cli {
    /// GitHub App identifier, used as the JWT issuer
    #[arg(long, env = "GH_APP_ID", value_name = "ID", hide_env_values = true)]
    pub app_id: Option<String>,

    /// Base64-encoded PEM private key of the GitHub App
    #[arg(
        long,
        env = "GH_APP_PRIVATE_KEY_PEM_B64",
        value_name = "BASE64",
        hide_env_values = true
    )]
    pub private_key_b64: Option<String>,

    /// Installation to mint a token for (defaults to the first installation)
    #[arg(long, env = "GH_APP_INSTALLATION_ID", value_name = "ID")]
    pub installation_id: Option<u64>,

    /// GitHub REST API base URL
    #[arg(long, env = "GH_APP_API_URL", value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Path of the token cache file
    ///
    /// Defaults to gh_app_token_cache.json in the system temporary directory.
    #[arg(long, env = "GH_APP_TOKEN_CACHE_FILE", value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// Skip reading and writing the token cache
    #[arg(long)]
    pub no_cache: bool,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
