//! Login command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use claimdesk_core::{AccessToken, ApiUrl};

use crate::output;
use crate::session::CliSession;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin API base URL (http(s):// or file:// for a local store)
    #[arg(long, env = "CLAIMDESK_API")]
    pub api: String,

    /// Bearer token issued by the admin application
    #[arg(long, env = "CLAIMDESK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path of the CSRF cookie endpoint, e.g. /sanctum/csrf-cookie
    #[arg(long)]
    pub csrf_path: Option<String>,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;

    let token = match args.token {
        Some(token) => AccessToken::new(token),
        None if api.is_local() => AccessToken::new("local"),
        None => bail!("A token is required for {api}. Pass --token or set CLAIMDESK_TOKEN."),
    };

    if token.is_empty() {
        bail!("Token must not be empty");
    }

    let session = CliSession {
        api,
        token,
        csrf_path: args.csrf_path,
    };
    storage::save_session(&session).context("Failed to save session")?;

    output::field("API", session.api.as_str());
    output::field("Backend", session.backend_name());
    output::success("Logged in");

    Ok(())
}
