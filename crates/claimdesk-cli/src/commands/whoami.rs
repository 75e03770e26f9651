//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let session = storage::require_session()?;

    output::field("API", session.api.as_str());
    output::field("Backend", session.backend_name());
    output::field("Token", &redact(session.token.as_str()));
    if let Some(path) = &session.csrf_path {
        output::field("CSRF", path);
    }

    Ok(())
}

/// Keep the first four characters of a token.
fn redact(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if visible.len() == token.len() {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
