//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{create, delete, get, list, login, logout, restore, update, whoami};

/// Claims-admin CLI for listing and editing records.
#[derive(Parser, Debug)]
#[command(name = "claimdesk")]
#[command(author, version = env!("CLAIMDESK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store an API URL and access token
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// List records of an entity
    List(list::ListArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Create a record
    Create(create::CreateArgs),

    /// Update a record
    Update(update::UpdateArgs),

    /// Soft-delete a record
    Delete(delete::DeleteArgs),

    /// Restore a soft-deleted record
    Restore(restore::RestoreArgs),
}
