//! Restore command implementation.

use anyhow::{Context, Result};
use clap::Args;

use claimdesk_core::Entity;

use super::{EntityKind, with_entity};
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Record type
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Record uuid
    pub uuid: String,
}

pub async fn run(args: RestoreArgs) -> Result<()> {
    let session = storage::require_session()?;
    with_entity!(args.entity, restore_record(&session, &args))
}

async fn restore_record<T: Entity>(session: &CliSession, args: &RestoreArgs) -> Result<()> {
    let sync = session.sync::<T>()?;
    sync.mount().await;

    let restored = sync
        .handle_restore(&args.uuid)
        .await
        .with_context(|| format!("Failed to restore {} {}", T::RESOURCE.name, args.uuid))?;

    output::record(&restored, false)?;
    output::success(&format!("Restored {} {}", T::RESOURCE.name, args.uuid));
    Ok(())
}
