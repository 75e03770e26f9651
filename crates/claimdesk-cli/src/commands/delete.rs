//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use claimdesk_core::Entity;

use super::{EntityKind, with_entity};
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record type
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Record uuid
    pub uuid: String,
}

pub async fn run(args: DeleteArgs) -> Result<()> {
    let session = storage::require_session()?;
    with_entity!(args.entity, delete_record(&session, &args))
}

async fn delete_record<T: Entity>(session: &CliSession, args: &DeleteArgs) -> Result<()> {
    let sync = session.sync::<T>()?;
    sync.mount().await;

    sync.handle_delete(&args.uuid)
        .await
        .with_context(|| format!("Failed to delete {} {}", T::RESOURCE.name, args.uuid))?;

    output::success(&format!("Deleted {} {}", T::RESOURCE.name, args.uuid));
    Ok(())
}
