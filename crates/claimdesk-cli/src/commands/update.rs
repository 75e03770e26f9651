//! Update command implementation.

use anyhow::{Context, Result};
use clap::Args;

use claimdesk_core::Entity;

use super::payload::PayloadArgs;
use super::{EntityKind, with_entity};
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record type
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Record uuid
    pub uuid: String,

    #[command(flatten)]
    pub payload: PayloadArgs,
}

pub async fn run(args: UpdateArgs) -> Result<()> {
    let session = storage::require_session()?;
    with_entity!(args.entity, update_record(&session, &args))
}

async fn update_record<T: Entity>(session: &CliSession, args: &UpdateArgs) -> Result<()> {
    let payload = args.payload.build()?;
    let sync = session.sync::<T>()?;

    let updated = sync
        .handle_update(&args.uuid, &payload)
        .await
        .with_context(|| format!("Failed to update {} {}", T::RESOURCE.name, args.uuid))?;

    output::record(&updated, false)?;
    output::success(&format!("Updated {} {}", T::RESOURCE.name, args.uuid));

    Ok(())
}
