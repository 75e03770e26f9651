//! Create command implementation.

use anyhow::{Context, Result};
use clap::Args;

use claimdesk_core::Entity;

use super::payload::PayloadArgs;
use super::{EntityKind, with_entity};
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Record type
    #[arg(value_enum)]
    pub entity: EntityKind,

    #[command(flatten)]
    pub payload: PayloadArgs,
}

pub async fn run(args: CreateArgs) -> Result<()> {
    let session = storage::require_session()?;
    with_entity!(args.entity, create_record(&session, &args))
}

async fn create_record<T: Entity>(session: &CliSession, args: &CreateArgs) -> Result<()> {
    let payload = args.payload.build()?;
    let sync = session.sync::<T>()?;

    let created = sync
        .handle_create(&payload)
        .await
        .with_context(|| format!("Failed to create {}", T::RESOURCE.name))?;

    output::record(&created, false)?;
    output::success(&format!("Created {} {}", T::RESOURCE.name, created.uuid()));

    Ok(())
}
