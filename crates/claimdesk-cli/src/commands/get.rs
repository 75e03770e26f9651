//! Get command implementation.

use anyhow::{Result, bail};
use clap::Args;

use claimdesk_core::Entity;
use claimdesk_core::resource::DEFAULT_ERROR_MESSAGE;

use super::{EntityKind, with_entity};
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Record type
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Record uuid
    pub uuid: String,

    /// Pretty-print the record
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: GetArgs) -> Result<()> {
    let session = storage::require_session()?;
    with_entity!(args.entity, get_record(&session, &args))
}

async fn get_record<T: Entity>(session: &CliSession, args: &GetArgs) -> Result<()> {
    let sync = session.sync::<T>()?;
    let resource = sync.resource();

    match resource.get_item(&args.uuid).await {
        Some(record) => output::record(&record, args.pretty),
        None => {
            let error = resource
                .error()
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
            bail!("Failed to get {} {}: {}", T::RESOURCE.name, args.uuid, error)
        }
    }
}
