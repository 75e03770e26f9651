//! List command implementation.

use anyhow::{Result, bail};
use clap::Args;

use claimdesk_core::Entity;

use super::{EntityKind, with_entity};
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Record type
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Keep records whose search fields contain this text
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only records that are not soft-deleted
    #[arg(long, conflicts_with = "deleted")]
    pub active: bool,

    /// Only soft-deleted records
    #[arg(long)]
    pub deleted: bool,

    /// Pretty-print each record
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs) -> Result<()> {
    let session = storage::require_session()?;
    with_entity!(args.entity, list_records(&session, &args))
}

async fn list_records<T: Entity>(session: &CliSession, args: &ListArgs) -> Result<()> {
    let sync = session.sync::<T>()?;
    sync.mount().await;

    if let Some(error) = sync.store().error() {
        bail!("Failed to list {} records: {}", T::RESOURCE.name, error);
    }

    if let Some(term) = &args.search {
        sync.set_search_term(term.clone());
    }

    let records: Vec<T> = sync
        .filtered_items()
        .into_iter()
        .filter(|record| {
            if args.active {
                !record.is_deleted()
            } else if args.deleted {
                record.is_deleted()
            } else {
                true
            }
        })
        .collect();

    if records.is_empty() {
        output::note("No records found.");
        return Ok(());
    }

    for record in &records {
        output::record(record, args.pretty)?;
    }

    Ok(())
}
