use tracing::info;

use crate::cli::Cli;
use crate::collectors;
use crate::collectors::platform;
use crate::error::Result;
use crate::identity;
use crate::record::HostRecord;
use crate::store::{self, MySqlStore, UpsertOutcome};

/// One full inventory run: resolve the identifier (fatal if impossible),
/// collect facts, assemble the record, then either print it (--dry-run) or
/// upsert it into the datastore.
pub async fn run(cli: &Cli) -> Result<()> {
    let identity = identity::resolve()?;
    info!(identifier = %identity, "resolved hardware identifier");

    let probe = platform::detect();
    let facts = collectors::collect_all(probe.as_ref()).await;
    let record = HostRecord::assemble(identity, facts);

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let datastore = MySqlStore::connect(&cli.datastore()).await?;
    match store::upsert(&datastore, &record).await? {
        UpsertOutcome::Inserted => {
            info!(identifier = %record.identifier, "inserted new inventory record");
        }
        UpsertOutcome::Updated => {
            info!(identifier = %record.identifier, "updated existing inventory record");
        }
    }

    Ok(())
}
