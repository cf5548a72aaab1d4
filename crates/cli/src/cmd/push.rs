use anyhow::Context;
use stitch_domain::StitchConfig;
use stitch_infra::pusher_from_config;
use tracing::{error, info};

use super::print_result;
use crate::cli::PushArgs;
use crate::input;

pub async fn run(config: &StitchConfig, args: PushArgs) -> anyhow::Result<()> {
    let records = input::read_records(input::open(args.input.as_deref())?)?;

    let mut pusher = pusher_from_config(config)?;
    if let Some(batch_size) = args.batch_size {
        pusher = pusher.with_batch_size(batch_size);
    }

    info!(
        table = %args.table,
        keys = ?args.keys,
        records = records.len(),
        batch_size = pusher.batch_size(),
        "pushing records"
    );

    let mut committed = 0usize;
    let outcome = pusher
        .push_records_with(&args.table, &args.keys, records, |batch| {
            committed += batch.len();
            info!(records = batch.len(), committed, "batch committed");
        })
        .await;

    match outcome {
        Ok(Some(result)) => print_result(&result),
        Ok(None) => {
            info!("input contained no records, nothing sent");
            Ok(())
        }
        Err(err) => {
            error!(
                kind = err.label(),
                status = err.status(),
                committed_records = err.committed_records().unwrap_or(committed),
                "push failed"
            );
            Err(err).with_context(|| format!("push to table {} failed", args.table))
        }
    }
}
