//! Batched record pushing
//!
//! Turns a sequence of records into upsert commands, cuts them into batches
//! of at most `batch_size` and submits the batches one after another. The
//! next batch is not built until the previous one has been acknowledged.

use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use stitch_domain::constants::DEFAULT_BATCH_SIZE;
use stitch_domain::{ApiResult, Command, Record, Result, StitchError};
use tracing::{debug, info, instrument, warn};

use crate::client::ApiClient;

/// Running totals for one push operation
#[derive(Debug, Default)]
struct PushProgress {
    batches: usize,
    committed: usize,
}

/// Pushes records to a table in size-bounded batches
pub struct BatchPusher {
    client: Arc<ApiClient>,
    batch_size: usize,
}

impl BatchPusher {
    /// Create a pusher with the default batch size of 100
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, batch_size: DEFAULT_BATCH_SIZE }
    }

    /// Maximum records per request; `0` sends all records in one request.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Client used for every batch.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Push records without a per-batch callback
    ///
    /// See [`BatchPusher::push_stream`] for semantics.
    pub async fn push_records<I>(
        &self,
        table_name: &str,
        key_names: &[String],
        records: I,
    ) -> Result<Option<ApiResult>>
    where
        I: IntoIterator<Item = Record>,
    {
        self.push_records_with(table_name, key_names, records, |_| {}).await
    }

    /// Push records, calling `on_batch_sent` after each acknowledged batch
    pub async fn push_records_with<I, F>(
        &self,
        table_name: &str,
        key_names: &[String],
        records: I,
        on_batch_sent: F,
    ) -> Result<Option<ApiResult>>
    where
        I: IntoIterator<Item = Record>,
        F: FnMut(&[Record]),
    {
        self.push_stream(table_name, key_names, futures::stream::iter(records), on_batch_sent)
            .await
    }

    /// Push a stream of records in batches
    ///
    /// # Arguments
    ///
    /// * `table_name` - Destination table
    /// * `key_names` - Primary key fields, shared by every command
    /// * `records` - Records in submission order
    /// * `on_batch_sent` - Called with the raw records of each batch once
    ///   the service has accepted it
    ///
    /// # Returns
    ///
    /// Result of the last batch, or `None` if there were no records (no
    /// request is made in that case)
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty table name or key list
    /// - `BatchFailed` wrapping the first failed call; later batches are not
    ///   sent and earlier ones stay committed
    #[instrument(
        skip(self, key_names, records, on_batch_sent),
        fields(table = %table_name, batch_size = self.batch_size)
    )]
    pub async fn push_stream<S, F>(
        &self,
        table_name: &str,
        key_names: &[String],
        records: S,
        mut on_batch_sent: F,
    ) -> Result<Option<ApiResult>>
    where
        S: Stream<Item = Record>,
        F: FnMut(&[Record]),
    {
        validate_target(table_name, key_names)?;

        let mut records = pin!(records);
        let mut progress = PushProgress::default();
        let mut batch: Vec<Command> = Vec::new();
        let mut last_result = None;

        while let Some(record) = records.next().await {
            batch.push(Command::upsert(
                self.client.next_sequence(),
                table_name,
                key_names.to_vec(),
                record,
            ));

            if self.batch_size > 0 && batch.len() >= self.batch_size {
                let full = std::mem::take(&mut batch);
                last_result = Some(self.send_batch(full, &mut progress, &mut on_batch_sent).await?);
            }
        }

        if !batch.is_empty() {
            last_result = Some(self.send_batch(batch, &mut progress, &mut on_batch_sent).await?);
        }

        if progress.batches == 0 {
            debug!("no records to push");
        } else {
            info!(
                batches = progress.batches,
                records = progress.committed,
                "push completed"
            );
        }

        Ok(last_result)
    }

    async fn send_batch<F>(
        &self,
        batch: Vec<Command>,
        progress: &mut PushProgress,
        on_batch_sent: &mut F,
    ) -> Result<ApiResult>
    where
        F: FnMut(&[Record]),
    {
        let batch_index = progress.batches;
        let size = batch.len();

        let result = match self.client.push(&batch).await {
            Ok(result) => result,
            Err(source) => {
                warn!(
                    batch_index,
                    committed_records = progress.committed,
                    error = %source,
                    "batch push failed, aborting"
                );
                return Err(StitchError::BatchFailed {
                    batch_index,
                    committed_records: progress.committed,
                    source: Box::new(source),
                });
            }
        };

        let records: Vec<Record> = batch.into_iter().map(Command::into_data).collect();
        on_batch_sent(&records);

        progress.batches += 1;
        progress.committed += size;
        debug!(batch_index, records = size, "batch sent");

        Ok(result)
    }
}

fn validate_target(table_name: &str, key_names: &[String]) -> Result<()> {
    if table_name.trim().is_empty() {
        return Err(StitchError::Validation("table name must not be empty".into()));
    }
    if key_names.is_empty() {
        return Err(StitchError::Validation(format!(
            "key names for table {table_name} must not be empty"
        )));
    }
    if key_names.iter().any(|key| key.trim().is_empty()) {
        return Err(StitchError::Validation(format!(
            "key names for table {table_name} contain an empty name"
        )));
    }
    Ok(())
}
