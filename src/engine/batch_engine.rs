use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tokio::signal::ctrl_c;
use tokio::sync::oneshot;
use tokio::task::yield_now;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::cleaning::CleaningPipeline;
use crate::generator::BatchGenerator;
use crate::pipeline::{BatchProcessor, BatchReport, Cleaner, PipelineError, Scorer};
use crate::scoring::RuleEngine;
use crate::settings::PipelineConfig;
use crate::storage::{read_raw_batch, write_raw_batch, CsvPartitionStore, PartitionStore};

/// Long-running loop: generate a batch, land it in the data lake, process it, wait, repeat.
///
/// Batches run strictly one after another. A failing batch is logged and the loop moves on.
pub struct BatchEngine {
    config: PipelineConfig
}

impl BatchEngine {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs with the standard cleaning pipeline, rule engine and CSV partition store.
    pub async fn run(&self) -> anyhow::Result<u64> {
        let processor = BatchProcessor::new(
            CleaningPipeline::new().with_semicolon_recovery(self.config.recover_semicolon_columns),
            RuleEngine::new(),
            CsvPartitionStore::new(&self.config.folders.processed, &self.config.folders.suspicious)
        );

        self.run_with(processor).await
    }

    /// Runs until Ctrl-C or `max_batches`, returning the number of batches completed.
    pub async fn run_with<C, S, P>(&self, processor: BatchProcessor<C, S, P>) -> anyhow::Result<u64>
    where
        C: Cleaner,
        S: Scorer,
        P: PartitionStore
    {
        let (stop, shutdown) = oneshot::channel();
        let listener = tokio::spawn(async move {
            match ctrl_c().await {
                Ok(()) => {
                    let _ = stop.send(());
                }
                Err(error) => error!("Unable to listen for Ctrl-C: {error}")
            }
        });

        //NOTE: Lets the listener install its handler before the first batch starts
        yield_now().await;

        let result = self.run_until(processor, shutdown).await;
        listener.abort();

        result
    }

    /// Runs until `shutdown` fires or `max_batches` is reached.
    ///
    /// A stop requested while a batch is in flight takes effect once that batch is done.
    /// A dropped sender never stops the loop.
    pub async fn run_until<C, S, P>(&self, processor: BatchProcessor<C, S, P>, mut shutdown: oneshot::Receiver<()>) -> anyhow::Result<u64>
    where
        C: Cleaner,
        S: Scorer,
        P: PartitionStore
    {
        self.config.folders.setup()?;

        let mut generator = BatchGenerator::new(self.config.seed);
        let interval = Duration::from_secs(self.config.interval_seconds);

        info!("Starting continuous processing (every {} seconds)", self.config.interval_seconds);

        let mut batch_count = 0;

        loop {
            batch_count += 1;
            info!("BATCH #{batch_count}");

            self.run_cycle(&mut generator, &processor, batch_count);

            if self.config.max_batches.is_some_and(|max_batches| batch_count >= max_batches) {
                break;
            }

            if shutdown.try_recv().is_ok() {
                info!("Pipeline stopped by user");
                break;
            }

            info!("Waiting {} seconds until next batch...", self.config.interval_seconds);

            tokio::select! {
                _ = sleep(interval) => {}
                Ok(()) = &mut shutdown => {
                    info!("Pipeline stopped by user");
                    break;
                }
            }
        }

        debug!("Run loop finished after {batch_count} batches");

        Ok(batch_count)
    }

    fn run_cycle<C, S, P>(&self, generator: &mut BatchGenerator, processor: &BatchProcessor<C, S, P>, batch_number: u64)
    where
        C: Cleaner,
        S: Scorer,
        P: PartitionStore
    {
        let now = Local::now().naive_local();
        let stamp = format!("{}_{batch_number:04}", now.format("%Y%m%d_%H%M%S"));

        match self.process_cycle(generator, processor, &stamp, now) {
            Ok(report) => {
                info!("{report}");

                if let Some(path) = report.normal_path {
                    info!("Saved normal transactions to: {}", path.display());
                }

                if let Some(path) = report.suspicious_path {
                    warn!("Saved suspicious transactions to: {}", path.display());
                }
            }
            Err(error) if error.is_expected() => warn!("Skipping batch [{stamp}]: {error}"),
            Err(error) => error!("Error processing batch [{stamp}]: {error}")
        }
    }

    fn process_cycle<C, S, P>(&self, generator: &mut BatchGenerator, processor: &BatchProcessor<C, S, P>, stamp: &str, now: chrono::NaiveDateTime) -> Result<BatchReport, PipelineError>
    where
        C: Cleaner,
        S: Scorer,
        P: PartitionStore
    {
        let raw_path = self.raw_path(stamp);
        let generated = generator.generate(self.config.batch_size, now);

        write_raw_batch(&raw_path, &generated)?;
        info!("Generated {} transactions into: {}", generated.len(), raw_path.display());

        let raw = read_raw_batch(&raw_path)?;

        processor.process(raw, stamp)
    }

    fn raw_path(&self, stamp: &str) -> PathBuf {
        self.config.folders.transactions.join(format!("transactions_{stamp}.csv"))
    }
}
