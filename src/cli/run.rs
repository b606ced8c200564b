//! Run command implementation

use crate::config::Config;
use crate::pipeline::Pipeline;
use clap::Args;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct RunArgs {}

impl RunArgs {
    /// Start the pipeline and run until Ctrl-C.
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let pipeline = Pipeline::new(config).await?;
        let handle = tokio::spawn(pipeline.run(shutdown_rx));

        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown signal received");
        let _ = shutdown_tx.send(true);

        handle.await??;
        tracing::info!("pipeline stopped");
        Ok(())
    }
}
