//! Command execution

use crate::config::Config;
use crate::error::Result;
use formrelay_extract::HttpExtractionModel;
use formrelay_pipeline::{Pipeline, PipelineWorker};
use formrelay_record::SqliteRecordStore;
use formrelay_upload::HttpArtifactStore;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Start the watch loop; returns when a shutdown signal arrives.
pub async fn execute_run(config: Config) -> Result<()> {
    let artifacts = HttpArtifactStore::with_timeout(
        &config.store.endpoint,
        &config.store.bucket,
        Duration::from_secs(config.store.timeout_secs),
    );
    let model = HttpExtractionModel::new(
        &config.model.endpoint,
        &config.model.model_name,
        config.model.model_version,
    )
    .with_timeout_secs(config.model.timeout_secs);
    let records = SqliteRecordStore::new(&config.table.db_path)?;

    info!(
        watch_dir = %config.watcher.watch_dir.display(),
        model = %config.model.model_name,
        version = config.model.model_version,
        "starting formrelay"
    );

    let allowed = config.watcher.allowed_extensions.clone();
    let pipeline = Pipeline::new(artifacts, model, records, allowed);
    let mut worker = PipelineWorker::new(config.watcher, pipeline);

    worker.run().await;
    Ok(())
}

/// Write a default configuration file.
pub fn execute_init(path: &Path) -> Result<()> {
    Config::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    println!("Edit it, then start the watcher with: formrelay run");
    Ok(())
}

/// Print the most recently committed record.
pub fn execute_latest(config: &Config, json: bool) -> Result<()> {
    let store = SqliteRecordStore::new(&config.table.db_path)?;

    let Some((id, record)) = store.latest_record()? else {
        println!("No records committed yet.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("record:            {}", id);
        println!("score:             {}", record.score);
        println!("date_value:        {}", record.date_value);
        println!("text_value:        {}", record.text_value);
        println!("dropdown_value:    {}", record.dropdown_value);
        println!("numeric_value:     {}", record.numeric_value);
        println!("free_text_writing: {}", record.free_text_writing_value);
    }
    Ok(())
}

/// Report each configuration section (validation already ran at load).
pub fn execute_check(config: &Config) -> Result<()> {
    println!("configuration OK");
    println!(
        "watcher: {} every {}s ({})",
        config.watcher.watch_dir.display(),
        config.watcher.poll_interval_secs,
        config.watcher.allowed_extensions.join(", ")
    );
    println!(
        "store:   {} bucket {}",
        config.store.endpoint, config.store.bucket
    );
    println!(
        "model:   {} v{} at {}",
        config.model.model_name, config.model.model_version, config.model.endpoint
    );
    println!("table:   {}", config.table.db_path.display());
    Ok(())
}
