//! Observability setup: structured logging and metrics recording.
//!
//! The library only emits `tracing` events and `metrics` measurements.
//! Installing a subscriber or a metrics recorder is the embedding
//! application's job; [`init_tracing`] is provided for the CLI.

use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize structured logging with tracing and configuration
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("care_label={}", config.level.to_lowercase()).parse()?);

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    tracing::info!(
        log_level = %config.level,
        log_format = ?config.format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Record material extraction metrics
pub fn record_extraction(source: &'static str, token_count: usize, material_count: usize, duration: Duration) {
    metrics::counter!("material_extractions_total", "source" => source).increment(1);
    metrics::histogram!("material_extraction_tokens").record(token_count as f64);
    metrics::histogram!("material_extraction_materials").record(material_count as f64);
    metrics::histogram!("material_extraction_duration_seconds").record(duration.as_secs_f64());
}

/// Record how a single token was resolved (`exact`, `fuzzy`, `containment`, `none`)
pub fn record_token_resolution(kind: &'static str) {
    metrics::counter!("material_token_resolutions_total", "kind" => kind).increment(1);
}

/// Record recommendation metrics
pub fn record_recommendation(band: &'static str, candidate_count: usize, recommended_count: usize) {
    metrics::counter!("recommendations_total", "band" => band).increment(1);
    metrics::histogram!("recommendation_candidate_items").record(candidate_count as f64);
    metrics::histogram!("recommendation_selected_items").record(recommended_count as f64);
}
