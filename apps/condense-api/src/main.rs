//! Condense - Document Summarization Service
//!
//! HTTP service that reads a long document from S3, summarizes it segment by
//! segment through Amazon Bedrock, and writes the detailed and final summaries
//! back to the bucket.

mod config;
mod dto;
mod handlers;
mod routes;

use anyhow::Result;
use condense_bedrock::infrastructure::BedrockInferenceClient;
use condense_domain::summarization::SummarizationService;
use condense_s3::infrastructure::S3DocumentStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub summarization_service:
        Arc<SummarizationService<S3DocumentStore, S3DocumentStore, BedrockInferenceClient>>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);

    info!("Starting Condense summarization service");

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.s3_force_path_style)
        .build();
    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    let bedrock_client = aws_sdk_bedrockruntime::Client::new(&aws_config);

    info!(
        bucket = %config.bucket,
        model_id = %config.model_id,
        max_chunk_size = config.pipeline.chunker.max_chunk_size,
        pacing_delay_ms = config.pipeline.pacing_delay.as_millis() as u64,
        final_prefix = %config.layout.final_prefix,
        detailed_prefix = %config.layout.detailed_prefix,
        "Initializing summarization service"
    );

    let store = S3DocumentStore::new(s3_client, config.bucket.clone());
    let inference = BedrockInferenceClient::new(bedrock_client, config.model_id.clone());

    let service = SummarizationService::new(
        store.clone(),
        store,
        inference,
        config.pipeline.clone(),
        config.layout.clone(),
    );

    let state = AppState {
        summarization_service: Arc::new(service),
    };

    let app = routes::create_router(state);

    let addr = config.bind_address();
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
