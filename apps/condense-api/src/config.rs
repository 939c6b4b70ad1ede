//! Environment configuration of the service

use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};
use condense_domain::summarization::{ArtifactLayout, PipelineConfig};

const DEFAULT_BUCKET: &str = "condense";
const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Settings read from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bucket: String,
    pub model_id: String,
    pub host: String,
    pub port: u16,
    /// Path-style S3 addressing, needed for MinIO
    pub s3_force_path_style: bool,
    pub log_json: bool,
    pub pipeline: PipelineConfig,
    pub layout: ArtifactLayout,
}

impl AppConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    ///
    /// # Errors
    ///
    /// Fails when a numeric variable does not parse or when the resulting
    /// pipeline configuration is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = lookup("CONDENSE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        let model_id = lookup("CONDENSE_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let host = lookup("CONDENSE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(&lookup, "CONDENSE_PORT")?.unwrap_or(3000);
        let s3_force_path_style =
            parse_var(&lookup, "CONDENSE_S3_FORCE_PATH_STYLE")?.unwrap_or(false);
        let log_json = lookup("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let mut pipeline = PipelineConfig::default();
        if let Some(size) = parse_var(&lookup, "CONDENSE_MAX_CHUNK_SIZE")? {
            pipeline.chunker.max_chunk_size = size;
        }
        if let Some(millis) = parse_var::<u64, _>(&lookup, "CONDENSE_PACING_DELAY_MS")? {
            pipeline.pacing_delay = Duration::from_millis(millis);
        }
        pipeline
            .validate()
            .context("Invalid pipeline configuration")?;

        let mut layout = ArtifactLayout::default();
        if let Some(prefix) = lookup("CONDENSE_FINAL_PREFIX") {
            layout.final_prefix = prefix;
        }
        if let Some(prefix) = lookup("CONDENSE_DETAILED_PREFIX") {
            layout.detailed_prefix = prefix;
        }
        layout.validate().context("Invalid artifact prefixes")?;

        Ok(Self {
            bucket,
            model_id,
            host,
            port,
            s3_force_path_style,
            log_json,
            pipeline,
            layout,
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} has an invalid value: '{}'", name, raw))
        })
        .transpose()
}
