// MCP stdio server for Turkish legislation search
//
// Logs go to stderr; stdout carries the MCP transport.

use anyhow::{Context, Result};
use clap::Parser;
use mevzuat_mcp::config::{
    DEFAULT_BEDESTEN_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MEVZUAT_BASE_URL, ENV_BEDESTEN_BASE_URL,
    ENV_CACHE_TTL_SECS, ENV_MEVZUAT_BASE_URL, ENV_OCR_API_KEY, ENV_TIMEOUT_SECS,
};
use mevzuat_mcp::ocr::{DEFAULT_OCR_ENDPOINT, DEFAULT_OCR_MODEL};
use mevzuat_mcp::{MevzuatServer, MevzuatService, ServerConfig};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "mevzuat-mcp", version, about = "Turkish legislation search tools over MCP (stdio)")]
struct Args {
    /// Base URL of the legislation site
    #[arg(long, env = ENV_MEVZUAT_BASE_URL, default_value = DEFAULT_MEVZUAT_BASE_URL)]
    mevzuat_base_url: String,

    /// Base URL of the bedesten legislation API
    #[arg(long, env = ENV_BEDESTEN_BASE_URL, default_value = DEFAULT_BEDESTEN_BASE_URL)]
    bedesten_base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = ENV_TIMEOUT_SECS, default_value_t = 30)]
    timeout_secs: u64,

    /// Cache time-to-live in seconds
    #[arg(long, env = ENV_CACHE_TTL_SECS, default_value_t = 3600)]
    cache_ttl_secs: u64,

    /// Retries for transient upstream failures
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// OCR credential; PDF documents fall back to their text layer without it
    #[arg(long, env = ENV_OCR_API_KEY, hide_env_values = true)]
    ocr_api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_OCR_ENDPOINT)]
    ocr_endpoint: String,

    #[arg(long, default_value = DEFAULT_OCR_MODEL)]
    ocr_model: String,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        ServerConfig::builder()
            .mevzuat_base_url(self.mevzuat_base_url)
            .bedesten_base_url(self.bedesten_base_url)
            .request_timeout(Duration::from_secs(self.timeout_secs))
            .cache_ttl(Duration::from_secs(self.cache_ttl_secs))
            .max_retries(self.max_retries)
            .ocr_api_key(self.ocr_api_key)
            .ocr_endpoint(self.ocr_endpoint)
            .ocr_model(self.ocr_model)
            .build()
            .context("Invalid server configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mevzuat_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Args::parse().into_config()?;
    let service = MevzuatService::new(&config).context("Failed to initialise legislation service")?;

    // Start cleanup tasks before serving
    service.caches().start_cleanup_tasks();

    MevzuatServer::new(service).serve_stdio().await
}
