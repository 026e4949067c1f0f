use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Backend selection. `simulate` serves deterministic generated data and is
/// the default when no data directory is given, mirroring typical dev usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Empty,
    Simulate,
    File,
    Graph,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ga4ghr")]
#[command(about = "GA4GH search API server")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "GA4GHR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "GA4GHR_PORT", default_value = "8080")]
    pub port: u16,

    /// Backend serving the search endpoints
    #[arg(long, env = "GA4GHR_BACKEND", value_enum, default_value = "simulate")]
    pub backend: BackendKind,

    /// Directory containing data files (file and graph backends)
    #[arg(long, env = "GA4GHR_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Page size used when a search request does not specify one
    #[arg(long, env = "GA4GHR_DEFAULT_PAGE_SIZE", default_value = "100")]
    pub default_page_size: i32,

    /// Approximate maximum serialized size of a single page, in bytes
    #[arg(long, env = "GA4GHR_MAX_RESPONSE_BYTES", default_value = "2147483648")]
    pub max_response_bytes: usize,

    /// Enable CORS for all origins
    #[arg(long, env = "GA4GHR_CORS", default_value = "true")]
    pub cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Random seed for the simulated backend
    #[arg(long, env = "GA4GHR_SIM_SEED", default_value = "0")]
    pub sim_seed: u64,

    /// Number of simulated variant sets
    #[arg(long, env = "GA4GHR_SIM_VARIANT_SETS", default_value = "1")]
    pub sim_variant_sets: usize,

    /// Number of simulated call sets per variant set
    #[arg(long, env = "GA4GHR_SIM_CALLS", default_value = "1")]
    pub sim_calls: usize,

    /// Probability of a simulated variant at any given coordinate
    #[arg(long, env = "GA4GHR_SIM_VARIANT_DENSITY", default_value = "0.5")]
    pub sim_variant_density: f64,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
