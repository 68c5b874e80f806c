use clap::Parser;

use crate::services::payments::stripe::Currency;

#[derive(Parser, Debug, Clone)]
#[command(name = "lpfactory")]
#[command(about = "Competitor scan and landing page generator", long_about = None)]
pub struct Config {
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "SERVER_PORT", default_value = "8080")]
    pub port: u16,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "120")]
    pub request_timeout: u64,

    #[arg(long, env = "CORS_ORIGINS", default_value = "")]
    pub cors_origins: String,

    #[arg(long, env = "DATABASE_URL", default_value = "postgres://localhost/lpfactory")]
    pub database_url: String,

    /// Public base url used to build `/view/:id` links
    #[arg(long, env = "APP_URL", default_value = "http://localhost:8080")]
    pub app_url: String,

    // page fetch
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout: u64,

    #[arg(long, env = "MAX_CONTENT_CHARS", default_value = "3000")]
    pub max_content_chars: usize,

    /// Pages with a larger body are rejected before parsing
    #[arg(long, env = "MAX_PAGE_BYTES", default_value = "5242880")]
    pub max_page_bytes: usize,

    // language model (openai-compatible chat completions)
    #[arg(
        long,
        env = "LLM_API_URL",
        default_value = "https://api.deepinfra.com/v1/openai/chat/completions"
    )]
    pub llm_api_url: String,

    #[arg(long, env = "LLM_API_KEY")]
    pub llm_api_key: Option<String>,

    #[arg(long, env = "LLM_MODEL", default_value = "meta-llama/Meta-Llama-3-8B-Instruct")]
    pub llm_model: String,

    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "90")]
    pub llm_timeout: u64,

    // stripe
    #[arg(long, env = "STRIPE_SECRET_KEY")]
    pub stripe_secret_key: Option<String>,

    #[arg(long, env = "STRIPE_API_BASE", default_value = "https://api.stripe.com")]
    pub stripe_api_base: String,

    /// Per-call limit; a stalled call degrades publication to the sentinel link
    #[arg(long, env = "STRIPE_TIMEOUT_SECS", default_value = "15")]
    pub stripe_timeout: u64,

    /// Monthly price in minor units (cents)
    #[arg(long, env = "PRICE_UNIT_AMOUNT", default_value = "2900")]
    pub price_unit_amount: i64,

    #[arg(long, env = "PRICE_CURRENCY", value_enum, default_value = "usd")]
    pub price_currency: Currency,

    // call-to-action injection
    #[arg(long, env = "CTA_WORDS", value_delimiter = ',', default_value = "buy,start,get")]
    pub cta_words: Vec<String>,

    #[arg(long, env = "PAYMENT_PLACEHOLDER", default_value = "#PAYMENT_TARGET#")]
    pub payment_placeholder: String,

    // periodic scan
    #[arg(
        long,
        env = "SCAN_TARGETS",
        value_delimiter = ',',
        default_value = "https://en.wikipedia.org/wiki/Notion_(app),https://en.wikipedia.org/wiki/Jira"
    )]
    pub scan_targets: Vec<String>,

    /// 0 disables the scan worker
    #[arg(long, env = "SCAN_INTERVAL_SECS", default_value = "86400")]
    pub scan_interval: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}
