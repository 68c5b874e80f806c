pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod worker;

pub use config::Config;
pub use error::{ApiError, Result};

use axum::{http::Method, Router};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use services::{
    content::HttpPageSource,
    injector::CtaPolicy,
    llm::ChatCompletionClient,
    payments::{stripe::StripeService, OfferPlan},
    pipeline::Pipeline,
    storage::PgIdeaStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Pipeline,
}

impl AppState {
    /// Wires the production collaborators: reqwest for pages, the model and
    /// stripe, postgres for records.
    pub fn new(config: Config, db: PgPool) -> Self {
        let http = reqwest::Client::new();

        let pipeline = Pipeline::new(
            Arc::new(HttpPageSource::new(
                http.clone(),
                Duration::from_secs(config.fetch_timeout),
                config.max_page_bytes,
            )),
            Arc::new(ChatCompletionClient::new(http.clone(), &config)),
            Arc::new(StripeService::new(http, &config)),
            Arc::new(PgIdeaStore::new(db)),
            CtaPolicy::new(&config.cta_words, config.payment_placeholder.clone()),
            OfferPlan {
                unit_amount: config.price_unit_amount,
                currency: config.price_currency,
            },
            config.max_content_chars,
        );

        Self { config, pipeline }
    }
}

fn build_cors(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        // Development: allow all origins
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = build_cors(&state.config.cors_origins);

    Router::new()
        .merge(routes::ideas::routes())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout,
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
