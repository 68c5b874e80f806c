use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;

use super::{OfferPlan, PaymentLinks};
use crate::{ApiError, Config, Result};

pub struct StripeService {
    http: reqwest::Client,
    secret_key: Option<SecretString>,
    api_base: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct StripeObject {
    id: String,
}

#[derive(Deserialize)]
struct PaymentLinkResponse {
    url: String,
}

/// Supported currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Currency {
    Eur,
    #[default]
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Eur => "eur",
            Currency::Usd => "usd",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }
}

impl StripeService {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            secret_key: config.stripe_secret_key.clone().map(SecretString::from),
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.stripe_timeout),
        }
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let secret_key = self
            .secret_key
            .as_ref()
            .ok_or_else(|| ApiError::PaymentLinkFailed("stripe not configured".into()))?;

        let response = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .basic_auth(secret_key.expose_secret(), None::<&str>)
            .form(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::PaymentLinkFailed(format!("stripe request: {}", e)))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(ApiError::PaymentLinkFailed(format!("stripe error: {}", error)));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::PaymentLinkFailed(format!("stripe parse: {}", e)))
    }
}

#[async_trait]
impl PaymentLinks for StripeService {
    async fn create_product(&self, name: &str) -> Result<String> {
        let product: StripeObject = self.post_form("/v1/products", &[("name", name)]).await?;
        Ok(product.id)
    }

    async fn create_price(&self, product_id: &str, plan: &OfferPlan) -> Result<String> {
        let unit_amount = plan.unit_amount.to_string();
        let price: StripeObject = self
            .post_form(
                "/v1/prices",
                &[
                    ("product", product_id),
                    ("unit_amount", unit_amount.as_str()),
                    ("currency", plan.currency.as_str()),
                    ("recurring[interval]", "month"),
                ],
            )
            .await?;
        Ok(price.id)
    }

    async fn create_link(&self, price_id: &str) -> Result<String> {
        let link: PaymentLinkResponse = self
            .post_form(
                "/v1/payment_links",
                &[
                    ("line_items[0][price]", price_id),
                    ("line_items[0][quantity]", "1"),
                ],
            )
            .await?;
        Ok(link.url)
    }
}
