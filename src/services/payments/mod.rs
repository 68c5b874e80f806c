pub mod stripe;

use async_trait::async_trait;

use crate::Result;
use stripe::Currency;

/// Recurring monthly price attached to every generated offer.
#[derive(Debug, Clone, Copy)]
pub struct OfferPlan {
    /// Minor units (cents)
    pub unit_amount: i64,
    pub currency: Currency,
}

impl OfferPlan {
    /// Human label used in prompts, e.g. `$29/mo`.
    pub fn label(&self) -> String {
        if self.unit_amount % 100 == 0 {
            format!("{}{}/mo", self.currency.symbol(), self.unit_amount / 100)
        } else {
            let major = self.unit_amount as f64 / 100.0;
            format!("{}{:.2}/mo", self.currency.symbol(), major)
        }
    }
}

/// Issues shareable payment links: product, then price, then link.
#[async_trait]
pub trait PaymentLinks: Send + Sync {
    async fn create_product(&self, name: &str) -> Result<String>;
    async fn create_price(&self, product_id: &str, plan: &OfferPlan) -> Result<String>;
    async fn create_link(&self, price_id: &str) -> Result<String>;
}

/// Runs the three-call issuance sequence; the first failure aborts it.
pub async fn issue_payment_link(
    payments: &dyn PaymentLinks,
    product_name: &str,
    plan: &OfferPlan,
) -> Result<String> {
    let product_id = payments.create_product(product_name).await?;
    let price_id = payments.create_price(&product_id, plan).await?;
    let url = payments.create_link(&price_id).await?;

    tracing::info!("issued payment link {} for product {}", url, product_id);

    Ok(url)
}
