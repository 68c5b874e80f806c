use super::{
    payments::issue_payment_link,
    pipeline::{Pipeline, SENTINEL_DESTINATION},
    structured::strip_fences,
};
use crate::{
    error::{ApiError, Result},
    models::{ChatMessage, Idea, PublishOutcome},
};

impl Pipeline {
    /// Generates the landing page for idea `id` and stores it, replacing any
    /// earlier page. A failed payment link degrades to the sentinel
    /// destination; a failed model call leaves the record untouched.
    pub async fn publish(&self, id: i64) -> Result<PublishOutcome> {
        let idea = self.store.get(id).await?.ok_or(ApiError::RecordNotFound)?;
        tracing::info!("publishing idea {} ({})", id, idea.competitor_name);

        let product_name = format!("Solution for {} users", idea.competitor_name);
        let destination =
            match issue_payment_link(self.payments.as_ref(), &product_name, &self.plan).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("idea {} published without payment link: {}", id, e);
                    SENTINEL_DESTINATION.to_string()
                }
            };

        let prompt = self.landing_prompt(&idea);
        let reply = self.model.complete(&[ChatMessage::user(prompt)]).await?;

        let markup = strip_fences(&reply, "html");
        let markup = self.cta.inject(&markup, &destination);

        self.store.set_published_markup(id, &markup).await?;
        tracing::info!("idea {} published -> {}", id, destination);

        Ok(PublishOutcome {
            destination_url: destination,
            artifact_ref: id,
        })
    }

    fn landing_prompt(&self, idea: &Idea) -> String {
        format!(
            "Create a Tailwind CSS LP (HTML) for SaaS solving: \"{}\". Competitor: {}. Price: {}. Button Link: {}",
            idea.weaknesses.join(", "),
            idea.competitor_name,
            self.plan.label(),
            self.cta.placeholder(),
        )
    }
}
