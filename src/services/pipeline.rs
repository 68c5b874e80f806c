use std::sync::Arc;

use super::{
    content::PageSource, injector::CtaPolicy, llm::Completion, payments::OfferPlan,
    payments::PaymentLinks, storage::IdeaStore,
};

/// Destination used when no payment link could be issued.
pub const SENTINEL_DESTINATION: &str = "#";

/// The scan and publish stages over their collaborators.
///
/// Holds no mutable state: every `analyze`/`publish` call is independent and
/// all shared state lives in the store.
#[derive(Clone)]
pub struct Pipeline {
    pub(crate) pages: Arc<dyn PageSource>,
    pub(crate) model: Arc<dyn Completion>,
    pub(crate) payments: Arc<dyn PaymentLinks>,
    pub(crate) store: Arc<dyn IdeaStore>,
    pub(crate) cta: CtaPolicy,
    pub(crate) plan: OfferPlan,
    pub(crate) max_content_chars: usize,
}

impl Pipeline {
    pub fn new(
        pages: Arc<dyn PageSource>,
        model: Arc<dyn Completion>,
        payments: Arc<dyn PaymentLinks>,
        store: Arc<dyn IdeaStore>,
        cta: CtaPolicy,
        plan: OfferPlan,
        max_content_chars: usize,
    ) -> Self {
        Self {
            pages,
            model,
            payments,
            store,
            cta,
            plan,
            max_content_chars,
        }
    }

    pub fn store(&self) -> &dyn IdeaStore {
        self.store.as_ref()
    }
}
