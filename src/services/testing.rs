//! In-process collaborators for pipeline and route tests.

use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use url::Url;

use super::{
    content::PageSource,
    injector::CtaPolicy,
    llm::Completion,
    payments::{stripe::Currency, OfferPlan, PaymentLinks},
    pipeline::Pipeline,
    storage::IdeaStore,
};
use crate::{
    error::{ApiError, Result},
    models::{ChatMessage, Idea, NewIdea},
};

pub struct FakePages {
    body: Option<String>,
    fetches: Mutex<usize>,
}

impl FakePages {
    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl PageSource for FakePages {
    async fn fetch(&self, _url: &Url) -> Result<String> {
        *self.fetches.lock().unwrap() += 1;
        self.body
            .clone()
            .ok_or_else(|| ApiError::FetchFailed("connection refused".into()))
    }
}

pub struct FakeModel {
    replies: Mutex<VecDeque<String>>,
    fail: bool,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeModel {
    pub fn replying<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for FakeModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(ApiError::ModelCallFailed("upstream unavailable".into()));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::ModelCallFailed("no scripted reply".into()))
    }
}

pub struct FakePayments {
    ok: bool,
    products: Mutex<Vec<String>>,
}

impl FakePayments {
    pub fn products(&self) -> Vec<String> {
        self.products.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentLinks for FakePayments {
    async fn create_product(&self, name: &str) -> Result<String> {
        if !self.ok {
            return Err(ApiError::PaymentLinkFailed("card network down".into()));
        }
        let mut products = self.products.lock().unwrap();
        products.push(name.to_string());
        Ok(format!("prod_{}", products.len()))
    }

    async fn create_price(&self, product_id: &str, _plan: &OfferPlan) -> Result<String> {
        Ok(product_id.replace("prod_", "price_"))
    }

    async fn create_link(&self, price_id: &str) -> Result<String> {
        Ok(format!(
            "https://pay.example/link/{}",
            price_id.trim_start_matches("price_")
        ))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Idea>>,
    updates: Mutex<usize>,
}

impl MemoryStore {
    pub fn records(&self) -> Vec<Idea> {
        self.records.lock().unwrap().clone()
    }

    pub fn updates(&self) -> usize {
        *self.updates.lock().unwrap()
    }
}

#[async_trait]
impl IdeaStore for MemoryStore {
    async fn insert(&self, idea: NewIdea) -> Result<i64> {
        let mut records = self.records.lock().unwrap();
        let id = records.len() as i64 + 1;
        records.push(Idea {
            id,
            source_url: idea.source_url,
            competitor_name: idea.competitor_name,
            weaknesses: idea.weaknesses,
            published_markup: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Idea>> {
        Ok(self.records.lock().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn set_published_markup(&self, id: i64, markup: &str) -> Result<()> {
        *self.updates.lock().unwrap() += 1;
        if let Some(idea) = self.records.lock().unwrap().iter_mut().find(|i| i.id == id) {
            idea.published_markup = Some(markup.to_string());
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Idea>> {
        let mut records = self.records();
        records.reverse();
        Ok(records)
    }
}

pub struct Fixture {
    pub pipeline: Pipeline,
    pub pages: Arc<FakePages>,
    pub model: Arc<FakeModel>,
    pub payments: Arc<FakePayments>,
    pub store: Arc<MemoryStore>,
}

/// `page: None` makes every fetch fail; `payments_ok: false` makes link
/// issuance fail at the first call.
pub fn fixture(page: Option<&str>, model: FakeModel, payments_ok: bool) -> Fixture {
    let pages = Arc::new(FakePages {
        body: page.map(str::to_string),
        fetches: Mutex::new(0),
    });
    let model = Arc::new(model);
    let payments = Arc::new(FakePayments {
        ok: payments_ok,
        products: Mutex::new(Vec::new()),
    });
    let store = Arc::new(MemoryStore::default());

    let pipeline = Pipeline::new(
        pages.clone(),
        model.clone(),
        payments.clone(),
        store.clone(),
        CtaPolicy::new(["buy", "start", "get"], "#PAYMENT_TARGET#"),
        OfferPlan {
            unit_amount: 2900,
            currency: Currency::Usd,
        },
        3000,
    );

    Fixture {
        pipeline,
        pages,
        model,
        payments,
        store,
    }
}
