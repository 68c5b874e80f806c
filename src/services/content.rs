// src/services/content.rs
use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use url::Url;

use crate::error::{ApiError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; lpfactory/0.1)";

/// Retrieves a page body as markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

pub struct HttpPageSource {
    http: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl HttpPageSource {
    pub fn new(http: reqwest::Client, timeout: Duration, max_bytes: usize) -> Self {
        Self {
            http,
            timeout,
            max_bytes,
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let mut response = self
            .http
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ApiError::FetchFailed(e.to_string()))?;

        let too_large =
            || ApiError::FetchFailed(format!("page exceeds {} bytes", self.max_bytes));

        if response.content_length().unwrap_or(0) > self.max_bytes as u64 {
            return Err(too_large());
        }

        // chunked bodies carry no length, so the cap is enforced while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ApiError::FetchFailed(e.to_string()))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Fetches a page and reduces it to a bounded run of plain text.
pub struct TextExtractor<'a> {
    source: &'a dyn PageSource,
    max_chars: usize,
}

impl<'a> TextExtractor<'a> {
    pub fn new(source: &'a dyn PageSource, max_chars: usize) -> Self {
        Self { source, max_chars }
    }

    pub async fn extract(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|_| ApiError::InvalidUrl)?;
        let html = self.source.fetch(&parsed).await?;
        Ok(extract_text(&html, self.max_chars))
    }
}

/// Body text with script/style/noscript dropped, whitespace collapsed and
/// the result cut to `max_chars` characters.
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    if let Ok(body) = Selector::parse("body") {
        for element in document.select(&body) {
            collect_text(&element, &mut raw);
        }
    }

    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

fn collect_text(node: &ElementRef, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(elem) => {
                if matches!(elem.name(), "script" | "style" | "noscript") {
                    continue;
                }
                if let Some(child_elem) = ElementRef::wrap(child) {
                    collect_text(&child_elem, out);
                }
            }
            _ => {}
        }
    }
}
