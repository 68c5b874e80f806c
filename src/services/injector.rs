// src/services/injector.rs
use html5ever::{local_name, namespace_url, ns, QualName};
use scraper::{Html, Node, Selector, StrTendril};

/// Attributes carried over when a `<button>` is turned into a link.
const VISUAL_ATTRS: &[&str] = &["class", "style", "id", "title"];

/// Decides which clickable elements are calls to action and where they point.
#[derive(Debug, Clone)]
pub struct CtaPolicy {
    trigger_words: Vec<String>,
    placeholder: String,
}

impl CtaPolicy {
    pub fn new<I, S>(trigger_words: I, placeholder: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            trigger_words: trigger_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_call_to_action(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.trigger_words.iter().any(|w| text.contains(w.as_str()))
    }

    /// Points every call-to-action link or button at `destination`, then
    /// substitutes any leftover placeholder. Markup without candidates is
    /// returned verbatim apart from the substitution.
    pub fn inject(&self, markup: &str, destination: &str) -> String {
        let rewritten = self
            .rewrite_candidates(markup, destination)
            .unwrap_or_else(|| markup.to_string());

        if self.placeholder.is_empty() {
            rewritten
        } else {
            rewritten.replace(&self.placeholder, destination)
        }
    }

    fn rewrite_candidates(&self, markup: &str, destination: &str) -> Option<String> {
        let clickable = match Selector::parse("a, button") {
            Ok(sel) => sel,
            Err(e) => {
                tracing::warn!("clickable selector rejected: {:?}", e);
                return None;
            }
        };

        let mut document = Html::parse_document(markup);
        let candidates: Vec<_> = document
            .select(&clickable)
            .filter(|el| self.is_call_to_action(&el.text().collect::<String>()))
            .map(|el| el.id())
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let href = QualName::new(None, ns!(), local_name!("href"));
        for id in &candidates {
            let Some(mut node) = document.tree.get_mut(*id) else {
                continue;
            };
            let Node::Element(element) = node.value() else {
                continue;
            };

            if element.name() == "button" {
                element.name = QualName::new(None, ns!(html), local_name!("a"));
                element
                    .attrs
                    .retain(|name, _| VISUAL_ATTRS.contains(&&*name.local));
            }
            element
                .attrs
                .insert(href.clone(), StrTendril::from(destination));
        }

        tracing::debug!("rewrote {} call-to-action elements", candidates.len());
        Some(document.html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEST: &str = "https://pay.example/x";

    fn policy() -> CtaPolicy {
        CtaPolicy::new(["buy", "start", "get"], "#PAYMENT_TARGET#")
    }

    #[test]
    fn test_button_becomes_link() {
        let out = policy().inject(r#"<button class="cta">Buy Now</button>"#, DEST);

        let doc = Html::parse_document(&out);
        let buttons = Selector::parse("button").unwrap();
        assert_eq!(doc.select(&buttons).count(), 0);

        let links = Selector::parse("a").unwrap();
        let anchors: Vec<_> = doc.select(&links).collect();
        assert_eq!(anchors.len(), 1);
        let anchor = anchors[0];
        assert_eq!(anchor.value().attr("href"), Some(DEST));
        assert_eq!(anchor.value().attr("class"), Some("cta"));
        assert_eq!(anchor.text().collect::<String>(), "Buy Now");
    }

    #[test]
    fn test_button_keeps_position_and_drops_behaviour_attrs() {
        let markup = r#"<div id="hero"><h1>Plans</h1><button type="submit" onclick="go()" class="btn" style="color:red">Get started</button><p>after</p></div>"#;
        let out = policy().inject(markup, DEST);

        let doc = Html::parse_document(&out);
        let hero = Selector::parse("#hero").unwrap();
        let hero = doc.select(&hero).next().unwrap();
        let children: Vec<_> = hero
            .children()
            .filter_map(|c| c.value().as_element().map(|e| e.name().to_string()))
            .collect();
        assert_eq!(children, vec!["h1", "a", "p"]);

        let link = Selector::parse("a").unwrap();
        let anchor = doc.select(&link).next().unwrap();
        assert_eq!(anchor.value().attr("style"), Some("color:red"));
        assert_eq!(anchor.value().attr("type"), None);
        assert_eq!(anchor.value().attr("onclick"), None);
    }

    #[test]
    fn test_link_href_rewritten_in_place() {
        let markup = r#"<a href="/signup" class="btn" data-track="hero" target="_blank">START FREE TRIAL</a>"#;
        let out = policy().inject(markup, DEST);

        let doc = Html::parse_document(&out);
        let link = Selector::parse("a").unwrap();
        let anchor = doc.select(&link).next().unwrap();
        assert_eq!(anchor.value().attr("href"), Some(DEST));
        assert_eq!(anchor.value().attr("data-track"), Some("hero"));
        assert_eq!(anchor.value().attr("target"), Some("_blank"));
    }

    #[test]
    fn test_non_cta_links_untouched() {
        let markup = r#"<a href="/docs">Read docs</a><a href="/pricing">Buy</a>"#;
        let out = policy().inject(markup, DEST);

        let doc = Html::parse_document(&out);
        let link = Selector::parse("a").unwrap();
        let hrefs: Vec<_> = doc
            .select(&link)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(hrefs, vec!["/docs", DEST]);
    }

    #[test]
    fn test_no_candidates_returns_markup_unchanged() {
        let markup = "<section><a href=\"/about\">About us</a><p>Contact: #PAYMENT_TARGET#</p></section>";
        let out = policy().inject(markup, DEST);
        assert_eq!(
            out,
            "<section><a href=\"/about\">About us</a><p>Contact: https://pay.example/x</p></section>"
        );
    }

    #[test]
    fn test_placeholder_substituted_everywhere() {
        let markup = r##"<a href="#PAYMENT_TARGET#">Subscribe</a><form action="#PAYMENT_TARGET#"></form><button>Get it</button>"##;
        let out = policy().inject(markup, DEST);
        assert!(!out.contains("#PAYMENT_TARGET#"));
        assert!(out.contains(r#"<a href="https://pay.example/x">Subscribe</a>"#));
    }

    #[test]
    fn test_sentinel_destination() {
        let out = policy().inject("<button>Buy now</button>", "#");
        assert!(out.contains(r##"<a href="#">Buy now</a>"##));
    }

    #[test]
    fn test_custom_trigger_words() {
        let policy = CtaPolicy::new(["  Join "], "#PAY#");
        assert!(policy.is_call_to_action("JOIN the waitlist"));
        assert!(!policy.is_call_to_action("Buy now"));
    }
}
