use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::time::Instant;
use url::Url;

use super::PreviewError;
use crate::token::{self, PREVIEW_TOKEN_BYTES};

/// Previews vanish this long after creation, whether or not they were read.
pub const PREVIEW_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRecord {
    pub token: String,
    pub content: String,
    pub base_url: Url,
    pub created_at: DateTime<Utc>,
}

impl PreviewRecord {
    /// The stored HTML with a `<base href>` pointing at `base_url`, so
    /// relative links resolve against the page it was rendered from.
    pub fn render(&self) -> String {
        let base = format!("<base href=\"{}\">", self.base_url);
        let lower = self.content.to_ascii_lowercase();

        let head_end = find_head_tag(&lower)
            .and_then(|start| lower[start..].find('>').map(|end| start + end + 1));

        match head_end {
            Some(at) => format!("{}{}{}", &self.content[..at], base, &self.content[at..]),
            None => format!("{}{}", base, self.content),
        }
    }
}

/// Offset of the first `<head>` or `<head ...>` tag, skipping `<header>`.
fn find_head_tag(lower: &str) -> Option<usize> {
    lower.match_indices("<head").find_map(|(at, tag)| {
        match lower[at + tag.len()..].chars().next() {
            Some(c) if c == '>' || c.is_ascii_whitespace() => Some(at),
            _ => None,
        }
    })
}

#[derive(Debug)]
struct Entry {
    record: PreviewRecord,
    deadline: Instant,
}

/// Process-local preview storage. Nothing here survives a restart.
#[derive(Debug, Clone)]
pub struct PreviewStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for PreviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::with_ttl(PREVIEW_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a preview and schedule its removal. Must run inside a tokio runtime.
    pub fn create(&self, content: String, base_url: &str) -> Result<PreviewRecord, PreviewError> {
        if content.trim().is_empty() {
            return Err(PreviewError::EmptyContent);
        }
        let base_url = Url::parse(base_url)
            .map_err(|e| PreviewError::InvalidBaseUrl(base_url.to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(PreviewError::InvalidBaseUrl(
                base_url.to_string(),
                "not a base url".to_string(),
            ));
        }

        let token = token::generate(PREVIEW_TOKEN_BYTES)?;
        let record = PreviewRecord {
            token: token.clone(),
            content,
            base_url,
            created_at: Utc::now(),
        };

        let deadline = Instant::now() + self.ttl;
        self.entries.write().insert(
            token.clone(),
            Entry {
                record: record.clone(),
                deadline,
            },
        );

        let entries = self.entries.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if entries.write().remove(&token).is_some() {
                tracing::debug!("preview expired");
            }
        });

        Ok(record)
    }

    /// Look up a live preview. Reading never extends its lifetime.
    pub fn get(&self, token: &str) -> Option<PreviewRecord> {
        let entries = self.entries.read();
        let entry = entries.get(token)?;
        if Instant::now() >= entry.deadline {
            return None;
        }
        Some(entry.record.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><head><title>x</title></head><body><a href=\"a.css\">a</a></body></html>";

    #[tokio::test]
    async fn test_create_and_get() {
        let store = PreviewStore::new();
        let record = store
            .create(PAGE.to_string(), "https://example.com/site/")
            .unwrap();

        let fetched = store.get(&record.token).unwrap();
        assert_eq!(fetched.content, PAGE);
        assert_eq!(fetched.base_url.as_str(), "https://example.com/site/");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let store = PreviewStore::new();
        assert!(matches!(
            store.create("  ".to_string(), "https://example.com"),
            Err(PreviewError::EmptyContent)
        ));
        assert!(matches!(
            store.create(PAGE.to_string(), "not a url"),
            Err(PreviewError::InvalidBaseUrl(..))
        ));
        assert!(matches!(
            store.create(PAGE.to_string(), "mailto:a@b.com"),
            Err(PreviewError::InvalidBaseUrl(..))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl_even_when_read() {
        let store = PreviewStore::new();
        let token = store
            .create(PAGE.to_string(), "https://example.com/")
            .unwrap()
            .token;

        tokio::time::advance(Duration::from_secs(9 * 60)).await;
        assert!(store.get(&token).is_some());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(store.get(&token).is_none());

        // let the removal task run
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(store.is_empty());
    }

    #[test]
    fn test_render_injects_base_into_head() {
        let record = PreviewRecord {
            token: "t".to_string(),
            content: PAGE.to_string(),
            base_url: Url::parse("https://example.com/site/").unwrap(),
            created_at: Utc::now(),
        };
        let html = record.render();
        assert!(html.starts_with(
            "<html><head><base href=\"https://example.com/site/\"><title>"
        ));
    }

    #[test]
    fn test_render_without_head_prepends_base() {
        let record = PreviewRecord {
            token: "t".to_string(),
            content: "<p>hi</p>".to_string(),
            base_url: Url::parse("https://example.com/").unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(
            record.render(),
            "<base href=\"https://example.com/\"><p>hi</p>"
        );
    }

    #[test]
    fn test_render_skips_header_element() {
        let base_url = Url::parse("https://example.com/site/").unwrap();
        let record = |content: &str| PreviewRecord {
            token: "t".to_string(),
            content: content.to_string(),
            base_url: base_url.clone(),
            created_at: Utc::now(),
        };

        assert_eq!(
            record("<body><header>Nav</header><a href=\"x\">x</a></body>").render(),
            "<base href=\"https://example.com/site/\"><body><header>Nav</header><a href=\"x\">x</a></body>"
        );
        assert_eq!(
            record("<html><HEAD lang=\"en\"></HEAD><body><header></header></body></html>").render(),
            "<html><HEAD lang=\"en\"><base href=\"https://example.com/site/\"></HEAD><body><header></header></body></html>"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_removal_is_timed_from_create() {
        let store = PreviewStore::new();
        store
            .create(PAGE.to_string(), "https://example.com/")
            .unwrap();

        // the removal task is not polled until the clock has already moved
        tokio::time::advance(PREVIEW_TTL).await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(store.is_empty());
    }
}
