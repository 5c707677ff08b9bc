//! Fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::app::{FreshetError, Result};
use crate::fetcher::Fetcher;

#[derive(Clone)]
enum Reply {
    Body(String),
    Fail(String),
}

/// In-memory [`Fetcher`] serving canned documents per URL.
#[derive(Default)]
pub struct StaticFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, url: &str, body: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Body(body.into()));
    }

    pub fn fail(&self, url: &str, reason: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Fail(reason.to_string()));
    }

    pub fn delay(&self, url: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().unwrap().get(url).cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(reason)) => Err(FreshetError::network(url, reason)),
            None => Err(FreshetError::network(url, "404 Not Found")),
        }
    }
}

/// An RSS 2.0 item for [`rss`]; `None` fields are left out of the document.
#[derive(Default, Clone)]
pub struct TestItem {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
    pub link: &'static str,
    pub guid: Option<&'static str>,
}

pub fn item(title: &'static str, link: &'static str) -> TestItem {
    TestItem {
        title: Some(title),
        description: Some("Lorem ipsum"),
        link,
        guid: None,
    }
}

pub fn rss(title: &str, items: &[TestItem]) -> String {
    let mut doc = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n<channel>\n\
         <title>{}</title>\n<link>https://example.com</link>\n<description>{} description</description>\n",
        title, title
    );
    for item in items {
        doc.push_str("<item>\n");
        if let Some(title) = item.title {
            doc.push_str(&format!("<title>{}</title>\n", title));
        }
        if let Some(description) = item.description {
            doc.push_str(&format!("<description>{}</description>\n", description));
        }
        doc.push_str(&format!("<link>{}</link>\n", item.link));
        if let Some(guid) = item.guid {
            doc.push_str(&format!("<guid>{}</guid>\n", guid));
        }
        doc.push_str("</item>\n");
    }
    doc.push_str("</channel>\n</rss>\n");
    doc
}
