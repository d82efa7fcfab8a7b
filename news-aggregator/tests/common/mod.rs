#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use news_aggregator::{FetchConfig, Fetcher, HttpClient, HttpResponse, RequestOptions, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration as StdDuration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Option<StdDuration>,
}

/// In-memory [`HttpClient`]. Unknown URLs answer 404.
#[derive(Default)]
pub struct StubHttpClient {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl StubHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route {
                status,
                body: body.into(),
                delay: None,
            },
        );
        self
    }

    pub fn ok(self, url: &str, body: impl Into<String>) -> Self {
        self.respond(url, 200, body)
    }

    pub fn slow(self, url: &str, delay: StdDuration, body: impl Into<String>) -> Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            Route {
                status: 200,
                body: body.into(),
                delay: Some(delay),
            },
        );
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requested URLs in request order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn user_agent_for(&self, url: &str) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, ua)| ua.clone())
    }
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), options.user_agent.clone()));

        let route = self.routes.lock().unwrap().get(url).cloned();
        match route {
            Some(route) => {
                if let Some(delay) = route.delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse {
                    status: route.status,
                    body: route.body,
                })
            }
            None => Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

pub fn fetcher(client: Arc<StubHttpClient>) -> Arc<Fetcher> {
    Arc::new(Fetcher::with_client(client, FetchConfig::default()))
}

pub fn fetcher_with(client: Arc<StubHttpClient>, config: FetchConfig) -> Arc<Fetcher> {
    Arc::new(Fetcher::with_client(client, config))
}

pub struct Item {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub description: String,
}

/// An item published `hours_ago` hours before now.
pub fn item(title: &str, link: &str, hours_ago: i64, description: &str) -> Item {
    Item {
        title: title.to_string(),
        link: link.to_string(),
        published: Some(Utc::now() - Duration::hours(hours_ago)),
        description: description.to_string(),
    }
}

/// RSS 2.0 document with the given channel title and items.
pub fn rss_feed(channel_title: &str, items: &[Item]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n<channel>\n",
    );
    xml.push_str(&format!("<title>{}</title>\n", channel_title));
    xml.push_str("<link>https://example.com/</link>\n<description>Test feed</description>\n");

    for item in items {
        xml.push_str("<item>\n");
        if !item.title.is_empty() {
            xml.push_str(&format!("<title><![CDATA[{}]]></title>\n", item.title));
        }
        if !item.link.is_empty() {
            xml.push_str(&format!("<link>{}</link>\n", item.link));
            xml.push_str(&format!("<guid>{}</guid>\n", item.link));
        }
        if let Some(published) = item.published {
            xml.push_str(&format!("<pubDate>{}</pubDate>\n", published.to_rfc2822()));
        }
        xml.push_str(&format!(
            "<description><![CDATA[{}]]></description>\n",
            item.description
        ));
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}

/// `n` distinct recent items on one host.
pub fn numbered_items(prefix: &str, host: &str, n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            item(
                &format!("{} story {}", prefix, i),
                &format!("https://{}/{}", host, i),
                1 + i as i64,
                "Plain description of the story.",
            )
        })
        .collect()
}
