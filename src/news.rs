// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! Collects source material from RSS feeds.
//!
//! Feeds are plain RSS 2.0. A feed that cannot be fetched or parsed is
//! logged and skipped so that one dead feed never blocks a drafting run.

use crate::clock::{DateTime, Utc};
use crate::count::Mentions;
use crate::http::{HTTPError, HTTPResult, HTTPService};
use crate::text;
use indoc::formatdoc;
use log::warn;
use rss::Channel;
use thiserror::Error;

/// A service for retrieving feed documents.
///
/// Using this trait, clients can implement different ways of fetching
/// feeds, such as an actual HTTP connector for production code and a
/// deterministic connector for testing purposes.
pub trait FeedService {
    /// Retrieves the raw feed document at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that fetches feeds over HTTP.
pub struct HttpFeedService {
    client: reqwest::Client,
}

impl HTTPService for HttpFeedService {}

impl Default for HttpFeedService {
    /// Creates a new feed service with a stock HTTP client.
    fn default() -> Self {
        let client = Self::client();
        Self { client }
    }
}

impl FeedService for HttpFeedService {
    async fn fetch(&self, url: &str) -> HTTPResult<String> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            Err(HTTPError::Http(resp.status()))
        } else {
            Ok(resp.text().await?)
        }
    }
}

/// A feed collection error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] HTTPError),

    /// An error parsing a feed document.
    #[error("Feed parse error: {0}")]
    Parse(#[from] rss::Error),
}

/// One news item pulled out of a feed.
#[derive(Clone, Debug, PartialEq)]
pub struct NewsItem {
    title: String,
    summary: String,
    link: String,
    source: String,
    published: Option<DateTime<Utc>>,
}

impl NewsItem {
    /// Builds a news item from an RSS entry.
    ///
    /// Feed text routinely arrives with HTML entities in titles and
    /// summaries; both are decoded here so downstream consumers never
    /// see `&amp;`.
    fn from_rss(item: &rss::Item, source: &str) -> Self {
        let published = item
            .pub_date()
            .and_then(|date| DateTime::parse_from_rfc2822(date).ok())
            .map(|date| date.with_timezone(&Utc));
        Self {
            title: text::convert_html_entities(item.title().unwrap_or_default()),
            summary: text::convert_html_entities(item.description().unwrap_or_default()),
            link: item.link().unwrap_or_default().to_string(),
            source: source.to_string(),
            published,
        }
    }

    /// The item's headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The item's summary or description.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Link to the full article.
    pub fn link(&self) -> &str {
        &self.link
    }

    /// The feed URL the item came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// When the item was published, if the feed said.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published
    }

    /// True if the item mentions any of the given keywords,
    /// case-insensitively, in its title or summary.
    ///
    /// An empty keyword list matches everything.
    pub fn matches(&self, keywords: &[String]) -> bool {
        if keywords.is_empty() {
            return true;
        }
        let title = self.title.to_lowercase();
        let summary = self.summary.to_lowercase();
        keywords
            .iter()
            .map(|kw| kw.to_lowercase())
            .any(|kw| title.contains(&kw) || summary.contains(&kw))
    }

    /// The context block the generator embeds into its drafting prompt.
    ///
    /// Summaries are clipped to a snippet so one long article does not
    /// crowd out the instructions.
    pub fn prompt_block(&self) -> String {
        let published = self
            .published
            .map(|date| date.to_rfc3339())
            .unwrap_or_else(|| String::from("unknown"));
        formatdoc! {"
            [NEWS]
            Title: {}
            Summary: {}
            Source: {}
            Published: {}",
            self.title,
            text::snippet(&self.summary, 200),
            self.link,
            published,
        }
    }
}

#[cfg(test)]
impl NewsItem {
    /// A fixed news item for display tests.
    pub(crate) fn test() -> Self {
        let published = DateTime::parse_from_rfc2822("14 May 2026 16:45:00 GMT")
            .unwrap()
            .with_timezone(&Utc);
        Self {
            title: String::from("Espresso prices climb for the third straight month"),
            summary: String::from("Cafe owners are quietly rewriting their menus again."),
            link: String::from("https://news.example.com/espresso-prices"),
            source: String::from("https://feeds.example.com/tech.xml"),
            published: Some(published),
        }
    }
}

impl Mentions for NewsItem {
    fn mentions(&self, topic: &str) -> bool {
        self.matches(std::slice::from_ref(&topic.to_string()))
    }
}

/// Sweeps the configured feeds for recent news.
#[derive(Debug)]
pub struct NewsCollector {
    feeds: Vec<String>,
}

impl NewsCollector {
    /// Creates a collector over the given feed URLs.
    pub fn new(feeds: Vec<String>) -> Self {
        Self { feeds }
    }

    /// The configured feed URLs.
    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }

    /// Adds a feed URL, ignoring duplicates.
    pub fn add_feed(&mut self, url: impl Into<String>) {
        let url = url.into();
        if !self.feeds.contains(&url) {
            self.feeds.push(url);
        }
    }

    /// Collects up to `limit` items across all feeds, newest first.
    ///
    /// `keywords` filters items by title and summary; pass an empty slice
    /// to keep everything. Items without a publication date sort last.
    /// A feed that fails to fetch or parse is logged and skipped.
    pub async fn collect<S: FeedService>(
        &self,
        service: &S,
        limit: usize,
        keywords: &[String],
    ) -> Vec<NewsItem> {
        let mut all = Vec::new();
        for feed_url in &self.feeds {
            match self.collect_feed(service, feed_url, keywords).await {
                Ok(items) => all.extend(items),
                Err(err) => {
                    warn!("skipping feed {feed_url}: {err}");
                    continue;
                }
            }
        }

        all.sort_by(|a, b| b.published.cmp(&a.published));
        all.truncate(limit);
        all
    }

    async fn collect_feed<S: FeedService>(
        &self,
        service: &S,
        feed_url: &str,
        keywords: &[String],
    ) -> Result<Vec<NewsItem>, Error> {
        let body = service.fetch(feed_url).await?;
        let channel = Channel::read_from(body.as_bytes())?;
        let items = channel
            .items()
            .iter()
            .map(|item| NewsItem::from_rss(item, feed_url))
            .filter(|item| item.matches(keywords))
            .collect();
        Ok(items)
    }
}
