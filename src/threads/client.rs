// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! Clients for publishing posts through the Threads Graph API.
//!
//! Publishing is a two-step dance: create a media container for the text,
//! then publish the container. Authentication is standard OAuth with an
//! extra exchange that trades the short-lived token for a 60-day one.

use crate::clock::{Clock, DateTime, Utc};
use crate::persona::MAX_POST_CHARS;
use crate::text;
use crate::threads::service::{HttpThreadsService, ThreadsService};
use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

/// Root of the Threads Graph API.
const BASE_URL: &str = "https://graph.threads.net";

/// The interactive OAuth authorization page.
const AUTH_URL: &str = "https://threads.net/oauth/authorize";

/// Endpoint that exchanges an authorization code for a token.
const TOKEN_URL: &str = "https://graph.threads.net/oauth/access_token";

/// The permissions the tool asks for.
const SCOPES: [&str; 4] = [
    "threads_basic",
    "threads_content_publish",
    "threads_manage_insights",
    "threads_manage_replies",
];

/// Where the OAuth flow sends the browser after authorization.
const DEFAULT_REDIRECT_URI: &str = "https://localhost:8000/callback";

/// The insight metrics requested for a published post.
const INSIGHT_METRICS: &str = "views,likes,replies,reposts,quotes";

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// A call that needs a token was made before authentication.
    #[error(
        "not authenticated: complete the OAuth flow, or set $THREADS_ACCESS_TOKEN and $THREADS_USER_ID"
    )]
    NotAuthenticated,

    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] crate::http::HTTPError),

    /// An error parsing a Graph API response.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A client for one Threads app, optionally bound to an authorized user.
#[derive(Debug)]
pub struct ThreadsClient<S: ThreadsService> {
    app_id: String,
    app_secret: String,
    redirect_uri: String,
    access_token: Option<String>,
    user_id: Option<String>,
    service: S,
}

impl ThreadsClient<HttpThreadsService> {
    /// Creates a new client for the given Threads app credentials.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self::with_service(app_id, app_secret, HttpThreadsService::default())
    }
}

impl<S: ThreadsService> ThreadsClient<S> {
    /// Creates a new client backed by the given service implementation.
    pub(crate) fn with_service(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        service: S,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            redirect_uri: String::from(DEFAULT_REDIRECT_URI),
            access_token: None,
            user_id: None,
            service,
        }
    }

    /// Overrides the OAuth redirect URI.
    pub fn redirect_uri(self, redirect_uri: impl Into<String>) -> Self {
        let redirect_uri = redirect_uri.into();
        Self {
            redirect_uri,
            ..self
        }
    }

    /// Binds the client to an already-authorized user.
    ///
    /// Use this when a long-lived token obtained earlier is supplied via
    /// the environment instead of running the OAuth flow again.
    pub fn authenticated(
        self,
        access_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            user_id: Some(user_id.into()),
            ..self
        }
    }

    /// The current access token, if the client is authenticated.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The authorized user's id, if the client is authenticated.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The URL a user must visit to authorize this app.
    pub fn authorization_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&response_type=code",
            AUTH_URL,
            self.app_id,
            self.redirect_uri,
            SCOPES.join(","),
        )
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// The short-lived token is then traded up for a long-lived (60-day)
    /// one. If that second exchange fails the short-lived token is kept,
    /// with a warning, since it still works for about an hour.
    pub async fn exchange_code(&mut self, code: &str) -> Result<(), Error> {
        let params = [
            ("client_id", self.app_id.as_str()),
            ("client_secret", self.app_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code", code),
        ];
        let body = self.service.post_form(TOKEN_URL, &params).await?;
        let token: ShortLivedToken = serde_json::from_str(&body)?;

        self.access_token = Some(token.access_token);
        self.user_id = Some(token.user_id.to_string());

        if let Err(err) = self.exchange_long_lived().await {
            warn!("could not obtain a long-lived token, keeping the short-lived one: {err}");
        }
        Ok(())
    }

    /// Trades the current token for a long-lived one.
    async fn exchange_long_lived(&mut self) -> Result<(), Error> {
        let access_token = self
            .access_token
            .clone()
            .ok_or(Error::NotAuthenticated)?;
        let url = format!("{BASE_URL}/access_token");
        let query = [
            ("grant_type", "th_exchange_token"),
            ("client_secret", self.app_secret.as_str()),
            ("access_token", access_token.as_str()),
        ];
        let body = self.service.get(&url, &query).await?;
        let token: LongLivedToken = serde_json::from_str(&body)?;

        info!(
            "obtained a long-lived token, expires in {} days",
            token.expires_in / 86_400
        );
        self.access_token = Some(token.access_token);
        Ok(())
    }

    /// Publishes `post_text` to the authorized user's Threads profile.
    ///
    /// Text beyond the 500-character platform limit is truncated with a
    /// warning rather than rejected. Returns a receipt carrying the new
    /// post's id and a publication timestamp from `clock`.
    pub async fn publish<C: Clock>(&self, post_text: &str, clock: &C) -> Result<Receipt, Error> {
        let (access_token, user_id) = self.credentials()?;

        let chars = post_text.chars().count();
        let post_text = if chars > MAX_POST_CHARS {
            warn!("post is {chars} characters, truncating to {MAX_POST_CHARS}");
            text::truncate_chars(post_text, MAX_POST_CHARS)
        } else {
            post_text.to_string()
        };

        let container_id = self
            .create_container(access_token, user_id, &post_text)
            .await?;
        let post_id = self
            .publish_container(access_token, user_id, &container_id)
            .await?;

        Ok(Receipt {
            post_id,
            published_at: clock.now(),
        })
    }

    /// Step 1: registers the text as a media container.
    async fn create_container(
        &self,
        access_token: &str,
        user_id: &str,
        post_text: &str,
    ) -> Result<String, Error> {
        let url = format!("{BASE_URL}/v1.0/{user_id}/threads");
        let params = [
            ("media_type", "TEXT"),
            ("text", post_text),
            ("access_token", access_token),
        ];
        let body = self.service.post_form(&url, &params).await?;
        let container: MediaObject = serde_json::from_str(&body)?;
        Ok(container.id)
    }

    /// Step 2: publishes a previously created container.
    async fn publish_container(
        &self,
        access_token: &str,
        user_id: &str,
        container_id: &str,
    ) -> Result<String, Error> {
        let url = format!("{BASE_URL}/v1.0/{user_id}/threads_publish");
        let params = [
            ("creation_id", container_id),
            ("access_token", access_token),
        ];
        let body = self.service.post_form(&url, &params).await?;
        let published: MediaObject = serde_json::from_str(&body)?;
        Ok(published.id)
    }

    /// Retrieves engagement metrics for a published post.
    pub async fn insights(&self, post_id: &str) -> Result<Insights, Error> {
        let (access_token, _) = self.credentials()?;

        let url = format!("{BASE_URL}/v1.0/{post_id}/insights");
        let query = [
            ("metric", INSIGHT_METRICS),
            ("access_token", access_token),
        ];
        let body = self.service.get(&url, &query).await?;
        let response: InsightsResponse = serde_json::from_str(&body)?;
        Ok(Insights::from_response(response))
    }

    fn credentials(&self) -> Result<(&str, &str), Error> {
        match (self.access_token.as_deref(), self.user_id.as_deref()) {
            (Some(token), Some(user_id)) => Ok((token, user_id)),
            _ => Err(Error::NotAuthenticated),
        }
    }
}

/// Proof that a post went out.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    post_id: String,
    published_at: DateTime<Utc>,
}

#[cfg(test)]
impl Receipt {
    /// A fixed receipt for display tests.
    pub(crate) fn test() -> Self {
        Self {
            post_id: String::from("17920283402"),
            published_at: crate::test_utils::FrozenClock::default().now(),
        }
    }
}

impl Receipt {
    /// The id Threads assigned to the published post.
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// When the post was published.
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

/// Engagement metrics for a published post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Insights {
    /// Times the post was viewed.
    pub views: u64,

    /// Likes received.
    pub likes: u64,

    /// Replies received. Replies are what the ranking system actually
    /// rewards, so this is the number to watch.
    pub replies: u64,

    /// Times the post was reposted.
    pub reposts: u64,

    /// Times the post was quoted.
    pub quotes: u64,
}

impl Insights {
    fn from_response(response: InsightsResponse) -> Self {
        let mut insights = Insights::default();
        for entry in response.data {
            let value = entry.value();
            match entry.name.as_str() {
                "views" => insights.views = value,
                "likes" => insights.likes = value,
                "replies" => insights.replies = value,
                "reposts" => insights.reposts = value,
                "quotes" => insights.quotes = value,
                other => warn!("ignoring unknown insight metric '{other}'"),
            }
        }
        insights
    }
}

#[derive(Debug, Deserialize)]
struct ShortLivedToken {
    access_token: String,
    user_id: u64,
}

#[derive(Debug, Deserialize)]
struct LongLivedToken {
    access_token: String,

    #[serde(default)]
    expires_in: u64,
}

/// The `{"id": "..."}` object both publishing steps answer with.
#[derive(Debug, Deserialize)]
struct MediaObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct InsightsResponse {
    data: Vec<InsightEntry>,
}

#[derive(Debug, Deserialize)]
struct InsightEntry {
    name: String,

    #[serde(default)]
    values: Vec<InsightValue>,

    #[serde(default)]
    total_value: Option<InsightValue>,
}

impl InsightEntry {
    /// Some metrics report a `total_value`, others a `values` series;
    /// either way the lifetime number is what we want.
    fn value(&self) -> u64 {
        self.total_value
            .as_ref()
            .or_else(|| self.values.first())
            .map(|v| v.value)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
struct InsightValue {
    value: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HTTPError, HTTPResult};
    use crate::test_utils::{FrozenClock, load_data};
    use std::sync::Mutex;

    /// Answers every endpoint from the fixture files.
    struct FixtureService;

    impl ThreadsService for FixtureService {
        async fn post_form(&self, url: &str, _params: &[(&str, &str)]) -> HTTPResult<String> {
            if url.ends_with("/oauth/access_token") {
                Ok(load_data("threads_token"))
            } else if url.ends_with("/threads") {
                Ok(load_data("threads_container"))
            } else if url.ends_with("/threads_publish") {
                Ok(load_data("threads_publish"))
            } else {
                Err(HTTPError::Http(reqwest::StatusCode::NOT_FOUND))
            }
        }

        async fn get(&self, url: &str, _query: &[(&str, &str)]) -> HTTPResult<String> {
            if url.ends_with("/access_token") {
                Ok(load_data("threads_long_lived"))
            } else if url.contains("/insights") {
                Ok(load_data("threads_insights"))
            } else {
                Err(HTTPError::Http(reqwest::StatusCode::NOT_FOUND))
            }
        }
    }

    /// Like [`FixtureService`], but the long-lived token exchange fails.
    struct ShortOnlyService;

    impl ThreadsService for ShortOnlyService {
        async fn post_form(&self, _url: &str, _params: &[(&str, &str)]) -> HTTPResult<String> {
            Ok(load_data("threads_token"))
        }

        async fn get(&self, _url: &str, _query: &[(&str, &str)]) -> HTTPResult<String> {
            Err(HTTPError::Http(reqwest::StatusCode::BAD_REQUEST))
        }
    }

    /// Records the text posted to the container endpoint.
    #[derive(Default)]
    struct RecordingService {
        posted: Mutex<Vec<String>>,
    }

    impl ThreadsService for RecordingService {
        async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> HTTPResult<String> {
            if url.ends_with("/threads") {
                let text = params
                    .iter()
                    .find(|(key, _)| *key == "text")
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_default();
                self.posted.lock().unwrap().push(text);
                Ok(load_data("threads_container"))
            } else {
                Ok(load_data("threads_publish"))
            }
        }

        async fn get(&self, _url: &str, _query: &[(&str, &str)]) -> HTTPResult<String> {
            Err(HTTPError::Http(reqwest::StatusCode::NOT_FOUND))
        }
    }

    fn client<S: ThreadsService>(service: S) -> ThreadsClient<S> {
        ThreadsClient::with_service("123456", "s3cr3t", service)
    }

    #[test]
    fn it_builds_an_authorization_url() {
        let client = client(FixtureService);
        let expected = "https://threads.net/oauth/authorize\
            ?client_id=123456\
            &redirect_uri=https://localhost:8000/callback\
            &scope=threads_basic,threads_content_publish,threads_manage_insights,threads_manage_replies\
            &response_type=code";
        assert_eq!(client.authorization_url(), expected);
    }

    #[test]
    fn it_honors_a_custom_redirect_uri() {
        let client = client(FixtureService).redirect_uri("https://example.com/oauth");
        assert!(
            client
                .authorization_url()
                .contains("redirect_uri=https://example.com/oauth")
        );
    }

    #[tokio::test]
    async fn it_exchanges_a_code_for_a_long_lived_token() {
        let mut client = client(FixtureService);
        client.exchange_code("AQBx7").await.unwrap();
        assert_eq!(client.access_token(), Some("THQVJLongLivedToken"));
        assert_eq!(client.user_id(), Some("178414123"));
    }

    #[tokio::test]
    async fn it_keeps_the_short_lived_token_when_the_exchange_fails() {
        let mut client = client(ShortOnlyService);
        client.exchange_code("AQBx7").await.unwrap();
        assert_eq!(client.access_token(), Some("THQVJShortLivedToken"));
        assert_eq!(client.user_id(), Some("178414123"));
    }

    #[tokio::test]
    async fn it_publishes_a_post_and_returns_a_receipt() {
        let client = client(FixtureService).authenticated("THQVJLongLivedToken", "178414123");
        let receipt = client
            .publish("Shipping a tiny tool today. What should it do next?", &FrozenClock::default())
            .await
            .unwrap();
        assert_eq!(receipt.post_id(), "17920283402");
        assert_eq!(receipt.published_at(), FrozenClock::default().now());
    }

    #[tokio::test]
    async fn it_refuses_to_publish_unauthenticated() {
        let client = client(FixtureService);
        let result = client
            .publish("Anyone out there?", &FrozenClock::default())
            .await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
    }

    #[tokio::test]
    async fn it_truncates_over_long_posts_before_sending() {
        let service = RecordingService::default();
        let long_post = "x".repeat(650);

        let client = client(service).authenticated("THQVJLongLivedToken", "178414123");
        client
            .publish(&long_post, &FrozenClock::default())
            .await
            .unwrap();

        let posted = client.service.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].chars().count(), MAX_POST_CHARS);
    }

    #[tokio::test]
    async fn it_parses_post_insights() {
        let client = client(FixtureService).authenticated("THQVJLongLivedToken", "178414123");
        let insights = client.insights("17920283402").await.unwrap();
        assert_eq!(
            insights,
            Insights {
                views: 3204,
                likes: 128,
                replies: 41,
                reposts: 7,
                quotes: 3,
            }
        );
    }

    #[tokio::test]
    async fn it_refuses_to_fetch_insights_unauthenticated() {
        let client = client(FixtureService);
        let result = client.insights("17920283402").await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
    }
}
