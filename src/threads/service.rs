// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! HTTPS connector for the Threads Graph API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Threads API over HTTPS, essentially a specialized HTTPS client
//! specifically for Threads.

use crate::http::{HTTPError, HTTPResult, HTTPService};
use reqwest::header;

/// A service for talking to the Threads Graph API.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Threads API, such as an actual connector for production code,
/// and a deterministic connector for testing purposes.
pub trait ThreadsService {
    /// Sends a form-encoded POST to `url` and returns the raw JSON body.
    fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Sends a GET with the given query parameters and returns the raw
    /// JSON body.
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts the Threads Graph API directly.
pub struct HttpThreadsService {
    client: reqwest::Client,
}

impl HTTPService for HttpThreadsService {}

impl Default for HttpThreadsService {
    /// Creates a new Threads service with a stock HTTP client.
    fn default() -> Self {
        let client = Self::client();
        Self { client }
    }
}

impl HttpThreadsService {
    /// Verifies a Graph API response and extracts its body.
    ///
    /// The Graph API answers JSON for every endpoint used here; anything
    /// else means the request went somewhere unexpected.
    async fn read_json_body(resp: reqwest::Response) -> HTTPResult<String> {
        if !resp.status().is_success() {
            return Err(HTTPError::Http(resp.status()));
        }
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .ok_or(HTTPError::MissingContentType)?
            .to_str()?;
        if !content_type.starts_with("application/json") {
            Err(HTTPError::UnexpectedContentType(content_type.to_string()))
        } else {
            Ok(resp.text().await?)
        }
    }
}

impl ThreadsService for HttpThreadsService {
    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> HTTPResult<String> {
        let resp = self.client.post(url).form(params).send().await?;
        Self::read_json_body(resp).await
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> HTTPResult<String> {
        let resp = self.client.get(url).query(query).send().await?;
        Self::read_json_body(resp).await
    }
}
