use crate::ai::Auth;
use crate::ai::client::claude::{ClaudeRequest, ClaudeResponse};
use crate::ai::client::{APIClient, APIResult};
use crate::clock::{Clock, DateTime, Utc};
use crate::http::{HTTPError, HTTPResult};
use crate::news::FeedService;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::sync::Mutex;

/// Loads a fixture from `tests/data`, with the extension inferred.
pub fn load_data(file: &str) -> String {
    for ext in ["json", "xml"] {
        let path = format!("tests/data/{file}.{ext}");
        if let Ok(data) = fs::read_to_string(&path) {
            return data;
        }
    }
    panic!("could not find test data for '{file}'");
}

/// A clock stuck at a fixed instant, so timestamps are deterministic.
pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}

/// A feed service that answers from fixture files instead of the network.
///
/// URLs that were not registered with [`StaticFeedService::with`] return
/// an HTTP 404, which is also how feed-failure handling gets tested.
#[derive(Default)]
pub struct StaticFeedService {
    bodies: HashMap<String, String>,
}

impl StaticFeedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `fixture` (a `tests/data` file) as the body for `url`.
    pub fn with(mut self, url: &str, fixture: &str) -> Self {
        self.bodies.insert(url.to_string(), load_data(fixture));
        self
    }
}

impl FeedService for StaticFeedService {
    async fn fetch(&self, url: &str) -> HTTPResult<String> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or(HTTPError::Http(reqwest::StatusCode::NOT_FOUND))
    }
}

/// Wraps generated text in the Messages API response envelope.
pub fn claude_text(text: &str) -> ClaudeResponse {
    let body = serde_json::json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-haiku-20240307",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 1, "output_tokens": 1}
    });
    serde_json::from_str(&body.to_string()).expect("could not build a test response")
}

/// An AI client that replays a scripted sequence of response texts.
///
/// Each [`send`](APIClient::send) call consumes the next response;
/// running past the end of the script is a test bug and panics.
pub struct ScriptedClient {
    responses: Mutex<VecDeque<ClaudeResponse>>,
}

impl ScriptedClient {
    pub fn with_responses(texts: Vec<String>) -> Self {
        let responses = texts.iter().map(|text| claude_text(text)).collect();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

impl APIClient for ScriptedClient {
    type APIRequest = ClaudeRequest;
    type APIResponse = ClaudeResponse;

    fn new(_auth: Auth) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
        }
    }

    async fn send(&self, _request: &ClaudeRequest) -> APIResult<ClaudeResponse> {
        let response = self
            .responses
            .lock()
            .expect("scripted client lock poisoned")
            .pop_front()
            .expect("the scripted client ran out of responses");
        Ok(response)
    }
}
