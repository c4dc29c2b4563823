//! Anthropic Claude API client.
//!
//! When you create a request, you will have to select a [model](Model) to
//! use. By default, the [cheapest](Model::cheapest) model is selected; it is
//! plenty for drafting 500-character social posts. Read the
//! [Anthropic model documentation](https://docs.anthropic.com/en/docs/about-claude/models)
//! for more information on the various models offered by the Anthropic API.
//!
//! # Access
//!
//! You will need to set up an [Anthropic API account](https://console.anthropic.com/)
//! and generate your own authentication key. Your key should be stored
//! under the `$ANTHROPIC_API_KEY` environment variable for use with
//! [`Auth`](crate::ai::Auth).
//!
//! **Note that you are solely responsible for paying the costs of Anthropic
//! API access.** Each generation run makes one drafting call plus two
//! humanizing calls per kept draft, so a run with five drafts is on the
//! order of a dozen requests.
//!
//! # Cost
//!
//! Models are billed on a per-token basis, where a token is the smallest
//! unit of text the model reads and produces. Prices are expressed in US
//! dollars per 1 million tokens. As of July 2025, the prices for each model
//! are as follows; for the latest pricing, see Anthropic's
//! [pricing](https://docs.anthropic.com/en/docs/about-claude/pricing) docs.
//!
//! | Model    | Descriptor                 | Input  | Output |
//! |----------|----------------------------|--------|--------|
//! | Haiku3   | claude-3-haiku-20240307    | $0.25  | $1.25  |
//! | Haiku35  | claude-3-5-haiku-20241022  | $0.80  | $4.00  |
//! | Sonnet37 | claude-3-7-sonnet-20250219 | $3.00  | $15.00 |
//! | Sonnet4  | claude-sonnet-4-20250514   | $3.00  | $15.00 |
//! | Opus4    | claude-opus-4-20250514     | $15.00 | $75.00 |

use crate::ai::Auth;
use crate::ai::client::{APIClient, APIRequest, APIResponse, APIResult};
use crate::http::{HTTPError, HTTPService};
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Endpoint for the Anthropic Messages API.
const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// The API version header value required by every request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A body for an Anthropic Messages API request.
#[derive(Debug, Deserialize, Serialize)]
pub struct ClaudeRequest {
    model: Model,

    max_tokens: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    messages: Vec<Message>,
}

impl Default for ClaudeRequest {
    /// A request with the default model, a 4000-token output ceiling, and
    /// no messages yet.
    fn default() -> Self {
        Self {
            model: Model::default(),
            max_tokens: 4000,
            temperature: None,
            system: None,
            messages: Vec::new(),
        }
    }
}

impl ClaudeRequest {
    /// Sets the output token ceiling for the response.
    pub fn max_tokens(self, max_tokens: u32) -> Self {
        Self { max_tokens, ..self }
    }

    /// Sets the sampling temperature, between 0.0 and 1.0.
    ///
    /// Lower values make the output more predictable; higher values make
    /// it more varied. The drafting pass runs warmer than the humanizing
    /// pass, which is meant to converge, not explore.
    pub fn temperature(self, temperature: f64) -> Self {
        let temperature = Some(temperature);
        Self {
            temperature,
            ..self
        }
    }
}

impl APIRequest for ClaudeRequest {
    /// This request uses Claude-specific [models](Model).
    type Model = Model;

    /// Sets the model used by the request.
    ///
    /// If not specified, the [default](Model::default) model will be used.
    fn model(self, model: Model) -> Self {
        Self { model, ..self }
    }

    /// Sets the system prompt for the request.
    ///
    /// The Messages API carries high-level behavioral instructions in a
    /// `system` field separate from the conversation turns. Instructions
    /// are not necessary if you do not wish to customize the response.
    fn instructions(self, instructions: impl Into<String>) -> Self {
        let system = Some(instructions.into());
        Self { system, ..self }
    }

    /// Sets the request's input, replacing the conversation with a single
    /// user turn containing the given prompt.
    fn input(self, input: impl Into<String>) -> Self {
        let messages = vec![Message::user(input)];
        Self { messages, ..self }
    }
}

/// One turn of a Messages API conversation.
#[derive(Debug, Deserialize, Serialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// A message authored by the caller.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The author of a [`Message`].
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caller.
    User,

    /// The model.
    Assistant,
}

/// Available Claude models.
///
/// The [default](Model::default) is [claude-3-haiku](Model::Haiku3), the
/// model the drafting prompts were tuned against and also the
/// [least expensive](Model::cheapest) option. See the
/// [cost breakdown](self#cost) in the module documentation for prices.
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub enum Model {
    /// Fast and cheap; tuned target of the drafting prompts.
    #[default]
    #[serde(rename = "claude-3-haiku-20240307")]
    Haiku3,

    /// A newer small model, noticeably better at following strict output
    /// format rules.
    #[serde(rename = "claude-3-5-haiku-20241022")]
    Haiku35,

    /// A mid-size model with hybrid reasoning.
    #[serde(rename = "claude-3-7-sonnet-20250219")]
    Sonnet37,

    /// The current general-purpose workhorse.
    #[serde(rename = "claude-sonnet-4-20250514")]
    Sonnet4,

    /// The most capable, and most expensive, option.
    #[serde(rename = "claude-opus-4-20250514")]
    Opus4,
}

impl Model {
    /// The least expensive available model.
    pub fn cheapest() -> Self {
        Model::Haiku3
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(&self).expect(&format!("could not serialize {:?}", self));
        let s = s.trim_matches('"');
        f.write_fmt(format_args!("{}", s))
    }
}

/// A body for an Anthropic Messages API response.
#[derive(Debug, Deserialize)]
pub struct ClaudeResponse {
    id: String,

    model: String,

    content: Vec<ContentBlock>,

    stop_reason: Option<String>,

    usage: Option<Usage>,
}

impl ClaudeResponse {
    /// The unique id the service assigned to this exchange.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The descriptor of the model that actually produced the response.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Why the model stopped generating, if the service said.
    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    /// Token accounting for the exchange, if the service provided it.
    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }
}

impl APIResponse for ClaudeResponse {
    /// The generated text, concatenated across all text content blocks.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// One block of response content.
///
/// Text generations arrive as blocks of type `"text"`; other block types
/// (tool use and the like) carry no text and are skipped when the response
/// is flattened to a string.
#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,

    #[serde(default)]
    text: Option<String>,
}

impl ContentBlock {
    /// The wire-format type tag of this block.
    pub fn block_type(&self) -> &str {
        &self.block_type
    }
}

/// Token accounting reported by the service.
#[derive(Debug, Deserialize)]
pub struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

impl Usage {
    /// Tokens read from the request.
    pub fn input_tokens(&self) -> u64 {
        self.input_tokens
    }

    /// Tokens produced in the response.
    pub fn output_tokens(&self) -> u64 {
        self.output_tokens
    }
}

/// A client for the Anthropic Messages API.
#[derive(Debug)]
pub struct ClaudeClient {
    auth: Auth,
    client: reqwest::Client,
}

impl HTTPService for ClaudeClient {}

impl APIClient for ClaudeClient {
    type APIRequest = ClaudeRequest;
    type APIResponse = ClaudeResponse;

    /// Creates a new client with the given authentication data.
    fn new(auth: Auth) -> Self {
        let client = Self::client();
        Self { auth, client }
    }

    /// Sends the request to the Messages API and receives a response.
    async fn send(&self, request: &ClaudeRequest) -> APIResult<ClaudeResponse> {
        let resp = self
            .client
            .post(MESSAGES_URL)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", self.auth.api_key())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(HTTPError::from)?;

        if !resp.status().is_success() {
            return Err(HTTPError::Http(resp.status()).into());
        }

        let response = resp
            .json::<ClaudeResponse>()
            .await
            .map_err(HTTPError::from)?;
        Ok(response)
    }
}
