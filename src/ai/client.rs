//! API clients for various AI services.

pub mod claude;

use crate::ai::Auth;
use crate::http::HTTPError;
use thiserror::Error;

/// A client for an AI service's API.
pub trait APIClient {
    /// The client can make API requests of this type.
    type APIRequest: APIRequest;

    /// The client receives API responses of this type.
    type APIResponse: APIResponse;

    /// Creates a new client with the given authentication data.
    fn new(auth: Auth) -> Self;

    /// Sends the request to the AI service and receives a response.
    fn send(
        &self,
        request: &Self::APIRequest,
    ) -> impl Future<Output = APIResult<Self::APIResponse>> + Send;
}

/// A request to an AI service's API.
///
/// This trait follows a "builder" pattern where elements of the request
/// are built up over time:
///
/// ```
/// use threadsmith::ai::client::APIRequest;
/// use threadsmith::ai::client::claude::{ClaudeRequest, Model};
///
/// let request = ClaudeRequest::default()
///     .model(Model::cheapest())
///     .instructions("You are a social media editor.")
///     .input("Rewrite this post so it sounds like a person wrote it.");
/// ```
///
/// It is often useful for your concrete implementation to also implement
/// [`Default`] to return an instance with default values already set,
/// although this is not required.
pub trait APIRequest {
    /// An enum or other data structure providing options for different
    /// AI models, which are specific to each service.
    type Model;

    /// Sets the model used by the API request and returns a new
    /// request.
    ///
    /// AI services often have many different models; consult the
    /// documentation for your specific AI service for options.
    fn model(self, model: Self::Model) -> Self;

    /// Sets specialized instructions for the request and returns a new
    /// request.
    ///
    /// Some AI services allow callers to specify instructions for
    /// generating responses, such as tone, goals, or examples of
    /// correct responses, separately from the prompt itself. If your
    /// service has no such channel, this method can be a no-op.
    fn instructions(self, instructions: impl Into<String>) -> Self;

    /// Sets the request's input and returns a new request.
    ///
    /// The input is often referred to as a "prompt" and is the text
    /// for which an AI service generates a response.
    fn input(self, input: impl Into<String>) -> Self;
}

/// A response from an AI service's API.
pub trait APIResponse {
    /// The generated text, concatenated across whatever block structure
    /// the service's wire format uses.
    fn text(&self) -> String;
}

/// An API result that includes the response if successful or an error
/// if unsuccessful.
pub type APIResult<T> = Result<T, APIError>;

/// An API error.
#[derive(Debug, Error)]
pub enum APIError {
    /// An error from the underlying HTTP exchange.
    #[error("HTTP error: {0}")]
    Http(#[from] HTTPError),

    /// The service answered with something that does not parse as its
    /// documented response shape.
    #[error("could not parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}
