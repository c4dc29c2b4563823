// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! AI services.

pub mod client;

use std::env;
use thiserror::Error;

/// The environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Manages authentication keys for AI service APIs.
#[derive(Debug)]
pub struct Auth {
    api_key: String,
}

impl Auth {
    /// Creates a new `Auth` structure using the given API key.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: String::from(api_key),
        }
    }

    /// Retrieves an API key from the environment.
    ///
    /// Returns an error if the API key cannot be retrieved from the
    /// environment.
    pub fn from_env(envvar: &str) -> AuthResult {
        let api_key = env::var(envvar).map_err(|err| AuthError::Env(envvar.to_string(), err))?;
        Ok(Self { api_key })
    }

    /// The actual API key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threadsmith::ai::Auth;
    /// let auth = Auth::new("ThisIsMyApiKey");
    /// assert_eq!(auth.api_key(), "ThisIsMyApiKey");
    /// ```
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Standard result type for [`Auth`] creation.
pub type AuthResult = Result<Auth, AuthError>;

/// Indicates an error when creating an authentication key.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An error occurred while retrieving a key from the environment.
    #[error("${0} is not usable: {1}")]
    Env(String, env::VarError),
}
