// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! Settings and environment utilities.
//!
//! Feeds, candidate topics, personas, and rubric weights live in a TOML
//! settings file; secrets (API keys and tokens) come from the environment
//! only and are never written to disk.

use crate::ai::{self, AuthResult};
use crate::persona::{self, Persona};
use crate::scoring::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides the settings file location.
pub const CONFIG_PATH_VAR: &str = "THREADSMITH_CONFIG";

/// The Threads app id, from the app dashboard.
pub const APP_ID_VAR: &str = "THREADS_APP_ID";

/// The Threads app secret, from the app dashboard.
pub const APP_SECRET_VAR: &str = "THREADS_APP_SECRET";

/// A long-lived access token obtained through `threadsmith auth`.
pub const ACCESS_TOKEN_VAR: &str = "THREADS_ACCESS_TOKEN";

/// The authorized user id reported alongside the token.
pub const USER_ID_VAR: &str = "THREADS_USER_ID";

/// A configuration error.
#[derive(Debug, Error)]
pub enum Error {
    /// The settings file exists but could not be read.
    #[error("could not read settings file: {0}")]
    Read(#[from] std::io::Error),

    /// The settings file is not valid TOML, or violates an invariant
    /// (such as a negative rubric weight).
    #[error("could not parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No configuration directory exists on this platform.
    #[error("could not locate a configuration directory")]
    MissingConfigDir,

    /// A required environment variable is unset or empty.
    #[error("${0} is not set")]
    MissingEnv(&'static str),
}

/// User-editable settings.
///
/// Every field has a sensible default, so a missing settings file is not
/// an error and a partial file only overrides what it names.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// RSS feeds swept for source material.
    pub feeds: Vec<String>,

    /// Candidate topics tallied by the `trends` subcommand.
    pub topics: Vec<String>,

    /// Configured personas; empty means the built-in examples.
    pub personas: Vec<Persona>,

    /// Rubric weights for candidate scoring.
    pub weights: ScoringWeights,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds: vec![
                String::from("https://news.yahoo.co.jp/rss/topics/top-picks.xml"),
                String::from("https://www.itmedia.co.jp/rss/2.0/news_bursts.xml"),
            ],
            topics: [
                "AI",
                "business",
                "health",
                "food",
                "travel",
                "technology",
                "marketing",
                "side hustles",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            personas: Vec::new(),
            weights: ScoringWeights::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the default location.
    ///
    /// A missing file yields the defaults; a file that exists but does
    /// not parse is an error, since silently ignoring a typo in the
    /// weights table would be worse.
    pub fn load() -> Result<Self, Error> {
        let path = resolve_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// Loads settings from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// The personas to draft as: the configured ones, or the built-in
    /// examples when none are configured.
    pub fn personas(&self) -> Vec<Persona> {
        if self.personas.is_empty() {
            persona::defaults()
        } else {
            self.personas.clone()
        }
    }

    /// Looks up a persona by name, case-insensitively.
    ///
    /// With no name, the first persona is used.
    pub fn persona_named(&self, name: Option<&str>) -> Option<Persona> {
        let personas = self.personas();
        match name {
            None => personas.into_iter().next(),
            Some(name) => personas
                .into_iter()
                .find(|p| p.name.eq_ignore_ascii_case(name)),
        }
    }
}

/// Resolves the settings file path.
///
/// `$THREADSMITH_CONFIG` wins; otherwise the platform configuration
/// directory is used.
pub fn resolve_config_path() -> Result<PathBuf, Error> {
    if let Ok(path) = env::var(CONFIG_PATH_VAR) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("threadsmith").join("config.toml"))
        .ok_or(Error::MissingConfigDir)
}

/// Authentication for the Anthropic API, from `$ANTHROPIC_API_KEY`.
pub fn anthropic_auth() -> AuthResult {
    ai::Auth::from_env(ai::API_KEY_VAR)
}

/// The Threads app credentials `(app_id, app_secret)` from the
/// environment.
pub fn threads_app() -> Result<(String, String), Error> {
    Ok((required_var(APP_ID_VAR)?, required_var(APP_SECRET_VAR)?))
}

/// The Threads user credentials `(access_token, user_id)` from the
/// environment.
pub fn threads_user() -> Result<(String, String), Error> {
    Ok((required_var(ACCESS_TOKEN_VAR)?, required_var(USER_ID_VAR)?))
}

fn required_var(name: &'static str) -> Result<String, Error> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingEnv(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use temp_env::{with_var, with_var_unset};

    #[test]
    fn it_defaults_to_the_stock_feeds_and_weights() {
        let settings = Settings::default();
        assert_eq!(settings.feeds.len(), 2);
        assert_eq!(settings.weights, ScoringWeights::default());
        assert!(settings.personas.is_empty());
    }

    #[test]
    fn it_falls_back_to_builtin_personas() {
        let settings = Settings::default();
        let personas = settings.personas();
        assert_eq!(personas.len(), 3);
    }

    #[test]
    fn it_parses_a_full_settings_file() {
        let content = indoc! {r##"
            feeds = ["https://feeds.example.com/tech.xml"]
            topics = ["coffee", "AI"]

            [weights]
            conversation_trigger = 0.4
            trend_relevance = 0.3
            emotional_impact = 0.1
            value_provided = 0.1
            stage1_potential = 0.1

            [[personas]]
            name = "The Barista"
            specialty = "Coffee"
            tone = "Warm"
            values = "Good coffee for everyone"
            target_audience = "Cafe regulars"
            goals = "Share brewing know-how"
        "##};
        let settings: Settings = toml::from_str(content).unwrap();
        assert_eq!(settings.feeds, vec!["https://feeds.example.com/tech.xml"]);
        assert_eq!(settings.topics, vec!["coffee", "AI"]);
        assert_eq!(settings.personas().len(), 1);
        assert_eq!(
            settings
                .weights
                .get(crate::scoring::Metric::ConversationTrigger),
            Some(0.4)
        );
    }

    #[test]
    fn it_only_overrides_what_a_partial_file_names() {
        let settings: Settings = toml::from_str("topics = [\"espresso\"]").unwrap();
        assert_eq!(settings.topics, vec!["espresso"]);
        assert_eq!(settings.feeds.len(), 2);
        assert_eq!(settings.weights, ScoringWeights::default());
    }

    #[test]
    fn it_rejects_negative_weights_in_the_settings_file() {
        let content = "[weights]\nconversation_trigger = -0.4";
        let parsed: Result<Settings, _> = toml::from_str(content);
        assert!(parsed.is_err());
    }

    #[test]
    fn it_finds_personas_case_insensitively() {
        let settings = Settings::default();
        let persona = settings.persona_named(Some("the operator")).unwrap();
        assert_eq!(persona.name, "The Operator");
    }

    #[test]
    fn it_defaults_to_the_first_persona() {
        let settings = Settings::default();
        let persona = settings.persona_named(None).unwrap();
        assert_eq!(persona.name, "The Foodie");
    }

    #[test]
    fn it_returns_none_for_unknown_personas() {
        let settings = Settings::default();
        assert!(settings.persona_named(Some("The Ghost")).is_none());
    }

    #[test]
    fn it_prefers_the_config_path_override() {
        with_var(CONFIG_PATH_VAR, Some("/tmp/custom.toml"), || {
            let path = resolve_config_path().unwrap();
            assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
        })
    }

    #[test]
    fn it_loads_defaults_when_the_file_is_missing() {
        with_var(
            CONFIG_PATH_VAR,
            Some("/nonexistent/threadsmith/config.toml"),
            || {
                let settings = Settings::load().unwrap();
                assert_eq!(settings.feeds.len(), 2);
            },
        )
    }

    #[test]
    fn it_reports_missing_environment_variables_by_name() {
        with_var_unset(APP_ID_VAR, || {
            let err = threads_app().unwrap_err();
            assert_eq!(err.to_string(), "$THREADS_APP_ID is not set");
        })
    }

    #[test]
    fn it_treats_empty_environment_variables_as_missing() {
        with_var(ACCESS_TOKEN_VAR, Some(""), || {
            assert!(threads_user().is_err());
        })
    }
}
