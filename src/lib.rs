// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! threadsmith is a command-line tool that drafts Threads posts for a
//! configured authorial persona, scores each candidate against a weighted
//! quality rubric, and publishes the winner through the Threads API. It
//! pulls source material from RSS feeds, asks Claude for structured
//! drafts, rewrites them so they read like a person wrote them, and ranks
//! the results so the best candidate is always at the top.
//!
//! # Examples
//!
//! Draft five scored candidates from the latest feed news:
//!
//! ```bash
//! threadsmith draft
//! ```
//!
//! Draft as a specific persona, about a specific subject, with the score
//! breakdown:
//!
//! ```bash
//! threadsmith draft espresso --persona "The Foodie" --details
//! ```
//!
//! List the latest news collected from the configured feeds:
//!
//! ```bash
//! threadsmith news
//! ```
//!
//! See which configured topics today's news mentions the most:
//!
//! ```bash
//! threadsmith trends -c
//! ```
//!
//! Score a post you wrote yourself:
//!
//! ```bash
//! threadsmith score my-post.txt
//! ```
//!
//! Publish, then check how the post is doing:
//!
//! ```bash
//! threadsmith publish "Shipping a tiny tool today. What should it do next? #buildinpublic"
//! threadsmith insights 17920283402
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! threadsmith --help
//! ```
//!
//! # Anthropic API Setup
//!
//! Drafting uses the Anthropic Claude API. To enable access:
//!
//! 1. Set up an [Anthropic API account].
//! 2. Generate an [API key].
//! 3. Store the generated key in your shell's `$ANTHROPIC_API_KEY`
//!    environment variable. Follow your shell's procedure for configuring
//!    environment variables, but generally this involves running
//!
//!    ```bash
//!    $ export ANTHROPIC_API_KEY='copied api key'
//!    ```
//!
//!    in your shell session or in your shell's configuration ("rc") file
//!    (e.g., `~/.bashrc` or `~/.zshrc`).
//!
//! **You are solely responsible for the cost of your use of the Anthropic
//! API!** See the [claude module documentation] for more information on
//! the cost of using the API.
//!
//! # Threads API Setup
//!
//! Publishing and insights use the Threads API. Create a Threads app in
//! the Meta developer dashboard, store its id and secret in
//! `$THREADS_APP_ID` and `$THREADS_APP_SECRET`, then run
//! `threadsmith auth url` and `threadsmith auth token <code>` to obtain a
//! long-lived access token for `$THREADS_ACCESS_TOKEN` and
//! `$THREADS_USER_ID`.
//!
//! # License
//!
//! threadsmith is licensed under the terms of the [Apache License 2.0].
//! Please see the LICENSE file accompanying this source code or visit the
//! previous link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [API key]: https://console.anthropic.com/settings/keys
//! [Anthropic API account]: https://console.anthropic.com/
//! [claude module documentation]: crate::ai::client::claude

pub mod ai;
pub mod cli;
pub mod clock;
pub mod conf;
pub mod count;
pub mod generator;
pub mod http;
pub mod news;
pub mod persona;
pub mod scoring;
pub mod text;
pub mod threads;
pub mod view;

#[cfg(test)]
mod test_utils;
