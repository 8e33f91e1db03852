// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collaborator configuration loaded from environment variables.

/// Collaborator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the chat-completions endpoint.
    pub labeling_endpoint: String,
    /// API key for the labeling/grouping endpoint.
    pub api_key: String,
    /// Vision model name.
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            labeling_endpoint: std::env::var("ROOMSCALE_LABELING_ENDPOINT")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("ROOMSCALE_API_KEY").unwrap_or_default(),
            model: std::env::var("ROOMSCALE_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
        }
    }
}
