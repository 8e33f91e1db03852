// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chat-completions transport shared by the labeling and grouping clients.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Minimal chat-completions client over a vision-capable endpoint.
pub(crate) struct ChatClient {
    endpoint: String,
    api_key: String,
    model: String,
    http: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatClient {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| Error::Malformed(format!("invalid API key header: {e}")))?,
        );
        Ok(headers)
    }

    /// Send one completion request and return the first choice's content.
    pub fn complete(&self, messages: Vec<serde_json::Value>) -> Result<String> {
        let resp = self
            .http
            .post(format!("{}/chat/completions", self.endpoint))
            .headers(self.auth_headers()?)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": messages,
            }))
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let body: ChatResponse = resp.json()?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Malformed("completion carried no choices".into()))
    }
}

/// Strip a markdown code fence (```json … ``` or ``` … ```) wrapping a
/// response body. Models wrap JSON payloads inconsistently; parsing works on
/// the inner text either way.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line
    match inner.split_once('\n') {
        Some((first_line, rest)) if first_line.trim().chars().all(char::is_alphanumeric) => {
            rest.trim()
        }
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_unwrapped() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn bare_fences_are_unwrapped() {
        let fenced = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(fenced), "[1, 2]");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn an_unterminated_fence_is_left_alone() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "```json\n{\"a\": 1}");
    }
}
