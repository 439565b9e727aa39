//! Checklist assistant backed by the Anthropic Messages API.
//!
//! Given a message, the assistant drafts checklist items or a short
//! summary. Replies are cleaned up by the pure functions at the bottom of
//! this module before they reach the checklist.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AssistantError;
use crate::message::Message;

/// Messages API endpoint.
pub const API_URL: &str = "https://api.anthropic.com/v1/messages";

const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters of body text sent with a request.
pub const MAX_BODY_CHARS: usize = 2000;

/// Longest checklist item kept, in characters.
pub const MAX_ITEM_CHARS: usize = 100;

/// Lines this short or shorter are not treated as items.
const MIN_ITEM_CHARS: usize = 5;

type Result<T> = std::result::Result<T, AssistantError>;

/// HTTP client for drafting checklist items.
#[derive(Debug, Clone)]
pub struct Assistant {
    http_client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl Assistant {
    /// Creates an assistant for the given key and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: API_URL.to_string(),
        })
    }

    /// Builds an assistant from configuration, or `None` when no API key
    /// is configured.
    #[must_use]
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.claude_api_key.as_deref()?;
        match Self::new(api_key, config.claude_model.as_str()) {
            Ok(assistant) => Some(assistant),
            Err(e) => {
                warn!(error = %e, "assistant disabled");
                None
            }
        }
    }

    /// Overrides the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Model id used for requests.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Drafts one checklist item for a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is empty.
    pub async fn suggest_item(&self, message: &Message) -> Result<String> {
        let prompt = format!(
            "Write one short, actionable checklist item (under 80 characters, \
             starting with a verb) for this email. Reply with the item text only.\n\n{}",
            email_context(message)
        );
        let reply = self.complete(&prompt, 150).await?;
        clean_item(&reply).ok_or(AssistantError::EmptyResponse)
    }

    /// Drafts up to `count` checklist items for a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn suggest_items(&self, message: &Message, count: usize) -> Result<Vec<String>> {
        let prompt = format!(
            "Write {count} short, actionable checklist items (under 80 characters \
             each, starting with a verb) for this email. Put one item per line \
             with no numbering or bullets.\n\n{}",
            email_context(message)
        );
        let reply = self.complete(&prompt, 300).await?;
        Ok(clean_item_lines(&reply, count))
    }

    /// Summarizes a message in a sentence or two.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is empty.
    pub async fn summarize(&self, message: &Message) -> Result<String> {
        let prompt = format!(
            "Summarize the main point or request of this email in one or two \
             sentences.\n\n{}",
            email_context(message)
        );
        let reply = self.complete(&prompt, 200).await?;
        let summary = reply.trim();
        if summary.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(summary.to_string())
    }

    /// Sends a single-turn request and returns the first text block.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, max_tokens, "assistant request");
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map_or_else(|_| status.to_string(), |body| body.error.message);
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = response.json().await?;
        body.content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(AssistantError::EmptyResponse)
    }
}

/// The email as presented to the model, body cut to [`MAX_BODY_CHARS`].
fn email_context(message: &Message) -> String {
    let body: String = message.body.chars().take(MAX_BODY_CHARS).collect();
    format!(
        "Email Subject: {}\nFrom: {}\n\nEmail Content:\n{body}",
        message.subject, message.sender
    )
}

/// Cuts text to [`MAX_ITEM_CHARS`], ending in `...` when shortened.
fn cap_length(text: &str) -> String {
    if text.chars().count() <= MAX_ITEM_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_ITEM_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

/// Cleans a single-item reply: trims whitespace and surrounding quotes.
fn clean_item(reply: &str) -> Option<String> {
    let cleaned = reply.trim().trim_matches('"').trim_matches('\'');
    (!cleaned.is_empty()).then(|| cap_length(cleaned))
}

/// Splits a multi-item reply into at most `count` items.
///
/// Quotes, dashes and asterisks around each line are stripped, and lines
/// of [`MIN_ITEM_CHARS`] characters or fewer are dropped.
fn clean_item_lines(reply: &str, count: usize) -> Vec<String> {
    reply
        .trim()
        .lines()
        .map(|line| {
            line.trim()
                .trim_matches('"')
                .trim_matches('\'')
                .trim_matches('-')
                .trim_matches('*')
                .trim()
        })
        .filter(|line| line.chars().count() > MIN_ITEM_CHARS)
        .map(cap_length)
        .take(count)
        .collect()
}
