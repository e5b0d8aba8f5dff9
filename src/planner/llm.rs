//! Hosted model clients.
//!
//! One blocking request per call, no retries. OpenAI and Upstage share the
//! chat-completions wire format; Anthropic uses its messages API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, Provider};

use super::{PlannerError, Result};

/// Something that turns a system prompt and a user message into a reply.
pub trait LlmClient {
    fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// [`LlmClient`] over HTTP, for whichever provider the config names.
pub struct HttpLlm {
    provider: Provider,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::blocking::Client,
}

impl HttpLlm {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            provider: config.provider,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn chat_completions(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let response: ChatResponse = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(PlannerError::EmptyReply)
    }

    fn messages(&self, system: &str, user: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let response: MessagesResponse = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(PlannerError::EmptyReply)
    }
}

impl LlmClient for HttpLlm {
    fn complete(&self, system: &str, user: &str) -> Result<String> {
        debug!(provider = %self.provider, model = %self.model, "calling model");
        match self.provider {
            Provider::OpenAi | Provider::Upstage => self.chat_completions(system, user),
            Provider::Anthropic => self.messages(system, user),
        }
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
