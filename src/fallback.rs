use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{FaqError, Result};

pub const DEFAULT_FALLBACK_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_FALLBACK_TIMEOUT: &str = "10s";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the help assistant of an online food marketplace \
connecting farmers, restaurants and traders. Answer briefly. If you do not know the answer, \
tell the user to contact +250 796 897 823 or sales@food.rw.";

/// Answers free text the matcher could not place.
pub trait FallbackResponder {
    fn respond(&self, input: &str) -> Result<String>;
}

impl<F> FallbackResponder for F
where
    F: Fn(&str) -> Result<String>,
{
    fn respond(&self, input: &str) -> Result<String> {
        self(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Chat-completions URL. No endpoint means no remote fallback.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    /// humantime duration, e.g. "10s" or "1m 30s".
    pub timeout: String,
    pub system_prompt: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: DEFAULT_FALLBACK_MODEL.to_string(),
            timeout: DEFAULT_FALLBACK_TIMEOUT.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl FallbackConfig {
    pub fn timeout(&self) -> Result<Duration> {
        let timeout = humantime::parse_duration(&self.timeout).map_err(|err| {
            FaqError::InvalidArg(format!("fallback timeout '{}': {err}", self.timeout))
        })?;
        if timeout.is_zero() {
            return Err(FaqError::InvalidArg(
                "fallback timeout must be > 0".to_string(),
            ));
        }
        Ok(timeout)
    }

    /// Build the HTTP responder when an endpoint is configured.
    pub fn responder(&self) -> Result<Option<HttpResponder>> {
        match &self.endpoint {
            Some(_) => HttpResponder::from_config(self).map(Some),
            None => Ok(None),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 2],
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Generative-text fallback over an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct HttpResponder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    system_prompt: String,
}

impl HttpResponder {
    pub fn from_config(config: &FallbackConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| FaqError::InvalidArg("fallback endpoint is not set".to_string()))?;
        let client = Client::builder().timeout(config.timeout()?).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        })
    }
}

impl FallbackResponder for HttpResponder {
    fn respond(&self, input: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatTurn {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatTurn {
                    role: "user",
                    content: input,
                },
            ],
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response: ChatResponse = request.send()?.error_for_status()?.json()?;
        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(FaqError::Fallback("empty reply".to_string()));
        }
        Ok(reply)
    }
}
