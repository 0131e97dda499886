//! HTTP client for a chat-completions-style language model API.
//!
//! Sends the system prompt, history, and question in one request and
//! decodes the reply: `render_widget` tool calls become dry widget
//! configs, plain content becomes text. The reply text is forwarded
//! through the caller's [`DeltaSink`](crate::DeltaSink) as it is decoded;
//! this implementation forwards it as a single delta, the seam allows
//! finer-grained increments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vizier_core::widget::DryWidgetConfig;

use crate::messages::{ChatMessage, DataContext, LlmReply};
use crate::{DeltaSink, LanguageModel};

/// Name of the widget-rendering function offered to the model.
const RENDER_WIDGET: &str = "render_widget";

/// Errors from the language-model HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API returned a non-2xx status code.
    #[error("Model API error ({status}): {body}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered 2xx but the reply was unusable (no choices,
    /// undecodable tool arguments).
    #[error("Malformed model reply: {0}")]
    MalformedReply(String),
}

/// HTTP-backed [`LanguageModel`] implementation.
pub struct HttpLanguageModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpLanguageModel {
    /// Create a client for the model API.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `https://llm.internal`.
    /// * `api_key`  - Bearer token attached to every request.
    /// * `model`    - Model identifier sent with each completion request.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    /// Build the wire messages: system prompt, history, then the question.
    fn build_messages(
        question: &str,
        context: &DataContext,
        history: &[ChatMessage],
    ) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: context.system_prompt(),
        });
        for turn in history {
            messages.push(WireMessage {
                role: match turn.role {
                    crate::messages::ChatRole::User => "user".to_string(),
                    crate::messages::ChatRole::Assistant => "assistant".to_string(),
                },
                content: turn.content.clone(),
            });
        }
        messages.push(WireMessage {
            role: "user".to_string(),
            content: question.to_string(),
        });
        messages
    }

    /// JSON schema for the `render_widget` function parameters.
    fn render_widget_tool() -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": RENDER_WIDGET,
                "description": "Render a chart or table widget from a SQL query result",
                "parameters": {
                    "type": "object",
                    "required": ["title", "sql", "type"],
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "sql": { "type": "string" },
                        "type": { "type": "string", "enum": ["chart", "table"] },
                        "chart": {
                            "type": "object",
                            "properties": {
                                "type": { "type": "string" },
                                "data": {
                                    "type": "object",
                                    "properties": {
                                        "labels": { "type": "string" },
                                        "datasets": {
                                            "type": "array",
                                            "items": {
                                                "type": "object",
                                                "required": ["label", "data"],
                                                "properties": {
                                                    "label": { "type": "string" },
                                                    "data": { "type": "string" },
                                                    "backgroundColor": {
                                                        "type": "array",
                                                        "items": { "type": "string" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        "columns": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "required": ["key", "name", "dataType"],
                                "properties": {
                                    "key": { "type": "string" },
                                    "name": { "type": "string" },
                                    "dataType": {
                                        "type": "string",
                                        "enum": ["string", "number", "date", "object", "array"]
                                    }
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    /// Decode the arguments of one `render_widget` call.
    fn decode_widget(arguments: &str) -> Result<DryWidgetConfig, LlmError> {
        let value: serde_json::Value = serde_json::from_str(arguments)
            .map_err(|e| LlmError::MalformedReply(format!("Tool arguments are not JSON: {e}")))?;
        DryWidgetConfig::from_value(value).map_err(|e| LlmError::MalformedReply(e.to_string()))
    }
}

#[async_trait]
impl LanguageModel for HttpLanguageModel {
    async fn generate(
        &self,
        question: &str,
        context: &DataContext,
        history: &[ChatMessage],
        deltas: DeltaSink,
    ) -> Result<LlmReply, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: Self::build_messages(question, context, history),
            tools: vec![Self::render_widget_tool()],
            tool_choice: "auto",
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedReply(e.to_string()))?;

        let reply = payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedReply("Reply contained no choices".to_string()))?
            .message;

        // Any assistant commentary travels to the client as a delta,
        // whether or not widgets follow. A send failure means the client
        // went away; the reply is still returned to the caller.
        if let Some(content) = &reply.content {
            if !content.is_empty() {
                let _ = deltas.send(content.clone());
            }
        }

        let tool_calls = reply.tool_calls.unwrap_or_default();
        if tool_calls.is_empty() {
            return Ok(LlmReply::Text(reply.content.unwrap_or_default()));
        }

        let mut widgets = Vec::with_capacity(tool_calls.len());
        for call in &tool_calls {
            if call.function.name != RENDER_WIDGET {
                tracing::warn!(name = %call.function.name, "Ignoring unknown tool call");
                continue;
            }
            widgets.push(Self::decode_widget(&call.function.arguments)?);
        }

        if widgets.is_empty() {
            return Err(LlmError::MalformedReply(
                "Reply contained only unknown tool calls".to_string(),
            ));
        }

        tracing::debug!(widgets = widgets.len(), "Model produced widget configs");

        Ok(LlmReply::Widgets(widgets))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    tools: Vec<serde_json::Value>,
    tool_choice: &'a str,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireReply,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
