//! Chat message and reply types exchanged with the language model.

use serde::{Deserialize, Serialize};
use vizier_core::widget::DryWidgetConfig;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior conversation turn, replayed to the model for context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Project data context handed to the model alongside the question.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContext {
    /// Project the question is scoped to.
    pub project_id: String,
    /// Description of the project's datasets: tables, columns, types.
    pub description: String,
}

impl DataContext {
    /// Render the system prompt that frames the model as a data analyst
    /// over this project's datasets.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a data analyst answering questions about the datasets of \
             project {}. When a chart or table is the best answer, call the \
             render_widget function with SQL over these datasets and a widget \
             config whose placeholders reference the SQL result columns: \
             [[column]] selects values, ((column)) groups series by the \
             column. Otherwise answer in plain text.\n\nDatasets:\n{}",
            self.project_id, self.description,
        )
    }
}

/// A completed model reply: plain text, or widget templates to hydrate.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmReply {
    /// Free-form answer with no widget.
    Text(String),
    /// One dry config per `render_widget` call the model made.
    Widgets(Vec<DryWidgetConfig>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn chat_message_uses_lowercase_roles_on_the_wire() {
        let message = ChatMessage {
            role: ChatRole::Assistant,
            content: "hello".to_string(),
        };

        let value = serde_json::to_value(&message).expect("serialization should succeed");
        assert_eq!(value, json!({"role": "assistant", "content": "hello"}));
    }

    #[test]
    fn system_prompt_mentions_project_and_datasets() {
        let context = DataContext {
            project_id: "acme-retail".to_string(),
            description: "sales(date DATE, daily_sales NUMERIC)".to_string(),
        };

        let prompt = context.system_prompt();
        assert!(prompt.contains("acme-retail"));
        assert!(prompt.contains("sales(date DATE, daily_sales NUMERIC)"));
        assert!(prompt.contains("render_widget"));
    }
}
