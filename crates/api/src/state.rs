use std::sync::Arc;

use vizier_llm::LanguageModel;
use vizier_query::QueryEngine;

use crate::config::ServerConfig;
use crate::context::ContextCache;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Collaborators
/// are held behind their trait seams so integration tests can substitute
/// stubs.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upstream SQL execution service.
    pub query: Arc<dyn QueryEngine>,
    /// Language model producing replies and dry widget configs.
    pub llm: Arc<dyn LanguageModel>,
    /// Per-project data-context cache (cheaply cloneable, shared entries).
    pub context: ContextCache,
}
