//! Query-engine collaborator for Vizier.
//!
//! The API layer depends on the [`QueryEngine`] seam: run SQL, get rows;
//! describe a project, get a schema summary for the language model. The
//! [`HttpQueryEngine`] implementation targets the upstream SQL execution
//! service over HTTP.

mod client;
mod error;

pub use client::HttpQueryEngine;
pub use error::QueryError;

use async_trait::async_trait;
use vizier_core::widget::Row;

/// Executes SQL against an upstream engine and serves project metadata.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Run `sql` and return the result rows in result order.
    async fn run(&self, sql: &str) -> Result<Vec<Row>, QueryError>;

    /// Fetch a human-readable description of a project's datasets
    /// (tables, columns, types), used as model context.
    async fn describe(&self, project_id: &str) -> Result<String, QueryError>;
}
