pub mod wikipedia;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::core::{Language, SearchCandidate, SourceRef};
use crate::error::Result;

pub use wikipedia::WikipediaProvider;

/// Trait for encyclopedia search sources, one per language edition
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Full-text search; snippets come back as plain text
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>>;

    /// Thumbnail for a single page, if it has one
    async fn thumbnail(&self, title: &str) -> Result<Option<String>>;

    /// Thumbnails for several pages in one call, keyed by page title
    async fn thumbnails(&self, titles: &[String]) -> Result<HashMap<String, String>>;

    /// Canonical URL of a page
    fn page_url(&self, title: &str) -> String;

    /// Language edition served by this provider
    fn language(&self) -> Language;

    /// Get provider name
    fn name(&self) -> &str;

    /// Reference to a candidate's page on this provider
    fn source_ref(&self, candidate: &SearchCandidate) -> SourceRef {
        SourceRef::new(
            self.name(),
            candidate.title.clone(),
            self.page_url(&candidate.title),
            &candidate.snippet,
            candidate.language,
        )
    }
}
