use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::core::{Language, SearchCandidate, SourceRef};
use crate::error::{CellarError, Result};
use crate::providers::SearchProvider;
use crate::text::strip_html;

const PROVIDER_NAME: &str = "wikipedia";

/// Wikipedia search and thumbnail provider for one language edition
pub struct WikipediaProvider {
    client: Client,
    language: Language,
    search_limit: usize,
    thumbnail_size: u32,
}

#[derive(Debug, Deserialize)]
struct SearchApiResponse {
    #[serde(default)]
    query: Option<SearchBlock>,
}

#[derive(Debug, Deserialize)]
struct SearchBlock {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    thumbnail: Option<ImageRef>,
    #[serde(default)]
    originalimage: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    source: String,
}

#[derive(Debug, Deserialize)]
struct PageImagesResponse {
    #[serde(default)]
    query: Option<PagesBlock>,
}

#[derive(Debug, Deserialize)]
struct PagesBlock {
    #[serde(default)]
    pages: HashMap<String, PageImage>,
}

#[derive(Debug, Deserialize)]
struct PageImage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnail: Option<ImageRef>,
}

impl WikipediaProvider {
    /// Create a provider for `language` using the configured timeout and User-Agent
    pub fn new(language: Language, config: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            language,
            search_limit: config.search_limit,
            thumbnail_size: config.thumbnail_size,
        })
    }

    fn base_url(&self) -> String {
        format!("https://{}.wikipedia.org", self.language.code())
    }

    fn source_name(&self) -> String {
        format!("{}-{}", PROVIDER_NAME, self.language.code())
    }

    fn upstream(&self, message: impl Into<String>) -> CellarError {
        CellarError::upstream(self.source_name(), message)
    }

    async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.upstream(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(self.upstream(format!("HTTP {}", response.status())));
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| self.upstream(format!("Invalid JSON: {}", e)))?;

        Ok(Some(body))
    }
}

#[async_trait]
impl SearchProvider for WikipediaProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let url = format!("{}/w/api.php", self.base_url());
        let params = [
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("srsearch", query.to_string()),
            ("format", "json".to_string()),
            ("utf8", "1".to_string()),
            ("srlimit", self.search_limit.to_string()),
            ("srnamespace", "0".to_string()),
        ];

        let response: Option<SearchApiResponse> = self.get_json(&url, &params).await?;
        let candidates = response
            .map(|r| candidates_from_search(r, self.language))
            .unwrap_or_default();

        tracing::debug!(
            "{} returned {} candidates for {:?}",
            self.source_name(),
            candidates.len(),
            query
        );

        Ok(candidates)
    }

    async fn thumbnail(&self, title: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url(),
            encode_title(title)
        );

        let summary: Option<SummaryResponse> = self.get_json(&url, &[]).await?;
        Ok(summary.and_then(summary_image))
    }

    async fn thumbnails(&self, titles: &[String]) -> Result<HashMap<String, String>> {
        if titles.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/w/api.php", self.base_url());
        let params = [
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("prop", "pageimages".to_string()),
            ("piprop", "thumbnail".to_string()),
            ("pithumbsize", self.thumbnail_size.to_string()),
            ("titles", titles.join("|")),
            ("redirects", "1".to_string()),
        ];

        let response: Option<PageImagesResponse> = self.get_json(&url, &params).await?;
        Ok(response.map(images_by_title).unwrap_or_default())
    }

    fn page_url(&self, title: &str) -> String {
        page_url(self.language, title)
    }

    fn language(&self) -> Language {
        self.language
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

/// Title as used in Wikipedia paths: spaces to underscores, percent-encoded
fn encode_title(title: &str) -> String {
    urlencoding::encode(&title.replace(' ', "_")).into_owned()
}

/// Canonical article URL for a title
pub fn page_url(language: Language, title: &str) -> String {
    format!(
        "https://{}.wikipedia.org/wiki/{}",
        language.code(),
        encode_title(title)
    )
}

/// Wikipedia reference for a candidate
pub fn source_ref(candidate: &SearchCandidate) -> SourceRef {
    SourceRef::new(
        PROVIDER_NAME,
        candidate.title.clone(),
        page_url(candidate.language, &candidate.title),
        &candidate.snippet,
        candidate.language,
    )
}

fn candidates_from_search(response: SearchApiResponse, language: Language) -> Vec<SearchCandidate> {
    response
        .query
        .map(|q| q.search)
        .unwrap_or_default()
        .into_iter()
        .filter(|hit| !hit.title.trim().is_empty())
        .map(|hit| SearchCandidate::new(language, hit.title, strip_html(&hit.snippet)))
        .collect()
}

fn summary_image(summary: SummaryResponse) -> Option<String> {
    summary
        .thumbnail
        .or(summary.originalimage)
        .map(|img| img.source)
        .filter(|s| !s.is_empty())
}

fn images_by_title(response: PageImagesResponse) -> HashMap<String, String> {
    response
        .query
        .map(|q| q.pages)
        .unwrap_or_default()
        .into_values()
        .filter_map(|page| {
            let thumb = page.thumbnail?.source;
            if page.title.is_empty() || thumb.is_empty() {
                None
            } else {
                Some((page.title, thumb))
            }
        })
        .collect()
}
