use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::core::{Language, RecognizeResponse, ScoredMatch, SearchCandidate, WineGuess};
use crate::error::Result;
use crate::providers::{SearchProvider, WikipediaProvider};
use crate::ranking::{
    fallback_match, finalize, RankedCandidate, Ranker, SignalRanker, ENRICH_LIMIT,
};

/// Wine recognition orchestrator: parallel search, ranking, thumbnail enrichment
pub struct RecognitionEngine {
    ranker: Arc<dyn Ranker>,
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl Default for RecognitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionEngine {
    /// Create an engine with the signal ranker and no providers
    pub fn new() -> Self {
        Self {
            ranker: Arc::new(SignalRanker::new()),
            providers: Vec::new(),
        }
    }

    /// Create an engine with one Wikipedia provider per configured language
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut engine = Self::new();
        for language in &config.languages {
            engine.add_provider(Arc::new(WikipediaProvider::new(*language, config)?));
        }
        tracing::info!(
            "Recognition engine ready ({} provider(s), ranker: {})",
            engine.providers.len(),
            engine.ranker.name()
        );
        Ok(engine)
    }

    /// Replace the ranker
    pub fn with_ranker(mut self, ranker: Arc<dyn Ranker>) -> Self {
        self.ranker = ranker;
        self
    }

    /// Add a search provider
    pub fn add_provider(&mut self, provider: Arc<dyn SearchProvider>) {
        self.providers.push(provider);
    }

    /// Match a user's guess against every provider.
    ///
    /// Fails only for invalid input; provider failures count as empty results.
    pub async fn recognize(&self, guess: WineGuess) -> Result<RecognizeResponse> {
        let start = Instant::now();
        let guess = guess.trimmed();
        guess.validate()?;

        let query_used = guess.query_used();
        let pooled = self.search_all(&guess).await;
        let ranked = self.ranker.rank(&guess, &pooled);

        if ranked.is_empty() {
            tracing::info!("No usable results for {:?}, using input as-is", query_used);
            return Ok(RecognizeResponse::new(query_used, vec![fallback_match(&guess)]));
        }

        let top: Vec<RankedCandidate> = ranked.into_iter().take(ENRICH_LIMIT).collect();
        let images = self.resolve_images(&top).await;

        let matches: Vec<ScoredMatch> = top
            .into_iter()
            .zip(images)
            .map(|(ranked, image_url)| {
                let source = self
                    .provider_for(ranked.candidate.language)
                    .map(|p| p.source_ref(&ranked.candidate));
                ranked.into_match(&guess, source, image_url)
            })
            .collect();

        let matches = finalize(matches);

        tracing::info!(
            "✅ {:?} → {} match(es), best {}% ({:.1}ms)",
            query_used,
            matches.len(),
            matches.first().map(|m| m.confidence).unwrap_or(0),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(RecognizeResponse::new(query_used, matches))
    }

    /// Query every provider in parallel and pool the candidates in provider order
    async fn search_all(&self, guess: &WineGuess) -> Vec<SearchCandidate> {
        let searches = self.providers.iter().map(|provider| {
            let query = guess.search_query(provider.language());
            async move {
                match provider.search(&query).await {
                    Ok(results) => {
                        tracing::debug!(
                            "Provider {}-{} returned {} results",
                            provider.name(),
                            provider.language(),
                            results.len()
                        );
                        results
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Provider {}-{} failed: {}",
                            provider.name(),
                            provider.language(),
                            e
                        );
                        Vec::new()
                    }
                }
            }
        });

        join_all(searches).await.into_iter().flatten().collect()
    }

    /// Thumbnail per candidate: page summary first, then the batch page-images lookup
    async fn resolve_images(&self, top: &[RankedCandidate]) -> Vec<Option<String>> {
        let summaries = join_all(top.iter().map(|r| async move {
            let provider = self.provider_for(r.candidate.language)?;
            match provider.thumbnail(&r.candidate.title).await {
                Ok(image) => image,
                Err(e) => {
                    tracing::debug!("Thumbnail lookup failed for {}: {}", r.candidate.title, e);
                    None
                }
            }
        }));

        let batches = join_all(self.providers.iter().map(|provider| {
            let titles: Vec<String> = top
                .iter()
                .filter(|r| r.candidate.language == provider.language())
                .map(|r| r.candidate.title.clone())
                .collect();
            async move {
                let images = if titles.is_empty() {
                    HashMap::new()
                } else {
                    provider.thumbnails(&titles).await.unwrap_or_else(|e| {
                        tracing::debug!("Page images lookup failed: {}", e);
                        HashMap::new()
                    })
                };
                (provider.language(), images)
            }
        }));

        let (summaries, batches) = futures::join!(summaries, batches);

        let mut by_language: HashMap<Language, HashMap<String, String>> = HashMap::new();
        for (language, images) in batches {
            by_language.entry(language).or_default().extend(images);
        }

        top.iter()
            .zip(summaries)
            .map(|(r, summary)| {
                summary.or_else(|| {
                    by_language
                        .get(&r.candidate.language)
                        .and_then(|images| images.get(&r.candidate.title).cloned())
                })
            })
            .collect()
    }

    fn provider_for(&self, language: Language) -> Option<&Arc<dyn SearchProvider>> {
        self.providers.iter().find(|p| p.language() == language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CellarError;

    #[tokio::test]
    async fn test_engine_creation() {
        let engine = RecognitionEngine::from_config(&EngineConfig::default()).unwrap();
        assert_eq!(engine.providers.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_guess_rejected() {
        let engine = RecognitionEngine::new();
        let err = engine.recognize(WineGuess::new(" ", "", "2019")).await.unwrap_err();
        assert!(matches!(err, CellarError::InvalidInput(_)));
    }

    struct RejectAll;

    impl Ranker for RejectAll {
        fn rank(&self, _guess: &WineGuess, _candidates: &[SearchCandidate]) -> Vec<RankedCandidate> {
            Vec::new()
        }

        fn name(&self) -> &str {
            "reject-all"
        }
    }

    #[tokio::test]
    async fn test_custom_ranker_rejecting_everything_falls_back() {
        let engine = RecognitionEngine::new().with_ranker(Arc::new(RejectAll));
        let response = engine
            .recognize(WineGuess::new("", "Cuvée Y", ""))
            .await
            .unwrap();
        assert_eq!(response.matches[0].producer, "Unknown");
        assert_eq!(response.matches[0].name, "Cuvée Y");
    }

    #[tokio::test]
    async fn test_no_providers_falls_back() {
        let engine = RecognitionEngine::new();
        let response = engine
            .recognize(WineGuess::new("Domaine X", "Cuvée Y", "2019"))
            .await
            .unwrap();
        assert_eq!(response.query_used, "Domaine X Cuvée Y 2019");
        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].confidence, 60);
    }
}
