pub mod fallback;
pub mod signals;
pub mod title;

use crate::core::{ScoredMatch, SearchCandidate, SourceRef, WineGuess};
use crate::providers::wikipedia;
use crate::text::find_vintage;

pub use fallback::{fallback_match, FALLBACK_CONFIDENCE};
pub use signals::{score_candidate, Score, SignalRanker};
pub use title::split_title;

/// Candidates kept for thumbnail enrichment
pub const ENRICH_LIMIT: usize = 8;

/// Matches returned to the caller
pub const MAX_MATCHES: usize = 5;

/// Trait for candidate scoring implementations
pub trait Ranker: Send + Sync {
    /// Drop noise, score the rest and return them sorted by confidence
    /// (highest first, ties in input order)
    fn rank(&self, guess: &WineGuess, candidates: &[SearchCandidate]) -> Vec<RankedCandidate>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Candidate with its confidence and explanation
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub candidate: SearchCandidate,
    pub confidence: u8,
    pub reasons: Vec<String>,
}

impl RankedCandidate {
    /// Resolve into a wine suggestion for this guess
    pub fn into_match(
        self,
        guess: &WineGuess,
        source: Option<SourceRef>,
        image_url: Option<String>,
    ) -> ScoredMatch {
        let title = self.candidate.title.trim().to_string();
        let (producer, name) = split_title(&title, &guess.producer, &guess.name);

        let producer = if producer.is_empty() {
            guess.producer.clone()
        } else {
            producer
        };
        let name = if !name.is_empty() {
            name
        } else if !guess.name.is_empty() {
            guess.name.clone()
        } else {
            title
        };

        ScoredMatch {
            producer,
            name,
            vintage: guess
                .vintage_year()
                .or_else(|| find_vintage(&self.candidate.snippet)),
            confidence: self.confidence,
            reasons: self.reasons,
            image_url,
            source,
        }
    }
}

/// Re-sort by confidence (stable) and keep the top [`MAX_MATCHES`]
pub fn finalize(mut matches: Vec<ScoredMatch>) -> Vec<ScoredMatch> {
    matches.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    matches.truncate(MAX_MATCHES);
    matches
}

/// Rank pooled search results against the user's guesses.
///
/// Pure and total: blank guesses and empty candidate lists degrade to the
/// single fallback match. No thumbnails are resolved here.
pub fn rank(
    producer_guess: &str,
    name_guess: &str,
    vintage_guess: &str,
    candidates: &[SearchCandidate],
) -> Vec<ScoredMatch> {
    let guess = WineGuess::new(producer_guess, name_guess, vintage_guess);
    let ranked = SignalRanker::new().rank(&guess, candidates);

    if ranked.is_empty() {
        return vec![fallback_match(&guess)];
    }

    let matches = ranked
        .into_iter()
        .take(ENRICH_LIMIT)
        .map(|r| {
            let source = wikipedia::source_ref(&r.candidate);
            r.into_match(&guess, Some(source), None)
        })
        .collect();

    finalize(matches)
}
