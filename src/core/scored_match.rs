use serde::{Deserialize, Serialize};

use crate::core::Language;
use crate::text::truncate_chars;

/// Maximum snippet length kept on a [`SourceRef`]
pub const SNIPPET_LIMIT: usize = 220;

/// Where a match came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Provider name (e.g. "wikipedia")
    pub provider: String,
    pub title: String,
    /// Canonical page URL
    pub url: String,
    /// Snippet, truncated to [`SNIPPET_LIMIT`] characters
    pub snippet: String,
    pub lang: Language,
}

impl SourceRef {
    pub fn new(
        provider: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: &str,
        lang: Language,
    ) -> Self {
        Self {
            provider: provider.into(),
            title: title.into(),
            url: url.into(),
            snippet: truncate_chars(snippet, SNIPPET_LIMIT),
            lang,
        }
    }
}

/// A candidate resolved into a wine suggestion with a 0-100 confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMatch {
    #[serde(default)]
    pub producer: String,

    pub name: String,

    #[serde(default)]
    pub vintage: Option<i32>,

    /// Always within 0..=100
    pub confidence: u8,

    /// Human-readable explanation of the score, in scoring order
    #[serde(default)]
    pub reasons: Vec<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

impl ScoredMatch {
    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        let mut out = if self.producer.is_empty() {
            self.name.clone()
        } else {
            format!("{} – {}", self.producer, self.name)
        };
        if let Some(vintage) = self.vintage {
            out.push_str(&format!(" ({})", vintage));
        }
        out
    }
}

/// Response of a recognition request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeResponse {
    pub ok: bool,

    /// The user's guesses joined as one query
    pub query_used: String,

    /// At most five matches, best first
    pub matches: Vec<ScoredMatch>,
}

impl RecognizeResponse {
    pub fn new(query_used: impl Into<String>, matches: Vec<ScoredMatch>) -> Self {
        Self {
            ok: true,
            query_used: query_used.into(),
            matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScoredMatch {
        ScoredMatch {
            producer: "Château Margaux".to_string(),
            name: "Pavillon Rouge".to_string(),
            vintage: Some(2015),
            confidence: 72,
            reasons: vec!["Wine context detected.".to_string()],
            image_url: None,
            source: None,
        }
    }

    #[test]
    fn test_display_name() {
        let mut m = sample();
        assert_eq!(m.display_name(), "Château Margaux – Pavillon Rouge (2015)");
        m.producer.clear();
        m.vintage = None;
        assert_eq!(m.display_name(), "Pavillon Rouge");
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(RecognizeResponse::new("Margaux", vec![sample()])).unwrap();
        assert_eq!(json["queryUsed"], "Margaux");
        assert_eq!(json["matches"][0]["confidence"], 72);
        assert!(json["matches"][0]["imageUrl"].is_null());
        assert!(json["matches"][0].get("source").is_none());
    }

    #[test]
    fn test_source_ref_truncates_snippet() {
        let long = "é".repeat(300);
        let source = SourceRef::new("wikipedia", "T", "https://x", &long, Language::Fr);
        assert_eq!(source.snippet.chars().count(), SNIPPET_LIMIT);
    }
}
