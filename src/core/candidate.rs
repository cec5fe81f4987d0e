use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::text::normalize;

/// Snippet phrases that mark a "may refer to" page, already normalized
const DISAMBIGUATION_PHRASES: &[&str] = &[
    "may refer to",
    "peut faire référence à",
    "peut se référer à",
];

/// Language edition of the encyclopedia a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    /// Words appended to a search so it leans towards wine pages
    pub fn context_words(&self) -> [&'static str; 2] {
        match self {
            Language::En => ["wine", "winery"],
            Language::Fr => ["vin", "domaine"],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// One raw search result before scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub title: String,

    /// Plain text, markup already stripped
    #[serde(default)]
    pub snippet: String,

    pub language: Language,
}

impl SearchCandidate {
    pub fn new(language: Language, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            language,
        }
    }

    /// Normalized `title + " " + snippet`, the text every signal is matched against
    pub fn haystack(&self) -> String {
        normalize(&format!("{} {}", self.title, self.snippet))
    }

    /// Disambiguation and "may refer to" pages are never wine matches.
    ///
    /// The title marker is checked before normalization strips its parentheses.
    pub fn is_disambiguation(&self) -> bool {
        if self.title.to_lowercase().contains("(disambiguation)") {
            return true;
        }
        let snippet = normalize(&self.snippet);
        DISAMBIGUATION_PHRASES.iter().any(|p| snippet.contains(p))
    }
}
