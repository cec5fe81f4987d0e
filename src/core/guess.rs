use serde::{Deserialize, Serialize};

use crate::core::Language;
use crate::error::{CellarError, Result};
use crate::text::{find_vintage, join_non_blank};

/// The user's free-text description of a bottle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WineGuess {
    #[serde(default, rename = "producerGuess")]
    pub producer: String,

    #[serde(default, rename = "nameGuess")]
    pub name: String,

    #[serde(default, rename = "vintageGuess")]
    pub vintage: String,
}

impl WineGuess {
    /// Create a guess; every field is trimmed
    pub fn new(producer: impl AsRef<str>, name: impl AsRef<str>, vintage: impl AsRef<str>) -> Self {
        Self {
            producer: producer.as_ref().trim().to_string(),
            name: name.as_ref().trim().to_string(),
            vintage: vintage.as_ref().trim().to_string(),
        }
    }

    /// Re-trim fields, e.g. after deserializing a request body
    pub fn trimmed(self) -> Self {
        Self::new(self.producer, self.name, self.vintage)
    }

    /// A search needs at least a producer or a name
    pub fn validate(&self) -> Result<()> {
        if self.producer.trim().is_empty() && self.name.trim().is_empty() {
            return Err(CellarError::InvalidInput(
                "Enter at least a producer or a name to search.".to_string(),
            ));
        }
        Ok(())
    }

    /// Non-blank guesses joined by a space
    pub fn query_used(&self) -> String {
        join_non_blank([self.producer.as_str(), self.name.as_str(), self.vintage.as_str()])
    }

    /// Query sent to one language edition: the guesses plus two context words
    pub fn search_query(&self, language: Language) -> String {
        let core = self.query_used();
        let [first, second] = language.context_words();
        join_non_blank([core.as_str(), first, second])
    }

    /// Year parsed from the vintage guess, if any
    pub fn vintage_year(&self) -> Option<i32> {
        find_vintage(&self.vintage)
    }
}
