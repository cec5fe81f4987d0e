pub mod candidate;
pub mod guess;
pub mod scored_match;

pub use candidate::{Language, SearchCandidate};
pub use guess::WineGuess;
pub use scored_match::{RecognizeResponse, ScoredMatch, SourceRef};
