use crate::core::{ScoredMatch, WineGuess};

/// Confidence given to a match built only from the user's input
pub const FALLBACK_CONFIDENCE: u8 = 60;

const UNKNOWN: &str = "Unknown";

/// Synthetic match used when no search result survives filtering
pub fn fallback_match(guess: &WineGuess) -> ScoredMatch {
    let or_unknown = |s: &str| {
        if s.trim().is_empty() {
            UNKNOWN.to_string()
        } else {
            s.trim().to_string()
        }
    };

    ScoredMatch {
        producer: or_unknown(&guess.producer),
        name: or_unknown(&guess.name),
        vintage: guess.vintage_year(),
        confidence: FALLBACK_CONFIDENCE,
        reasons: vec!["No results found; using your input as entered.".to_string()],
        image_url: None,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_uses_guess() {
        let m = fallback_match(&WineGuess::new("Domaine X", "Cuvée Y", "2019"));
        assert_eq!(m.producer, "Domaine X");
        assert_eq!(m.name, "Cuvée Y");
        assert_eq!(m.vintage, Some(2019));
        assert_eq!(m.confidence, 60);
        assert_eq!(m.reasons.len(), 1);
    }

    #[test]
    fn test_fallback_blank_fields() {
        let m = fallback_match(&WineGuess::new("", "Cuvée Y", "NV"));
        assert_eq!(m.producer, "Unknown");
        assert_eq!(m.vintage, None);
    }
}
