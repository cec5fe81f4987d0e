//! Text helpers shared by the ranker: normalization, HTML stripping and
//! vintage extraction.
//!
//! Every substring comparison in the ranker runs on [`normalize`]d text, so
//! matching is never case- or punctuation-sensitive.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9à-öø-ÿ\s\-']").expect("valid regex"));

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

static SPAN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?span[^>]*>").expect("valid regex"));

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").expect("valid regex"));

static VINTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid regex"));

/// Normalize text for comparison.
///
/// Lowercases, decodes `&amp;`, replaces everything outside
/// `[a-z0-9à-öø-ÿ\s\-']` with a space, collapses whitespace runs and trims.
/// Idempotent.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase().replace("&amp;", "&");
    let cleaned = DISALLOWED.replace_all(&lowered, " ");
    MULTI_SPACE.replace_all(&cleaned, " ").trim().to_string()
}

/// Strip markup from a search snippet and decode the common entities.
pub fn strip_html(s: &str) -> String {
    let without_spans = SPAN_TAG.replace_all(s, "");
    let without_tags = ANY_TAG.replace_all(&without_spans, "");
    without_tags
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}

/// First `19xx`/`20xx` year standing as its own word.
pub fn find_vintage(text: &str) -> Option<i32> {
    VINTAGE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Non-blank parts joined by a single space.
pub fn join_non_blank<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  Château  Margaux, 2015! "), "château margaux 2015");
        assert_eq!(normalize("Moët &amp; Chandon"), "moët chandon");
        assert_eq!(normalize("Saint-Émilion Grand Cru"), "saint-émilion grand cru");
        assert_eq!(normalize("L'Évangile"), "l'évangile");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_strips_punctuation_between_words() {
        assert_eq!(normalize("Domaine X (disambiguation)"), "domaine x disambiguation");
        assert_eq!(normalize("a/b\\c"), "a b c");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Domaine de la Romanée-Conti",
            "&amp;amp; Weird   \t spacing ",
            "Cuvée «Spéciale» — 2019",
            "İstanbul ÆØÅ ß",
            "tab\tonly",
            "",
            "   ",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_strip_html() {
        let raw = r#"<span class="searchmatch">Château</span> Margaux is a &quot;first growth&quot; &amp; estate&#39;s pride"#;
        assert_eq!(
            strip_html(raw),
            "Château Margaux is a \"first growth\" & estate's pride"
        );
    }

    #[test]
    fn test_find_vintage() {
        assert_eq!(find_vintage("bottled in 2015 and 2016"), Some(2015));
        assert_eq!(find_vintage("1999"), Some(1999));
        assert_eq!(find_vintage("12015"), None);
        assert_eq!(find_vintage("1850 and 2101"), None);
        assert_eq!(find_vintage("n/a"), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("cépage", 3), "cép");
        assert_eq!(truncate_chars("short", 220), "short");
    }

    #[test]
    fn test_join_non_blank() {
        assert_eq!(join_non_blank(["Domaine X", " ", "2019"]), "Domaine X 2019");
        assert_eq!(join_non_blank(["", ""]), "");
    }
}
