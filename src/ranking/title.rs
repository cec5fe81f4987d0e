use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::text::normalize;

static LEADING_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-–:]\s*").expect("valid regex"));

const SEPARATORS: [&str; 2] = [" – ", " - "];

/// Split a page title into a best-guess `(producer, name)` pair.
///
/// Tries, in order: cutting the producer guess out of the title, splitting
/// on a spaced dash, and finally falling back to the guesses themselves.
pub fn split_title(title: &str, producer_guess: &str, name_guess: &str) -> (String, String) {
    let title = title.trim();
    let producer = producer_guess.trim();
    let name = name_guess.trim();

    let title_norm = normalize(title);
    let producer_norm = normalize(producer);

    let or_fallback = |s: &str| -> String {
        if !s.is_empty() {
            s.to_string()
        } else if !name.is_empty() {
            name.to_string()
        } else {
            title.to_string()
        }
    };

    if !producer_norm.is_empty() && title_norm.contains(&producer_norm) {
        let rest = remove_first_ci(title, producer);
        let rest = LEADING_SEPARATOR.replace(&rest, "");
        return (producer.to_string(), or_fallback(rest.trim()));
    }

    if let Some(sep) = SEPARATORS.iter().find(|sep| title.contains(**sep)) {
        let mut parts = title.splitn(2, sep).map(str::trim);
        let first = parts.next().unwrap_or_default();
        let second = parts.next().unwrap_or_default();

        if !producer_norm.is_empty() {
            if normalize(first).contains(&producer_norm) {
                return (first.to_string(), or_fallback(second));
            }
            if normalize(second).contains(&producer_norm) {
                return (second.to_string(), or_fallback(first));
            }
        }

        let producer_part = if first.is_empty() { producer } else { first };
        return (producer_part.to_string(), or_fallback(second));
    }

    (producer.to_string(), or_fallback(""))
}

/// Remove the first case-insensitive literal occurrence of `needle`
fn remove_first_ci(haystack: &str, needle: &str) -> String {
    match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace(haystack, "").into_owned(),
        Err(_) => haystack.to_string(),
    }
}
