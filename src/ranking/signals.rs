use crate::core::{SearchCandidate, WineGuess};
use crate::ranking::{RankedCandidate, Ranker};
use crate::text::{find_vintage, normalize};

/// Wine vocabulary (EN + FR, grapes and regions) used as a relevance signal
pub const DOMAIN_VOCABULARY: &[&str] = &[
    // en
    "wine",
    "winery",
    "vineyard",
    "vineyards",
    "grape",
    "grapes",
    "appellation",
    "aoc",
    "aop",
    "doc",
    "docg",
    "chateau",
    "château",
    "domaine",
    "cru",
    "cuvee",
    "cuvée",
    "champagne",
    "sparkling",
    "red wine",
    "white wine",
    "rosé",
    "rose",
    // grapes and regions
    "cabernet",
    "merlot",
    "pinot",
    "syrah",
    "shiraz",
    "tempranillo",
    "nebbiolo",
    "sangiovese",
    "sauvignon",
    "riesling",
    "bourgogne",
    "bordeaux",
    "rioja",
    "chianti",
    "barolo",
    "burgundy",
    "tuscany",
    "piemonte",
    "mendoza",
    "marlborough",
    // fr
    "vin",
    "vignoble",
    "viticole",
    "viticulture",
    "cépage",
    "appellation d origine",
    "appellation d'origine",
    "mis en bouteille",
];

/// Terms scored outside the vocabulary cap
pub const BONUS_TERMS: &[(&str, i32)] = &[("producer", 2), ("estate", 1)];

const TERM_POINTS: i32 = 2;
const DOMAIN_CAP: i32 = 30;
const NO_CONTEXT_PENALTY: i32 = -10;

const PRODUCER_FULL: i32 = 28;
const PRODUCER_PER_TOKEN: i32 = 6;
const PRODUCER_TOKEN_CAP: i32 = 18;

const NAME_FULL: i32 = 22;
const NAME_PER_TOKEN: i32 = 5;
const NAME_TOKEN_CAP: i32 = 14;

const VINTAGE_MATCH: i32 = 8;
const VINTAGE_SUPPLIED: i32 = 2;

/// Only tokens this long count towards a partial match
const MIN_TOKEN_CHARS: usize = 4;

/// Confidence and its explanation for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub confidence: u8,
    pub reasons: Vec<String>,
}

/// Keyword-signal ranker: wine vocabulary, producer/name overlap and vintage
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalRanker;

impl SignalRanker {
    pub fn new() -> Self {
        Self
    }
}

impl Ranker for SignalRanker {
    fn rank(&self, guess: &WineGuess, candidates: &[SearchCandidate]) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .filter(|c| !c.title.trim().is_empty() && !c.is_disambiguation())
            .map(|c| {
                let score = score_candidate(guess, c);
                RankedCandidate {
                    candidate: c.clone(),
                    confidence: score.confidence,
                    reasons: score.reasons,
                }
            })
            .collect();

        // Stable: ties keep discovery order
        ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        ranked
    }

    fn name(&self) -> &str {
        "signals"
    }
}

/// Score one candidate against the guess
pub fn score_candidate(guess: &WineGuess, candidate: &SearchCandidate) -> Score {
    let hay = candidate.haystack();
    let mut reasons = Vec::new();
    let mut total = 0;

    let vocabulary = vocabulary_points(&hay);
    if vocabulary > 0 {
        total += vocabulary.min(DOMAIN_CAP);
        reasons.push("Wine context detected.".to_string());
    } else {
        total += NO_CONTEXT_PENALTY;
        reasons.push("Little wine context (lower confidence).".to_string());
    }
    total += bonus_points(&hay);

    let producer = normalize(&guess.producer);
    match match_guess(&hay, &producer, PRODUCER_FULL, PRODUCER_PER_TOKEN, PRODUCER_TOKEN_CAP) {
        Some(GuessMatch::Full(points)) => {
            total += points;
            reasons.push(format!("Producer found: \"{}\"", guess.producer.trim()));
        }
        Some(GuessMatch::Partial { points, hits }) => {
            total += points;
            reasons.push(format!("Producer partially found ({} token(s)).", hits));
        }
        None => {}
    }

    let name = normalize(&guess.name);
    match match_guess(&hay, &name, NAME_FULL, NAME_PER_TOKEN, NAME_TOKEN_CAP) {
        Some(GuessMatch::Full(points)) => {
            total += points;
            reasons.push(format!("Name found: \"{}\"", guess.name.trim()));
        }
        Some(GuessMatch::Partial { points, hits }) => {
            total += points;
            reasons.push(format!("Name partially found ({} token(s)).", hits));
        }
        None => {}
    }

    if let Some(year) = guess.vintage_year() {
        if find_vintage(&hay) == Some(year) {
            total += VINTAGE_MATCH;
            reasons.push(format!("Vintage match: {}", year));
        } else {
            total += VINTAGE_SUPPLIED;
            reasons.push(format!("Vintage supplied: {}", year));
        }
    }

    Score {
        confidence: total.clamp(0, 100) as u8,
        reasons,
    }
}

/// Uncapped vocabulary subtotal: two points per term present
fn vocabulary_points(hay: &str) -> i32 {
    DOMAIN_VOCABULARY
        .iter()
        .filter(|term| hay.contains(*term))
        .count() as i32
        * TERM_POINTS
}

fn bonus_points(hay: &str) -> i32 {
    BONUS_TERMS
        .iter()
        .filter(|(term, _)| hay.contains(term))
        .map(|(_, points)| points)
        .sum()
}

enum GuessMatch {
    Full(i32),
    Partial { points: i32, hits: usize },
}

/// Two-tier match of a normalized guess: whole string first, then long tokens
fn match_guess(
    hay: &str,
    guess: &str,
    full: i32,
    per_token: i32,
    token_cap: i32,
) -> Option<GuessMatch> {
    if guess.is_empty() {
        return None;
    }
    if hay.contains(guess) {
        return Some(GuessMatch::Full(full));
    }

    let hits = guess
        .split(' ')
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|t| hay.contains(t))
        .count();

    if hits == 0 {
        return None;
    }

    Some(GuessMatch::Partial {
        points: (hits as i32 * per_token).min(token_cap),
        hits,
    })
}
