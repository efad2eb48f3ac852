use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{PreferenceCandidate, PreferenceKind};

/// Explicit dietary tags matched as substrings of the transcript. Values
/// with internal spaces are stored hyphenated.
const DIETARY_TAGS: [&str; 7] = [
    "vegan",
    "vegetarian",
    "kosher",
    "halal",
    "gluten-free",
    "gluten free",
    "lactose intolerant",
];

/// Negative context triggers checked immediately before a keyword.
const NEGATION_TRIGGERS: [&str; 8] = [
    "no ", "don't ", "dont ", "do not ", "avoid ", "allerg", "can't ", "cannot ",
];

static PHRASE_PATTERNS: LazyLock<Vec<(Regex, PreferenceKind)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"i (?:don't|do not|dont) like ([a-zA-Z \-']+)").unwrap(),
            PreferenceKind::Dislike,
        ),
        (
            Regex::new(r"i hate ([a-zA-Z \-']+)").unwrap(),
            PreferenceKind::Dislike,
        ),
        (
            Regex::new(r"i'm allergic to ([a-zA-Z \-']+)").unwrap(),
            PreferenceKind::Allergy,
        ),
        (
            Regex::new(r"i am allergic to ([a-zA-Z \-']+)").unwrap(),
            PreferenceKind::Allergy,
        ),
    ]
});

/// Derives candidate dietary preferences from a transcript and the keywords
/// reported by the analysis model. Pure function; matching is
/// case-insensitive via the lower-cased transcript.
pub fn extract_preferences(
    transcript: &str,
    _intent: &str,
    keywords: &[String],
) -> Vec<PreferenceCandidate> {
    let mut candidates = Vec::new();
    let text = transcript.to_lowercase();

    for tag in DIETARY_TAGS {
        if text.contains(tag) {
            candidates.push(PreferenceCandidate::from_voice(
                PreferenceKind::Restriction,
                tag.replace(' ', "-"),
            ));
        }
    }

    let mentions_allergy =
        text.contains("allerg") || text.contains("allergy") || text.contains("allergic");

    for keyword in keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            continue;
        }
        let lowered = keyword.to_lowercase();

        // An allergy mention wins over any negation trigger for the same
        // keyword.
        if mentions_allergy && text.contains(&lowered) {
            candidates.push(PreferenceCandidate::from_voice(
                PreferenceKind::Allergy,
                keyword,
            ));
            continue;
        }

        let negated = NEGATION_TRIGGERS
            .iter()
            .any(|trigger| text.contains(&format!("{}{}", trigger, lowered)));
        if negated {
            candidates.push(PreferenceCandidate::from_voice(
                PreferenceKind::Dislike,
                keyword,
            ));
        }
    }

    for (pattern, kind) in PHRASE_PATTERNS.iter() {
        for capture in pattern.captures_iter(&text) {
            if let Some(matched) = capture.get(1) {
                let value = matched.as_str().trim();
                if !value.is_empty() {
                    candidates.push(PreferenceCandidate::from_voice(*kind, value));
                }
            }
        }
    }

    candidates
}

/// Collapses candidates by (kind, lower-cased value), keeping first-seen
/// order. Stable and idempotent.
pub fn dedupe_candidates(candidates: Vec<PreferenceCandidate>) -> Vec<PreferenceCandidate> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = (candidate.kind, candidate.value.to_lowercase());
        if seen.insert(key) {
            deduped.push(candidate);
        }
    }

    deduped
}
