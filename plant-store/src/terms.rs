//! Turns a free-text question into PostgREST name filters.

/// Upper bound on terms sent in one `or=(…)` filter.
pub const MAX_TERMS: usize = 8;

/// Shortest word worth matching against plant names.
const MIN_TERM_LEN: usize = 3;

/// Question words that would match half the catalog.
const STOP_WORDS: &[&str] = &[
    "about", "and", "are", "benefit", "benefits", "can", "does", "for", "from", "good", "has",
    "have", "help", "helps", "how", "into", "its", "medicinal", "plant", "plants", "should",
    "take", "tell", "that", "the", "their", "this", "use", "used", "uses", "what", "when",
    "where", "which", "who", "why", "with", "you", "your",
];

/// Extracts candidate plant-name words from `query`.
///
/// Words are split on anything that is not alphanumeric, lowercased, kept
/// when at least three characters long and not a stop word, de-duplicated in
/// order of first appearance, and capped at [`MAX_TERMS`]. The output never
/// contains PostgREST reserved characters.
pub fn search_terms(query: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in query.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() < MIN_TERM_LEN {
            continue;
        }
        let lower = word.to_lowercase();
        if STOP_WORDS.contains(&lower.as_str()) || out.contains(&lower) {
            continue;
        }
        out.push(lower);
        if out.len() == MAX_TERMS {
            break;
        }
    }
    out
}

/// Builds the value of PostgREST's `or` parameter: a case-insensitive
/// substring match on `name` for each term.
///
/// Returns `None` for an empty term list.
pub fn name_filter(terms: &[String]) -> Option<String> {
    if terms.is_empty() {
        return None;
    }
    let clauses: Vec<String> = terms.iter().map(|t| format!("name.ilike.*{t}*")).collect();
    Some(format!("({})", clauses.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_short_and_stop_words() {
        assert_eq!(search_terms("What helps with stress?"), vec!["stress"]);
        assert_eq!(
            search_terms("Is Ashwagandha good for sleep?"),
            vec!["ashwagandha", "sleep"]
        );
    }

    #[test]
    fn dedups_and_strips_reserved_characters() {
        let terms = search_terms("tulsi, TULSI (holy-basil) *neem*");
        assert_eq!(terms, vec!["tulsi", "holy", "basil", "neem"]);
        assert!(terms.iter().all(|t| t.chars().all(char::is_alphanumeric)));
    }

    #[test]
    fn caps_number_of_terms() {
        let q = "alpha bravo charlie delta echo foxtrot golf hotel india juliet";
        assert_eq!(search_terms(q).len(), MAX_TERMS);
    }

    #[test]
    fn builds_or_filter() {
        let f = name_filter(&["neem".into(), "tulsi".into()]).unwrap();
        assert_eq!(f, "(name.ilike.*neem*,name.ilike.*tulsi*)");
        assert!(name_filter(&[]).is_none());
    }
}
