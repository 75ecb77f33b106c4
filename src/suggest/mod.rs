//! Domain typo suggestions against a popular-domain reference list.

mod distance;
mod reference;

pub use distance::edit_distance;
pub use reference::ReferenceDomains;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestOptions {
    /// Maximum number of suggestions returned.
    pub limit: usize,
    /// Drop candidates farther than this many edits. `None` keeps every
    /// candidate and only `limit` applies.
    pub max_distance: Option<usize>,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            limit: 3,
            max_distance: None,
        }
    }
}

/// Closest reference domains to `domain`, nearest first, at most
/// `options.limit` of them. Equal distances keep reference-list order and the
/// input itself is never suggested.
pub fn suggest(domain: &str, reference: &ReferenceDomains, options: &SuggestOptions) -> Vec<String> {
    let needle = domain.trim().trim_end_matches('.').to_lowercase();
    if options.limit == 0 {
        return Vec::new();
    }

    let needle_len = needle.chars().count();
    let mut scored: Vec<(usize, &str)> = reference
        .iter()
        .filter(|candidate| *candidate != needle)
        .filter_map(|candidate| {
            if let Some(max) = options.max_distance {
                // the length gap is a lower bound of the distance
                if needle_len.abs_diff(candidate.chars().count()) > max {
                    return None;
                }
            }
            let distance = edit_distance(&needle, candidate);
            match options.max_distance {
                Some(max) if distance > max => None,
                _ => Some((distance, candidate)),
            }
        })
        .collect();

    // stable: ties stay in reference order
    scored.sort_by_key(|(distance, _)| *distance);
    scored
        .into_iter()
        .take(options.limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// [`suggest`] with the default options.
pub fn suggest_domains(domain: &str, reference: &ReferenceDomains) -> Vec<String> {
    suggest(domain, reference, &SuggestOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn transposition_suggests_gmail_first() {
        let suggestions = suggest_domains("gmial.com", &ReferenceDomains::builtin());
        assert_eq!(suggestions.first().map(String::as_str), Some("gmail.com"));
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn never_suggests_itself() {
        let reference = ReferenceDomains::builtin();
        let suggestions = suggest_domains("gmail.com", &reference);
        assert!(!suggestions.iter().any(|s| s == "gmail.com"));
        let upper = suggest_domains("GMAIL.COM", &reference);
        assert!(!upper.iter().any(|s| s == "gmail.com"));
    }

    #[test]
    fn ties_follow_reference_order() {
        let reference = ReferenceDomains::from_domains(["abd.com", "abc.com", "abe.com"]);
        let suggestions = suggest_domains("abx.com", &reference);
        assert_eq!(suggestions, vec!["abd.com", "abc.com", "abe.com"]);
    }

    #[test]
    fn nearest_first() {
        let reference = ReferenceDomains::from_domains(["gmai.com", "gmail.com", "yahoo.com"]);
        let suggestions = suggest_domains("gmaiil.com", &reference);
        assert_eq!(suggestions[0], "gmail.com");
        assert_eq!(suggestions[1], "gmai.com");
    }

    #[test]
    fn max_distance_cuts_far_candidates() {
        let options = SuggestOptions {
            limit: 3,
            max_distance: Some(2),
        };
        let suggestions = suggest("gmial.com", &ReferenceDomains::builtin(), &options);
        assert_eq!(suggestions, vec!["gmail.com"]);
    }

    #[test]
    fn zero_limit_is_empty() {
        let options = SuggestOptions {
            limit: 0,
            max_distance: None,
        };
        assert!(suggest("gmial.com", &ReferenceDomains::builtin(), &options).is_empty());
    }

    #[test]
    fn empty_reference_yields_nothing() {
        let reference = ReferenceDomains::from_domains(Vec::<String>::new());
        assert!(suggest_domains("gmial.com", &reference).is_empty());
    }

    proptest! {
        #[test]
        fn sorted_bounded_and_never_self(domain in "[a-z]{1,10}\\.(com|net|fr)") {
            let reference = ReferenceDomains::builtin();
            let suggestions = suggest_domains(&domain, &reference);
            prop_assert!(suggestions.len() <= 3);
            prop_assert!(!suggestions.contains(&domain));
            let distances: Vec<usize> = suggestions
                .iter()
                .map(|s| edit_distance(&domain, s))
                .collect();
            prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
