//! Resolving user input to list entries.

use anyhow::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Find the entry `query` refers to and return its index.
///
/// A number is taken as a 1-based position; anything else is fuzzy matched
/// against `label` and the best-scoring entry wins.
pub fn resolve<T>(items: &[T], query: &str, label: impl Fn(&T) -> &str) -> Result<usize> {
    if let Ok(position) = query.trim().parse::<usize>() {
        if (1..=items.len()).contains(&position) {
            return Ok(position - 1);
        }
        anyhow::bail!("No entry #{} (have {})", position, items.len());
    }

    let matcher = SkimMatcherV2::default();
    let best = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| matcher.fuzzy_match(label(item), query).map(|score| (i, score)))
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));

    match best {
        Some((index, _)) => Ok(index),
        None => anyhow::bail!("Nothing matches '{}'", query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["Ana Ruiz".into(), "Ben Okafor".into(), "Anabel Ng".into()]
    }

    #[test]
    fn test_numeric_query_is_position() {
        assert_eq!(resolve(&names(), "2", |s| s.as_str()).unwrap(), 1);
        assert!(resolve(&names(), "0", |s| s.as_str()).is_err());
        assert!(resolve(&names(), "4", |s| s.as_str()).is_err());
    }

    #[test]
    fn test_fuzzy_query_picks_best_match() {
        assert_eq!(resolve(&names(), "okafor", |s| s.as_str()).unwrap(), 1);
        assert_eq!(resolve(&names(), "anabel", |s| s.as_str()).unwrap(), 2);
    }

    #[test]
    fn test_no_match_is_an_error() {
        assert!(resolve(&names(), "zzz", |s| s.as_str()).is_err());
    }
}
