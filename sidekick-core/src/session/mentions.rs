//! `@`-mention extraction from user queries.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([^\s@]+)").expect("mention pattern must compile"));

/// Every `@name` token in the query, marker stripped, in query order.
pub fn mentioned_names(query: &str) -> Vec<String> {
    MENTION_PATTERN
        .captures_iter(query)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Split candidates into (mentioned, other) by base-name match against the
/// query's `@` tokens. Both halves keep candidate order.
pub fn partition_by_mention(query: &str, candidates: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let names = mentioned_names(query);
    candidates.iter().cloned().partition(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| names.iter().any(|m| m == name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_marker_prefixed_tokens() {
        assert_eq!(
            mentioned_names("fix @foo.ts and @bar.rs now"),
            vec!["foo.ts", "bar.rs"]
        );
    }

    #[test]
    fn query_without_mentions_yields_nothing() {
        assert!(mentioned_names("no markers here").is_empty());
    }

    #[test]
    fn mention_stops_at_whitespace_and_marker() {
        assert_eq!(mentioned_names("see @a.ts@b.ts"), vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn partition_matches_base_names_only() {
        let candidates = vec![
            PathBuf::from("/ws/src/foo.ts"),
            PathBuf::from("/ws/src/bar.ts"),
        ];
        let (mentioned, other) = partition_by_mention("fix @foo.ts now", &candidates);
        assert_eq!(mentioned, vec![PathBuf::from("/ws/src/foo.ts")]);
        assert_eq!(other, vec![PathBuf::from("/ws/src/bar.ts")]);
    }
}
