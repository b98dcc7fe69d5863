use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;

static WORDS_DIR: Dir = include_dir!("src/words");

/// Shortest word that may be submitted for scoring.
pub const MIN_WORD_LEN: usize = 3;

#[derive(Deserialize, Clone, Debug)]
struct WordEntry {
    word: String,
    points: u32,
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
struct WordTable {
    name: String,
    size: u32,
    words: Vec<WordEntry>,
}

/// Word membership and scoring, built once from a static word→points table.
/// Lookups are case-insensitive over the normalized (lowercase, trimmed) form.
#[derive(Debug, Clone)]
pub struct DictionaryIndex {
    points: HashMap<String, u32>,
}

impl DictionaryIndex {
    /// Load the dictionary bundled into the binary.
    pub fn embedded() -> Self {
        let file = WORDS_DIR
            .get_file("english.json")
            .expect("Word list not found");
        let contents = file
            .contents_utf8()
            .expect("Unable to interpret word list as a string");
        let table: WordTable = from_str(contents).expect("Unable to deserialize word list json");

        Self::from_entries(table.words.into_iter().map(|e| (e.word, e.points)))
    }

    /// Build an index from explicit entries. Used by tests and custom tables.
    pub fn from_entries<S, I>(entries: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, u32)>,
    {
        let points = entries
            .into_iter()
            .map(|(word, pts)| (normalize(&word.into()), pts))
            .collect();
        Self { points }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.points.contains_key(&normalize(word))
    }

    /// Point value for a word; absent words fall back to their length.
    pub fn score_of(&self, word: &str) -> u32 {
        let normalized = normalize(word);
        self.points
            .get(&normalized)
            .copied()
            .unwrap_or(normalized.chars().count() as u32)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Lowercase, trimmed form used as the uniqueness and lookup key.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_dictionary_loads() {
        let dict = DictionaryIndex::embedded();

        assert!(!dict.is_empty());
        assert!(dict.contains("cat"));
        assert!(dict.contains("tree"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let dict = DictionaryIndex::from_entries([("cat", 5)]);

        assert!(dict.contains("cat"));
        assert!(dict.contains("CAT"));
        assert!(dict.contains("Cat"));
        assert!(!dict.contains("dog"));
    }

    #[test]
    fn test_score_of_known_word() {
        let dict = DictionaryIndex::from_entries([("cat", 5)]);

        assert_eq!(dict.score_of("cat"), 5);
        assert_eq!(dict.score_of("CAT"), 5);
    }

    #[test]
    fn test_score_of_unknown_word_falls_back_to_length() {
        let dict = DictionaryIndex::from_entries([("cat", 5)]);

        assert_eq!(dict.score_of("xyzzy"), 5);
        assert_eq!(dict.score_of("zq"), 2);
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  CaT "), "cat");
        assert_eq!(normalize("TREE"), "tree");
    }

    #[test]
    fn test_from_entries_normalizes_keys() {
        let dict = DictionaryIndex::from_entries([("  CAT ", 5), ("Dog", 4)]);

        assert!(dict.contains("cat"));
        assert!(dict.contains("dog"));
        assert_eq!(dict.len(), 2);
    }
}
