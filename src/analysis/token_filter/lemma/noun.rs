//! Rule-based noun lemmatizer.
//!
//! Reduces English plural nouns to their singular base form. Lookup order:
//!
//! 1. irregular plurals (`children` → `child`, `leaves` → `leaf`)
//! 2. invariant words that merely end in `s` (`thanks`, `series`, `this`)
//! 3. ordered suffix detachment rules, longest first
//!
//! Suffix rules are never applied to words of three characters or fewer,
//! to words ending in `ss`, `us` or `is` (`class`, `status`, `analysis`), or
//! to tokens that contain anything other than letters (`what's`, `3pm`).
//! Without a full dictionary the rules favour the common case, so a handful
//! of `-ie`/`-che` nouns are listed as irregulars.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::Lemmatizer;

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("aches", "ache"),
    ("buses", "bus"),
    ("caches", "cache"),
    ("calories", "calorie"),
    ("children", "child"),
    ("cookies", "cookie"),
    ("criteria", "criterion"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("goes", "go"),
    ("halves", "half"),
    ("headaches", "headache"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("men", "man"),
    ("mice", "mouse"),
    ("movies", "movie"),
    ("niches", "niche"),
    ("people", "person"),
    ("quizzes", "quiz"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("teeth", "tooth"),
    ("thieves", "thief"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
];

const INVARIANT_WORDS: &[&str] = &[
    "afterwards",
    "always",
    "besides",
    "does",
    "hers",
    "news",
    "ours",
    "perhaps",
    "series",
    "sometimes",
    "species",
    "thanks",
    "theirs",
    "this",
    "towards",
    "whereas",
    "yours",
];

/// Ordered suffix rules: `(suffix, replacement)`.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
    ("s", ""),
];

const KEPT_ENDINGS: &[&str] = &["ss", "us", "is"];

static IRREGULAR_PLURALS_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_PLURALS.iter().copied().collect());

static INVARIANT_WORDS_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| INVARIANT_WORDS.iter().copied().collect());

/// Part-of-speech agnostic lemmatizer that treats every word as a noun.
#[derive(Debug, Clone, Default)]
pub struct NounLemmatizer;

impl NounLemmatizer {
    /// Create a new noun lemmatizer.
    pub fn new() -> Self {
        NounLemmatizer
    }

    fn detach_suffix(word: &str) -> Option<String> {
        for (suffix, replacement) in SUFFIX_RULES {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            // "ties" -> "tie", not "ty"
            if *suffix == "ies" && stem.chars().count() < 2 {
                continue;
            }
            return Some(format!("{stem}{replacement}"));
        }
        None
    }
}

impl Lemmatizer for NounLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = IRREGULAR_PLURALS_MAP.get(word) {
            return (*lemma).to_string();
        }

        if word.chars().count() <= 3
            || INVARIANT_WORDS_SET.contains(word)
            || !word.chars().all(char::is_alphabetic)
            || KEPT_ENDINGS.iter().any(|ending| word.ends_with(ending))
        {
            return word.to_string();
        }

        Self::detach_suffix(word).unwrap_or_else(|| word.to_string())
    }

    fn name(&self) -> &'static str {
        "noun"
    }
}
