//! Intents corpus: the labeled training input and the response table.
//!
//! A corpus is read from a JSON document of the form
//!
//! ```json
//! {
//!   "intents": [
//!     { "tag": "greeting", "patterns": ["Hello", "Hi there"], "responses": ["Hi!"] }
//!   ]
//! }
//! ```
//!
//! and validated once at load time: every intent needs a non-empty tag and
//! at least one response, and tags must be unique. After that it is
//! immutable.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IntentlyError, Result};

/// A labeled category of user request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Unique identifier of the intent.
    pub tag: String,
    /// Example phrasings used for training.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Candidate replies.
    pub responses: Vec<String>,
}

impl Intent {
    /// Create a new intent.
    pub fn new<S: Into<String>>(tag: S, patterns: Vec<String>, responses: Vec<String>) -> Self {
        Intent {
            tag: tag.into(),
            patterns,
            responses,
        }
    }
}

/// Where a corpus was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusIdentity {
    /// Path of the intents file, as given.
    pub path: String,
    /// CRC-32 of the raw file bytes.
    pub checksum: u32,
}

#[derive(Serialize, Deserialize)]
struct CorpusDocument {
    intents: Vec<Intent>,
}

/// A validated, immutable collection of intents.
#[derive(Debug, Clone)]
pub struct Corpus {
    intents: Vec<Intent>,
    by_tag: HashMap<String, usize>,
    identity: Option<CorpusIdentity>,
}

impl Corpus {
    /// Build a corpus from intents, rejecting empty tags, empty response
    /// lists and duplicate tags.
    pub fn new(intents: Vec<Intent>) -> Result<Self> {
        let mut by_tag = HashMap::with_capacity(intents.len());

        for (index, intent) in intents.iter().enumerate() {
            if intent.tag.trim().is_empty() {
                return Err(IntentlyError::corpus(format!(
                    "intent #{index} has an empty tag"
                )));
            }
            if intent.responses.is_empty() {
                return Err(IntentlyError::corpus(format!(
                    "intent '{}' has no responses",
                    intent.tag
                )));
            }
            if by_tag.insert(intent.tag.clone(), index).is_some() {
                return Err(IntentlyError::corpus(format!(
                    "duplicate tag '{}'",
                    intent.tag
                )));
            }
        }

        Ok(Corpus {
            intents,
            by_tag,
            identity: None,
        })
    }

    /// Parse a corpus from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: CorpusDocument = serde_json::from_str(json)
            .map_err(|e| IntentlyError::corpus(format!("malformed intents document: {e}")))?;
        Self::new(document.intents)
    }

    /// Load a corpus from a JSON file, remembering its path and checksum.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let content = std::str::from_utf8(&bytes).map_err(|e| {
            IntentlyError::corpus(format!("{} is not valid UTF-8: {e}", path.display()))
        })?;

        let mut corpus = Self::from_json(content)?;
        corpus.identity = Some(CorpusIdentity {
            path: path.display().to_string(),
            checksum: crc32fast::hash(&bytes),
        });

        log::info!(
            "Loaded {} intents ({} patterns) from {}",
            corpus.len(),
            corpus.pattern_count(),
            path.display()
        );

        Ok(corpus)
    }

    /// Serialize the corpus back to its JSON document form.
    pub fn to_json_pretty(&self) -> Result<String> {
        let document = CorpusDocument {
            intents: self.intents.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// All intents, in file order.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Look up an intent by tag.
    pub fn get(&self, tag: &str) -> Option<&Intent> {
        self.by_tag.get(tag).map(|&index| &self.intents[index])
    }

    /// Check whether a tag exists.
    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Number of intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Check if the corpus has no intents.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Total number of patterns across all intents.
    pub fn pattern_count(&self) -> usize {
        self.intents.iter().map(|intent| intent.patterns.len()).sum()
    }

    /// Source identity, when the corpus was loaded from a file.
    pub fn identity(&self) -> Option<&CorpusIdentity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn intent(tag: &str, patterns: &[&str], responses: &[&str]) -> Intent {
        Intent::new(
            tag,
            patterns.iter().map(|s| s.to_string()).collect(),
            responses.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_corpus_from_json() {
        let corpus = Corpus::from_json(
            r#"{"intents": [
                {"tag": "greeting", "patterns": ["Hello", "Hi"], "responses": ["Hi!"]},
                {"tag": "goodbye", "patterns": ["Bye"], "responses": ["See you!"]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.pattern_count(), 3);
        assert_eq!(corpus.get("goodbye").unwrap().responses, vec!["See you!"]);
        assert!(corpus.get("thanks").is_none());
        assert!(corpus.identity().is_none());
    }

    #[test]
    fn test_missing_tag_is_rejected() {
        let result = Corpus::from_json(r#"{"intents": [{"patterns": ["Hi"], "responses": ["Hi!"]}]}"#);
        assert!(matches!(result, Err(IntentlyError::Corpus(_))));
    }

    #[test]
    fn test_missing_responses_is_rejected() {
        let result = Corpus::from_json(r#"{"intents": [{"tag": "greeting", "patterns": ["Hi"]}]}"#);
        assert!(matches!(result, Err(IntentlyError::Corpus(_))));
    }

    #[test]
    fn test_empty_responses_is_rejected() {
        let result = Corpus::new(vec![intent("greeting", &["Hi"], &[])]);
        assert!(matches!(result, Err(IntentlyError::Corpus(_))));
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let result = Corpus::new(vec![
            intent("greeting", &["Hi"], &["Hello!"]),
            intent("greeting", &["Hey"], &["Hey!"]),
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Corpus error: duplicate tag 'greeting'");
    }

    #[test]
    fn test_blank_tag_is_rejected() {
        let result = Corpus::new(vec![intent("  ", &["Hi"], &["Hello!"])]);
        assert!(matches!(result, Err(IntentlyError::Corpus(_))));
    }

    #[test]
    fn test_intent_without_patterns_is_allowed() {
        let corpus = Corpus::new(vec![intent("fallback", &[], &["Hmm?"])]).unwrap();
        assert_eq!(corpus.pattern_count(), 0);
    }

    #[test]
    fn test_from_file_records_identity() {
        let json = r#"{"intents": [{"tag": "greeting", "patterns": ["Hi"], "responses": ["Hi!"]}]}"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let corpus = Corpus::from_file(file.path()).unwrap();
        let identity = corpus.identity().unwrap();
        assert_eq!(identity.checksum, crc32fast::hash(json.as_bytes()));
        assert_eq!(identity.path, file.path().display().to_string());
    }

    #[test]
    fn test_json_round_trip() {
        let corpus = Corpus::new(vec![intent("greeting", &["Hi"], &["Hello!"])]).unwrap();
        let reparsed = Corpus::from_json(&corpus.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reparsed.intents(), corpus.intents());
    }
}
