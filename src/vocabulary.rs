//! Vocabulary and label set construction.
//!
//! Both types are sorted, de-duplicated lists of strings. Their index
//! positions are the coordinates of every feature and label vector the
//! system produces, so a trained network is only meaningful together with
//! the exact vocabulary and label set it was trained against.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::TextNormalizer;
use crate::corpus::Corpus;
use crate::error::{IntentlyError, Result};

/// Sorted term list with a reverse index.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SortedTerms {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl SortedTerms {
    fn from_set(terms: BTreeSet<String>) -> Self {
        let terms: Vec<String> = terms.into_iter().collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        SortedTerms { terms, index }
    }

    fn from_sorted(terms: Vec<String>, what: &str) -> Result<Self> {
        if let Some(pair) = terms.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(IntentlyError::artifact(format!(
                "{what} is not strictly sorted: '{}' precedes '{}'",
                pair[0], pair[1]
            )));
        }
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Ok(SortedTerms { terms, index })
    }

    /// CRC32 over the terms in order, each followed by a newline.
    fn checksum(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for term in &self.terms {
            hasher.update(term.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize()
    }
}

/// The fixed, sorted set of normalized tokens seen in training patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary(SortedTerms);

impl Vocabulary {
    /// Build a vocabulary from arbitrary tokens (sorted and de-duplicated here).
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Vocabulary(SortedTerms::from_set(
            tokens.into_iter().map(Into::into).collect(),
        ))
    }

    /// Rebuild a persisted vocabulary; it must already be strictly sorted.
    pub fn from_sorted(tokens: Vec<String>) -> Result<Self> {
        SortedTerms::from_sorted(tokens, "vocabulary").map(Vocabulary)
    }

    /// Coordinate of a token, if it is part of the vocabulary.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.0.index.get(token).copied()
    }

    /// Tokens in coordinate order.
    pub fn tokens(&self) -> &[String] {
        &self.0.terms
    }

    /// Vocabulary size `V`.
    pub fn len(&self) -> usize {
        self.0.terms.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.0.terms.is_empty()
    }

    /// Content checksum; changes when any token or its coordinate changes.
    pub fn checksum(&self) -> u32 {
        self.0.checksum()
    }
}

impl Serialize for Vocabulary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.terms.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Vocabulary {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tokens = Vec::<String>::deserialize(deserializer)?;
        Vocabulary::from_sorted(tokens).map_err(serde::de::Error::custom)
    }
}

/// The fixed, sorted set of intent tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet(SortedTerms);

impl LabelSet {
    /// Build a label set from arbitrary tags (sorted and de-duplicated here).
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LabelSet(SortedTerms::from_set(tags.into_iter().map(Into::into).collect()))
    }

    /// Rebuild a persisted label set; it must already be strictly sorted.
    pub fn from_sorted(tags: Vec<String>) -> Result<Self> {
        SortedTerms::from_sorted(tags, "label set").map(LabelSet)
    }

    /// Index of a tag, if known.
    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.0.index.get(tag).copied()
    }

    /// Tag at an index.
    pub fn tag(&self, index: usize) -> Option<&str> {
        self.0.terms.get(index).map(String::as_str)
    }

    /// Tags in index order.
    pub fn tags(&self) -> &[String] {
        &self.0.terms
    }

    /// Number of labels `C`.
    pub fn len(&self) -> usize {
        self.0.terms.len()
    }

    /// Check if the label set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.terms.is_empty()
    }

    pub fn checksum(&self) -> u32 {
        self.0.checksum()
    }
}

impl Serialize for LabelSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.terms.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tags = Vec::<String>::deserialize(deserializer)?;
        LabelSet::from_sorted(tags).map_err(serde::de::Error::custom)
    }
}

/// One normalized pattern together with the tag it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Normalized tokens of the pattern.
    pub tokens: Vec<String>,
    /// Intent tag.
    pub tag: String,
}

/// Output of [`build`].
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Sorted vocabulary.
    pub vocabulary: Vocabulary,
    /// Sorted label set.
    pub labels: LabelSet,
    /// One document per pattern, in corpus order.
    pub documents: Vec<Document>,
}

/// Derive the vocabulary, the label set and the per-pattern documents from
/// a corpus.
///
/// Tokens in the normalizer's ignore-set never enter the vocabulary. Tags
/// are taken from the documents, so an intent without patterns gets no
/// label. The result depends only on the corpus and the normalizer.
pub fn build(corpus: &Corpus, normalizer: &TextNormalizer) -> Result<BuildOutput> {
    let mut documents = Vec::with_capacity(corpus.pattern_count());
    let mut tokens = BTreeSet::new();
    let mut tags = BTreeSet::new();

    for intent in corpus.intents() {
        for pattern in &intent.patterns {
            let pattern_tokens = normalizer.normalize(pattern)?;
            tokens.extend(
                pattern_tokens
                    .iter()
                    .filter(|token| !normalizer.is_ignored(token))
                    .cloned(),
            );
            tags.insert(intent.tag.clone());
            documents.push(Document {
                tokens: pattern_tokens,
                tag: intent.tag.clone(),
            });
        }
    }

    Ok(BuildOutput {
        vocabulary: Vocabulary(SortedTerms::from_set(tokens)),
        labels: LabelSet(SortedTerms::from_set(tags)),
        documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Intent;

    fn corpus() -> Corpus {
        Corpus::new(vec![
            Intent::new(
                "greeting",
                vec!["Hello!".to_string(), "Hi there".to_string()],
                vec!["Hi!".to_string()],
            ),
            Intent::new(
                "goodbye",
                vec!["Bye".to_string(), "See you later.".to_string()],
                vec!["See you!".to_string()],
            ),
            Intent::new("empty", vec![], vec!["...".to_string()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_sorted_vocabulary_and_labels() {
        let output = build(&corpus(), &TextNormalizer::new()).unwrap();

        assert_eq!(
            output.vocabulary.tokens(),
            &["bye", "hello", "hi", "later", "see", "there", "you"]
        );
        assert_eq!(output.labels.tags(), &["goodbye", "greeting"]);
        assert_eq!(output.documents.len(), 4);
        assert_eq!(output.documents[0].tokens, vec!["hello"]);
        assert_eq!(output.documents[0].tag, "greeting");
    }

    #[test]
    fn test_build_is_deterministic() {
        let normalizer = TextNormalizer::new();
        let first = build(&corpus(), &normalizer).unwrap();
        let second = build(&corpus(), &normalizer).unwrap();

        assert_eq!(
            serde_json::to_vec(&first.vocabulary).unwrap(),
            serde_json::to_vec(&second.vocabulary).unwrap()
        );
        assert_eq!(
            serde_json::to_vec(&first.labels).unwrap(),
            serde_json::to_vec(&second.labels).unwrap()
        );
    }

    #[test]
    fn test_from_tokens_dedups_and_sorts() {
        let vocabulary = Vocabulary::from_tokens(vec!["b", "a", "b", "c"]);
        assert_eq!(vocabulary.tokens(), &["a", "b", "c"]);
        assert_eq!(vocabulary.index_of("c"), Some(2));
        assert_eq!(vocabulary.index_of("z"), None);
    }

    #[test]
    fn test_unsorted_vocabulary_is_rejected() {
        let result = Vocabulary::from_sorted(vec!["b".to_string(), "a".to_string()]);
        assert!(matches!(result, Err(IntentlyError::Artifact(_))));

        let result = LabelSet::from_sorted(vec!["a".to_string(), "a".to_string()]);
        assert!(matches!(result, Err(IntentlyError::Artifact(_))));
    }

    #[test]
    fn test_deserialize_checks_order() {
        let ok: LabelSet = serde_json::from_str(r#"["goodbye", "greeting"]"#).unwrap();
        assert_eq!(ok.tag(1), Some("greeting"));

        let err = serde_json::from_str::<LabelSet>(r#"["greeting", "goodbye"]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_checksum_tracks_content() {
        let a = Vocabulary::from_tokens(vec!["bye", "hello", "hi"]);
        let b = Vocabulary::from_tokens(vec!["hi", "hello", "bye"]);
        let c = Vocabulary::from_tokens(vec!["bye", "hello", "hey"]);
        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), c.checksum());

        // same length, different tags
        let labels = LabelSet::from_tags(vec!["goodbye", "greeting"]);
        let other = LabelSet::from_tags(vec!["goodbye", "thanks"]);
        assert_ne!(labels.checksum(), other.checksum());
    }
}
