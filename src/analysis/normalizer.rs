//! Text normalization for intent classification.
//!
//! [`TextNormalizer`] turns raw text into the canonical token sequence used
//! both when building the vocabulary and when encoding user input:
//! Unicode word tokenization, lowercasing, removal of the ignore-set and
//! noun lemmatization, in that order.
//!
//! # Examples
//!
//! ```
//! use intently::analysis::normalizer::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new();
//! let tokens = normalizer.normalize("Check my leave balances, please!").unwrap();
//! assert_eq!(tokens, vec!["check", "my", "leave", "balance", "please"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::{IgnoreFilter, LemmaFilter, LowercaseFilter};
use crate::analysis::tokenizer::word_boundary::WordBoundaryTokenizer;
use crate::error::Result;

/// Tokenizes, lowercases, filters and lemmatizes text.
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    analyzer: PipelineAnalyzer,
    ignore: IgnoreFilter,
}

impl TextNormalizer {
    /// Create a normalizer with the default ignore-set.
    pub fn new() -> Self {
        Self::with_ignore_filter(IgnoreFilter::new())
    }

    /// Create a normalizer that drops the given tokens.
    pub fn with_ignore_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_ignore_filter(IgnoreFilter::from_tokens(tokens))
    }

    fn with_ignore_filter(ignore: IgnoreFilter) -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(WordBoundaryTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(ignore.clone()))
            .add_filter(Arc::new(LemmaFilter::new()))
            .with_name("intent_normalizer");

        TextNormalizer { analyzer, ignore }
    }

    /// Normalize `text` into an ordered sequence of lowercase lemmas.
    pub fn normalize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }

    /// Check whether a token belongs to the ignore-set.
    pub fn is_ignored(&self, token: &str) -> bool {
        self.ignore.is_ignored(token)
    }

    /// The ignore-set, sorted.
    pub fn ignore_tokens(&self) -> Vec<String> {
        self.ignore.tokens()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
