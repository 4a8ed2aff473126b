//! Word-level tokenizer built on Unicode word boundaries.
//!
//! This module splits text using the Unicode Text Segmentation rules
//! (UAX #29). Unlike a plain `unicode_words` split, punctuation segments are
//! kept as tokens of their own, one per character, so that downstream
//! filters can decide what to discard. Whitespace segments are dropped.
//!
//! # Examples
//!
//! ```
//! use intently::analysis::tokenizer::Tokenizer;
//! use intently::analysis::tokenizer::word_boundary::WordBoundaryTokenizer;
//!
//! let tokenizer = WordBoundaryTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Is anyone there?").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "Is");
//! assert_eq!(tokens[2].text, "there");
//! assert_eq!(tokens[3].text, "?");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
///
/// # Behavior
///
/// - Words (including contractions such as `what's`) form a single token
/// - Each punctuation character is its own token
/// - Whitespace is discarded
#[derive(Clone, Debug, Default)]
pub struct WordBoundaryTokenizer;

impl WordBoundaryTokenizer {
    /// Create a new word boundary tokenizer.
    pub fn new() -> Self {
        WordBoundaryTokenizer
    }
}

impl Tokenizer for WordBoundaryTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .split_word_bounds()
            .filter(|segment| !segment.chars().all(char::is_whitespace))
            .map(Token::new)
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "word_boundary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundary_tokenizer() {
        let tokenizer = WordBoundaryTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("hello world").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
    }

    #[test]
    fn test_punctuation_is_split_out() {
        let tokenizer = WordBoundaryTokenizer::new();
        let texts: Vec<String> = tokenizer
            .tokenize("Thanks, bye!")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, vec!["Thanks", ",", "bye", "!"]);
    }

    #[test]
    fn test_repeated_punctuation() {
        let tokenizer = WordBoundaryTokenizer::new();
        let texts: Vec<String> = tokenizer
            .tokenize("what?!")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, vec!["what", "?", "!"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        let tokenizer = WordBoundaryTokenizer::new();
        assert_eq!(tokenizer.tokenize("").unwrap().count(), 0);
        assert_eq!(tokenizer.tokenize("  \t\n ").unwrap().count(), 0);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(WordBoundaryTokenizer::new().name(), "word_boundary");
    }
}
