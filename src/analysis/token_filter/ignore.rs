//! Ignore filter implementation.
//!
//! Removes tokens whose text belongs to a fixed ignore-set. The default set
//! is the four sentence punctuation marks `!`, `?`, `,` and `.`, which carry
//! no intent signal and must never become vocabulary entries.
//!
//! # Examples
//!
//! ```
//! use intently::analysis::token_filter::Filter;
//! use intently::analysis::token_filter::ignore::IgnoreFilter;
//! use intently::analysis::token::Token;
//!
//! let filter = IgnoreFilter::new();
//! let tokens = vec![Token::new("hello"), Token::new("!")];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "hello");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Tokens dropped by default before they can reach the vocabulary.
pub const DEFAULT_IGNORE_TOKENS: &[&str] = &["!", "?", ",", "."];

/// A filter that removes ignored tokens from the token stream.
#[derive(Clone, Debug)]
pub struct IgnoreFilter {
    ignored: Arc<HashSet<String>>,
}

impl IgnoreFilter {
    /// Create a new ignore filter over [`DEFAULT_IGNORE_TOKENS`].
    pub fn new() -> Self {
        Self::from_tokens(DEFAULT_IGNORE_TOKENS.iter().copied())
    }

    /// Create a new ignore filter from a list of tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IgnoreFilter {
            ignored: Arc::new(tokens.into_iter().map(|s| s.into()).collect()),
        }
    }

    /// Check if a token text is ignored.
    pub fn is_ignored(&self, text: &str) -> bool {
        self.ignored.contains(text)
    }

    /// The ignored tokens, sorted.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.ignored.iter().cloned().collect();
        tokens.sort();
        tokens
    }

    /// Number of ignored tokens.
    pub fn len(&self) -> usize {
        self.ignored.len()
    }

    /// Check if the ignore-set is empty.
    pub fn is_empty(&self) -> bool {
        self.ignored.is_empty()
    }
}

impl Default for IgnoreFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for IgnoreFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let ignored = Arc::clone(&self.ignored);
        Ok(Box::new(
            tokens.filter(move |token| !ignored.contains(&token.text)),
        ))
    }

    fn name(&self) -> &'static str {
        "ignore"
    }
}
