//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of the analysis pipeline: they split input
//! text into [`Token`](crate::analysis::token::Token)s.
//!
//! # Available Tokenizers
//!
//! - [`word_boundary::WordBoundaryTokenizer`] - Unicode word boundaries, punctuation kept
//!
//! # Examples
//!
//! ```
//! use intently::analysis::tokenizer::Tokenizer;
//! use intently::analysis::tokenizer::word_boundary::WordBoundaryTokenizer;
//!
//! let tokenizer = WordBoundaryTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world!").unwrap().collect();
//! assert_eq!(tokens.len(), 3);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a tokenizer can sit inside an
/// artifact shared across threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod word_boundary;
