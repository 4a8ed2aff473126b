//! Text analysis module for Intently.
//!
//! This module provides tokenization, token filters, the analysis pipeline
//! and the [`TextNormalizer`](normalizer::TextNormalizer) that every
//! pattern and every user message passes through.

pub mod analyzer;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::*;
pub use normalizer::TextNormalizer;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
