//! Case folding.
//!
//! Every token the normalizer emits is lowercase, so patterns like
//! "Hello" and "hello" land on the same vocabulary entry.
//!
//! ```
//! use intently::analysis::token::Token;
//! use intently::analysis::token_filter::Filter;
//! use intently::analysis::token_filter::lowercase::LowercaseFilter;
//!
//! let folded: Vec<String> = LowercaseFilter
//!     .filter(Box::new(vec![Token::new("Opening"), Token::new("HOURS")].into_iter()))
//!     .unwrap()
//!     .map(|token| token.text)
//!     .collect();
//!
//! assert_eq!(folded, ["opening", "hours"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Unicode-aware lowercasing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            let folded = token.text.to_lowercase();
            token.with_text(folded)
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn fold(tokens: Vec<Token>) -> Vec<Token> {
        LowercaseFilter::new()
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect()
    }

    #[test]
    fn folds_mixed_case_patterns() {
        let folded = fold(vec![Token::new("What"), Token::new("ARE"), Token::new("you")]);
        let texts: Vec<&str> = folded.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["what", "are", "you"]);
    }

    #[test]
    fn folds_non_ascii() {
        assert_eq!(fold(vec![Token::new("ÉTÉ")])[0].text, "été");
    }
}
