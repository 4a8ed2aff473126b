//! Tokens flowing through the normalizer.
//!
//! The tokenizer produces them, filters rewrite or drop them, and
//! [`TextNormalizer`](crate::analysis::normalizer::TextNormalizer) collects
//! the text of whatever survives.
//!
//! ```
//! use intently::analysis::token::Token;
//!
//! let token = Token::new("hours");
//! assert_eq!(token.with_text("hour").text, "hour");
//! ```

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
}

impl Token {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token { text: text.into() }
    }

    /// Replace the text in place of allocating a new token.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Boxed iterator passed from stage to stage.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_text_replaces_text() {
        let token = Token::new("Leaves").with_text("leaf");
        assert_eq!(token, Token::new("leaf"));
        assert_eq!(token.to_string(), "leaf");
    }
}
