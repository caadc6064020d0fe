//! Token types for the sxml lexer

use crate::error::{Pos, Span};

/// Lexical category of a token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Element name, either after `(` or as a bare shorthand word
    Identifier,
    /// Attribute name following `@` (without the `@`)
    AttributeName,
    /// Free text, trimmed and unescaped
    Text,
    /// Quoted string, without the quotes
    String,
    /// One of `( ) [ ] { }`
    Symbol,
    /// `(# ... )` comment body
    Comment,
}

impl TokenKind {
    /// Get token name for error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::AttributeName => "attribute name",
            Self::Text => "text",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Comment => "comment",
        }
    }

    /// Check if token can appear as an attribute value
    pub const fn is_attr_value(self) -> bool {
        matches!(self, Self::Identifier | Self::Text | Self::String)
    }
}

/// Token with source location
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Byte offset of the first character of the token
    pub const fn offset(&self) -> usize {
        self.span.start.offset
    }

    /// Check for a symbol token with the given lexeme
    pub fn is_symbol(&self, lexeme: &str) -> bool {
        self.kind == TokenKind::Symbol && self.lexeme == lexeme
    }

    /// Describe the token for error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Symbol => format!("'{}'", self.lexeme),
            kind => format!("{} '{}'", kind.name(), self.lexeme),
        }
    }
}

/// Read-once token sequence with one-token lookahead
#[derive(Clone, Debug, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
    end: Pos,
}

impl TokenStream {
    /// Wrap `tokens`; `end` is the position just past the source text
    pub const fn new(tokens: Vec<Token>, end: Pos) -> Self {
        Self {
            tokens,
            index: 0,
            end,
        }
    }

    /// Look at the next token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Consume the next token
    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    /// Consume the next token only if it satisfies `pred`
    pub fn next_if(&mut self, pred: impl FnOnce(&Token) -> bool) -> Option<Token> {
        if self.peek().is_some_and(pred) {
            self.next_token()
        } else {
            None
        }
    }

    /// Check whether every token has been consumed
    pub fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Position of the next token, or end of input when exhausted
    pub fn position(&self) -> Pos {
        self.peek().map_or(self.end, |t| t.span.start)
    }

    /// Describe the next token for error messages
    pub fn describe_next(&self) -> String {
        self.peek()
            .map_or_else(|| "end of input".to_string(), Token::describe)
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &str, offset: usize) -> Token {
        let pos = Pos::new(offset, 1, 1);
        Token::new(kind, lexeme, Span::new(pos, pos))
    }

    #[test]
    fn test_token_kind_is_attr_value() {
        assert!(TokenKind::Identifier.is_attr_value());
        assert!(TokenKind::Text.is_attr_value());
        assert!(TokenKind::String.is_attr_value());
        assert!(!TokenKind::Symbol.is_attr_value());
        assert!(!TokenKind::AttributeName.is_attr_value());
        assert!(!TokenKind::Comment.is_attr_value());
    }

    #[test]
    fn test_stream_peek_next_at_end() {
        let mut stream = TokenStream::new(
            vec![
                token(TokenKind::Symbol, "(", 0),
                token(TokenKind::Identifier, "a", 1),
            ],
            Pos::new(2, 1, 3),
        );
        assert_eq!(stream.peek().map(|t| t.lexeme.as_str()), Some("("));
        assert!(stream.next_token().is_some_and(|t| t.is_symbol("(")));
        assert_eq!(stream.position().offset, 1);
        assert!(stream.next_token().is_some());
        assert!(stream.at_end());
        assert_eq!(stream.position(), Pos::new(2, 1, 3));
        assert_eq!(stream.describe_next(), "end of input");
        assert!(stream.next_token().is_none());
    }

    #[test]
    fn test_describe() {
        assert_eq!(token(TokenKind::Symbol, ")", 0).describe(), "')'");
        assert_eq!(token(TokenKind::Text, "hi", 0).describe(), "text 'hi'");
    }
}
