//! Lexer for sxml source text
//!
//! Turns source text into a flat [`TokenStream`]. Nesting is carried only by
//! `(` / `)` symbol tokens; no token has inner structure.
//!
//! At each position, after whitespace:
//! - `(` opens a form. `(#` starts a comment running to the next `)`;
//!   `(:name` and `(name` both yield the form's name as an identifier.
//! - `@name` is an attribute name.
//! - `"..."` is a string, taken verbatim.
//! - `[ ] { } )` are single-character symbols.
//! - A bare word matching the name syntax is an identifier (shorthand
//!   element); anything else is a text run up to the next bracket.
//!
//! A backtick escapes the next character. At the start of a token it forces
//! a text run; inside a text run it embeds brackets literally.

pub mod cursor;
pub mod token;

use std::borrow::Cow;

use tracing::debug;

pub use cursor::Cursor;
pub use token::{Token, TokenKind, TokenStream};

use crate::error::{LexError, Pos, Span};
use cursor::is_whitespace;

/// Escape character for text runs
pub const ESCAPE: u8 = b'`';

/// Lex `source` into a token stream
pub fn lex(source: &str) -> Result<TokenStream, LexError> {
    let source = normalize_newlines(source);
    Lexer::new(&source).tokenize()
}

/// Replace CRLF and lone CR with LF
pub fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Single-pass lexer over normalized source text
#[derive(Debug)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer; `input` must already use `\n` line endings
    pub const fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            tokens: Vec::new(),
        }
    }

    /// Consume the whole input
    pub fn tokenize(mut self) -> Result<TokenStream, LexError> {
        loop {
            self.cursor.skip_whitespace();
            let Some(b) = self.cursor.current() else {
                break;
            };
            match b {
                b'(' => self.lex_open()?,
                b'@' => {
                    let start = self.cursor.position();
                    self.cursor.advance();
                    self.read_atom(TokenKind::AttributeName, start)?;
                }
                b'"' => self.read_string()?,
                ESCAPE => self.read_text()?,
                b if is_symbol(b) => self.push_symbol(),
                _ if self.bare_word_is_name() => {
                    let start = self.cursor.position();
                    self.cursor.consume(b':');
                    self.read_atom(TokenKind::Identifier, start)?;
                }
                _ => self.read_text()?,
            }
        }

        let end = self.cursor.position();
        debug!(tokens = self.tokens.len(), bytes = end.offset, "lexed source");
        Ok(TokenStream::new(self.tokens, end))
    }

    fn lex_open(&mut self) -> Result<(), LexError> {
        let start = self.cursor.position();
        self.cursor.advance();
        let paren = Span::new(start, self.cursor.position());
        self.cursor.skip_whitespace();

        if self.cursor.current() == Some(b'#') {
            return self.read_comment(start);
        }

        self.tokens.push(Token::new(TokenKind::Symbol, "(", paren));
        let name_start = self.cursor.position();
        self.cursor.consume(b':');
        self.read_atom(TokenKind::Identifier, name_start)
    }

    /// Read a name: `[a-z0-9:-]*` plus at most one trailing `?`, `*` or `+`
    fn read_atom(&mut self, kind: TokenKind, start: Pos) -> Result<(), LexError> {
        let from = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if is_quantifier(b) {
                self.cursor.advance();
                break;
            }
            if !is_name_byte(b) {
                break;
            }
            self.cursor.advance();
        }

        let lexeme = self.cursor.slice_from(from);
        if lexeme.is_empty() {
            return Err(LexError::EmptyAtom {
                pos: self.cursor.position(),
            });
        }
        let span = Span::new(start, self.cursor.position());
        self.tokens.push(Token::new(kind, lexeme, span));
        Ok(())
    }

    fn read_string(&mut self) -> Result<(), LexError> {
        let start = self.cursor.position();
        self.cursor.advance();
        let from = self.cursor.pos();

        while let Some(b) = self.cursor.current() {
            if b == b'"' {
                let lexeme = self.cursor.slice_from(from);
                self.cursor.advance();
                let span = Span::new(start, self.cursor.position());
                self.tokens.push(Token::new(TokenKind::String, lexeme, span));
                return Ok(());
            }
            self.cursor.advance();
        }

        Err(LexError::UnterminatedString { pos: start })
    }

    /// Cursor is at `#`; `start` is the position of the `(`
    fn read_comment(&mut self, start: Pos) -> Result<(), LexError> {
        self.cursor.advance();
        let from = self.cursor.pos();

        while let Some(b) = self.cursor.current() {
            if b == b')' {
                let lexeme = self.cursor.slice_from(from).trim();
                self.cursor.advance();
                let span = Span::new(start, self.cursor.position());
                self.tokens.push(Token::new(TokenKind::Comment, lexeme, span));
                return Ok(());
            }
            self.cursor.advance();
        }

        Err(LexError::UnterminatedComment { pos: start })
    }

    fn read_text(&mut self) -> Result<(), LexError> {
        let start = self.cursor.position();
        let mut text = String::new();
        // length of `text` without trailing unescaped whitespace
        let mut keep = 0;

        while let Some(b) = self.cursor.current() {
            if b == ESCAPE {
                self.cursor.advance();
                if let Some(c) = self.cursor.next_char() {
                    text.push(c);
                    keep = text.len();
                }
                continue;
            }
            if is_symbol(b) {
                break;
            }
            if let Some(c) = self.cursor.next_char() {
                text.push(c);
                if !is_whitespace(b) {
                    keep = text.len();
                }
            }
        }

        text.truncate(keep);
        if text.is_empty() {
            return Err(LexError::EmptyAtom { pos: start });
        }
        let span = Span::new(start, self.cursor.position());
        self.tokens.push(Token::new(TokenKind::Text, text, span));
        Ok(())
    }

    fn push_symbol(&mut self) {
        let start = self.cursor.position();
        self.cursor.advance();
        let lexeme = self.cursor.slice_from(start.offset);
        let span = Span::new(start, self.cursor.position());
        self.tokens.push(Token::new(TokenKind::Symbol, lexeme, span));
    }

    /// Whether the word at the cursor reads as a bare identifier
    fn bare_word_is_name(&self) -> bool {
        let mut probe = self.cursor.clone();
        probe.consume(b':');
        let from = probe.pos();
        while let Some(b) = probe.current() {
            if is_whitespace(b) || is_symbol(b) {
                break;
            }
            probe.advance();
        }
        is_name(probe.slice_from(from))
    }
}

/// Bytes allowed in names
pub const fn is_name_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b':')
}

/// Cardinality suffixes
pub const fn is_quantifier(b: u8) -> bool {
    matches!(b, b'?' | b'*' | b'+')
}

/// Single-character symbols
pub const fn is_symbol(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'[' | b']' | b'{' | b'}')
}

/// Check that `word` is a complete name: `[a-z0-9:-]+[?*+]?`
pub fn is_name(word: &str) -> bool {
    let body = word
        .strip_suffix(|c: char| matches!(c, '?' | '*' | '+'))
        .unwrap_or(word);
    !body.is_empty() && body.bytes().all(is_name_byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Result<Vec<(TokenKind, String)>, LexError> {
        Ok(lex(source)?.map(|t| (t.kind, t.lexeme)).collect())
    }

    fn tok(kind: TokenKind, lexeme: &str) -> (TokenKind, String) {
        (kind, lexeme.to_string())
    }

    #[test]
    fn test_lex_element_with_attributes() -> Result<(), LexError> {
        let tokens = kinds(r#"(a @href "x.html" @rel next)"#)?;
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::Symbol, "("),
                tok(TokenKind::Identifier, "a"),
                tok(TokenKind::AttributeName, "href"),
                tok(TokenKind::String, "x.html"),
                tok(TokenKind::AttributeName, "rel"),
                tok(TokenKind::Identifier, "next"),
                tok(TokenKind::Symbol, ")"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_lex_colon_name_and_quantifier() -> Result<(), LexError> {
        let tokens = kinds("(:item (? title) (* entry) (+ x))")?;
        assert_eq!(tokens.get(1), Some(&tok(TokenKind::Identifier, "item")));
        assert_eq!(tokens.get(3), Some(&tok(TokenKind::Identifier, "?")));
        assert_eq!(tokens.get(4), Some(&tok(TokenKind::Identifier, "title")));
        assert_eq!(tokens.get(7), Some(&tok(TokenKind::Identifier, "*")));
        assert_eq!(tokens.get(11), Some(&tok(TokenKind::Identifier, "+")));
        Ok(())
    }

    #[test]
    fn test_lex_quantifier_ends_atom() -> Result<(), LexError> {
        let tokens = kinds("(name?x)")?;
        assert_eq!(tokens.get(1), Some(&tok(TokenKind::Identifier, "name?")));
        assert_eq!(tokens.get(2), Some(&tok(TokenKind::Identifier, "x")));
        Ok(())
    }

    #[test]
    fn test_lex_comment_replaces_open_paren() -> Result<(), LexError> {
        let tokens = kinds("(root (# ignored text ) child)")?;
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::Symbol, "("),
                tok(TokenKind::Identifier, "root"),
                tok(TokenKind::Comment, "ignored text"),
                tok(TokenKind::Identifier, "child"),
                tok(TokenKind::Symbol, ")"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_lex_text_runs() -> Result<(), LexError> {
        let tokens = kinds("(p Hello, world! (b bold) don't stop  )")?;
        assert_eq!(tokens.get(2), Some(&tok(TokenKind::Text, "Hello, world!")));
        assert_eq!(tokens.get(5), Some(&tok(TokenKind::Identifier, "bold")));
        assert_eq!(tokens.get(7), Some(&tok(TokenKind::Text, "don't stop")));
        Ok(())
    }

    #[test]
    fn test_lex_escape_forces_text() -> Result<(), LexError> {
        let tokens = kinds("(p `hello `(world`) ok)")?;
        assert_eq!(tokens.get(2), Some(&tok(TokenKind::Text, "hello (world) ok")));
        assert_eq!(tokens.len(), 4);
        Ok(())
    }

    #[test]
    fn test_lex_string_is_verbatim() -> Result<(), LexError> {
        let tokens = kinds(r#"(a @k " v (x) ")"#)?;
        assert_eq!(tokens.get(3), Some(&tok(TokenKind::String, " v (x) ")));
        Ok(())
    }

    #[test]
    fn test_lex_normalizes_line_endings() -> Result<(), LexError> {
        let stream = lex("(a\r\n b\r c)")?;
        let lines: Vec<u32> = stream.map(|t| t.span.start.line).collect();
        assert_eq!(lines, vec![1, 1, 2, 3, 3]);
        Ok(())
    }

    #[test]
    fn test_lex_offsets() -> Result<(), LexError> {
        let stream = lex("(a @k v)")?;
        let offsets: Vec<usize> = stream.map(|t| t.offset()).collect();
        assert_eq!(offsets, vec![0, 1, 3, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_lex_unterminated_string() {
        assert_eq!(
            lex(r#"(a @k "oops)"#).map(|_| ()),
            Err(LexError::UnterminatedString {
                pos: Pos::new(6, 1, 7)
            })
        );
    }

    #[test]
    fn test_lex_unterminated_comment() {
        assert!(matches!(
            lex("(a (# never closed"),
            Err(LexError::UnterminatedComment { .. })
        ));
    }

    #[test]
    fn test_lex_empty_atom() {
        assert!(matches!(lex("()"), Err(LexError::EmptyAtom { .. })));
        assert!(matches!(lex("(a @ b)"), Err(LexError::EmptyAtom { .. })));
        assert!(matches!(lex("(Upper)"), Err(LexError::EmptyAtom { .. })));
    }

    #[test]
    fn test_is_name() {
        assert!(is_name("item"));
        assert!(is_name("def-el"));
        assert!(is_name("ns:item"));
        assert!(is_name("entry*"));
        assert!(!is_name("?"));
        assert!(!is_name("a?b"));
        assert!(!is_name("Hello"));
        assert!(!is_name(""));
    }
}
