//! Recursive-descent parser building the document tree

use tracing::{debug, instrument};

use crate::error::{ParseError, Result};
use crate::lexer::{lex, TokenKind, TokenStream};
use crate::model::{Attr, Element, Node};

/// Hard ceiling on element nesting; recursion stays well inside a 2 MiB
/// thread stack up to this depth
pub const MAX_DEPTH: u16 = 256;

/// Configuration for the parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth; the root is depth 1. Values above
    /// [`MAX_DEPTH`] are clamped to it, and 0 rejects every document
    pub max_depth: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl Config {
    pub const fn new(max_depth: u16) -> Self {
        Self {
            max_depth: if max_depth > MAX_DEPTH {
                MAX_DEPTH
            } else {
                max_depth
            },
        }
    }

    /// Depth limit actually enforced, including for hand-built configs
    pub fn limit(self) -> u16 {
        self.max_depth.min(MAX_DEPTH)
    }
}

/// Parse source text with the default configuration
pub fn parse(source: &str) -> Result<Element> {
    parse_with_config(source, Config::default())
}

/// Parse source text with custom limits
#[instrument(skip_all, fields(len = source.len()))]
pub fn parse_with_config(source: &str, config: Config) -> Result<Element> {
    let tokens = lex(source)?;
    let root = Parser::with_config(tokens, config).parse()?;
    debug!(root = %root.name, "parsed document");
    Ok(root)
}

/// sxml parser over a token stream
#[derive(Debug)]
pub struct Parser {
    tokens: TokenStream,
    config: Config,
    depth: u16,
}

impl Parser {
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_config(tokens, Config::default())
    }

    pub const fn with_config(tokens: TokenStream, config: Config) -> Self {
        Self {
            tokens,
            config,
            depth: 0,
        }
    }

    /// Parse a complete document: one root element, optionally surrounded
    /// by comments
    pub fn parse(mut self) -> std::result::Result<Element, ParseError> {
        self.skip_comments();
        let root = self.parse_element()?;
        self.skip_comments();

        if !self.tokens.at_end() {
            return Err(ParseError::TrailingContent {
                pos: self.tokens.position(),
                found: self.tokens.describe_next(),
            });
        }
        Ok(root)
    }

    fn parse_element(&mut self) -> std::result::Result<Element, ParseError> {
        if !self.tokens.peek().is_some_and(|t| t.is_symbol("(")) {
            return Err(ParseError::ExpectedOpenParen {
                pos: self.tokens.position(),
                found: self.tokens.describe_next(),
            });
        }
        let open = self.tokens.position();
        self.tokens.next_token();

        self.depth = self.depth.saturating_add(1);
        if self.depth > self.config.limit() {
            return Err(ParseError::TooDeep {
                pos: open,
                max: self.config.limit(),
            });
        }

        let name = match self.tokens.peek() {
            Some(t) if t.kind == TokenKind::Identifier => t.lexeme.clone(),
            _ => {
                return Err(ParseError::ExpectedName {
                    pos: self.tokens.position(),
                    found: self.tokens.describe_next(),
                })
            }
        };
        self.tokens.next_token();

        let attrs = self.parse_attributes()?;
        let children = self.parse_children()?;

        if !self.tokens.peek().is_some_and(|t| t.is_symbol(")")) {
            return Err(ParseError::ExpectedCloseParen {
                pos: self.tokens.position(),
                found: self.tokens.describe_next(),
            });
        }
        self.tokens.next_token();
        self.depth = self.depth.saturating_sub(1);

        Ok(Element {
            name,
            attrs,
            children,
        })
    }

    fn parse_attributes(&mut self) -> std::result::Result<Vec<Attr>, ParseError> {
        let mut attrs = Vec::new();

        while let Some(name) = self
            .tokens
            .next_if(|t| t.kind == TokenKind::AttributeName)
        {
            match self.tokens.next_if(|t| t.kind.is_attr_value()) {
                Some(value) => attrs.push(Attr::new(name.lexeme, value.lexeme.trim())),
                None => {
                    return Err(ParseError::InvalidAttributeValue {
                        pos: self.tokens.position(),
                        name: name.lexeme,
                        found: self.tokens.describe_next(),
                    })
                }
            }
        }

        Ok(attrs)
    }

    fn parse_children(&mut self) -> std::result::Result<Vec<Node>, ParseError> {
        let mut children = Vec::new();

        while let Some(token) = self.tokens.peek() {
            let kind = token.kind;
            let opens = token.is_symbol("(");
            match kind {
                TokenKind::Text => {
                    if let Some(t) = self.tokens.next_token() {
                        children.push(Node::Text(t.lexeme));
                    }
                }
                TokenKind::Identifier => {
                    if let Some(t) = self.tokens.next_token() {
                        children.push(Node::Element(Element::new(t.lexeme)));
                    }
                }
                TokenKind::Comment => {
                    self.tokens.next_token();
                }
                TokenKind::Symbol if opens => {
                    // `(name)` with nothing inside is dropped; write a bare
                    // `name` to keep an empty element
                    let child = self.parse_element()?;
                    if !child.is_empty() {
                        children.push(Node::Element(child));
                    }
                }
                _ => break,
            }
        }

        Ok(children)
    }

    fn skip_comments(&mut self) {
        while self
            .tokens
            .next_if(|t| t.kind == TokenKind::Comment)
            .is_some()
        {}
    }
}
