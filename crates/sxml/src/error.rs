//! Error types for sxml
//!
//! Each stage of the pipeline has its own error enum. Lexer and parser errors
//! carry the source position; schema and validation errors carry the
//! offending names. [`Error`] wraps all of them for callers that drive the
//! whole pipeline.

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }
}

/// Lexical errors
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("empty atom at {pos}")]
    EmptyAtom { pos: Pos },
    #[error("unterminated string starting at {pos}")]
    UnterminatedString { pos: Pos },
    #[error("unterminated comment starting at {pos}")]
    UnterminatedComment { pos: Pos },
}

impl LexError {
    pub const fn pos(&self) -> Pos {
        match self {
            Self::EmptyAtom { pos }
            | Self::UnterminatedString { pos }
            | Self::UnterminatedComment { pos } => *pos,
        }
    }
}

/// Structural errors raised while building the tree
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected '(' at {pos}, found {found}")]
    ExpectedOpenParen { pos: Pos, found: String },
    #[error("expected element name at {pos}, found {found}")]
    ExpectedName { pos: Pos, found: String },
    #[error("expected ')' at {pos}, found {found}")]
    ExpectedCloseParen { pos: Pos, found: String },
    #[error("invalid value for attribute '{name}' at {pos}, found {found}")]
    InvalidAttributeValue {
        pos: Pos,
        name: String,
        found: String,
    },
    #[error("max depth exceeded at {pos}: {max}")]
    TooDeep { pos: Pos, max: u16 },
    #[error("unexpected {found} after root element at {pos}")]
    TrailingContent { pos: Pos, found: String },
}

impl ParseError {
    pub const fn pos(&self) -> Pos {
        match self {
            Self::ExpectedOpenParen { pos, .. }
            | Self::ExpectedName { pos, .. }
            | Self::ExpectedCloseParen { pos, .. }
            | Self::InvalidAttributeValue { pos, .. }
            | Self::TooDeep { pos, .. }
            | Self::TrailingContent { pos, .. } => *pos,
        }
    }
}

/// Errors in the schema document itself
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema root '{root}' has no @start attribute")]
    MissingStart { root: String },
    #[error("unknown definition kind '{kind}' (expected def-attr or def-el)")]
    UnknownDefKind { kind: String },
    #[error("{kind} definition has no name element")]
    MissingDefinitionName { kind: String },
    #[error("unexpected text '{text}' in definition of '{definition}'")]
    UnexpectedText { definition: String, text: String },
    #[error("rule '{marker}' in definition of '{definition}' names no target")]
    MissingRuleTarget { definition: String, marker: String },
    #[error("invalid cardinality '{rule}' in definition of '{definition}'")]
    InvalidCardinality { definition: String, rule: String },
}

/// First violation found while checking a document against a schema
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("root element is '{found}', schema expects '{expected}'")]
    RootMismatch { expected: String, found: String },
    #[error("schema definition error: attribute '{attr}' of '{element}' cannot repeat")]
    SchemaDefinitionError { element: String, attr: String },
    #[error("missing mandatory attribute '{attr}' on '{element}'")]
    MissingMandatoryAttr { element: String, attr: String },
    #[error("unknown attribute '{attr}' on '{element}'")]
    UnknownAttr { element: String, attr: String },
    #[error("missing mandatory element '{child}' in '{element}'")]
    MissingMandatoryElement { element: String, child: String },
    #[error("unknown element '{child}' in '{element}'")]
    UnknownElement { element: String, child: String },
}

/// Serializer errors
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("attribute '{attr}' of '{element}' contains '\"' and cannot be written as sxml")]
    QuoteInAttribute { element: String, attr: String },
    #[error("json serialization failed: {0}")]
    Json(String),
}

/// Any error produced by the sxml pipeline
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl Error {
    /// Short label naming the error variant
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Lex(e) => match e {
                LexError::EmptyAtom { .. } => "EmptyAtom",
                LexError::UnterminatedString { .. } => "UnterminatedString",
                LexError::UnterminatedComment { .. } => "UnterminatedComment",
            },
            Self::Parse(e) => match e {
                ParseError::ExpectedOpenParen { .. } => "ExpectedOpenParen",
                ParseError::ExpectedName { .. } => "ExpectedName",
                ParseError::ExpectedCloseParen { .. } => "ExpectedCloseParen",
                ParseError::InvalidAttributeValue { .. } => "InvalidAttributeValue",
                ParseError::TooDeep { .. } => "TooDeep",
                ParseError::TrailingContent { .. } => "TrailingContent",
            },
            Self::Schema(e) => match e {
                SchemaError::MissingStart { .. } => "MissingStart",
                SchemaError::UnknownDefKind { .. } => "UnknownDefKind",
                SchemaError::MissingDefinitionName { .. } => "MissingDefinitionName",
                SchemaError::UnexpectedText { .. } => "UnexpectedText",
                SchemaError::MissingRuleTarget { .. } => "MissingRuleTarget",
                SchemaError::InvalidCardinality { .. } => "InvalidCardinality",
            },
            Self::Validation(e) => match e {
                ValidationError::RootMismatch { .. } => "RootMismatch",
                ValidationError::SchemaDefinitionError { .. } => "SchemaDefinitionError",
                ValidationError::MissingMandatoryAttr { .. } => "MissingMandatoryAttr",
                ValidationError::UnknownAttr { .. } => "UnknownAttr",
                ValidationError::MissingMandatoryElement { .. } => "MissingMandatoryElement",
                ValidationError::UnknownElement { .. } => "UnknownElement",
            },
            Self::Generate(e) => match e {
                GenerateError::UnsupportedFormat(_) => "UnsupportedFormat",
                GenerateError::QuoteInAttribute { .. } => "QuoteInAttribute",
                GenerateError::Json(_) => "Json",
            },
        }
    }

    /// Source position, for lexer and parser errors
    pub const fn pos(&self) -> Option<Pos> {
        match self {
            Self::Lex(e) => Some(e.pos()),
            Self::Parse(e) => Some(e.pos()),
            Self::Schema(_) | Self::Validation(_) | Self::Generate(_) => None,
        }
    }
}

/// Result type alias for sxml
pub type Result<T> = std::result::Result<T, Error>;
