//! sxml - compact S-expression markup with a schema validator
//!
//! Documents are parenthesized elements with `@name value` attributes and
//! bare text. A schema is itself an sxml document listing, per element, the
//! attributes and children it allows.
//!
//! # Quick Start
//!
//! ```
//! use sxml::{compile_schema, parse};
//! # fn main() -> Result<(), sxml::Error> {
//! let doc = parse(r#"(page @lang "en" (title `Hello) (p `Some text))"#)?;
//! assert_eq!(doc.attr("lang"), Some("en"));
//!
//! let schema = compile_schema(&parse(
//!     r#"(schema @start "page"
//!          (def-el page title (* p))
//!          (def-el title)
//!          (def-el p)
//!          (def-attr page (? lang))
//!          (def-attr lang))"#,
//! )?)?;
//! schema.validate(&doc)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{
    Error, GenerateError, LexError, ParseError, Pos, Result, SchemaError, Span, ValidationError,
};

pub mod lexer;
pub use lexer::{lex, Token, TokenKind, TokenStream};

pub mod model;
pub use model::{Attr, Element, Node};

pub mod parser;
pub use parser::{parse, parse_with_config, Config as ParserConfig, Parser, MAX_DEPTH};

pub mod schema;
pub use schema::{compile_schema, validate, Cardinality, Rule, RuleTable, Schema};

pub mod generate;
pub use generate::{generate, generate_as, Format};

pub mod query;
pub use query::{filter_nodes, first_el, first_text, get_attr};

pub mod dump;
pub use dump::dump;

/// Parse `source` and `schema_source`, then validate the document
pub fn validate_str(source: &str, schema_source: &str) -> Result<()> {
    let schema = compile_schema(&parse(schema_source)?)?;
    schema.validate(&parse(source)?)?;
    Ok(())
}
