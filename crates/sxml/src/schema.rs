//! Schema language: compiling schema documents and validating against them

pub mod compiler;
pub mod rules;
pub mod validator;

pub use compiler::{compile_schema, Schema};
pub use rules::{Cardinality, Expected, Rule, RuleMap, RuleTable};
pub use validator::validate;
