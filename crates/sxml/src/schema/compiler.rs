//! Schema compiler: reads a schema document into a [`RuleTable`]
//!
//! A schema is an ordinary sxml document:
//!
//! ```text
//! (schema @start "doc"
//!   (def-el doc title (* section))
//!   (def-el title)
//!   (def-el section (? title))
//!   (def-attr section id)
//!   (def-attr id))
//! ```
//!
//! Each `def-el` / `def-attr` names the definition with its first child and
//! lists one rule per remaining child. A bare name is mandatory; `(? x)`,
//! `(* x)` and `(+ x)` mark optional, zero-or-more and one-or-more. Extra
//! names inside a rule are aliases sharing its cardinality.

use tracing::{debug, instrument, warn};

use crate::error::{SchemaError, ValidationError};
use crate::lexer::is_quantifier;
use crate::model::{Element, Node};
use crate::schema::rules::{Cardinality, Rule, RuleMap, RuleTable};
use crate::schema::validator::validate;

const DEF_ATTR: &str = "def-attr";
const DEF_EL: &str = "def-el";

/// Compiled schema: declared root element plus rules
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    root: String,
    rules: RuleTable,
}

impl Schema {
    pub fn new(root: impl Into<String>, rules: RuleTable) -> Self {
        Self {
            root: root.into(),
            rules,
        }
    }

    /// Name the document root must have
    pub fn root(&self) -> &str {
        &self.root
    }

    pub const fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Check `doc` against this schema
    pub fn validate(&self, doc: &Element) -> Result<(), ValidationError> {
        validate(doc, &self.root, &self.rules)
    }
}

/// Compile a parsed schema document
#[instrument(skip_all, fields(schema = %schema.name))]
pub fn compile_schema(schema: &Element) -> Result<Schema, SchemaError> {
    let root = schema
        .attr("start")
        .ok_or_else(|| SchemaError::MissingStart {
            root: schema.name.clone(),
        })?;

    let mut rules = RuleTable::new();
    for node in &schema.children {
        let def = match node {
            Node::Element(def) => def,
            Node::Text(text) => {
                return Err(SchemaError::UnexpectedText {
                    definition: schema.name.clone(),
                    text: text.clone(),
                })
            }
        };
        let map = match def.name.as_str() {
            DEF_ATTR => &mut rules.attrs,
            DEF_EL => &mut rules.elements,
            other => {
                return Err(SchemaError::UnknownDefKind {
                    kind: other.to_string(),
                })
            }
        };
        compile_definition(def, map)?;
    }

    debug!(
        root,
        attrs = rules.attrs.len(),
        elements = rules.elements.len(),
        "compiled schema"
    );
    Ok(Schema::new(root, rules))
}

fn compile_definition(def: &Element, map: &mut RuleMap) -> Result<(), SchemaError> {
    let mut nodes = def.children.iter();
    let key = match nodes.next() {
        Some(Node::Element(e)) => e.name.clone(),
        Some(Node::Text(text)) => {
            return Err(SchemaError::UnexpectedText {
                definition: def.name.clone(),
                text: text.clone(),
            })
        }
        None => {
            return Err(SchemaError::MissingDefinitionName {
                kind: def.name.clone(),
            })
        }
    };

    let rules = nodes
        .map(|node| compile_rule(&key, node))
        .collect::<Result<Vec<_>, _>>()?;

    if map.insert(key.clone(), rules).is_some() {
        warn!(kind = %def.name, name = %key, "duplicate definition replaces earlier one");
    }
    Ok(())
}

fn compile_rule(definition: &str, node: &Node) -> Result<Rule, SchemaError> {
    let rule_node = match node {
        Node::Element(e) => e,
        Node::Text(text) => {
            return Err(SchemaError::UnexpectedText {
                definition: definition.to_string(),
                text: text.clone(),
            })
        }
    };
    let mut names = child_names(definition, rule_node)?.into_iter();

    if let Some(cardinality) = Cardinality::from_marker(&rule_node.name) {
        let target = names.next().ok_or_else(|| SchemaError::MissingRuleTarget {
            definition: definition.to_string(),
            marker: rule_node.name.clone(),
        })?;
        return Ok(Rule::new(cardinality, target).with_aliases(names));
    }

    // `title?` style suffixes are not part of the rule language
    if rule_node.name.bytes().any(is_quantifier) {
        return Err(SchemaError::InvalidCardinality {
            definition: definition.to_string(),
            rule: rule_node.name.clone(),
        });
    }

    Ok(Rule::new(Cardinality::Mandatory, rule_node.name.clone()).with_aliases(names))
}

fn child_names(definition: &str, rule_node: &Element) -> Result<Vec<String>, SchemaError> {
    rule_node
        .children
        .iter()
        .map(|child| match child {
            Node::Element(e) => Ok(e.name.clone()),
            Node::Text(text) => Err(SchemaError::UnexpectedText {
                definition: definition.to_string(),
                text: text.clone(),
            }),
        })
        .collect()
}
