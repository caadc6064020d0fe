//! Structural validation of a document against a [`RuleTable`]

use tracing::{instrument, trace};

use crate::error::ValidationError;
use crate::model::Element;
use crate::schema::rules::{Cardinality, Expected, RuleTable};

/// Name under which text children are matched
pub const TEXT: &str = "text";

/// Check `doc` against `table`, stopping at the first violation
#[instrument(skip_all, fields(root = root))]
pub fn validate(doc: &Element, root: &str, table: &RuleTable) -> Result<(), ValidationError> {
    if doc.name != root {
        return Err(ValidationError::RootMismatch {
            expected: root.to_string(),
            found: doc.name.clone(),
        });
    }
    Validator { table }.element(doc)
}

struct Validator<'a> {
    table: &'a RuleTable,
}

impl Validator<'_> {
    fn element(&self, e: &Element) -> Result<(), ValidationError> {
        trace!(element = %e.name, "validating");
        self.attributes(e)?;
        self.children(e)?;
        e.elements().try_for_each(|child| self.element(child))
    }

    fn attributes(&self, e: &Element) -> Result<(), ValidationError> {
        let rules = self.table.attr_rules(&e.name);

        if let Some(bad) = rules.iter().find(|r| !r.cardinality.is_single()) {
            return Err(ValidationError::SchemaDefinitionError {
                element: e.name.clone(),
                attr: bad.name.to_string(),
            });
        }

        for rule in rules
            .iter()
            .filter(|r| r.cardinality == Cardinality::Mandatory)
        {
            if e.attrs.iter().filter(|a| a.name == rule.name).count() != 1 {
                return Err(ValidationError::MissingMandatoryAttr {
                    element: e.name.clone(),
                    attr: rule.name.to_string(),
                });
            }
        }

        for attr in &e.attrs {
            if match_count(&rules, &attr.name) != 1 {
                return Err(ValidationError::UnknownAttr {
                    element: e.name.clone(),
                    attr: attr.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn children(&self, e: &Element) -> Result<(), ValidationError> {
        let mut rules = self.table.element_rules(&e.name);
        rules.push(Expected {
            cardinality: Cardinality::Optional,
            name: TEXT,
        });

        // OneOrMore is held to exactly one, same as Mandatory
        for rule in rules.iter().filter(|r| r.cardinality.is_required()) {
            if e.children.iter().filter(|c| c.name() == rule.name).count() != 1 {
                return Err(ValidationError::MissingMandatoryElement {
                    element: e.name.clone(),
                    child: rule.name.to_string(),
                });
            }
        }

        for child in &e.children {
            if match_count(&rules, child.name()) != 1 {
                return Err(ValidationError::UnknownElement {
                    element: e.name.clone(),
                    child: child.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

fn match_count(rules: &[Expected<'_>], name: &str) -> usize {
    rules.iter().filter(|r| r.name == name).count()
}
