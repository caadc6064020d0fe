//! Compiled schema rules

use std::fmt;

use indexmap::IndexMap;

/// How many times a named attribute or child may appear
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cardinality {
    /// Exactly one
    Mandatory,
    /// `?`: zero or one
    Optional,
    /// `*`: any number
    ZeroOrMore,
    /// `+`: checked as exactly one
    OneOrMore,
}

impl Cardinality {
    /// Parse a rule marker; a plain name is not a marker
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "?" => Some(Self::Optional),
            "*" => Some(Self::ZeroOrMore),
            "+" => Some(Self::OneOrMore),
            _ => None,
        }
    }

    pub const fn marker(self) -> char {
        match self {
            Self::Mandatory => '!',
            Self::Optional => '?',
            Self::ZeroOrMore => '*',
            Self::OneOrMore => '+',
        }
    }

    /// Mandatory and OneOrMore both require exactly one match
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Mandatory | Self::OneOrMore)
    }

    /// Attributes never repeat, so only these two are valid for them
    pub const fn is_single(self) -> bool {
        matches!(self, Self::Mandatory | Self::Optional)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// One rule of a definition: a cardinality applied to a target name and
/// any alias names
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub cardinality: Cardinality,
    pub target: String,
    pub aliases: Vec<String>,
}

impl Rule {
    pub fn new(cardinality: Cardinality, target: impl Into<String>) -> Self {
        Self {
            cardinality,
            target: target.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Target followed by aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.target.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Definitions keyed by name, each holding its rules in schema order
pub type RuleMap = IndexMap<String, Vec<Rule>>;

/// Compiled schema: attribute and element definitions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleTable {
    pub attrs: RuleMap,
    pub elements: RuleMap,
}

/// A `(cardinality, name)` pair expanded from an active rule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expected<'a> {
    pub cardinality: Cardinality,
    pub name: &'a str,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active attribute expectations for element `name`
    pub fn attr_rules(&self, name: &str) -> Vec<Expected<'_>> {
        active(&self.attrs, name)
    }

    /// Active child expectations for element `name`
    pub fn element_rules(&self, name: &str) -> Vec<Expected<'_>> {
        active(&self.elements, name)
    }
}

/// Rules of definition `name` whose target is itself defined in `map`,
/// flattened so every target and alias name carries the rule's cardinality
fn active<'a>(map: &'a RuleMap, name: &str) -> Vec<Expected<'a>> {
    map.get(name)
        .into_iter()
        .flatten()
        .filter(|rule| map.contains_key(&rule.target))
        .flat_map(|rule| {
            rule.names().map(move |name| Expected {
                cardinality: rule.cardinality,
                name,
            })
        })
        .collect()
}
