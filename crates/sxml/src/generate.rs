//! Serializers from the document tree to text

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::GenerateError;
use crate::lexer::{cursor::is_whitespace, is_symbol, ESCAPE};
use crate::model::{Element, Node};

/// Elements written as `<x/>` in HTML, never with children
pub const SELF_CLOSING_HTML: [&str; 5] = ["meta", "link", "image", "hr", "br"];

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const HTML_DOCTYPE: &str = "<!DOCTYPE html>";

/// Output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Html,
    Xml,
    /// The source syntax itself
    Sxml,
    #[cfg(feature = "serde")]
    Json,
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Sxml => "sxml",
            #[cfg(feature = "serde")]
            Self::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "xml" => Ok(Self::Xml),
            "sxml" => Ok(Self::Sxml),
            #[cfg(feature = "serde")]
            "json" => Ok(Self::Json),
            _ => Err(GenerateError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialize `doc` in the format named by `tag`
pub fn generate(doc: &Element, tag: &str) -> Result<String, GenerateError> {
    generate_as(doc, tag.parse()?)
}

/// Serialize `doc` in `format`
#[instrument(skip_all, fields(format = %format))]
pub fn generate_as(doc: &Element, format: Format) -> Result<String, GenerateError> {
    let mut output = String::new();
    match format {
        Format::Html => {
            output.push_str(HTML_DOCTYPE);
            write_markup(doc, &mut output, Markup::Html);
        }
        Format::Xml => {
            output.push_str(XML_DECLARATION);
            write_markup(doc, &mut output, Markup::Xml);
        }
        Format::Sxml => write_sxml(doc, &mut output, true)?,
        #[cfg(feature = "serde")]
        Format::Json => {
            output = serde_json::to_string_pretty(doc)
                .map_err(|e| GenerateError::Json(e.to_string()))?;
        }
    }
    debug!(bytes = output.len(), "generated output");
    Ok(output)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Markup {
    Html,
    Xml,
}

fn write_markup(element: &Element, output: &mut String, markup: Markup) {
    output.push('<');
    output.push_str(&element.name);

    for attr in &element.attrs {
        output.push(' ');
        output.push_str(&attr.name);
        output.push_str("=\"");
        output.push_str(&attr.value.replace('"', "&quot;"));
        output.push('"');
    }

    let self_closing = match markup {
        Markup::Html => SELF_CLOSING_HTML.contains(&element.name.as_str()),
        Markup::Xml => element.children.is_empty(),
    };
    if self_closing {
        output.push_str("/>");
        return;
    }

    output.push('>');
    for child in &element.children {
        match child {
            Node::Element(child) => write_markup(child, output, markup),
            Node::Text(text) => output.push_str(&escape_text(text)),
        }
    }
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Nested elements with nothing inside are written as bare names, since
/// the parser drops `(x)`
fn write_sxml(element: &Element, output: &mut String, root: bool) -> Result<(), GenerateError> {
    if !root && element.is_empty() {
        push_name(&element.name, output);
        return Ok(());
    }

    output.push('(');
    push_name(&element.name, output);

    for attr in &element.attrs {
        if attr.value.contains('"') {
            return Err(GenerateError::QuoteInAttribute {
                element: element.name.clone(),
                attr: attr.name.clone(),
            });
        }
        output.push_str(" @");
        output.push_str(&attr.name);
        output.push_str(" \"");
        output.push_str(&attr.value);
        output.push('"');
    }

    let mut children = element.children.iter().peekable();
    while let Some(child) = children.next() {
        output.push(' ');
        match child {
            Node::Element(child) => write_sxml(child, output, false)?,
            Node::Text(text) => {
                output.push_str(&escape_sxml_text(text));
                // a text run only stops at a bracket
                let bracket_follows = match children.peek() {
                    None => true,
                    Some(Node::Element(next)) => !next.is_empty(),
                    Some(Node::Text(_)) => false,
                };
                if !bracket_follows {
                    output.push_str(" (#)");
                }
            }
        }
    }

    output.push(')');
    Ok(())
}

/// The lexer drops one leading `:` from a name
fn push_name(name: &str, output: &mut String) {
    if name.starts_with(':') {
        output.push(':');
    }
    output.push_str(name);
}

/// Backtick-escape text so it lexes back as one identical text token
fn escape_sxml_text(text: &str) -> String {
    let last = text.char_indices().last().map_or(0, |(i, _)| i);
    let mut escaped = String::with_capacity(text.len() + 2);

    for (i, c) in text.char_indices() {
        let needs_escape = i == 0
            || c == char::from(ESCAPE)
            || u8::try_from(c).is_ok_and(is_symbol)
            || (i == last && u8::try_from(c).is_ok_and(is_whitespace));
        if needs_escape {
            escaped.push(char::from(ESCAPE));
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn page() -> Element {
        Element::new("html")
            .with_child(
                Element::new("head")
                    .with_child(Element::new("meta").with_attr("charset", "utf-8"))
                    .with_child(Element::new("title").with_text("A & B")),
            )
            .with_child(
                Element::new("body")
                    .with_child(Element::new("p").with_attr("class", "say \"hi\"").with_text("1 < 2"))
                    .with_child(Element::new("br"))
                    .with_child(Element::new("div")),
            )
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("html".parse::<Format>(), Ok(Format::Html));
        assert_eq!("XML".parse::<Format>(), Ok(Format::Xml));
        assert_eq!(
            "pdf".parse::<Format>(),
            Err(GenerateError::UnsupportedFormat("pdf".to_string()))
        );
    }

    #[test]
    fn test_generate_html() -> Result<(), GenerateError> {
        let html = generate(&page(), "html")?;
        assert_eq!(
            html,
            concat!(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\"/>",
                "<title>A &amp; B</title></head><body>",
                "<p class=\"say &quot;hi&quot;\">1 &lt; 2</p><br/><div></div></body></html>"
            )
        );
        Ok(())
    }

    #[test]
    fn test_generate_xml_self_closes_empty_elements() -> Result<(), GenerateError> {
        let xml = generate(&Element::new("a").with_child(Element::new("b")), "xml")?;
        assert_eq!(xml, format!("{XML_DECLARATION}<a><b/></a>"));
        Ok(())
    }

    #[test]
    fn test_generate_unsupported() {
        assert!(matches!(
            generate(&page(), "rtf"),
            Err(GenerateError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_generate_sxml() -> Result<(), GenerateError> {
        let doc = Element::new("p")
            .with_attr("id", "x")
            .with_text("see (this)")
            .with_child(Element::new("br"))
            .with_child(Element::new("b").with_text("bold"));
        assert_eq!(
            generate(&doc, "sxml")?,
            "(p @id \"x\" `see `(this`) (#) br (b `bold))"
        );
        Ok(())
    }

    #[test]
    fn test_sxml_round_trip() -> crate::Result<()> {
        let source = r#"(doc @lang "en" (# c ) (h1 Title) `hello  world`  (#) `again (p `a `[b`] c) hr (img @src "x.png"))"#;
        let doc = parse(source)?;
        let written = generate(&doc, "sxml")?;
        assert_eq!(parse(&written)?, doc);
        Ok(())
    }

    #[test]
    fn test_sxml_rejects_quote_in_attribute() {
        assert!(matches!(
            generate(&page(), "sxml"),
            Err(GenerateError::QuoteInAttribute { .. })
        ));
    }
}
