//! Element-level block detection
//!
//! The execution layer resolves a target to a concrete element before acting
//! on it. This module decides whether that element is off-limits, either
//! because it (or an ancestor) carries the blocking marker attribute, or
//! because it matches one of the blocked selector patterns.
//!
//! `ElementView` abstracts the element so the check stays headless.
//! `ElementSnapshot` is an owned implementation with a small selector engine
//! covering the simple selectors used by the blocklist.

use std::collections::BTreeMap;

use thiserror::Error;

use super::blocklist::{Blocklist, BLOCKED_ELEMENT_ATTRIBUTE};

/// Errors raised while parsing a selector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{found}' in selector '{selector}'")]
    Unexpected { selector: String, found: char },

    #[error("unterminated attribute selector in '{0}'")]
    Unterminated(String),

    #[error("combinators are not supported: '{0}'")]
    Combinator(String),
}

/// Read-only view of a UI element and its ancestors
pub trait ElementView {
    /// Element tag name
    fn tag(&self) -> &str;

    /// Attribute value, if present
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Parent element, if any
    fn parent(&self) -> Option<&Self>;

    /// Whether this element matches a selector
    fn matches_selector(&self, selector: &str) -> Result<bool, SelectorError>;
}

/// Whether an element is blocked by the built-in rules
pub fn is_element_blocked<E: ElementView>(element: &E) -> bool {
    is_element_blocked_with(Blocklist::builtin(), element)
}

pub(crate) fn is_element_blocked_with<E: ElementView>(blocklist: &Blocklist, element: &E) -> bool {
    let mut current = Some(element);
    while let Some(el) = current {
        if el.attribute(BLOCKED_ELEMENT_ATTRIBUTE).is_some() {
            return true;
        }
        current = el.parent();
    }

    blocklist.selectors().iter().any(|selector| {
        match element.matches_selector(selector) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::trace!("Skipping unparseable blocked selector: {}", e);
                false
            }
        }
    })
}

/// Owned snapshot of an element and its ancestor chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<Box<ElementSnapshot>>,
}

impl ElementSnapshot {
    /// Create an element with no attributes or parent
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            attributes: BTreeMap::new(),
            parent: None,
        }
    }

    /// Set an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Set the parent element
    pub fn with_parent(mut self, parent: ElementSnapshot) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }
}

impl ElementView for ElementSnapshot {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    fn matches_selector(&self, selector: &str) -> Result<bool, SelectorError> {
        let groups = parse_selector_list(selector)?;
        Ok(groups
            .iter()
            .any(|compound| compound.iter().all(|simple| simple.matches(self))))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Contains,
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr {
        name: String,
        test: Option<(AttrOp, String)>,
    },
}

impl SimpleSelector {
    fn matches<E: ElementView>(&self, element: &E) -> bool {
        match self {
            SimpleSelector::Universal => true,
            SimpleSelector::Tag(tag) => element.tag().eq_ignore_ascii_case(tag),
            SimpleSelector::Id(id) => element.attribute("id") == Some(id.as_str()),
            SimpleSelector::Class(class) => element
                .attribute("class")
                .map(|c| c.split_whitespace().any(|c| c == class))
                .unwrap_or(false),
            SimpleSelector::Attr { name, test } => match (element.attribute(name), test) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(value), Some((op, expected))) => match op {
                    AttrOp::Equals => value == expected,
                    AttrOp::Contains => value.contains(expected.as_str()),
                    AttrOp::Prefix => value.starts_with(expected.as_str()),
                    AttrOp::Suffix => value.ends_with(expected.as_str()),
                },
            },
        }
    }
}

/// Split a selector list on top-level commas and parse each compound
fn parse_selector_list(selector: &str) -> Result<Vec<Vec<SimpleSelector>>, SelectorError> {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote: Option<char> = None;

    for (i, c) in selector.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                groups.push(parse_compound(&selector[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    groups.push(parse_compound(&selector[start..])?);

    Ok(groups)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(raw: &str) -> Result<Vec<SimpleSelector>, SelectorError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(SelectorError::Empty);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut parts = Vec::new();
    let mut i = 0;

    let read_ident = |i: &mut usize| -> String {
        let begin = *i;
        while *i < chars.len() && is_ident_char(chars[*i]) {
            *i += 1;
        }
        chars[begin..*i].iter().collect()
    };

    while i < chars.len() {
        let c = chars[i];
        match c {
            '#' | '.' => {
                i += 1;
                let ident = read_ident(&mut i);
                if ident.is_empty() {
                    return Err(unexpected(text, chars.get(i).copied().unwrap_or(c)));
                }
                parts.push(if c == '#' {
                    SimpleSelector::Id(ident)
                } else {
                    SimpleSelector::Class(ident)
                });
            }
            '[' => {
                let close = find_attr_end(&chars, i + 1)
                    .ok_or_else(|| SelectorError::Unterminated(text.to_string()))?;
                let body: String = chars[i + 1..close].iter().collect();
                parts.push(parse_attribute(text, &body)?);
                i = close + 1;
            }
            '*' if i == 0 => {
                parts.push(SimpleSelector::Universal);
                i += 1;
            }
            c if i == 0 && is_ident_char(c) => {
                parts.push(SimpleSelector::Tag(read_ident(&mut i).to_lowercase()));
            }
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(SelectorError::Combinator(text.to_string()));
            }
            c => return Err(unexpected(text, c)),
        }
    }

    Ok(parts)
}

/// Index of the `]` closing an attribute selector, skipping quoted values
fn find_attr_end(chars: &[char], from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, &c) in chars[from..].iter().enumerate() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, ']') => return Some(from + offset),
            _ => {}
        }
    }
    None
}

fn parse_attribute(selector: &str, body: &str) -> Result<SimpleSelector, SelectorError> {
    let body = body.trim();
    let name_end = body
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
        return Err(unexpected(selector, body.chars().next().unwrap_or(']')));
    }

    let rest = body[name_end..].trim_start();
    if rest.is_empty() {
        return Ok(SimpleSelector::Attr {
            name: name.to_lowercase(),
            test: None,
        });
    }

    let (op, value) = if let Some(v) = rest.strip_prefix("*=") {
        (AttrOp::Contains, v)
    } else if let Some(v) = rest.strip_prefix("^=") {
        (AttrOp::Prefix, v)
    } else if let Some(v) = rest.strip_prefix("$=") {
        (AttrOp::Suffix, v)
    } else if let Some(v) = rest.strip_prefix('=') {
        (AttrOp::Equals, v)
    } else {
        return Err(unexpected(selector, rest.chars().next().unwrap_or(']')));
    };

    Ok(SimpleSelector::Attr {
        name: name.to_lowercase(),
        test: Some((op, parse_attr_value(selector, value.trim())?)),
    })
}

fn parse_attr_value(selector: &str, value: &str) -> Result<String, SelectorError> {
    let mut chars = value.chars();
    match chars.next() {
        Some(q @ ('"' | '\'')) => {
            let inner = &value[1..];
            match inner.find(q) {
                Some(end) if end + 1 == inner.len() => Ok(inner[..end].to_string()),
                Some(end) => Err(unexpected(
                    selector,
                    inner[end + 1..].chars().next().unwrap_or(q),
                )),
                None => Err(SelectorError::Unterminated(selector.to_string())),
            }
        }
        Some(_) => match value.chars().find(|c| !is_ident_char(*c)) {
            Some(c) => Err(unexpected(selector, c)),
            None => Ok(value.to_string()),
        },
        None => Err(SelectorError::Unterminated(selector.to_string())),
    }
}

fn unexpected(selector: &str, found: char) -> SelectorError {
    SelectorError::Unexpected {
        selector: selector.to_string(),
        found,
    }
}
