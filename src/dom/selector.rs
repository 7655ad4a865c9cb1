// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS selector parsing and matching
//!
//! Simplified selector implementation: compound simple selectors
//! (`tag`, `#id`, `.class`, `[attr]`, `[attr=value]` with the usual
//! operators and the `i` flag) and comma-separated groups. Combinators
//! are not supported; callers scope queries by walking subtrees instead.

use crate::error::{Error, Result};

use super::element::Element;

/// A parsed CSS selector: one or more comma-separated compounds
#[derive(Debug, Clone)]
pub struct Selector {
    groups: Vec<Vec<SelectorPart>>,
}

/// A part of a compound selector
#[derive(Debug, Clone)]
enum SelectorPart {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
}

#[derive(Debug, Clone)]
struct AttributeSelector {
    name: String,
    operator: Option<AttributeOperator>,
    value: Option<String>,
    case_insensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOperator {
    /// [attr=value] - exact match
    Equals,
    /// [attr~=value] - word in space-separated list
    Includes,
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch,
    /// [attr^=value] - starts with
    Prefix,
    /// [attr$=value] - ends with
    Suffix,
    /// [attr*=value] - contains substring
    Substring,
}

impl Selector {
    /// Parse a CSS selector string
    pub fn parse(selector: &str) -> Result<Self> {
        let mut groups = Vec::new();
        for compound in selector.split(',') {
            let compound = compound.trim();
            if compound.is_empty() {
                return Err(Error::selector(selector, "empty selector"));
            }
            let mut parser = SelectorParser::new(compound);
            groups.push(parser.parse()?);
        }
        if groups.is_empty() {
            return Err(Error::selector(selector, "empty selector"));
        }
        Ok(Self { groups })
    }

    /// Check if an element matches any group of this selector
    pub fn matches(&self, element: &Element) -> bool {
        self.groups
            .iter()
            .any(|parts| parts.iter().all(|part| Self::part_matches(part, element)))
    }

    fn part_matches(part: &SelectorPart, element: &Element) -> bool {
        match part {
            SelectorPart::Universal => true,
            SelectorPart::Tag(tag) => element.local_name().eq_ignore_ascii_case(tag),
            SelectorPart::Id(id) => element.id().as_deref() == Some(id),
            SelectorPart::Class(class) => element
                .get_attribute("class")
                .map(|c| c.split_whitespace().any(|word| word == class))
                .unwrap_or(false),
            SelectorPart::Attribute(attr) => Self::attribute_matches(attr, element),
        }
    }

    fn attribute_matches(attr: &AttributeSelector, element: &Element) -> bool {
        let value = match element.get_attribute(&attr.name) {
            Some(value) => value,
            None => return false,
        };

        let (Some(op), Some(target)) = (&attr.operator, &attr.value) else {
            return true; // existence check only
        };

        let (value, target) = if attr.case_insensitive {
            (value.to_lowercase(), target.to_lowercase())
        } else {
            (value, target.clone())
        };

        match op {
            AttributeOperator::Equals => value == target,
            AttributeOperator::Includes => value.split_whitespace().any(|word| word == target),
            AttributeOperator::DashMatch => {
                value == target || value.starts_with(&format!("{}-", target))
            }
            AttributeOperator::Prefix => value.starts_with(&target),
            AttributeOperator::Suffix => value.ends_with(&target),
            AttributeOperator::Substring => value.contains(&target),
        }
    }
}

/// Simple compound-selector parser
struct SelectorParser {
    input: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> Result<Vec<SelectorPart>> {
        let mut parts = Vec::new();

        while self.pos < self.input.len() {
            match self.peek() {
                Some('#') => {
                    self.advance();
                    parts.push(SelectorPart::Id(self.read_identifier()?));
                }
                Some('.') => {
                    self.advance();
                    parts.push(SelectorPart::Class(self.read_identifier()?));
                }
                Some('[') => {
                    parts.push(SelectorPart::Attribute(self.parse_attribute()?));
                }
                Some('*') => {
                    self.advance();
                    parts.push(SelectorPart::Universal);
                }
                Some(c) if c.is_alphabetic() || c == '_' || c == '-' => {
                    parts.push(SelectorPart::Tag(self.read_identifier()?.to_lowercase()));
                }
                Some(c) => {
                    return Err(Error::selector(
                        self.input.iter().collect::<String>(),
                        format!("unexpected character '{}'", c),
                    ));
                }
                None => break,
            }
        }

        if parts.is_empty() {
            return Err(Error::selector(
                self.input.iter().collect::<String>(),
                "no selector parts",
            ));
        }

        Ok(parts)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> Result<String> {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if result.is_empty() {
            return Err(Error::selector(
                self.input.iter().collect::<String>(),
                "expected identifier",
            ));
        }
        Ok(result)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector> {
        self.advance(); // consume '['
        self.skip_whitespace();
        let name = self.read_identifier()?;
        self.skip_whitespace();

        let mut operator = None;
        let mut value = None;
        let mut case_insensitive = false;

        if let Some(c) = self.peek() {
            if c != ']' {
                let op = match c {
                    '=' => {
                        self.advance();
                        AttributeOperator::Equals
                    }
                    '~' => {
                        self.advance();
                        self.expect('=')?;
                        AttributeOperator::Includes
                    }
                    '|' => {
                        self.advance();
                        self.expect('=')?;
                        AttributeOperator::DashMatch
                    }
                    '^' => {
                        self.advance();
                        self.expect('=')?;
                        AttributeOperator::Prefix
                    }
                    '$' => {
                        self.advance();
                        self.expect('=')?;
                        AttributeOperator::Suffix
                    }
                    '*' => {
                        self.advance();
                        self.expect('=')?;
                        AttributeOperator::Substring
                    }
                    _ => {
                        return Err(Error::selector(
                            self.input.iter().collect::<String>(),
                            format!("unknown operator '{}'", c),
                        ))
                    }
                };
                operator = Some(op);

                self.skip_whitespace();
                value = Some(self.read_string_or_ident()?);
                self.skip_whitespace();

                if let Some('i') | Some('I') = self.peek() {
                    case_insensitive = true;
                    self.advance();
                    self.skip_whitespace();
                }
            }
        }

        self.expect(']')?;

        Ok(AttributeSelector {
            name,
            operator,
            value,
            case_insensitive,
        })
    }

    fn read_string_or_ident(&mut self) -> Result<String> {
        match self.peek() {
            Some('"') | Some('\'') => {
                let quote = self.advance().unwrap_or('"');
                let mut result = String::new();
                while let Some(c) = self.advance() {
                    if c == quote {
                        break;
                    }
                    if c == '\\' {
                        if let Some(escaped) = self.advance() {
                            result.push(escaped);
                        }
                    } else {
                        result.push(c);
                    }
                }
                Ok(result)
            }
            _ => self.read_identifier(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(Error::selector(
                self.input.iter().collect::<String>(),
                format!("expected '{}', got '{}'", expected, c),
            )),
            None => Err(Error::selector(
                self.input.iter().collect::<String>(),
                format!("expected '{}', got end of input", expected),
            )),
        }
    }
}
