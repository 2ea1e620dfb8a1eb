// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS-like selector engine.
//!
//! ## Grammar
//!
//! - Compound: an optional type (`button`) or universal (`*`) selector followed by any
//!   number of `#id` and `.class` parts, e.g. `button.primary#save`.
//! - Descendant combinator: whitespace between compounds, e.g. `.toolbar .save`.
//! - Selector list: alternatives separated by `,`, e.g. `#a, .b`.
//!
//! Matching runs right to left: the last compound must match the node itself, and each
//! preceding compound must match some ancestor further up.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Document;
use crate::types::NodeId;

/// Errors produced by [`Selector::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector (or one alternative of a list) has no compounds.
    Empty,
    /// A `#` or `.` was not followed by a name.
    MissingName {
        /// Byte offset of the marker.
        at: usize,
    },
    /// A character that is not part of the supported grammar.
    Unexpected {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        at: usize,
    },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty selector"),
            Self::MissingName { at } => write!(f, "expected a name after marker at {at}"),
            Self::Unexpected { ch, at } => write!(f, "unexpected character {ch:?} at {at}"),
        }
    }
}

impl core::error::Error for SelectorError {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty()
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag
            && tag != "*"
            && *tag != el.tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.id.as_deref() != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| el.has_class(c))
    }
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    // Each alternative is a descendant chain; the last compound is the subject.
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        let mut chain: Vec<Compound> = Vec::new();
        let mut current = Compound::default();
        let mut chars = input.char_indices().peekable();

        while let Some((at, ch)) = chars.next() {
            match ch {
                '#' | '.' => {
                    let mut name = String::new();
                    while let Some(&(_, c)) = chars.peek() {
                        if !is_name_char(c) {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    if name.is_empty() {
                        return Err(SelectorError::MissingName { at });
                    }
                    if ch == '#' {
                        current.id = Some(name);
                    } else {
                        current.classes.push(name);
                    }
                }
                '*' if current.is_empty() => current.tag = Some(String::from("*")),
                c if is_name_char(c) && current.is_empty() => {
                    let mut name = String::new();
                    name.push(c);
                    while let Some(&(_, c)) = chars.peek() {
                        if !is_name_char(c) {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    current.tag = Some(name);
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        chain.push(core::mem::take(&mut current));
                    }
                }
                ',' => {
                    if !current.is_empty() {
                        chain.push(core::mem::take(&mut current));
                    }
                    if chain.is_empty() {
                        return Err(SelectorError::Empty);
                    }
                    alternatives.push(core::mem::take(&mut chain));
                }
                ch => return Err(SelectorError::Unexpected { ch, at }),
            }
        }
        if !current.is_empty() {
            chain.push(current);
        }
        if chain.is_empty() {
            return Err(SelectorError::Empty);
        }
        alternatives.push(chain);
        Ok(Self { alternatives })
    }

    /// Returns true if `node` matches any alternative of this selector.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|chain| Self::chain_matches(chain, doc, node))
    }

    fn chain_matches(chain: &[Compound], doc: &Document, node: NodeId) -> bool {
        let Some((subject, ancestors)) = chain.split_last() else {
            return false;
        };
        if !subject.matches(doc, node) {
            return false;
        }
        // Greedy is exact for descendant-only chains.
        let mut cursor = doc.parent(node);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = cursor else {
                    return false;
                };
                cursor = doc.parent(candidate);
                if compound.matches(doc, candidate) {
                    break;
                }
            }
        }
        true
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
