//! CSS selector matching
//!
//! Supports the subset the frontend scripts rely on: type, universal,
//! `#id`, `.class`, attribute selectors (`[a]`, `=`, `~=`, `^=`, `$=`,
//! `*=`), `:not(<compound>)`, the descendant and child combinators, and
//! comma-separated lists.

use std::str::FromStr;

use crate::{DomTree, NodeId};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character {found:?} at offset {offset} in `{source_text}`")]
    UnexpectedChar {
        found: char,
        offset: usize,
        source_text: String,
    },

    #[error("unexpected end of selector `{0}`")]
    UnexpectedEnd(String),

    #[error("unsupported pseudo-class `:{0}`")]
    UnsupportedPseudo(String),
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(String),
    Class(String),
    Attr { name: String, op: AttrOp },
    Not(Box<Compound>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Includes(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

impl Selector {
    /// Parse a selector list
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        Parser::new(text).parse_list()
    }

    /// Check whether an element matches any alternative
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.element(node).is_some()
            && self.alternatives.iter().any(|c| c.matches_at(tree, node, c.compounds.len() - 1))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Complex {
    fn matches_at(&self, tree: &DomTree, node: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(tree, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|p| self.matches_at(tree, p, idx - 1)),
            Combinator::Descendant => tree
                .ancestors(node)
                .filter(|&a| tree.element(a).is_some())
                .any(|a| self.matches_at(tree, a, idx - 1)),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.conditions.is_empty()
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(elem) = tree.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !elem.is(tag) {
                return false;
            }
        }
        self.conditions.iter().all(|cond| match cond {
            Condition::Id(id) => elem.id() == Some(id.as_str()),
            Condition::Class(class) => elem.has_class(class),
            Condition::Attr { name, op } => match (elem.get_attr(name), op) {
                (None, _) => false,
                (Some(_), AttrOp::Exists) => true,
                (Some(v), AttrOp::Equals(want)) => v == want,
                (Some(v), AttrOp::Includes(want)) => v.split_whitespace().any(|t| t == want),
                (Some(v), AttrOp::Prefix(want)) => !want.is_empty() && v.starts_with(want.as_str()),
                (Some(v), AttrOp::Suffix(want)) => !want.is_empty() && v.ends_with(want.as_str()),
                (Some(v), AttrOp::Substring(want)) => !want.is_empty() && v.contains(want.as_str()),
            },
            Condition::Not(inner) => !inner.matches(tree, node),
        })
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::UnexpectedChar {
                found,
                offset: self.pos,
                source_text: self.source.to_string(),
            },
            None => SelectorError::UnexpectedEnd(self.source.to_string()),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        if self.peek() == Some(want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_list(mut self) -> Result<Selector, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }
        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => {
                    self.pos += 1;
                }
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }
        Ok(Complex { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut universal = false;
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                universal = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.conditions.push(Condition::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    compound.conditions.push(Condition::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.conditions.push(self.parse_attr()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.conditions.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }
        if compound.is_empty() && !universal {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_attr(&mut self) -> Result<Condition, SelectorError> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.bump() {
            Some(']') => return Ok(Condition::Attr { name, op: AttrOp::Exists }),
            Some('=') => AttrOp::Equals as fn(String) -> AttrOp,
            Some(c @ ('~' | '^' | '$' | '*')) => {
                self.expect('=')?;
                match c {
                    '~' => AttrOp::Includes,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            Some(_) => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
            None => return Err(self.unexpected()),
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != q) {
                    self.pos += 1;
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.expect(q)?;
                value
            }
            _ => self.parse_ident()?,
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(Condition::Attr { name, op: op(value) })
    }

    fn parse_pseudo(&mut self) -> Result<Condition, SelectorError> {
        let name = self.parse_ident()?.to_ascii_lowercase();
        if name != "not" {
            return Err(SelectorError::UnsupportedPseudo(name));
        }
        self.expect('(')?;
        self.skip_ws();
        let inner = self.parse_compound()?;
        self.skip_ws();
        self.expect(')')?;
        Ok(Condition::Not(Box::new(inner)))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let wrapper = tree.create_element("div");
        tree.set_attr(wrapper, "data-type", "currency");
        tree.set_attr(wrapper, "class", "form-group autocomplete-wrapper");
        let input = tree.create_element("input");
        tree.set_attr(input, "type", "text");
        let nested = tree.create_element("span");
        let select = tree.create_element("select");
        tree.append_child(tree.root(), wrapper);
        tree.append_child(wrapper, input);
        tree.append_child(wrapper, nested);
        tree.append_child(nested, select);
        (tree, wrapper, input, select)
    }

    #[test]
    fn test_child_combinator_with_attrs() {
        let (tree, _, input, _) = fixture();
        let sel = Selector::parse(r#"[data-type="currency"] > input[type="text"]"#).unwrap();
        assert!(sel.matches(&tree, input));

        let sel = Selector::parse(r#"[data-type="percentage"] > input[type="text"]"#).unwrap();
        assert!(!sel.matches(&tree, input));
    }

    #[test]
    fn test_descendant_vs_child() {
        let (tree, _, _, select) = fixture();
        assert!(Selector::parse(".autocomplete-wrapper select").unwrap().matches(&tree, select));
        assert!(!Selector::parse(".autocomplete-wrapper > select").unwrap().matches(&tree, select));
        assert!(Selector::parse("div > span > select").unwrap().matches(&tree, select));
    }

    #[test]
    fn test_not_and_list() {
        let (tree, wrapper, input, _) = fixture();
        let sel = Selector::parse("div:not(.open), input").unwrap();
        assert!(sel.matches(&tree, wrapper));
        assert!(sel.matches(&tree, input));
        assert!(!Selector::parse("div:not(.form-group)").unwrap().matches(&tree, wrapper));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(Selector::parse("div >"), Err(SelectorError::UnexpectedEnd(_))));
        assert!(matches!(Selector::parse("a:hover"), Err(SelectorError::UnsupportedPseudo(p)) if p == "hover"));
        assert!(matches!(Selector::parse("[type=\"text\""), Err(SelectorError::UnexpectedEnd(_))));
        assert!(matches!(Selector::parse("div,,p"), Err(SelectorError::UnexpectedChar { found: ',', .. })));
    }
}
