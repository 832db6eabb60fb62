use crate::{
    dom::tree::ElementTree,
    foundation::core::NodeId,
    foundation::error::{UnveilError, UnveilResult},
};

/// One simple-selector sequence: `tag`, `#id`, `.class`, `*`, or any
/// combination of them without whitespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, tree: &ElementTree, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if !tree.tag(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if tree.id_attr(node) != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| tree.has_class(node, c))
    }
}

/// Compounds joined by descendant combinators, stored left-to-right.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    parts: Vec<Compound>,
}

impl Complex {
    /// Matched right-to-left: the last compound must match the node itself,
    /// each earlier compound some strict ancestor, in order.
    fn matches(&self, tree: &ElementTree, node: NodeId) -> bool {
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !subject.matches(tree, node) {
            return false;
        }

        let mut current = node;
        for compound in ancestors.iter().rev() {
            let mut found = false;
            while let Some(parent) = tree.parent(current) {
                current = parent;
                if compound.matches(tree, current) {
                    found = true;
                    break;
                }
            }
            if !found {
                return false;
            }
        }
        true
    }
}

/// A parsed CSS-like selector.
///
/// Supported grammar: universal (`*`), tag, `#id`, `.class`, compound
/// selectors (`li.card#hero`), the descendant combinator (whitespace), and
/// comma-separated selector lists. Anything else is a parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
    source: String,
}

impl Selector {
    /// Parse `input` into a selector.
    pub fn parse(input: &str) -> UnveilResult<Selector> {
        if input.trim().is_empty() {
            return Err(UnveilError::selector("selector must be non-empty"));
        }

        let mut alternatives = Vec::new();
        for alt in input.split(',') {
            let alt = alt.trim();
            if alt.is_empty() {
                return Err(UnveilError::selector(format!(
                    "empty alternative in selector list '{input}'"
                )));
            }
            let parts = alt
                .split_whitespace()
                .map(parse_compound)
                .collect::<UnveilResult<Vec<_>>>()?;
            alternatives.push(Complex { parts });
        }

        Ok(Selector {
            alternatives,
            source: input.trim().to_string(),
        })
    }

    /// The selector text this value was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches any alternative.
    pub fn matches(&self, tree: &ElementTree, node: NodeId) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(tree, node))
    }

    /// Every descendant of `scope` matching this selector, in document
    /// order. `scope` itself is never returned.
    pub fn query_all(&self, tree: &ElementTree, scope: NodeId) -> Vec<NodeId> {
        tree.descendants(scope)
            .into_iter()
            .filter(|node| self.matches(tree, *node))
            .collect()
    }
}

fn parse_compound(part: &str) -> UnveilResult<Compound> {
    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();

    fn take_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
        let mut name = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_alphanumeric() || *c == '-' || *c == '_' {
                name.push(*c);
                chars.next();
            } else {
                break;
            }
        }
        name
    }

    if chars.peek() == Some(&'*') {
        chars.next();
        compound.universal = true;
    } else if chars.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
        compound.tag = Some(take_name(&mut chars));
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return Err(UnveilError::selector(format!("empty id in '{part}'")));
                }
                if compound.id.replace(name).is_some() {
                    return Err(UnveilError::selector(format!(
                        "multiple ids in compound '{part}'"
                    )));
                }
            }
            '.' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return Err(UnveilError::selector(format!("empty class in '{part}'")));
                }
                compound.classes.push(name);
            }
            other => {
                return Err(UnveilError::selector(format!(
                    "unexpected '{other}' in selector '{part}'"
                )));
            }
        }
    }

    if !compound.universal
        && compound.tag.is_none()
        && compound.id.is_none()
        && compound.classes.is_empty()
    {
        return Err(UnveilError::selector(format!(
            "compound selector '{part}' matches nothing"
        )));
    }
    Ok(compound)
}

#[cfg(test)]
#[path = "../../tests/unit/dom/selector.rs"]
mod tests;
