//! Filename templates: `{variable}_{domain}_{startdate}-{enddate}.{suffix}`.
//!
//! A [`Template`] is compiled once into alternating literal and field pieces. Formatting
//! walks the pieces and fills each field. For parsing, the pieces are also compiled
//! into an anchored regular expression with one lazy capture group per field, so a
//! filename is matched in time linear in its length however many separators it holds.
//!
//! Two fields with nothing between them cannot be told apart when parsing, so such
//! patterns are rejected at construction with [`CatalogError::AmbiguousTemplate`].

use crate::error::{CatalogError, Result};
use crate::model::AttributeMap;
use regex::Regex;

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    /// Index into `Template::names`
    Field(usize),
}

#[derive(Debug, Clone)]
pub struct Template {
    pattern: String,
    pieces: Vec<Piece>,
    names: Vec<String>,
    defaults: AttributeMap,
    matcher: Regex,
    /// Name index of each capture group, in group order
    groups: Vec<usize>,
}

impl Template {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        let invalid = |reason: &str| CatalogError::InvalidTemplate {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(invalid("unmatched '}'")),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(invalid("nested '{'")),
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("unterminated placeholder")),
                        }
                    }
                    if name.is_empty() || !name.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
                    {
                        return Err(invalid(&format!("bad placeholder name '{}'", name)));
                    }

                    if literal.is_empty() {
                        if let Some(Piece::Field(prev)) = pieces.last() {
                            return Err(CatalogError::AmbiguousTemplate {
                                pattern: pattern.to_string(),
                                first: names[*prev].clone(),
                                second: name,
                            });
                        }
                    } else {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }

                    let idx = match names.iter().position(|n| *n == name) {
                        Some(idx) => idx,
                        None => {
                            names.push(name);
                            names.len() - 1
                        }
                    };
                    pieces.push(Piece::Field(idx));
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        let (matcher, groups) = compile(&pieces).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            pieces,
            names,
            defaults: AttributeMap::new(),
            matcher,
            groups,
        })
    }

    /// Declares fallback values used by [`format`](Self::format) when the caller
    /// does not supply one. Defaults for names the pattern does not contain are ignored.
    pub fn with_defaults(mut self, defaults: AttributeMap) -> Self {
        self.defaults = defaults
            .into_iter()
            .filter(|(k, _)| self.names.contains(k))
            .collect();
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Distinct placeholder names in first-occurrence order.
    pub fn pattern_names(&self) -> &[String] {
        &self.names
    }

    pub fn defaults(&self) -> &AttributeMap {
        &self.defaults
    }

    /// Fills every placeholder from `values`, then the declared defaults, then `wildcard`.
    ///
    /// Names in `values` that the template does not declare are ignored.
    pub fn format_with(&self, values: &AttributeMap, wildcard: &str) -> String {
        let mut out = String::with_capacity(self.pattern.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field(idx) => {
                    let name = &self.names[*idx];
                    let fill = values
                        .get(name)
                        .or_else(|| self.defaults.get(name))
                        .map(String::as_str)
                        .unwrap_or(wildcard);
                    out.push_str(fill);
                }
            }
        }
        out
    }

    /// [`format_with`](Self::format_with) using the `*` wildcard.
    pub fn format(&self, values: &AttributeMap) -> String {
        self.format_with(values, WILDCARD)
    }

    /// Splits `concrete` on the template's literal text and returns one value per
    /// declared name, in declared order.
    ///
    /// Field values are non-empty. Where a separator occurs more than once the
    /// shortest value that still lets the rest of the string match is taken. A name
    /// used twice must capture the same text both times.
    pub fn parse(&self, concrete: &str) -> Result<AttributeMap> {
        let mismatch = || CatalogError::ParseMismatch {
            template: self.pattern.clone(),
            input: concrete.to_string(),
        };
        let captures = self.matcher.captures(concrete).ok_or_else(mismatch)?;

        let mut bound: Vec<Option<&str>> = vec![None; self.names.len()];
        for (group, idx) in self.groups.iter().enumerate() {
            let value = captures
                .get(group + 1)
                .map(|m| m.as_str())
                .ok_or_else(mismatch)?;
            if bound[*idx].is_some_and(|existing| existing != value) {
                return Err(mismatch());
            }
            bound[*idx] = Some(value);
        }

        Ok(self
            .names
            .iter()
            .zip(bound)
            .map(|(name, value)| (name.clone(), value.unwrap_or_default().to_string()))
            .collect())
    }
}

/// Anchored expression for `pieces`: literals escaped, one `(.+?)` per field.
fn compile(pieces: &[Piece]) -> std::result::Result<(Regex, Vec<usize>), regex::Error> {
    let mut source = String::from("(?s)^");
    let mut groups = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Literal(text) => source.push_str(&regex::escape(text)),
            Piece::Field(idx) => {
                source.push_str("(.+?)");
                groups.push(*idx);
            }
        }
    }
    source.push('$');
    Ok((Regex::new(&source)?, groups))
}
