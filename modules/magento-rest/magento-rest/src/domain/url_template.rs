//! URL template parsing and evaluation.
//!
//! A pattern is either a literal path or an expression wrapped in `={{ ... }}`:
//!
//! ```text
//! expr := term ('+' term)*
//! term := "text" | 'text' | $parameter["name"] | $parameter['name']
//! ```
//!
//! Patterns are parsed once at registry build. Evaluation only concatenates
//! literal text and stringified parameter values, so a value containing quotes
//! or `+` is never re-interpreted.

use std::iter::Peekable;
use std::str::Chars;

use serde_json::Value;

use super::error::DomainError;
use super::params::ItemParameters;
use super::values::{is_present, to_plain_string};

const EXPR_OPEN: &str = "={{";
const EXPR_CLOSE: &str = "}}";
const PARAMETER_REF: &str = "$parameter[";

/// How a path reference without a usable value is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathParameterPolicy {
    /// Missing or empty references render as the empty string.
    #[default]
    Permissive,
    /// Missing or empty references fail with `MissingParameter`.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Text(String),
    Parameter(String),
}

/// A parsed URL pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTemplate {
    Literal(String),
    Expression(Vec<Term>),
}

impl UrlTemplate {
    /// Parse a URL pattern.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidUrlTemplate` if an expression pattern does
    /// not follow the grammar.
    pub fn parse(pattern: &str) -> Result<Self, DomainError> {
        let Some(inner) = pattern
            .strip_prefix(EXPR_OPEN)
            .and_then(|rest| rest.strip_suffix(EXPR_CLOSE))
        else {
            return Ok(Self::Literal(pattern.to_owned()));
        };

        let mut parser = Parser {
            pattern,
            chars: inner.chars().peekable(),
        };
        parser.expression().map(Self::Expression)
    }

    /// Parameter names referenced by the template, in order of appearance.
    pub fn parameters(&self) -> Vec<&str> {
        match self {
            Self::Literal(_) => Vec::new(),
            Self::Expression(terms) => terms
                .iter()
                .filter_map(|t| match t {
                    Term::Parameter(name) => Some(name.as_str()),
                    Term::Text(_) => None,
                })
                .collect(),
        }
    }

    /// Render the template for one item.
    ///
    /// # Errors
    /// Under `PathParameterPolicy::Strict`, returns `MissingParameter` for a
    /// reference with no usable value, or for a required field the host did
    /// not supply (its declared default is not used). Resolver errors (e.g. a type violation)
    /// propagate under either policy.
    pub fn evaluate(&self, params: &ItemParameters<'_>) -> Result<String, DomainError> {
        let terms = match self {
            Self::Literal(url) => return Ok(url.clone()),
            Self::Expression(terms) => terms,
        };

        let mut url = String::new();
        for term in terms {
            match term {
                Term::Text(text) => url.push_str(text),
                Term::Parameter(name) => {
                    let value = match params.path_policy() {
                        PathParameterPolicy::Permissive => params.get_or(name, Value::Null)?,
                        PathParameterPolicy::Strict => {
                            if params.is_required(name) && !params.is_supplied(name) {
                                return Err(DomainError::missing_parameter(name.as_str()));
                            }
                            let value = params.get(name)?;
                            if !is_present(&value) {
                                return Err(DomainError::missing_parameter(name.as_str()));
                            }
                            value
                        }
                    };
                    url.push_str(&to_plain_string(&value));
                }
            }
        }
        Ok(url)
    }
}

struct Parser<'a> {
    pattern: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn expression(&mut self) -> Result<Vec<Term>, DomainError> {
        let mut terms = vec![self.term()?];
        loop {
            self.skip_whitespace();
            match self.chars.next() {
                None => return Ok(terms),
                Some('+') => terms.push(self.term()?),
                Some(c) => return Err(self.error(format!("unexpected '{c}' after term"))),
            }
        }
    }

    fn term(&mut self) -> Result<Term, DomainError> {
        self.skip_whitespace();
        match self.chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                self.quoted(quote).map(Term::Text)
            }
            Some('$') => {
                for expected in PARAMETER_REF.chars() {
                    if self.chars.next() != Some(expected) {
                        return Err(self.error("expected $parameter[...] reference"));
                    }
                }
                let name = match self.chars.next() {
                    Some(quote @ ('"' | '\'')) => self.quoted(quote)?,
                    _ => return Err(self.error("parameter name must be quoted")),
                };
                if self.chars.next() != Some(']') {
                    return Err(self.error("unclosed parameter reference"));
                }
                if name.is_empty() {
                    return Err(self.error("empty parameter name"));
                }
                Ok(Term::Parameter(name))
            }
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
            None => Err(self.error("expected a term")),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, DomainError> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.error("unterminated string literal")),
                Some('\\') => match self.chars.next() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(self.error("dangling escape")),
                },
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn error(&self, message: impl Into<String>) -> DomainError {
        DomainError::invalid_url_template(self.pattern, message)
    }
}
