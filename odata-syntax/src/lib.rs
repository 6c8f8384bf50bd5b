//! # OData-style filter parser
//!
//! `odata-syntax` turns filter strings such as `name eq 'Naveen' and age gt 30`
//! into a typed expression tree. Every field reference is checked against a
//! [`FieldResolver`] while parsing, so a successfully parsed [`Filter`] only
//! contains physical field names the backend knows about.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! OrExpr   := AndExpr ( "or" AndExpr )*
//! AndExpr  := CmpExpr ( "and" CmpExpr )*
//! CmpExpr  := "(" OrExpr ")" | Field Operator Literal
//! ```
//!
//! ## Example
//! ```
//! use odata_syntax::{parse_filter, CompareOp, Expr, Literal};
//!
//! let resolver = |scope: &str, field: &str| match (scope, field) {
//!     ("log_*", "name") => Some("newName".to_string()),
//!     ("log_*", "age") => Some("person.age".to_string()),
//!     _ => None,
//! };
//!
//! let filter = parse_filter("name eq 'Naveen' and age gt 30", "log_*", &resolver).unwrap();
//! let Expr::And(parts) = &filter.expr else { panic!() };
//! // parser preserves the original order
//! assert!(matches!(&parts[0], Expr::Comparison(c) if c.field == "newName" && c.op == CompareOp::Eq));
//! assert!(matches!(&parts[1], Expr::Comparison(c) if c.value == Literal::Number(30.0)));
//! ```

mod resolver;
mod tokenizer;

pub use resolver::FieldResolver;
pub use tokenizer::{Token, tokenize};

use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Parses `input` in [`ParseMode::Strict`], resolving field names in `scope`.
pub fn parse_filter<R>(input: &str, scope: &str, resolver: &R) -> Result<Filter, ParseError>
where
    R: FieldResolver + ?Sized,
{
    parse_filter_with(input, scope, resolver, ParseMode::Strict)
}

/// Parses `input` with an explicit [`ParseMode`].
pub fn parse_filter_with<R>(
    input: &str,
    scope: &str,
    resolver: &R,
    mode: ParseMode,
) -> Result<Filter, ParseError>
where
    R: FieldResolver + ?Sized,
{
    Parser::new(input, scope, resolver, mode).parse()
}

/// A parsed filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub expr: Expr,
}

/// Boolean structure of a filter.
///
/// `And`/`Or` hold flat vectors in source order and always have at least two
/// children: a chain with a single operand is returned as that operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `field op value`.
    ///
    /// ```
    /// use odata_syntax::{parse_filter, Expr};
    /// let resolver = |_: &str, f: &str| Some(f.to_uppercase());
    /// let expr = parse_filter("a le 3", "idx", &resolver).unwrap().expr;
    /// assert!(matches!(expr, Expr::Comparison(c) if c.field == "A"));
    /// ```
    Comparison(Comparison),
    /// Conjunction built from the `and` keyword.
    ///
    /// ```
    /// use odata_syntax::{parse_filter, Expr};
    /// let resolver = |_: &str, f: &str| Some(f.to_string());
    /// let Expr::And(parts) = parse_filter("a eq 1 and b eq 2", "idx", &resolver).unwrap().expr else { panic!() };
    /// assert_eq!(parts.len(), 2);
    /// ```
    And(Vec<Expr>),
    /// Disjunction built from the `or` keyword.
    ///
    /// ```
    /// use odata_syntax::{parse_filter, Expr};
    /// let resolver = |_: &str, f: &str| Some(f.to_string());
    /// let Expr::Or(parts) = parse_filter("a eq 1 or b eq 2", "idx", &resolver).unwrap().expr else { panic!() };
    /// assert_eq!(parts.len(), 2);
    /// ```
    Or(Vec<Expr>),
}

/// A single comparison with its field already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Physical field name returned by the resolver.
    pub field: String,
    /// The name as written in the filter.
    pub logical: String,
    pub op: CompareOp,
    pub value: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Operators are matched exactly as written; `EQ` is not `eq`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "eq" => Some(CompareOp::Eq),
            "ne" => Some(CompareOp::Ne),
            "gt" => Some(CompareOp::Gt),
            "ge" => Some(CompareOp::Ge),
            "lt" => Some(CompareOp::Lt),
            "le" => Some(CompareOp::Le),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
}

impl Literal {
    /// Classifies a raw value token.
    ///
    /// A token wrapped in single quotes is a string with the quotes removed
    /// and nothing unescaped. Anything else becomes a number when it parses as
    /// a finite float and stays a string otherwise.
    ///
    /// ```
    /// use odata_syntax::Literal;
    /// assert_eq!(Literal::coerce("'42'"), Literal::String("42".into()));
    /// assert_eq!(Literal::coerce("42"), Literal::Number(42.0));
    /// assert_eq!(Literal::coerce("abc"), Literal::String("abc".into()));
    /// ```
    pub fn coerce(raw: &str) -> Self {
        if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
            return Literal::String(raw[1..raw.len() - 1].to_string());
        }
        match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => Literal::Number(number),
            _ => Literal::String(raw.to_string()),
        }
    }
}

/// How forgiving the parser is about structure around a valid expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Groups must be closed and every token must be consumed.
    #[default]
    Strict,
    /// A missing `)` is accepted and trailing tokens are ignored.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed filter: unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        expected: &'static str,
        position: usize,
    },
    #[error("Unsupported comparison operator: {operator}")]
    UnsupportedOperator { operator: String, position: usize },
    #[error("malformed filter: expected ')' to close the group opened at byte {open}")]
    UnclosedGroup { open: usize, position: usize },
    #[error("malformed filter: unexpected token '{token}'")]
    TrailingToken { token: String, position: usize },
    #[error(
        "Invalid filter field '{field}'. Please check that it is present in the backend field configuration"
    )]
    UnresolvedField { field: String, position: usize },
}

impl ParseError {
    /// Byte offset in the filter string the error refers to.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedEnd { position, .. }
            | ParseError::UnsupportedOperator { position, .. }
            | ParseError::UnclosedGroup { position, .. }
            | ParseError::TrailingToken { position, .. }
            | ParseError::UnresolvedField { position, .. } => *position,
        }
    }

    /// `false` only for field resolution misses.
    pub fn is_syntax(&self) -> bool {
        !matches!(self, ParseError::UnresolvedField { .. })
    }
}

/// Recursive-descent parser over an eagerly built token list with a single
/// token of lookahead.
struct Parser<'a, 'r, R: ?Sized> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    input_len: usize,
    scope: &'r str,
    resolver: &'r R,
    mode: ParseMode,
}

impl<'a, 'r, R> Parser<'a, 'r, R>
where
    R: FieldResolver + ?Sized,
{
    fn new(input: &'a str, scope: &'r str, resolver: &'r R, mode: ParseMode) -> Self {
        Self {
            tokens: tokenize(input),
            pos: 0,
            input_len: input.len(),
            scope,
            resolver,
            mode,
        }
    }

    fn parse(mut self) -> Result<Filter, ParseError> {
        let expr = self.parse_or()?;
        if let Some(token) = self.peek() {
            match self.mode {
                ParseMode::Strict => {
                    return Err(ParseError::TrailingToken {
                        token: token.text.to_string(),
                        position: token.offset,
                    });
                }
                ParseMode::Lenient => {
                    debug!(remaining = self.tokens.len() - self.pos, "ignoring trailing tokens");
                }
            }
        }
        Ok(Filter { expr })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut parts = vec![self.parse_and()?];
        while self.consume("or").is_some() {
            parts.push(self.parse_and()?);
        }
        Ok(collapse(parts, Expr::Or))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut parts = vec![self.parse_comparison()?];
        while self.consume("and").is_some() {
            parts.push(self.parse_comparison()?);
        }
        Ok(collapse(parts, Expr::And))
    }

    // The field is resolved before the operator is read, so an unknown field
    // wins over a bad operator in the same comparison.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        if let Some(open) = self.consume("(") {
            let expr = self.parse_or()?;
            if self.consume(")").is_none() && self.mode == ParseMode::Strict {
                return Err(ParseError::UnclosedGroup {
                    open: open.offset,
                    position: self.position(),
                });
            }
            return Ok(expr);
        }

        let name = self.advance("a field name")?;
        let Some(field) = self.resolver.resolve(self.scope, name.text) else {
            debug!(scope = self.scope, field = name.text, "filter field did not resolve");
            return Err(ParseError::UnresolvedField {
                field: name.text.to_string(),
                position: name.offset,
            });
        };

        let op_token = self.advance("a comparison operator")?;
        let op = CompareOp::from_keyword(op_token.text).ok_or_else(|| {
            ParseError::UnsupportedOperator {
                operator: op_token.text.to_string(),
                position: op_token.offset,
            }
        })?;

        let value = Literal::coerce(self.advance("a value")?.text);
        let comparison = Comparison {
            field,
            logical: name.text.to_string(),
            op,
            value,
        };
        debug!(?comparison, "parsed comparison");
        Ok(Expr::Comparison(comparison))
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn consume(&mut self, keyword: &str) -> Option<Token<'a>> {
        let token = self.peek().filter(|token| token.is(keyword))?;
        self.pos += 1;
        Some(token)
    }

    fn advance(&mut self, expected: &'static str) -> Result<Token<'a>, ParseError> {
        let token = self.peek().ok_or(ParseError::UnexpectedEnd {
            expected,
            position: self.input_len,
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.input_len, |token| token.offset)
    }
}

fn collapse(mut parts: Vec<Expr>, combine: fn(Vec<Expr>) -> Expr) -> Expr {
    if parts.len() == 1 {
        if let Some(only) = parts.pop() {
            return only;
        }
    }
    let combined = combine(parts);
    debug!(expr = ?combined, "combined operands");
    combined
}
