//! Parser for the textual type expressions used in catalog files and on the
//! command line.
//!
//! ```text
//! expr  := '?' | ident ( '<' expr ( ',' expr )* '>' )?
//! ident := [A-Za-z_$] [A-Za-z0-9_$.]*
//! ```
//!
//! Whitespace between tokens is ignored. Whether an identifier names a
//! declaration or one of the declaring type's parameters is decided later,
//! when the expression is lowered against a catalog.

use gentype_common::limits::MAX_TYPE_EXPR_DEPTH;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    /// `?`: an unbound argument.
    Unbound,
    Named { name: String, args: Vec<TypeExpr> },
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Unbound => f.write_str("?"),
            TypeExpr::Named { name, args } => {
                f.write_str(name)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeExprError {
    #[error("unexpected end of type expression `{input}`")]
    UnexpectedEnd { input: String },

    #[error("unexpected `{found}` at offset {offset} in type expression `{input}`")]
    Unexpected {
        input: String,
        offset: usize,
        found: char,
    },

    #[error("type expression `{input}` nests deeper than {limit} levels")]
    TooDeep { input: String, limit: u32 },
}

/// Parse a complete type expression; trailing input is an error.
pub fn parse_type_expr(input: &str) -> Result<TypeExpr, TypeExprError> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().peekable(),
    };
    let expr = parser.expr(0)?;
    parser.skip_whitespace();
    match parser.chars.peek() {
        None => Ok(expr),
        Some(&(offset, found)) => Err(parser.unexpected(offset, found)),
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn expr(&mut self, depth: u32) -> Result<TypeExpr, TypeExprError> {
        if depth > MAX_TYPE_EXPR_DEPTH {
            return Err(TypeExprError::TooDeep {
                input: self.input.to_string(),
                limit: MAX_TYPE_EXPR_DEPTH,
            });
        }
        self.skip_whitespace();
        let Some(&(offset, first)) = self.chars.peek() else {
            return Err(self.end());
        };
        if first == '?' {
            self.chars.next();
            return Ok(TypeExpr::Unbound);
        }
        if !is_ident_start(first) {
            return Err(self.unexpected(offset, first));
        }

        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if !is_ident_continue(c) {
                break;
            }
            name.push(c);
            self.chars.next();
        }

        self.skip_whitespace();
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.expr(depth + 1)?);
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ',')) => continue,
                    Some((_, '>')) => break,
                    Some((offset, found)) => return Err(self.unexpected(offset, found)),
                    None => return Err(self.end()),
                }
            }
        }
        Ok(TypeExpr::Named { name, args })
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, c)| c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn end(&self) -> TypeExprError {
        TypeExprError::UnexpectedEnd {
            input: self.input.to_string(),
        }
    }

    fn unexpected(&self, offset: usize, found: char) -> TypeExprError {
        TypeExprError::Unexpected {
            input: self.input.to_string(),
            offset,
            found,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}
