//! Literal payload evaluation
//!
//! Decorator payloads such as `@inherit_from(...)`, `@legacy(...)` or
//! `@master_format(...)` are captured as raw text and turned into values
//! here. Only literals are understood: strings, numbers, booleans, `None`,
//! and nested lists, tuples and dicts. Anything else is rejected, nothing is
//! ever executed.

use text_size::TextSize;

use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;

/// A literal value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Elements of a list or tuple
    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// A single string or a sequence of strings, as a list
    pub fn to_string_list(&self) -> Option<Vec<String>> {
        match self {
            Self::Str(s) => Some(vec![s.clone()]),
            Self::List(items) | Self::Tuple(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => None,
        }
    }

    /// Short name of the value's type for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::None => "None",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Dict(_) => "dict",
        }
    }
}

/// A literal that does not fit the literal grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub message: String,
    /// Offset relative to the start of the evaluated text
    pub offset: TextSize,
}

impl LiteralError {
    fn new(message: impl Into<String>, offset: TextSize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.message, u32::from(self.offset))
    }
}

impl std::error::Error for LiteralError {}

/// Evaluate `text` as a single literal.
pub fn parse_literal(text: &str) -> Result<Literal, LiteralError> {
    let tokens: Vec<_> = tokenize(text)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .collect();
    let mut parser = LiteralParser {
        tokens: &tokens,
        pos: 0,
        end: TextSize::of(text),
    };
    let value = parser.value()?;
    if let Some(token) = parser.current() {
        return Err(LiteralError::new(
            format!("unexpected '{}' after literal", token.text),
            token.offset,
        ));
    }
    Ok(value)
}

/// Strip the quotes of a single- or triple-quoted string token.
///
/// Single-quoted strings have their escapes processed; triple-quoted
/// strings are returned verbatim.
pub fn unquote(token_text: &str) -> String {
    for quotes in ["\"\"\"", "'''"] {
        if token_text.len() >= 6 && token_text.starts_with(quotes) && token_text.ends_with(quotes)
        {
            return token_text[3..token_text.len() - 3].to_string();
        }
    }
    if token_text.len() >= 2 {
        unescape(&token_text[1..token_text.len() - 1])
    } else {
        String::new()
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(q @ ('\\' | '\'' | '"')) => out.push(q),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// String prefixes that may precede a quote (`u'...'`, `r"..."`)
const STRING_PREFIXES: [&str; 4] = ["u", "U", "r", "R"];

struct LiteralParser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    end: TextSize,
}

impl<'t, 'a> LiteralParser<'t, 'a> {
    fn current(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_offset(&self) -> TextSize {
        self.current().map(|t| t.offset).unwrap_or(self.end)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current().map(|t| t.kind == kind).unwrap_or(false)
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        let Some(token) = self.current() else {
            return Err(LiteralError::new("expected a literal", self.end));
        };
        match token.kind {
            SyntaxKind::STRING | SyntaxKind::TRIPLE_STRING => Ok(Literal::Str(self.strings())),
            SyntaxKind::INTEGER | SyntaxKind::FLOAT => self.number(false),
            SyntaxKind::MINUS => {
                self.pos += 1;
                self.number(true)
            }
            SyntaxKind::IDENT => self.name(token),
            SyntaxKind::L_PAREN => self.tuple(),
            SyntaxKind::L_BRACKET => {
                self.pos += 1;
                let items = self.items(SyntaxKind::R_BRACKET)?.0;
                Ok(Literal::List(items))
            }
            SyntaxKind::L_BRACE => self.dict(),
            _ => Err(LiteralError::new(
                format!("'{}' is not a literal", token.text),
                token.offset,
            )),
        }
    }

    /// Adjacent string literals concatenate
    fn strings(&mut self) -> String {
        let mut out = String::new();
        while let Some(token) = self.current() {
            if !matches!(token.kind, SyntaxKind::STRING | SyntaxKind::TRIPLE_STRING) {
                break;
            }
            out.push_str(&unquote(token.text));
            self.pos += 1;
        }
        out
    }

    fn number(&mut self, negative: bool) -> Result<Literal, LiteralError> {
        let offset = self.current_offset();
        let Some(token) = self.current() else {
            return Err(LiteralError::new("expected a number", offset));
        };
        let text = if negative {
            format!("-{}", token.text)
        } else {
            token.text.to_string()
        };
        let literal = match token.kind {
            SyntaxKind::INTEGER => text.parse().map(Literal::Int).ok(),
            SyntaxKind::FLOAT => text.parse().map(Literal::Float).ok(),
            _ => None,
        };
        let literal = literal
            .ok_or_else(|| LiteralError::new(format!("invalid number '{}'", text), offset))?;
        self.pos += 1;
        Ok(literal)
    }

    fn name(&mut self, token: &'t Token<'a>) -> Result<Literal, LiteralError> {
        let literal = match token.text {
            "True" => Literal::Bool(true),
            "False" => Literal::Bool(false),
            "None" => Literal::None,
            prefix if STRING_PREFIXES.contains(&prefix) => {
                let next = self.tokens.get(self.pos + 1);
                match next {
                    Some(next) if next.kind == SyntaxKind::STRING && next.offset == token.end() => {
                        self.pos += 1;
                        return Ok(Literal::Str(self.strings()));
                    }
                    _ => return Err(not_a_literal(token)),
                }
            }
            _ => return Err(not_a_literal(token)),
        };
        self.pos += 1;
        Ok(literal)
    }

    /// `()` is an empty tuple, `(x)` is just `x`, `(x,)` and `(x, y)` are tuples
    fn tuple(&mut self) -> Result<Literal, LiteralError> {
        self.pos += 1;
        let (mut items, trailing_comma) = self.items(SyntaxKind::R_PAREN)?;
        if items.len() == 1 && !trailing_comma {
            Ok(items.remove(0))
        } else {
            Ok(Literal::Tuple(items))
        }
    }

    /// Comma separated values up to `close`; reports whether a comma was seen
    /// after the last value.
    fn items(&mut self, close: SyntaxKind) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            if self.eat(close) {
                return Ok((items, trailing_comma));
            }
            items.push(self.value()?);
            trailing_comma = self.eat(SyntaxKind::COMMA);
            if !trailing_comma && !self.at(close) {
                return Err(LiteralError::new(
                    format!("expected ',' or {}", close.describe()),
                    self.current_offset(),
                ));
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.pos += 1;
        let mut entries = Vec::new();
        loop {
            if self.eat(SyntaxKind::R_BRACE) {
                return Ok(Literal::Dict(entries));
            }
            let key = self.value()?;
            if !self.eat(SyntaxKind::COLON) {
                return Err(LiteralError::new(
                    "expected ':' after dict key",
                    self.current_offset(),
                ));
            }
            let value = self.value()?;
            entries.push((key, value));
            if !self.eat(SyntaxKind::COMMA) && !self.at(SyntaxKind::R_BRACE) {
                return Err(LiteralError::new(
                    "expected ',' or '}'",
                    self.current_offset(),
                ));
            }
        }
    }
}

fn not_a_literal(token: &Token<'_>) -> LiteralError {
    LiteralError::new(
        format!("'{}' is not a literal; only literal values are allowed", token.text),
        token.offset,
    )
}
