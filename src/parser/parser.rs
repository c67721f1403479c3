//! Parser state and grammar primitives
//!
//! The [`Parser`] owns the token stream of one file together with its
//! indentation stack. Grammar rules in [`super::grammar`] are written as
//! methods over this state and return `Result<_, SyntaxError>`.

use text_size::{TextRange, TextSize};

use super::errors::{ErrorCode, ParseContext, SyntaxError};
use super::indent::{IndentError, IndentStack};
use super::lexer::{Token, tokenize};
use super::literal::unquote;
use super::syntax_kind::SyntaxKind;
use crate::base::{LineIndex, Position};

use smol_str::SmolStr;

/// Parser state for one source text
pub(crate) struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    line_index: LineIndex,
    indent: IndentStack,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            line_index: LineIndex::new(source),
            indent: IndentStack::new(),
        }
    }

    // =========================================================================
    // Token inspection (inline whitespace is skipped, newlines are not)
    // =========================================================================

    fn significant_index(&self, n: usize) -> Option<usize> {
        self.tokens[self.pos..]
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind != SyntaxKind::WHITESPACE)
            .nth(n)
            .map(|(i, _)| self.pos + i)
    }

    /// The `n`-th upcoming token, skipping inline whitespace
    pub(crate) fn nth(&self, n: usize) -> Option<&Token<'a>> {
        self.significant_index(n).map(|i| &self.tokens[i])
    }

    pub(crate) fn peek(&self) -> Option<&Token<'a>> {
        self.nth(0)
    }

    pub(crate) fn peek_kind(&self) -> Option<SyntaxKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// At an identifier spelled `keyword`
    pub(crate) fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .map(|t| t.kind == SyntaxKind::IDENT && t.text == keyword)
            .unwrap_or(false)
    }

    /// At `keyword` followed by `:`
    pub(crate) fn at_section(&self, keyword: &str) -> bool {
        self.at_keyword(keyword)
            && self.nth(1).map(|t| t.kind == SyntaxKind::COLON).unwrap_or(false)
    }

    /// At `@name`
    pub(crate) fn at_decorator(&self) -> bool {
        self.at(SyntaxKind::AT)
    }

    /// Nothing but an optional comment before the next newline
    pub(crate) fn at_line_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            None | Some(SyntaxKind::NEWLINE) | Some(SyntaxKind::COMMENT)
        )
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consume the next significant token
    pub(crate) fn bump(&mut self) -> Option<Token<'a>> {
        let index = self.significant_index(0)?;
        self.pos = index + 1;
        Some(self.tokens[index].clone())
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> Option<Token<'a>> {
        if self.at(kind) { self.bump() } else { None }
    }

    pub(crate) fn expect(
        &mut self,
        kind: SyntaxKind,
        context: ParseContext,
    ) -> Result<Token<'a>, SyntaxError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => {
                let code = if kind == SyntaxKind::COLON {
                    ErrorCode::E0307
                } else {
                    ErrorCode::E0902
                };
                Err(self.error_here(
                    code,
                    format!("expected {}, found {} {}", kind.describe(), self.found(), context),
                ))
            }
        }
    }

    pub(crate) fn expect_keyword(
        &mut self,
        keyword: &str,
        context: ParseContext,
    ) -> Result<Token<'a>, SyntaxError> {
        if self.at_keyword(keyword)
            && let Some(token) = self.bump()
        {
            return Ok(token);
        }
        Err(self.error_here(
            ErrorCode::E0902,
            format!("expected '{}', found {} {}", keyword, self.found(), context),
        ))
    }

    // =========================================================================
    // Locations and errors
    // =========================================================================

    pub(crate) fn position(&self, offset: TextSize) -> Position {
        self.line_index.position(offset)
    }

    /// Offset of the next significant token, or the end of input
    pub(crate) fn offset(&self) -> TextSize {
        self.peek()
            .map(|t| t.offset)
            .unwrap_or_else(|| TextSize::of(self.source))
    }

    /// Describe the next token for error messages
    pub(crate) fn found(&self) -> String {
        match self.peek() {
            None => "end of input".to_string(),
            Some(t) if t.kind == SyntaxKind::NEWLINE => "end of line".to_string(),
            Some(t) => format!("'{}'", t.text),
        }
    }

    pub(crate) fn error_at(
        &self,
        range: TextRange,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> SyntaxError {
        SyntaxError::new(message, code, range, self.position(range.start()))
    }

    /// Error located at the next significant token
    pub(crate) fn error_here(&self, code: ErrorCode, message: impl Into<String>) -> SyntaxError {
        let range = self
            .peek()
            .map(|t| t.range())
            .unwrap_or_else(|| TextRange::empty(TextSize::of(self.source)));
        self.error_at(range, code, message)
    }

    // =========================================================================
    // Lines and indentation
    // =========================================================================

    /// Skip whitespace, comments and newlines up to the next significant token
    pub(crate) fn skip_blank_lines(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .map(|t| t.kind.is_trivia())
            .unwrap_or(false)
        {
            self.pos += 1;
        }
    }

    /// Consume an optional trailing comment and the line break
    pub(crate) fn expect_end_of_line(&mut self, context: ParseContext) -> Result<(), SyntaxError> {
        self.eat(SyntaxKind::COMMENT);
        if self.at_eof() || self.eat(SyntaxKind::NEWLINE).is_some() {
            return Ok(());
        }
        Err(self.error_here(
            ErrorCode::E0206,
            format!("unexpected {} {}", self.found(), context),
        ))
    }

    /// Column of the next significant token (1-based)
    pub(crate) fn column(&self) -> Option<usize> {
        self.peek().map(|t| self.position(t.offset).column)
    }

    #[cfg(test)]
    pub(crate) fn indent_level(&self) -> usize {
        self.indent.top()
    }

    /// The next non-blank line starts to the right of the current block
    pub(crate) fn at_indented_line(&mut self) -> bool {
        self.skip_blank_lines();
        self.column()
            .map(|column| column > self.indent.top())
            .unwrap_or(false)
    }

    /// Open a block on the next non-blank line
    pub(crate) fn expect_indent(&mut self, context: ParseContext) -> Result<(), SyntaxError> {
        self.skip_blank_lines();
        let Some(column) = self.column() else {
            return Err(self.error_here(
                ErrorCode::E0201,
                format!("expected an indented block {}, found end of input", context),
            ));
        };
        self.indent
            .enter(column)
            .map_err(|err| self.indent_error(err, context))
    }

    /// Close the innermost block; end of input always closes it
    pub(crate) fn expect_undent(&mut self, context: ParseContext) -> Result<(), SyntaxError> {
        self.skip_blank_lines();
        let column = self.column();
        self.indent
            .leave(column)
            .map_err(|err| self.indent_error(err, context))
    }

    /// Another item of the current block follows.
    ///
    /// Items sit exactly at the block column; a deeper line is an error, a
    /// shallower one ends the block.
    pub(crate) fn at_block_item(&mut self, context: ParseContext) -> Result<bool, SyntaxError> {
        self.skip_blank_lines();
        let Some(column) = self.column() else {
            return Ok(false);
        };
        let level = self.indent.top();
        if column > level {
            return Err(self
                .error_here(
                    ErrorCode::E0203,
                    format!(
                        "unexpected indentation {}: column {} is deeper than the block at column {}",
                        context, column, level
                    ),
                )
                .with_hint("items of one block must start at the same column"));
        }
        Ok(column == level)
    }

    /// Parse an indented block whose items are produced by `item`.
    pub(crate) fn block<T>(
        &mut self,
        context: ParseContext,
        mut item: impl FnMut(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<Vec<T>, SyntaxError> {
        self.expect_indent(context)?;
        let mut items = Vec::new();
        while self.at_block_item(context)? {
            items.push(item(self)?);
        }
        self.expect_undent(context)?;
        Ok(items)
    }

    fn indent_error(&self, err: IndentError, context: ParseContext) -> SyntaxError {
        let code = match err {
            IndentError::NotASubentry { .. } => ErrorCode::E0201,
            IndentError::NotAnUndent { .. } => ErrorCode::E0202,
        };
        self.error_here(code, format!("{} {}", err, context))
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Identifier with an optional `[0]` / `[n]` marker written directly after it
    pub(crate) fn json_id(&mut self, context: ParseContext) -> Result<(SmolStr, TextRange), SyntaxError> {
        let Some(ident) = self.eat(SyntaxKind::IDENT) else {
            return Err(self.error_here(
                ErrorCode::E0301,
                format!("expected a field identifier, found {} {}", self.found(), context),
            ));
        };
        let mut range = ident.range();
        let marker = self.tokens.get(self.pos..self.pos + 3).and_then(|t| {
            let adjacent = t[0].kind == SyntaxKind::L_BRACKET && t[0].offset == ident.end();
            let inner = matches!(
                (t[1].kind, t[1].text),
                (SyntaxKind::INTEGER, "0") | (SyntaxKind::IDENT, "n")
            );
            (adjacent && inner && t[2].kind == SyntaxKind::R_BRACKET).then(|| t[2].end())
        });
        let mut name = String::from(ident.text);
        if let Some(end) = marker {
            self.pos += 3;
            name.push_str(&self.source[usize::from(ident.end())..usize::from(end)]);
            range = TextRange::new(range.start(), end);
        }
        Ok((SmolStr::new(name), range))
    }

    /// Plain identifier
    pub(crate) fn ident(&mut self, context: ParseContext) -> Result<Token<'a>, SyntaxError> {
        self.expect(SyntaxKind::IDENT, context)
    }

    /// `a.b.c`, returned as written
    pub(crate) fn dotted_name(&mut self, context: ParseContext) -> Result<(String, TextRange), SyntaxError> {
        let first = self.ident(context)?;
        let mut range = first.range();
        while self.at(SyntaxKind::DOT)
            && self.nth(1).map(|t| t.kind == SyntaxKind::IDENT).unwrap_or(false)
        {
            self.bump();
            if let Some(segment) = self.bump() {
                range = range.cover(segment.range());
            }
        }
        Ok((self.source[range].to_string(), range))
    }

    /// Single- or double-quoted string with escapes processed
    pub(crate) fn quoted_string(&mut self, context: ParseContext) -> Result<(String, TextRange), SyntaxError> {
        if self.at(SyntaxKind::ERROR) && self.peek().map(|t| t.text.starts_with(['"', '\''])).unwrap_or(false) {
            return Err(self.error_here(ErrorCode::E0102, format!("unterminated string literal {}", context)));
        }
        let token = self.expect(SyntaxKind::STRING, context)?;
        Ok((unquote(token.text), token.range()))
    }

    /// Quoted or triple-quoted documentation string
    pub(crate) fn doc_string(&mut self, context: ParseContext) -> Result<(String, TextRange), SyntaxError> {
        if let Some(token) = self.eat(SyntaxKind::TRIPLE_STRING) {
            return Ok((unquote(token.text), token.range()));
        }
        self.quoted_string(context)
    }

    /// Text of a balanced group starting at the next token, delimiters included.
    ///
    /// Nested groups of any kind must be closed in order; string tokens never
    /// count as delimiters.
    pub(crate) fn balanced(
        &mut self,
        open: SyntaxKind,
        context: ParseContext,
    ) -> Result<(&'a str, TextRange), SyntaxError> {
        let start = self.expect(open, context)?;
        let end = self.scan_group(&start, context)?;
        let range = TextRange::new(start.offset, end);
        Ok((&self.source[range], range))
    }

    /// Inner text of a parenthesized argument list, trimmed
    pub(crate) fn arguments(&mut self, context: ParseContext) -> Result<(&'a str, TextRange), SyntaxError> {
        let (text, range) = self.balanced(SyntaxKind::L_PAREN, context)?;
        Ok((text[1..text.len() - 1].trim(), range))
    }

    /// Advance past the group opened by `open` (already consumed); returns the
    /// end offset of its closing delimiter.
    fn scan_group(&mut self, open: &Token<'a>, context: ParseContext) -> Result<TextSize, SyntaxError> {
        let mut stack = vec![(open.kind, open.range())];
        while let Some(token) = self.tokens.get(self.pos).cloned() {
            self.pos += 1;
            if token.kind.is_open_delimiter() {
                stack.push((token.kind, token.range()));
                continue;
            }
            if !matches!(
                token.kind,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE
            ) {
                continue;
            }
            let Some((opener, _)) = stack.pop() else {
                break;
            };
            if opener.closing_delimiter() != Some(token.kind) {
                return Err(self.error_at(
                    token.range(),
                    ErrorCode::E0205,
                    format!(
                        "expected {} but found '{}' {}",
                        opener.closing_delimiter().map(SyntaxKind::describe).unwrap_or("')'"),
                        token.text,
                        context
                    ),
                ));
            }
            if stack.is_empty() {
                return Ok(token.end());
            }
        }
        let (opener, range) = stack.last().copied().unwrap_or((open.kind, open.range()));
        Err(self
            .error_at(
                range,
                ErrorCode::E0204,
                format!("unclosed {} {}", opener.describe(), context),
            )
            .with_hint("every opening delimiter needs a matching closing one"))
    }

    /// A host-language expression, captured as raw text.
    ///
    /// The expression runs to the end of the logical line: line breaks inside
    /// open brackets, braces or parentheses continue it. A trailing comment is
    /// not part of the expression.
    pub(crate) fn expr(&mut self, context: ParseContext) -> Result<(String, TextRange), SyntaxError> {
        let Some(first) = self.peek().cloned() else {
            return Err(self.error_here(ErrorCode::E0401, format!("expected an expression {}", context)));
        };
        if self.at_line_end() {
            return Err(self.error_here(
                ErrorCode::E0401,
                format!("expected an expression, found {} {}", self.found(), context),
            ));
        }
        let start = first.offset;
        let mut end = first.offset;
        loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                break;
            };
            match token.kind {
                SyntaxKind::NEWLINE | SyntaxKind::COMMENT => break,
                SyntaxKind::WHITESPACE => self.pos += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    return Err(self.error_at(
                        token.range(),
                        ErrorCode::E0205,
                        format!("unexpected '{}' {}", token.text, context),
                    ));
                }
                kind if kind.is_open_delimiter() => {
                    self.pos += 1;
                    end = self.scan_group(&token, context)?;
                }
                _ => {
                    self.pos += 1;
                    end = token.end();
                }
            }
        }
        let range = TextRange::new(start, end);
        Ok((self.source[range].trim().to_string(), range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_id_with_marker() {
        let mut p = Parser::new("authors[0]:");
        let (id, range) = p.json_id(ParseContext::RuleHeader).unwrap();
        assert_eq!(id, "authors[0]");
        assert_eq!(range, TextRange::new(0.into(), 10.into()));
        assert!(p.at(SyntaxKind::COLON));
    }

    #[test]
    fn test_json_id_marker_must_be_adjacent() {
        let mut p = Parser::new("authors [n]");
        let (id, _) = p.json_id(ParseContext::RuleHeader).unwrap();
        assert_eq!(id, "authors");
        assert!(p.at(SyntaxKind::L_BRACKET));
    }

    #[test]
    fn test_json_id_other_subscript_is_not_a_marker() {
        let mut p = Parser::new("authors[1]");
        let (id, _) = p.json_id(ParseContext::RuleHeader).unwrap();
        assert_eq!(id, "authors");
    }

    #[test]
    fn test_balanced_nested() {
        let mut p = Parser::new("(a, (b, [c]), ')') tail");
        let (text, _) = p.balanced(SyntaxKind::L_PAREN, ParseContext::Decorator).unwrap();
        assert_eq!(text, "(a, (b, [c]), ')')");
        assert!(p.at_keyword("tail"));
    }

    #[test]
    fn test_balanced_unclosed() {
        let mut p = Parser::new("(a, (b)\n");
        let err = p.balanced(SyntaxKind::L_PAREN, ParseContext::Decorator).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0204);
        assert_eq!(err.column(), 1);
    }

    #[test]
    fn test_balanced_mismatched() {
        let mut p = Parser::new("(a]");
        let err = p.balanced(SyntaxKind::L_PAREN, ParseContext::Decorator).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0205);
    }

    #[test]
    fn test_arguments_are_trimmed() {
        let mut p = Parser::new("( 'a', 1 )");
        let (text, _) = p.arguments(ParseContext::Decorator).unwrap();
        assert_eq!(text, "'a', 1");
    }

    #[test]
    fn test_expr_rest_of_line_without_comment() {
        let mut p = Parser::new("value[0] + 1  # note\nnext");
        let (text, _) = p.expr(ParseContext::CreatorBlock).unwrap();
        assert_eq!(text, "value[0] + 1");
        assert!(p.at(SyntaxKind::COMMENT));
    }

    #[test]
    fn test_expr_continues_inside_brackets() {
        let mut p = Parser::new("{'a': value['a'],\n     'b': value['b']}\nnext");
        let (text, _) = p.expr(ParseContext::CreatorBlock).unwrap();
        assert_eq!(text, "{'a': value['a'],\n     'b': value['b']}");
        assert!(p.at(SyntaxKind::NEWLINE));
    }

    #[test]
    fn test_expr_empty_is_an_error() {
        let mut p = Parser::new("   # nothing\n");
        let err = p.expr(ParseContext::DerivedBlock).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0401);
    }

    #[test]
    fn test_block_items_and_undent() {
        let source = "head:\n    a\n    b\nnext\n";
        let mut p = Parser::new(source);
        p.ident(ParseContext::TopLevel).unwrap();
        p.expect(SyntaxKind::COLON, ParseContext::TopLevel).unwrap();
        p.expect_end_of_line(ParseContext::TopLevel).unwrap();
        let items = p
            .block(ParseContext::RuleBody, |p| {
                let token = p.ident(ParseContext::RuleBody)?;
                p.expect_end_of_line(ParseContext::RuleBody)?;
                Ok(token.text.to_string())
            })
            .unwrap();
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(p.indent_level(), 1);
        assert!(p.at_keyword("next"));
    }

    #[test]
    fn test_block_requires_indentation() {
        let mut p = Parser::new("head:\nnext\n");
        p.ident(ParseContext::TopLevel).unwrap();
        p.expect(SyntaxKind::COLON, ParseContext::TopLevel).unwrap();
        p.expect_end_of_line(ParseContext::TopLevel).unwrap();
        let err = p.block(ParseContext::RuleBody, |p| p.ident(ParseContext::RuleBody)).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0201);
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_deeper_item_is_unexpected_indentation() {
        let mut p = Parser::new("head:\n  a\n    b\n");
        p.ident(ParseContext::TopLevel).unwrap();
        p.expect(SyntaxKind::COLON, ParseContext::TopLevel).unwrap();
        p.expect_end_of_line(ParseContext::TopLevel).unwrap();
        let err = p
            .block(ParseContext::RuleBody, |p| {
                let token = p.ident(ParseContext::RuleBody)?;
                p.expect_end_of_line(ParseContext::RuleBody)?;
                Ok(token)
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::E0203);
        assert_eq!(err.position, Position::new(3, 5));
    }

    #[test]
    fn test_end_of_line_rejects_trailing_content() {
        let mut p = Parser::new("x y\n");
        p.ident(ParseContext::RuleHeader).unwrap();
        let err = p.expect_end_of_line(ParseContext::RuleHeader).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0206);
    }
}
