//! Logos-based lexer for field and model definition files
//!
//! Every byte of the input ends up in exactly one token, so raw expression
//! text can always be sliced back out of the source.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Byte range covered by this token
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }

    /// Offset one past the last byte of this token
    pub fn end(&self) -> TextSize {
        self.range().end()
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Consume a triple-quoted string body up to and including the closing quotes.
fn triple_quoted(lex: &mut logos::Lexer<LogosToken>, quotes: &str) -> bool {
    match lex.remainder().find(quotes) {
        Some(end) => {
            lex.bump(end + quotes.len());
            true
        }
        None => false,
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    #[regex(r"\r?\n|\r")]
    Newline,

    #[regex(r"#[^\r\n]*")]
    Comment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,

    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\r\n]|\\.)*'"#)]
    String,

    #[token("\"\"\"", |lex| triple_quoted(lex, "\"\"\""))]
    #[token("'''", |lex| triple_quoted(lex, "'''"))]
    TripleString,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("@")]
    At,
    #[token("-")]
    Minus,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            Newline => SyntaxKind::NEWLINE,
            Comment => SyntaxKind::COMMENT,

            Ident => SyntaxKind::IDENT,
            Integer => SyntaxKind::INTEGER,
            Float => SyntaxKind::FLOAT,
            String => SyntaxKind::STRING,
            TripleString => SyntaxKind::TRIPLE_STRING,

            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            Comma => SyntaxKind::COMMA,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Eq => SyntaxKind::EQ,
            At => SyntaxKind::AT,
            Minus => SyntaxKind::MINUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_creator_line() {
        let tokens = tokenize("MARC, \"245__a\", value[0]");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::COMMA,
                SyntaxKind::WHITESPACE,
                SyntaxKind::STRING,
                SyntaxKind::COMMA,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
                SyntaxKind::L_BRACKET,
                SyntaxKind::INTEGER,
                SyntaxKind::R_BRACKET,
            ]
        );
        assert_eq!(tokens[3].text, "\"245__a\"");
        assert_eq!(tokens[6].offset, TextSize::new(16));
    }

    #[test]
    fn test_lex_comment_and_newline() {
        assert_eq!(
            kinds("# comment\ntitle"),
            vec![SyntaxKind::COMMENT, SyntaxKind::NEWLINE, SyntaxKind::IDENT]
        );
    }

    #[test]
    fn test_lex_triple_quoted_spans_lines() {
        let tokens = tokenize("\"\"\"first\nsecond\"\"\" x");
        assert_eq!(tokens[0].kind, SyntaxKind::TRIPLE_STRING);
        assert_eq!(tokens[0].text, "\"\"\"first\nsecond\"\"\"");
        assert_eq!(tokens[2].kind, SyntaxKind::IDENT);
    }

    #[test]
    fn test_lex_string_with_escape_and_hash() {
        let tokens = tokenize(r#"'it\'s # not a comment'"#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, SyntaxKind::STRING);
    }

    #[test]
    fn test_lex_unknown_characters_are_error_tokens() {
        let kinds = kinds("a + b");
        assert!(kinds.contains(&SyntaxKind::ERROR));
    }

    #[test]
    fn test_every_byte_is_covered() {
        let input = "x = {'a': [1, 2.5]} # tail\n\t@y";
        let joined: String = tokenize(input).iter().map(|t| t.text).collect();
        assert_eq!(joined, input);
    }
}
