//! Token kinds produced by the lexer
//!
//! The configuration DSL is line oriented, so newlines are tokens of their
//! own rather than whitespace trivia.

/// All token kinds of the field and model definition languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (skipped by the grammar, except NEWLINE at line boundaries)
    // =========================================================================
    WHITESPACE = 0,
    NEWLINE,
    COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,         // identifier
    INTEGER,       // 42
    FLOAT,         // 3.14
    STRING,        // "hello" or 'hello'
    TRIPLE_STRING, // """hello"""

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,   // (
    R_PAREN,   // )
    L_BRACKET, // [
    R_BRACKET, // ]
    L_BRACE,   // {
    R_BRACE,   // }
    COMMA,     // ,
    COLON,     // :
    DOT,       // .
    EQ,        // =
    AT,        // @
    MINUS,     // -

    /// Any character the DSL has no token for. Legal inside raw expressions.
    ERROR,
}

impl SyntaxKind {
    /// Whitespace or comment, never a line boundary
    pub fn is_inline_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }

    /// Whitespace, comment or newline
    pub fn is_trivia(self) -> bool {
        self.is_inline_trivia() || self == Self::NEWLINE
    }

    /// Opening delimiter of a balanced group
    pub fn is_open_delimiter(self) -> bool {
        matches!(self, Self::L_PAREN | Self::L_BRACKET | Self::L_BRACE)
    }

    /// Closing delimiter matching this opening delimiter
    pub fn closing_delimiter(self) -> Option<SyntaxKind> {
        match self {
            Self::L_PAREN => Some(Self::R_PAREN),
            Self::L_BRACKET => Some(Self::R_BRACKET),
            Self::L_BRACE => Some(Self::R_BRACE),
            _ => None,
        }
    }

    /// Human readable description used in error messages
    pub fn describe(self) -> &'static str {
        match self {
            Self::WHITESPACE => "whitespace",
            Self::NEWLINE => "end of line",
            Self::COMMENT => "comment",
            Self::IDENT => "identifier",
            Self::INTEGER => "integer",
            Self::FLOAT => "number",
            Self::STRING => "quoted string",
            Self::TRIPLE_STRING => "triple-quoted string",
            Self::L_PAREN => "'('",
            Self::R_PAREN => "')'",
            Self::L_BRACKET => "'['",
            Self::R_BRACKET => "']'",
            Self::L_BRACE => "'{'",
            Self::R_BRACE => "'}'",
            Self::COMMA => "','",
            Self::COLON => "':'",
            Self::DOT => "'.'",
            Self::EQ => "'='",
            Self::AT => "'@'",
            Self::MINUS => "'-'",
            Self::ERROR => "unexpected character",
        }
    }
}
