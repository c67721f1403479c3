//! Parse context tracking for context-aware error messages
//!
//! The grammar passes the context of the block it is in so that errors read
//! "expected ',' in creator block" instead of a bare token complaint.

/// Represents the current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    /// At the top level of a file
    TopLevel,
    /// Parsing a rule header (`json_id, aliases:`)
    RuleHeader,
    /// Inside a rule body
    RuleBody,
    /// Inside a `creator:` block
    CreatorBlock,
    /// Inside a `derived:` block
    DerivedBlock,
    /// Inside a `calculated:` block
    CalculatedBlock,
    /// Inside a `checker:` block
    CheckerBlock,
    /// Inside a `producer:` block
    ProducerBlock,
    /// Inside a `documentation:` block
    DocumentationBlock,
    /// Inside a model `fields:` block
    ModelFields,
    /// Parsing a decorator payload
    Decorator,
}

impl ParseContext {
    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "at top level",
            Self::RuleHeader => "in rule header",
            Self::RuleBody => "in rule body",
            Self::CreatorBlock => "in creator block",
            Self::DerivedBlock => "in derived block",
            Self::CalculatedBlock => "in calculated block",
            Self::CheckerBlock => "in checker block",
            Self::ProducerBlock => "in producer block",
            Self::DocumentationBlock => "in documentation block",
            Self::ModelFields => "in fields block",
            Self::Decorator => "in decorator",
        }
    }
}

impl std::fmt::Display for ParseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_description() {
        assert_eq!(ParseContext::CreatorBlock.description(), "in creator block");
        assert_eq!(ParseContext::ModelFields.to_string(), "in fields block");
    }
}
